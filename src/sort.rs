//! Column sort for report tables
//!
//! Clicking a sortable header reorders the table body by that column's text.
//! Each header remembers its own direction. The stored direction starts as
//! `Desc` and is flipped before sorting, so the first click sorts ascending
//! and later clicks alternate.
//!
//! Comparison follows Korean dictionary order: Hangul syllables sort in
//! 가나다 order (their Unicode order after NFC composition), Latin letters
//! compare case-insensitively with lowercase first on ties.
//!
//! Ties keep their previous relative order (`sort_by` is stable).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use unicode_normalization::UnicodeNormalization;

/// Glyph shown on a sortable header that has not been clicked yet
pub const UNSORTED_GLYPH: &str = "↕";

/// Glyphs stripped from header text when exporting
pub const SORT_GLYPHS: &[char] = &['▲', '▼', '↕'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// Per-header sort directions of one table, keyed by column index
#[derive(Debug, Clone, Default, Serialize)]
pub struct SortState {
    directions: BTreeMap<usize, SortDirection>,
}

impl SortState {
    /// Direction after the last click, `None` if never clicked
    pub fn direction(&self, column: usize) -> Option<SortDirection> {
        self.directions.get(&column).copied()
    }

    /// Glyph to display on the header
    pub fn glyph(&self, column: usize) -> &'static str {
        self.direction(column)
            .map(SortDirection::glyph)
            .unwrap_or(UNSORTED_GLYPH)
    }

    /// Register a click on a header and return the direction to sort in
    pub fn click(&mut self, column: usize) -> SortDirection {
        let next = self.direction(column).unwrap_or_default().flip();
        self.directions.insert(column, next);
        next
    }
}

/// Compare two strings in Korean collation order
pub fn korean_compare(a: &str, b: &str) -> Ordering {
    let a: Vec<char> = a.nfc().collect();
    let b: Vec<char> = b.nfc().collect();

    let fold = |c: &char| c.to_lowercase();
    let primary = a.iter().flat_map(fold).cmp(b.iter().flat_map(fold));

    primary
        .then_with(|| case_order(&a, &b))
        .then_with(|| a.cmp(&b))
}

// Lowercase sorts before uppercase at the first case difference
fn case_order(a: &[char], b: &[char]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        if x != y {
            return match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => Ordering::Equal,
            };
        }
    }
    Ordering::Equal
}

/// Reorder rows in place by a text key
pub fn sort_rows<R, F>(rows: &mut [R], direction: SortDirection, key: F)
where
    F: Fn(&R) -> String,
{
    rows.sort_by(|a, b| {
        let ordering = korean_compare(key(a).trim(), key(b).trim());
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Remove sort glyphs from header text
pub fn strip_sort_glyphs(text: &str) -> String {
    text.replace(SORT_GLYPHS, "").trim().to_string()
}
