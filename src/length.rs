//! Character counters for length-checked SEO fields
//!
//! Titles and descriptions have search-engine display limits, so the report
//! shows a live character count next to the proposed fix for these factors.
//! Counts are UTF-16 code units, which is what the browser-side counter in
//! the live page measures, so both sides always agree.

/// Factors whose fix proposal gets a length counter
pub const LENGTH_CHECKED_FACTORS: &[&str] = &["Title", "Description", "OG Title", "OG Description"];

pub fn is_length_checked(factor: &str) -> bool {
    LENGTH_CHECKED_FACTORS.contains(&factor.trim())
}

/// Length of the displayed text
pub fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Counter cell text, e.g. `"42자"`
pub fn counter_text(text: &str) -> String {
    format!("{}자", text_length(text))
}

/// Refresh a row's counter from its field. Rows without a counter are skipped.
pub fn update_length(field: &str, counter: Option<&mut String>) {
    if let Some(counter) = counter {
        *counter = counter_text(field);
    }
}
