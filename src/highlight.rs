//! Issue/ok classification for QA cells
//!
//! Every reviewable cell in the report carries a [`Status`]. Cells with
//! `Status::Issue` get the `highlight-cell` class when rendered, both in the
//! live page and in the frozen export.
//!
//! Two kinds of cells are classified:
//!
//! - **Comment cells** (SEO table): free text. Anything other than an explicit
//!   "no issue" phrase counts as an issue.
//! - **Alt verdict toggles** (Alt table): a two-state switch between
//!   [`AltVerdict::NoIssue`] and [`AltVerdict::NeedsFix`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// CSS class that marks a highlighted cell
pub const HIGHLIGHT_CLASS: &str = "highlight-cell";

/// Comment texts (trimmed, lower-cased) that mean "nothing to fix"
pub const NO_ISSUE_PHRASES: &[&str] = &["이슈 없음", "n/a", ""];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Ok,
    Issue,
}

impl Status {
    pub fn from_issue(is_issue: bool) -> Self {
        if is_issue {
            Status::Issue
        } else {
            Status::Ok
        }
    }

    pub fn is_issue(self) -> bool {
        self == Status::Issue
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Issue => "issue",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record a status on a cell. Absent cells are skipped.
pub fn set_status(cell: Option<&mut Status>, is_issue: bool) {
    if let Some(status) = cell {
        *status = Status::from_issue(is_issue);
    }
}

/// True unless the comment is one of [`NO_ISSUE_PHRASES`]
pub fn comment_is_issue(text: &str) -> bool {
    let folded = text.trim().to_lowercase();
    !NO_ISSUE_PHRASES.contains(&folded.as_str())
}

/// Status of a comment cell
pub fn comment_status(text: &str) -> Status {
    Status::from_issue(comment_is_issue(text))
}

/// Two-state verdict on an image's alt text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltVerdict {
    NoIssue,
    NeedsFix,
}

impl AltVerdict {
    pub const NO_ISSUE_LABEL: &'static str = "이슈 없음";
    pub const NEEDS_FIX_LABEL: &'static str = "수정 필요";

    /// Default verdict for an image: blank alt text needs fixing
    pub fn for_alt_text(alt: &str) -> Self {
        if alt.trim().is_empty() {
            AltVerdict::NeedsFix
        } else {
            AltVerdict::NoIssue
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            AltVerdict::NoIssue => AltVerdict::NeedsFix,
            AltVerdict::NeedsFix => AltVerdict::NoIssue,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AltVerdict::NoIssue => Self::NO_ISSUE_LABEL,
            AltVerdict::NeedsFix => Self::NEEDS_FIX_LABEL,
        }
    }

    /// Parse a displayed label back into a verdict
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            Self::NO_ISSUE_LABEL => Some(AltVerdict::NoIssue),
            Self::NEEDS_FIX_LABEL => Some(AltVerdict::NeedsFix),
            _ => None,
        }
    }

    pub fn status(self) -> Status {
        Status::from_issue(self == AltVerdict::NeedsFix)
    }
}

impl fmt::Display for AltVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
