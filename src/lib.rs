//! seoqa - Interactive SEO and image alt-text QA reports
//!
//! A QA report has one tab per audited page. Each tab holds an SEO factor
//! table (current value, comment, proposed fix) and, when the page has
//! images, an Image Alt table (alt text as-is, verdict, proposed alt text).
//!
//! # Overview
//!
//! Reviewers edit comments and proposals on a live page. Comments that say
//! anything other than "no issue" are highlighted, proposal lengths are
//! counted for length-checked factors, alt verdicts toggle with a click and
//! the Alt table sorts by verdict. When review is done the report is frozen
//! into a static HTML copy or an Excel workbook.
//!
//! # Quick Start
//!
//! ```no_run
//! use seoqa::{AuditInput, Event, LiveReport};
//!
//! let input = AuditInput::load("audit.json")?;
//! let mut live = LiveReport::new(input.build());
//!
//! live.dispatch(&Event::Edit { id: "t0-seo-0-comment".into(), text: "too long".into() })?;
//! live.dispatch(&Event::Click { id: "t0-alt-sort-3".into() })?;
//!
//! let export = seoqa::report::html::export_static(live.report());
//! std::fs::write(&export.file_name, export.html)?;
//! # Ok::<(), seoqa::ReportError>(())
//! ```
//!
//! # Modules
//!
//! - [`model`]: report, tabs, tables and rows; audit input
//! - [`events`]: element ids, handler registry and event dispatch
//! - [`highlight`], [`length`], [`sort`], [`tabs`]: the per-cell behaviors
//! - [`report`]: live page, static HTML and Excel output
//! - [`serve`]: local server for the live page
//! - [`config`]: settings file

pub mod config;
pub mod error;
pub mod events;
pub mod highlight;
pub mod length;
pub mod model;
pub mod report;
pub mod serve;
pub mod sort;
pub mod tabs;

pub use config::Config;
pub use error::{ReportError, Result};
pub use events::{Event, Handler, HandlerRegistry, LiveReport, Outcome};
pub use highlight::{AltVerdict, Status};
pub use model::{AuditInput, Report};
pub use sort::SortDirection;
pub use tabs::TabController;

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // PUBLIC API TESTS
    // ==========================================================================
    //
    // These tests verify the public API surface is re-exported from the root.
    // ==========================================================================

    #[test]
    fn test_public_exports() {
        let _: Status = Status::Ok;
        let _: SortDirection = SortDirection::Asc;
        let _ = Config::default();
        let _ = TabController::new(0);
    }

    #[test]
    fn test_empty_report_is_live() {
        let input = AuditInput { ticket_name: "T-1".into(), pages: vec![] };
        let live = LiveReport::new(input.build());
        assert_eq!(live.report().heading, "SEO QA Report - T-1");
        assert_eq!(live.report().active_tab(), None);
        assert!(live.handlers().is_empty());
    }

    #[test]
    fn test_verdict_variants() {
        assert_eq!(AltVerdict::NoIssue.label(), "이슈 없음");
        assert_eq!(AltVerdict::NeedsFix.label(), "수정 필요");
    }
}
