//! User events and their handlers
//!
//! The live page addresses interactive elements by element id (see
//! [`crate::model::element_id`]). At load time every id is registered with a
//! typed [`Handler`]; incoming [`Event`]s are looked up in that registry and
//! applied to the [`Report`].
//!
//! ```text
//! Event::Edit  { id: "t0-seo-3-comment", text }  → comment text + status
//! Event::Edit  { id: "t0-seo-0-fix", text }      → fix text + length counter
//! Event::Click { id: "t0-alt-2-toggle" }         → verdict toggle + status
//! Event::Click { id: "t0-alt-sort-3" }           → table sort
//! Event::Click { id: "tab-1" }                   → tab switch
//! ```

use crate::error::{ReportError, Result};
use crate::highlight::{self, AltVerdict, Status};
use crate::length;
use crate::model::{element_id, AltRow, AltTable, Report, SeoRow, ALT_HEADERS};
use crate::sort::{self, SortDirection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Text of an editable field changed
    Edit { id: String, text: String },
    /// A toggle, sortable header or tab button was clicked
    Click { id: String },
}

impl Event {
    pub fn id(&self) -> &str {
        match self {
            Event::Edit { id, .. } | Event::Click { id } => id,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Event::Edit { .. } => "edit",
            Event::Click { .. } => "click",
        }
    }
}

/// What an element does when it receives an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// SEO comment: edit updates text and status
    Comment { tab: usize, row: usize },
    /// SEO fix proposal: edit updates text and the counter if the row has one
    Fix { tab: usize, row: usize },
    /// Editable current value
    Current { tab: usize, row: usize },
    /// Alt verdict: click toggles
    AltToggle { tab: usize, row: usize },
    /// Alt text to-be
    AltToBe { tab: usize, row: usize },
    /// Sortable header of a tab's Alt table
    SortHeader { tab: usize, column: usize },
    /// Tab button
    TabButton { index: usize },
}

/// Result of handling an event, sent back to the live page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Cell {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<Status>,
        #[serde(skip_serializing_if = "Option::is_none")]
        counter: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    Sorted {
        id: String,
        direction: SortDirection,
        glyph: &'static str,
        /// Row ids in their new order
        order: Vec<usize>,
    },
    Tab {
        active: Option<usize>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Handler>,
}

impl HandlerRegistry {
    /// Register every interactive element of a report
    pub fn from_report(report: &Report) -> Self {
        let mut registry = Self::default();

        for (t, tab) in report.tabs.iter().enumerate() {
            registry.register(element_id::tab(t), Handler::TabButton { index: t });

            for row in &tab.seo.rows {
                registry.register(element_id::seo(t, row.id, element_id::COMMENT), Handler::Comment { tab: t, row: row.id });
                registry.register(element_id::seo(t, row.id, element_id::FIX), Handler::Fix { tab: t, row: row.id });
                if row.current_editable() {
                    registry.register(
                        element_id::seo(t, row.id, element_id::CURRENT),
                        Handler::Current { tab: t, row: row.id },
                    );
                }
            }

            if let Some(alt) = &tab.alt {
                for row in &alt.rows {
                    registry.register(element_id::alt(t, row.id, element_id::TOGGLE), Handler::AltToggle { tab: t, row: row.id });
                    registry.register(element_id::alt(t, row.id, element_id::TO_BE), Handler::AltToBe { tab: t, row: row.id });
                }
                for (column, _) in ALT_HEADERS.iter().enumerate().filter(|(_, h)| h.sortable) {
                    registry.register(element_id::alt_sort(t, column), Handler::SortHeader { tab: t, column });
                }
            }
        }

        debug!(handlers = registry.len(), "registered handlers");
        registry
    }

    pub fn register(&mut self, id: String, handler: Handler) {
        self.handlers.insert(id, handler);
    }

    pub fn get(&self, id: &str) -> Option<Handler> {
        self.handlers.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// A report together with its handler registry
#[derive(Debug, Clone)]
pub struct LiveReport {
    report: Report,
    handlers: HandlerRegistry,
}

impl LiveReport {
    /// Load a report: activate the first tab, register handlers and apply
    /// initial highlights and counters
    pub fn new(mut report: Report) -> Self {
        report.show_tab(0);
        init_fields(&mut report);
        let handlers = HandlerRegistry::from_report(&report);
        Self { report, handlers }
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    pub fn into_report(self) -> Report {
        self.report
    }

    /// Apply one event. Unknown ids and mismatched event kinds leave the
    /// report untouched.
    pub fn dispatch(&mut self, event: &Event) -> Result<Outcome> {
        let id = event.id();
        let handler = self.handlers.get(id).ok_or_else(|| {
            warn!(%id, "event for unknown element");
            ReportError::UnknownElement(id.to_string())
        })?;
        debug!(%id, ?handler, "dispatch");

        let report = &mut self.report;
        match (handler, event) {
            (Handler::Comment { tab, row }, Event::Edit { text, .. }) => {
                let row = seo_row(report, tab, row, id)?;
                row.comment = text.clone();
                highlight::set_status(Some(&mut row.comment_status), highlight::comment_is_issue(text));
                Ok(cell_outcome(id, Some(row.comment_status), None, None))
            }
            (Handler::Fix { tab, row }, Event::Edit { text, .. }) => {
                let row = seo_row(report, tab, row, id)?;
                row.fix = text.clone();
                length::update_length(&row.fix, row.counter.as_mut());
                Ok(cell_outcome(id, None, row.counter.clone(), None))
            }
            (Handler::Current { tab, row }, Event::Edit { text, .. }) => {
                let row = seo_row(report, tab, row, id)?;
                row.current = text.clone();
                Ok(cell_outcome(id, None, None, None))
            }
            (Handler::AltToBe { tab, row }, Event::Edit { text, .. }) => {
                let row = alt_row(report, tab, row, id)?;
                row.alt_to_be = text.clone();
                Ok(cell_outcome(id, None, None, None))
            }
            (Handler::AltToggle { tab, row }, Event::Click { .. }) => {
                let row = alt_row(report, tab, row, id)?;
                toggle_verdict(row);
                Ok(cell_outcome(id, Some(row.status), None, Some(row.verdict.label().to_string())))
            }
            (Handler::SortHeader { tab, column }, Event::Click { .. }) => {
                let table = alt_table(report, tab, id)?;
                let direction = sort_alt_table(table, column);
                Ok(Outcome::Sorted {
                    id: id.to_string(),
                    direction,
                    glyph: direction.glyph(),
                    order: table.rows.iter().map(|r| r.id).collect(),
                })
            }
            (Handler::TabButton { index }, Event::Click { .. }) => {
                report.show_tab(index);
                Ok(Outcome::Tab { active: report.active_tab() })
            }
            _ => Err(ReportError::InvalidEvent { id: id.to_string(), event: event.kind() }),
        }
    }

    /// Apply events in order, stopping at the first failure
    pub fn replay<'a, I>(&mut self, events: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut applied = 0;
        for event in events {
            self.dispatch(event)?;
            applied += 1;
        }
        Ok(applied)
    }
}

/// Flip an alt verdict and re-derive the cell status from its label
pub fn toggle_verdict(row: &mut AltRow) {
    row.verdict = row.verdict.toggle();
    let is_issue = AltVerdict::from_label(row.verdict.label()) == Some(AltVerdict::NeedsFix);
    highlight::set_status(Some(&mut row.status), is_issue);
}

/// Sort an Alt table by a column click and return the direction used
pub fn sort_alt_table(table: &mut AltTable, column: usize) -> SortDirection {
    let direction = table.sort.click(column);
    sort::sort_rows(&mut table.rows, direction, |r| r.column_text(column));
    direction
}

fn init_fields(report: &mut Report) {
    for tab in &mut report.tabs {
        for row in &mut tab.seo.rows {
            let is_issue = highlight::comment_is_issue(&row.comment);
            highlight::set_status(Some(&mut row.comment_status), is_issue);
            length::update_length(&row.fix, row.counter.as_mut());
        }
        if let Some(alt) = &mut tab.alt {
            for row in &mut alt.rows {
                let is_issue = row.verdict == AltVerdict::NeedsFix;
                highlight::set_status(Some(&mut row.status), is_issue);
            }
        }
    }
}

fn cell_outcome(id: &str, status: Option<Status>, counter: Option<String>, label: Option<String>) -> Outcome {
    Outcome::Cell { id: id.to_string(), status, counter, label }
}

fn seo_row<'a>(report: &'a mut Report, tab: usize, row: usize, id: &str) -> Result<&'a mut SeoRow> {
    report
        .tabs
        .get_mut(tab)
        .and_then(|t| t.seo.rows.iter_mut().find(|r| r.id == row))
        .ok_or_else(|| ReportError::UnknownElement(id.to_string()))
}

fn alt_table<'a>(report: &'a mut Report, tab: usize, id: &str) -> Result<&'a mut AltTable> {
    report
        .tabs
        .get_mut(tab)
        .and_then(|t| t.alt.as_mut())
        .ok_or_else(|| ReportError::UnknownElement(id.to_string()))
}

fn alt_row<'a>(report: &'a mut Report, tab: usize, row: usize, id: &str) -> Result<&'a mut AltRow> {
    alt_table(report, tab, id)?
        .rows
        .iter_mut()
        .find(|r| r.id == row)
        .ok_or_else(|| ReportError::UnknownElement(id.to_string()))
}
