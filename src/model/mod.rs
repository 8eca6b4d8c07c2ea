//! In-memory model of a QA report
//!
//! A [`Report`] is the single source of truth for everything the user sees:
//! renderers project it to HTML, the spreadsheet exporter projects it to
//! sheets, and events mutate it. Each tab holds one SEO table and, when the
//! page had images, one Alt table.
//!
//! Rows expose their cells through [`SeoRow::cells`] / [`AltRow::cells`] in
//! the exact column layout of the rendered table, so the HTML renderer and
//! the spreadsheet exporter index columns the same way.

pub mod input;

use crate::highlight::{AltVerdict, Status};
use crate::sort::SortState;
use crate::tabs::TabController;
use serde::Serialize;

pub use input::{AuditInput, FactorAudit, ImageAudit, PageAudit};

/// Heading prefix; the ticket name follows the `" - "` separator
pub const HEADING_PREFIX: &str = "SEO QA Report";

/// Factor whose current value stays editable in the SEO table
pub const EDITABLE_CURRENT_FACTOR: &str = "통이미지 사용";

/// Column of the Alt table that can be sorted
pub const ALT_SORT_COLUMN: usize = 3;

/// Column of the Alt table holding the image preview
pub const ALT_PREVIEW_COLUMN: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSpec {
    pub text: &'static str,
    pub class: Option<&'static str>,
    pub width: Option<&'static str>,
    pub sortable: bool,
}

const fn header(text: &'static str, class: Option<&'static str>, width: Option<&'static str>) -> HeaderSpec {
    HeaderSpec { text, class, width, sortable: false }
}

pub const SEO_HEADERS: [HeaderSpec; 6] = [
    header("항목", None, None),
    header("현황", None, Some("30%")),
    header("길이", Some("len-col"), None),
    header("Comment", None, Some("22%")),
    header("SEO 수정안", None, Some("auto")),
    header("길이", Some("len-col"), None),
];

pub const ALT_HEADERS: [HeaderSpec; 5] = [
    header("Image URL", None, Some("25%")),
    header("Preview", None, None),
    header("Alt Text (AS-IS)", None, Some("20%")),
    HeaderSpec { text: "SEO Comment", class: Some("sortable"), width: Some("15%"), sortable: true },
    header("Alt Text (To-Be)", None, None),
];

/// What a rendered table cell contains
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKind {
    /// Static text
    Text,
    /// User-editable text field. `editable` is false for fields that are
    /// styled as fields but not contenteditable.
    Field { id: String, editable: bool },
    /// Two-state alt verdict toggle
    Toggle { id: String },
    /// Image preview; has no text content
    Image { src: String },
    /// Length counter mirrored from the row's fix proposal
    Counter,
}

/// One rendered `<td>` of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView<'a> {
    pub text: &'a str,
    pub kind: CellKind,
    pub class: Option<&'static str>,
    pub colspan: u8,
    /// Review status; only reviewable cells carry one
    pub status: Option<Status>,
}

impl<'a> CellView<'a> {
    fn new(text: &'a str, kind: CellKind) -> Self {
        Self { text, kind, class: None, colspan: 1, status: None }
    }

    fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    fn span(mut self, colspan: u8) -> Self {
        self.colspan = colspan;
        self
    }

    fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeoRow {
    /// Stable row id, kept through sorting
    pub id: usize,
    pub factor: String,
    pub current: String,
    pub current_length: String,
    pub comment: String,
    pub comment_status: Status,
    pub fix: String,
    /// Counter text for length-checked factors
    pub counter: Option<String>,
}

impl SeoRow {
    pub fn current_editable(&self) -> bool {
        self.factor == EDITABLE_CURRENT_FACTOR
    }

    pub fn cells(&self, tab: usize) -> Vec<CellView<'_>> {
        let id = |field: &str| element_id::seo(tab, self.id, field);
        let mut cells = vec![CellView::new(&self.factor, CellKind::Text).class("factor-name")];

        if let Some(counter) = &self.counter {
            cells.push(CellView::new(
                &self.current,
                CellKind::Field { id: id(element_id::CURRENT), editable: false },
            ));
            cells.push(CellView::new(&self.current_length, CellKind::Text).class("len-col"));
            cells.push(self.comment_cell(id(element_id::COMMENT)));
            cells.push(
                CellView::new(&self.fix, CellKind::Field { id: id(element_id::FIX), editable: true })
                    .class("fix-cell"),
            );
            cells.push(CellView::new(counter, CellKind::Counter).class("len-col len-counter-fix"));
        } else {
            let current = if self.current_editable() {
                CellKind::Field { id: id(element_id::CURRENT), editable: true }
            } else {
                CellKind::Text
            };
            cells.push(CellView::new(&self.current, current).span(2));
            cells.push(self.comment_cell(id(element_id::COMMENT)));
            cells.push(
                CellView::new(&self.fix, CellKind::Field { id: id(element_id::FIX), editable: true })
                    .class("fix-cell")
                    .span(2),
            );
        }
        cells
    }

    fn comment_cell(&self, id: String) -> CellView<'_> {
        CellView::new(&self.comment, CellKind::Field { id, editable: true })
            .class("comment-cell")
            .status(self.comment_status)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AltRow {
    pub id: usize,
    pub image_url: String,
    pub alt_as_is: String,
    pub verdict: AltVerdict,
    pub status: Status,
    pub alt_to_be: String,
}

impl AltRow {
    pub fn cells(&self, tab: usize) -> Vec<CellView<'_>> {
        vec![
            CellView::new(&self.image_url, CellKind::Text),
            CellView::new("", CellKind::Image { src: self.image_url.clone() }),
            CellView::new(&self.alt_as_is, CellKind::Text),
            CellView::new(
                self.verdict.label(),
                CellKind::Toggle { id: element_id::alt(tab, self.id, element_id::TOGGLE) },
            )
            .class("comment-cell")
            .status(self.status),
            CellView::new(
                &self.alt_to_be,
                CellKind::Field { id: element_id::alt(tab, self.id, element_id::TO_BE), editable: true },
            ),
        ]
    }

    /// Trimmed text of one column, as used for sorting
    pub fn column_text(&self, column: usize) -> String {
        self.cells(0)
            .get(column)
            .map(|c| c.text.trim().to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SeoTable {
    pub rows: Vec<SeoRow>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AltTable {
    pub rows: Vec<AltRow>,
    pub sort: SortState,
}

impl AltTable {
    /// Header text as rendered, sort glyph included
    pub fn header_text(&self, column: usize) -> String {
        match ALT_HEADERS.get(column) {
            Some(h) if h.sortable => format!("{} {}", h.text, self.sort.glyph(column)),
            Some(h) => h.text.to_string(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Tab {
    /// Button label, also the sheet name source
    pub label: String,
    /// Audited page URL, shown as the button tooltip
    pub url: String,
    pub seo: SeoTable,
    pub alt: Option<AltTable>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub title: String,
    pub heading: String,
    pub ticket: String,
    pub tabs: Vec<Tab>,
    pub tab_state: TabController,
}

impl Report {
    pub fn new(ticket: &str, tabs: Vec<Tab>) -> Self {
        let heading = format!("{} - {}", HEADING_PREFIX, ticket);
        Self {
            title: heading.clone(),
            heading,
            ticket: ticket.to_string(),
            tab_state: TabController::new(tabs.len()),
            tabs,
        }
    }

    pub fn show_tab(&mut self, index: usize) {
        self.tab_state.show_tab(index);
    }

    pub fn active_tab(&self) -> Option<usize> {
        self.tab_state.active()
    }
}

/// Element ids used to address interactive parts of the page
pub mod element_id {
    pub const CURRENT: &str = "current";
    pub const COMMENT: &str = "comment";
    pub const FIX: &str = "fix";
    pub const TOGGLE: &str = "toggle";
    pub const TO_BE: &str = "tobe";

    pub fn tab(index: usize) -> String {
        format!("tab-{}", index)
    }

    pub fn seo(tab: usize, row: usize, field: &str) -> String {
        format!("t{}-seo-{}-{}", tab, row, field)
    }

    pub fn alt(tab: usize, row: usize, field: &str) -> String {
        format!("t{}-alt-{}-{}", tab, row, field)
    }

    pub fn alt_sort(tab: usize, column: usize) -> String {
        format!("t{}-alt-sort-{}", tab, column)
    }
}
