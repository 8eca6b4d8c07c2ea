//! Excel export
//!
//! The workbook has one sheet per tab, in tab order. Each sheet stacks the
//! tab's tables as plain text rows:
//!
//! ```text
//! SEO QA
//! 항목 | 현황 | 길이 | Comment | SEO 수정안 | 길이
//! Title | ... (one row per SEO row, cells as rendered)
//!                                    ← blank separator row
//! Image Alt QA
//! Image URL | Alt Text (AS-IS) | SEO Comment | Alt Text (To-Be)
//! ... (one row per image, preview column dropped)
//! ```
//!
//! Building the sheets is pure ([`build_workbook`]); writing needs the
//! `xlsx` feature. The whole file is rendered in memory before anything
//! touches the disk, so a failed export never leaves a partial file.

use crate::error::{ReportError, Result};
use crate::model::{Report, Tab, ALT_HEADERS, ALT_PREVIEW_COLUMN, SEO_HEADERS};
use crate::sort::strip_sort_glyphs;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Longest sheet name Excel accepts
pub const MAX_SHEET_NAME_CHARS: usize = 31;

/// Characters Excel forbids in sheet names
pub const FORBIDDEN_SHEET_CHARS: &[char] = &['\\', '/', '*', '?', ':', '[', ']'];

/// Ticket name used when the heading has no `" - "` separator
pub const FALLBACK_TICKET: &str = "Report";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetBook {
    pub file_name: String,
    pub sheets: Vec<Sheet>,
}

/// Sheet name for a tab label: keep the last 31 characters, then replace
/// forbidden characters with `_`
pub fn sheet_name(label: &str) -> String {
    let label = label.trim();
    let count = label.chars().count();
    let tail: String = if count > MAX_SHEET_NAME_CHARS {
        label.chars().skip(count - MAX_SHEET_NAME_CHARS).collect()
    } else {
        label.to_string()
    };
    tail.replace(FORBIDDEN_SHEET_CHARS, "_")
}

/// Ticket part of the heading: the segment after the first `" - "`
pub fn ticket_name(heading: &str) -> &str {
    match heading.split(" - ").nth(1) {
        Some(ticket) if !ticket.is_empty() => ticket,
        _ => FALLBACK_TICKET,
    }
}

/// `{ticket}_{YYYYMMDD}.xlsx`
pub fn workbook_file_name(heading: &str, date: NaiveDate) -> String {
    format!("{}_{}.xlsx", ticket_name(heading), date.format("%Y%m%d"))
}

/// Today's date as used in workbook names (UTC)
pub fn export_date() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Build every sheet of the workbook from the report's current state
pub fn build_workbook(report: &Report, date: NaiveDate) -> SheetBook {
    let sheets = report
        .tabs
        .iter()
        .enumerate()
        .map(|(index, tab)| Sheet { name: sheet_name(&tab.label), rows: sheet_rows(index, tab) })
        .collect();

    SheetBook { file_name: workbook_file_name(&report.heading, date), sheets }
}

fn sheet_rows(index: usize, tab: &Tab) -> Vec<Vec<String>> {
    let mut rows = vec![vec!["SEO QA".to_string()]];
    rows.push(SEO_HEADERS.iter().map(|h| h.text.trim().to_string()).collect());
    for row in &tab.seo.rows {
        rows.push(row.cells(index).iter().map(|c| c.text.trim().to_string()).collect());
    }

    rows.push(Vec::new());

    if let Some(alt) = &tab.alt {
        rows.push(vec!["Image Alt QA".to_string()]);
        rows.push(
            (0..ALT_HEADERS.len())
                .filter(|&column| column != ALT_PREVIEW_COLUMN)
                .map(|column| strip_sort_glyphs(&alt.header_text(column)))
                .collect(),
        );
        for row in &alt.rows {
            rows.push(
                row.cells(index)
                    .iter()
                    .enumerate()
                    .filter(|(column, _)| *column != ALT_PREVIEW_COLUMN)
                    .map(|(_, c)| c.text.trim().to_string())
                    .collect(),
            );
        }
    }

    rows
}

/// Serialize the workbook to `.xlsx` bytes
#[cfg(feature = "xlsx")]
pub fn to_bytes(book: &SheetBook) -> Result<Vec<u8>> {
    use rust_xlsxwriter::Workbook;

    let mut workbook = Workbook::new();
    for sheet in &book.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        for (r, row) in sheet.rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                // rust_xlsxwriter uses 0-based row/col as u32/u16
                worksheet.write_string(r as u32, c as u16, value)?;
            }
        }
    }
    Ok(workbook.save_to_buffer()?)
}

#[cfg(not(feature = "xlsx"))]
pub fn to_bytes(_book: &SheetBook) -> Result<Vec<u8>> {
    Err(ReportError::SpreadsheetUnavailable)
}

/// Build and serialize the workbook for a report. Failures are logged.
pub fn export(report: &Report) -> Result<(String, Vec<u8>)> {
    let book = build_workbook(report, export_date());
    match to_bytes(&book) {
        Ok(bytes) => Ok((book.file_name, bytes)),
        Err(e) => {
            error!(error = %e, "Excel export failed");
            Err(e)
        }
    }
}

/// Export the workbook into `dir` and return the written path
pub fn write_to_dir<P: AsRef<Path>>(report: &Report, dir: P) -> Result<PathBuf> {
    let (file_name, bytes) = export(report)?;
    let path = dir.as_ref().join(super::disk_file_name(&file_name));
    std::fs::write(&path, bytes).map_err(|e| {
        error!(path = %path.display(), error = %e, "failed to write workbook");
        ReportError::Io(e)
    })?;
    info!(path = %path.display(), "workbook written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, LiveReport};
    use crate::model::{AuditInput, FactorAudit, ImageAudit, PageAudit};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn page(url: &str) -> PageAudit {
        PageAudit { url: url.to_string(), ..Default::default() }
    }

    fn detailed_report() -> Report {
        AuditInput {
            ticket_name: "SEO-5".into(),
            pages: vec![PageAudit {
                url: "https://th.sulwhasoo.com/first-care".into(),
                factors: vec![
                    FactorAudit {
                        factor: "Title".into(),
                        current: " Sulwhasoo ".into(),
                        current_length: "9".into(),
                        comment: "이슈 없음".into(),
                        fix: "First Care".into(),
                    },
                    FactorAudit { factor: "Canonical".into(), current: "https://x".into(), ..Default::default() },
                ],
                images: vec![
                    ImageAudit { image_url: "https://cdn/1.jpg".into(), alt: "serum".into() },
                    ImageAudit { image_url: "https://cdn/2.jpg".into(), alt: "".into() },
                ],
            }],
        }
        .build()
    }

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    // ==========================================================================
    // NAMING
    // ==========================================================================

    #[test]
    fn test_sheet_name_replaces_forbidden_characters() {
        assert_eq!(sheet_name("a/b:c"), "a_b_c");
        assert_eq!(sheet_name(r"x\y*z?[1]"), "x_y_z__1_");
    }

    #[test]
    fn test_sheet_name_keeps_tail_when_too_long() {
        let label = "abcdefghijklmnopqrstuvwxyz0123456789";
        let name = sheet_name(label);
        assert_eq!(name.chars().count(), 31);
        assert_eq!(name, "fghijklmnopqrstuvwxyz0123456789");
    }

    #[test]
    fn test_sheet_name_truncates_before_replacing() {
        let label = format!("{}/{}", "p".repeat(40), "tail");
        assert_eq!(sheet_name(&label), format!("{}_tail", "p".repeat(26)));
    }

    #[test]
    fn test_sheet_name_counts_characters_not_bytes() {
        let label = "가".repeat(40);
        assert_eq!(sheet_name(&label), "가".repeat(31));
    }

    #[test]
    fn test_ticket_name() {
        assert_eq!(ticket_name("QA - MySite"), "MySite");
        assert_eq!(ticket_name("SEO QA Report - SEO-5"), "SEO-5");
        assert_eq!(ticket_name("A - B - C"), "B");
        assert_eq!(ticket_name("No separator"), "Report");
        assert_eq!(ticket_name("Trailing - "), "Report");
    }

    #[test]
    fn test_workbook_file_name() {
        assert_eq!(workbook_file_name("QA - MySite", date()), "MySite_20261016.xlsx");
        assert_eq!(workbook_file_name("QA", date()), "Report_20261016.xlsx");
    }

    // ==========================================================================
    // SHEET CONTENT
    // ==========================================================================

    #[test]
    fn test_one_sheet_per_tab_in_order() {
        let report = AuditInput {
            ticket_name: "MySite".into(),
            pages: vec![page("https://example.com/Page A"), page("https://example.com/Page B")],
        }
        .build();

        let book = build_workbook(&report, date());
        let names: Vec<_> = book.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Page A", "Page B"]);
        assert_eq!(book.file_name, "MySite_20261016.xlsx");
    }

    #[test]
    fn test_hangul_path_sheet_name_is_readable() {
        let report = AuditInput {
            ticket_name: "SEO-8".into(),
            pages: vec![page("https://www.sulwhasoo.com/kr/ko/윤조에센스-리뉴얼")],
        }
        .build();

        let book = build_workbook(&report, date());
        assert_eq!(book.sheets[0].name, "윤조에센스-리뉴얼");
    }

    #[test]
    fn test_seo_section_layout() {
        let book = build_workbook(&detailed_report(), date());
        let rows = &book.sheets[0].rows;
        assert_eq!(book.sheets[0].name, "first-care");

        assert_eq!(rows[0], strings(&["SEO QA"]));
        assert_eq!(rows[1], strings(&["항목", "현황", "길이", "Comment", "SEO 수정안", "길이"]));
        assert_eq!(rows[2], strings(&["Title", "Sulwhasoo", "9", "이슈 없음", "First Care", "10자"]));
        assert_eq!(rows[3], strings(&["Canonical", "https://x", "", ""]));
        assert!(rows[4].is_empty());
    }

    #[test]
    fn test_alt_section_drops_preview_column() {
        let book = build_workbook(&detailed_report(), date());
        let rows = &book.sheets[0].rows;

        assert_eq!(rows[5], strings(&["Image Alt QA"]));
        assert_eq!(rows[6], strings(&["Image URL", "Alt Text (AS-IS)", "SEO Comment", "Alt Text (To-Be)"]));
        assert_eq!(rows[7], strings(&["https://cdn/1.jpg", "serum", "이슈 없음", "N/A"]));
        assert_eq!(rows[8], strings(&["https://cdn/2.jpg", "", "수정 필요", ""]));
        assert_eq!(rows.len(), 9);
    }

    #[test]
    fn test_headers_lose_sort_glyphs_after_sorting() {
        let mut live = LiveReport::new(detailed_report());
        live.dispatch(&Event::Click { id: "t0-alt-sort-3".into() }).unwrap();

        let book = build_workbook(live.report(), date());
        let rows = &book.sheets[0].rows;
        assert_eq!(rows[6][2], "SEO Comment");
        // Ascending: 수정 필요 before 이슈 없음
        assert_eq!(rows[7][0], "https://cdn/2.jpg");
    }

    #[test]
    fn test_tab_without_images_has_only_seo_section() {
        let report = AuditInput { ticket_name: "T".into(), pages: vec![page("https://example.com/x")] }.build();
        let rows = &build_workbook(&report, date()).sheets[0].rows;
        assert_eq!(rows.len(), 3);
        assert!(rows[2].is_empty());
    }

    #[test]
    fn test_edits_flow_into_sheet() {
        let mut live = LiveReport::new(detailed_report());
        live.dispatch(&Event::Edit { id: "t0-seo-0-fix".into(), text: "  퍼스트 케어  ".into() }).unwrap();
        let book = build_workbook(live.report(), date());
        assert_eq!(book.sheets[0].rows[2][4], "퍼스트 케어");
        assert_eq!(book.sheets[0].rows[2][5], "10자");
    }

    // ==========================================================================
    // WRITING
    // ==========================================================================

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_written_workbook_reads_back() {
        use calamine::{open_workbook_auto, Data, Reader};

        let dir = tempfile::tempdir().unwrap();
        let path = write_to_dir(&detailed_report(), dir.path()).unwrap();
        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("SEO-5_"));

        let mut workbook = open_workbook_auto(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["first-care".to_string()]);

        let range = workbook.worksheet_range("first-care").unwrap();
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("SEO QA".into())));
        assert_eq!(range.get_value((2, 5)), Some(&Data::String("10자".into())));
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_ticket_with_slash_stays_in_dir() {
        let report = AuditInput { ticket_name: "SEO/123".into(), pages: vec![page("https://a.example/x")] }.build();

        let dir = tempfile::tempdir().unwrap();
        let path = write_to_dir(&report, dir.path()).unwrap();
        assert_eq!(path.parent(), Some(dir.path()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("SEO_123_") && name.ends_with(".xlsx"));
        assert!(path.exists());
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_duplicate_sheet_names_fail_without_file() {
        let mut report = AuditInput {
            ticket_name: "Dup".into(),
            pages: vec![page("https://a.example/same"), page("https://b.example/same")],
        }
        .build();
        report.heading = "QA - Dup".into();

        let dir = tempfile::tempdir().unwrap();
        let err = write_to_dir(&report, dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::Xlsx(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(not(feature = "xlsx"))]
    #[test]
    fn test_missing_writer_is_reported() {
        let err = export(&detailed_report()).unwrap_err();
        assert!(matches!(err, ReportError::SpreadsheetUnavailable));
    }
}
