//! Report output
//!
//! - **HTML**: the live, editable QA page and its frozen static export
//! - **XLSX**: one sheet per audited page
//!
//! # Usage
//!
//! ```ignore
//! use seoqa::report;
//!
//! // Picks the format from the extension
//! report::generate("report.html", &report)?;  // live page
//! report::generate("report.xlsx", &report)?;  // workbook
//! ```

pub mod html;
pub mod xlsx;

use crate::error::Result;
use crate::model::Report;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use url::Url;

/// Write a report in the format matching the file extension
pub fn generate<P: AsRef<Path>>(path: P, report: &Report) -> Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "xlsx" => {
            let (_, bytes) = xlsx::export(report)?;
            std::fs::write(path, bytes)?;
        }
        _ => {
            let mut file = std::fs::File::create(path)?;
            html::write(&mut file, report)?;
        }
    }
    Ok(())
}

/// Issue counts for a report
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub pages: usize,
    pub seo_rows: usize,
    pub seo_issues: usize,
    pub images: usize,
    pub image_issues: usize,
}

impl Summary {
    pub fn from_report(report: &Report) -> Self {
        let mut summary = Self { pages: report.tabs.len(), ..Self::default() };

        for tab in &report.tabs {
            summary.seo_rows += tab.seo.rows.len();
            summary.seo_issues += tab.seo.rows.iter().filter(|r| r.comment_status.is_issue()).count();
            if let Some(alt) = &tab.alt {
                summary.images += alt.rows.len();
                summary.image_issues += alt.rows.iter().filter(|r| r.status.is_issue()).count();
            }
        }

        summary
    }
}

/// Site identity used in report file names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteCode {
    pub brand: String,
    pub country: String,
    pub language: String,
}

const BRANDS: &[(&str, &str)] = &[("sulwhasoo", "SWS"), ("laneige", "LNG"), ("hera", "HERA"), ("aestura", "AES")];
const COUNTRY_SUBDOMAINS: &[&str] = &["hk", "sg", "my", "ph", "th", "tw", "vn", "jp", "kr"];
const LANGUAGE_SEGMENTS: &[&str] = &["ko", "en", "zh", "ja"];
const LOCALE_PATHS: &[&str] = &["kr/ko", "int/en", "jp/ja"];
const UNKNOWN: &str = "UNKNOWN";

fn is_alpha(s: &str, len: usize) -> bool {
    s.chars().count() == len && s.chars().all(char::is_alphabetic)
}

// Store-view codes like `tc_s` or `en_l`
fn is_store_code(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 4 && b[0].is_ascii_lowercase() && b[1].is_ascii_lowercase() && b[2] == b'_' && b[3].is_ascii_lowercase()
}

impl SiteCode {
    pub fn from_url(page_url: &str) -> Self {
        let (host, path) = match Url::parse(page_url) {
            Ok(u) => (u.host_str().unwrap_or("").to_string(), u.path().to_string()),
            Err(_) => (String::new(), String::new()),
        };
        let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
        let labels: Vec<&str> = host.split('.').collect();

        let brand = BRANDS
            .iter()
            .find(|(key, _)| host.contains(key) || path.contains(key))
            .map(|(_, code)| code.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let first_label = labels.first().map(|l| l.to_lowercase()).unwrap_or_default();
        let country = if COUNTRY_SUBDOMAINS.contains(&first_label.as_str()) {
            first_label.to_uppercase()
        } else if is_alpha(parts[0], 2) {
            parts[0].to_uppercase()
        } else if labels.len() > 1 && is_alpha(labels[labels.len() - 2], 2) {
            labels[labels.len() - 2].to_uppercase()
        } else {
            UNKNOWN.to_string()
        };

        let mut language = parts
            .iter()
            .find(|p| is_store_code(p) || (is_alpha(p, 2) && LANGUAGE_SEGMENTS.contains(p)))
            .map(|p| p.to_string())
            .unwrap_or_default();

        if parts.len() >= 2 && is_alpha(parts[0], 2) && is_alpha(parts[1], 2) {
            let locale = format!("{}/{}", parts[0], parts[1]);
            if LOCALE_PATHS.contains(&locale.as_str()) {
                language = format!("{}-{}", parts[0], parts[1]);
            }
        }

        Self { brand, country, language }
    }
}

/// Name safe to join onto an output directory: path separators become `_`
pub fn disk_file_name(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

/// `SEO-audit_Report_{ticket}_{brand}-{country}[_{lang}]_{yymmdd}.html`
pub fn report_file_name(ticket: &str, first_url: &str, date: NaiveDate) -> String {
    let site = SiteCode::from_url(first_url);
    let language = if site.language.is_empty() { String::new() } else { format!("_{}", site.language) };
    format!(
        "SEO-audit_Report_{}_{}-{}{}_{}.html",
        ticket,
        site.brand,
        site.country,
        language,
        date.format("%y%m%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, LiveReport};
    use crate::model::{AuditInput, FactorAudit, ImageAudit, PageAudit};

    fn report() -> Report {
        AuditInput {
            ticket_name: "SEO-9".into(),
            pages: vec![
                PageAudit {
                    url: "https://hk.sulwhasoo.com/tc_s/serum".into(),
                    factors: vec![
                        FactorAudit { factor: "Title".into(), comment: "too long".into(), ..Default::default() },
                        FactorAudit { factor: "H1".into(), comment: "N/A".into(), ..Default::default() },
                    ],
                    images: vec![
                        ImageAudit { image_url: "a".into(), alt: "".into() },
                        ImageAudit { image_url: "b".into(), alt: "x".into() },
                    ],
                },
                PageAudit { url: "https://hk.sulwhasoo.com/tc_s/".into(), ..Default::default() },
            ],
        }
        .build()
    }

    // ==========================================================================
    // SUMMARY STATISTICS
    // ==========================================================================

    #[test]
    fn test_summary_counts() {
        let summary = Summary::from_report(&report());
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.seo_rows, 2);
        assert_eq!(summary.seo_issues, 1);
        assert_eq!(summary.images, 2);
        assert_eq!(summary.image_issues, 1);
    }

    #[test]
    fn test_summary_tracks_edits() {
        let mut live = LiveReport::new(report());
        live.dispatch(&Event::Click { id: "t0-alt-1-toggle".into() }).unwrap();
        live.dispatch(&Event::Edit { id: "t0-seo-0-comment".into(), text: "이슈 없음".into() }).unwrap();
        let summary = Summary::from_report(live.report());
        assert_eq!(summary.seo_issues, 0);
        assert_eq!(summary.image_issues, 2);
    }

    #[test]
    fn test_summary_default() {
        let summary = Summary::default();
        assert_eq!(summary.pages, 0);
        assert_eq!(summary.seo_issues, 0);
    }

    // ==========================================================================
    // SITE CODES + FILE NAMES
    // ==========================================================================

    #[test]
    fn test_site_code_from_subdomain_and_store_code() {
        let site = SiteCode::from_url("https://hk.sulwhasoo.com/tc_s/serum");
        assert_eq!(site, SiteCode { brand: "SWS".into(), country: "HK".into(), language: "tc_s".into() });
    }

    #[test]
    fn test_site_code_from_locale_path() {
        let site = SiteCode::from_url("https://www.laneige.com/kr/ko/skincare.html");
        assert_eq!(site.brand, "LNG");
        assert_eq!(site.country, "KR");
        assert_eq!(site.language, "kr-ko");

        let site = SiteCode::from_url("https://www.laneige.com/jp/ja/");
        assert_eq!(site.language, "jp-ja");
    }

    #[test]
    fn test_site_code_from_second_level_domain() {
        let site = SiteCode::from_url("https://www.laneige.com.vn/lip");
        assert_eq!(site.country, "UNKNOWN");

        let site = SiteCode::from_url("https://shop.hera.co.uk/");
        assert_eq!(site.brand, "HERA");
        assert_eq!(site.country, "CO");
    }

    #[test]
    fn test_site_code_unknown() {
        let site = SiteCode::from_url("https://www.example.com/");
        assert_eq!(site, SiteCode { brand: "UNKNOWN".into(), country: "UNKNOWN".into(), language: String::new() });
    }

    #[test]
    fn test_report_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(
            report_file_name("SEO-9", "https://hk.sulwhasoo.com/tc_s/serum", date),
            "SEO-audit_Report_SEO-9_SWS-HK_tc_s_261016.html"
        );
        assert_eq!(
            report_file_name("T1", "https://www.example.com/", date),
            "SEO-audit_Report_T1_UNKNOWN-UNKNOWN_261016.html"
        );
    }

    #[test]
    fn test_disk_file_name_replaces_separators() {
        assert_eq!(disk_file_name("SEO/123_20261016.xlsx"), "SEO_123_20261016.xlsx");
        assert_eq!(disk_file_name(r"a\b/c.html"), "a_b_c.html");
        assert_eq!(disk_file_name("SEO_QA_Report_-_T1_Final.html"), "SEO_QA_Report_-_T1_Final.html");
    }

    // ==========================================================================
    // GENERATE
    // ==========================================================================

    #[test]
    fn test_generate_html_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        generate(&path, &report()).unwrap();
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("contenteditable"));
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_generate_xlsx_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        generate(&path, &report()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        // Zip container signature
        assert_eq!(&bytes[..2], b"PK");
    }
}
