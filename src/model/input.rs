//! Audit input: the collected page metadata a report is built from
//!
//! The collector produces one JSON document per ticket:
//!
//! ```json
//! {
//!   "ticket_name": "SEO-1234",
//!   "pages": [{
//!     "url": "https://www.laneige.com/kr/ko/skincare/water-bank.html",
//!     "factors": [{"factor": "Title", "current": "...", "current_length": "38",
//!                  "comment": "", "fix": ""}],
//!     "images": [{"image_url": "https://.../hero.jpg", "alt": ""}]
//!   }]
//! }
//! ```

use super::{AltRow, AltTable, Report, SeoRow, SeoTable, Tab};
use crate::error::Result;
use crate::highlight::{self, AltVerdict};
use crate::length;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use url::Url;

/// Factor the collector emits for the final (post-redirect) URL
const AUDIT_URL_FACTOR: &str = "Audit_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditInput {
    pub ticket_name: String,
    #[serde(default)]
    pub pages: Vec<PageAudit>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageAudit {
    pub url: String,
    #[serde(default)]
    pub factors: Vec<FactorAudit>,
    #[serde(default)]
    pub images: Vec<ImageAudit>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorAudit {
    pub factor: String,
    pub current: String,
    pub current_length: String,
    pub comment: String,
    pub fix: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageAudit {
    pub image_url: String,
    pub alt: String,
}

impl AuditInput {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|p| p.url.as_str())
    }

    /// Build the report with initial statuses and counters
    pub fn build(&self) -> Report {
        let tabs = self.pages.iter().map(build_tab).collect();
        Report::new(&self.ticket_name, tabs)
    }
}

/// Button label for a page: last path segment, else the host.
/// The segment is percent-decoded so non-ASCII paths read as typed.
pub fn tab_label(page_url: &str) -> String {
    let Ok(parsed) = Url::parse(page_url) else {
        return page_url.to_string();
    };

    let raw = parsed.path().trim_matches('/').rsplit('/').next().unwrap_or("");
    let last_segment = match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    };

    if !last_segment.is_empty() {
        last_segment
    } else {
        parsed.host_str().unwrap_or(page_url).to_string()
    }
}

fn build_tab(page: &PageAudit) -> Tab {
    let rows = page
        .factors
        .iter()
        .filter(|f| !(f.factor == AUDIT_URL_FACTOR && f.current == page.url))
        .enumerate()
        .map(|(id, f)| build_seo_row(id, f))
        .collect();

    let alt = if page.images.is_empty() {
        None
    } else {
        Some(AltTable {
            rows: page.images.iter().enumerate().map(|(id, img)| build_alt_row(id, img)).collect(),
            ..AltTable::default()
        })
    };

    let label = tab_label(&page.url);
    debug!(url = %page.url, %label, "built tab");

    Tab { label, url: page.url.clone(), seo: SeoTable { rows }, alt }
}

fn build_seo_row(id: usize, factor: &FactorAudit) -> SeoRow {
    let counter = length::is_length_checked(&factor.factor).then(|| length::counter_text(&factor.fix));

    SeoRow {
        id,
        factor: factor.factor.clone(),
        current: factor.current.clone(),
        current_length: factor.current_length.clone(),
        comment: factor.comment.clone(),
        comment_status: highlight::comment_status(&factor.comment),
        fix: factor.fix.clone(),
        counter,
    }
}

fn build_alt_row(id: usize, image: &ImageAudit) -> AltRow {
    let verdict = AltVerdict::for_alt_text(&image.alt);
    let alt_to_be = if image.alt.trim().is_empty() { String::new() } else { "N/A".to_string() };

    AltRow {
        id,
        image_url: image.image_url.clone(),
        alt_as_is: image.alt.clone(),
        verdict,
        status: verdict.status(),
        alt_to_be,
    }
}
