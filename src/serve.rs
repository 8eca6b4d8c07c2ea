//! HTTP server for the interactive report
//!
//! `seoqa serve audit.json` → builds the report, starts the server, opens the
//! browser. The page applies edits locally and posts each one to
//! `/api/event`, so exports always reflect what the reviewer sees.

use crate::events::{Event, LiveReport};
use crate::report::{html, xlsx, Summary};
use serde::Serialize;
use std::io::{self, Read};
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, error, info, warn};

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }
}

impl ApiResponse<()> {
    fn failure(message: String) -> Self {
        Self { ok: false, data: None, error: Some(message) }
    }
}

#[derive(Serialize)]
struct ReportSnapshot<'a> {
    report: &'a crate::model::Report,
    summary: Summary,
}

/// Response before it is handed to tiny_http
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    /// Download file name, sent as `Content-Disposition`
    pub file_name: Option<String>,
    pub body: Vec<u8>,
}

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";
const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

impl Reply {
    fn html(body: String) -> Self {
        Self { status: 200, content_type: HTML, file_name: None, body: body.into_bytes() }
    }

    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_else(|e| {
            format!(r#"{{"ok":false,"data":null,"error":"{}"}}"#, e).into_bytes()
        });
        Self { status, content_type: JSON, file_name: None, body }
    }

    fn download(content_type: &'static str, file_name: String, body: Vec<u8>) -> Self {
        Self { status: 200, content_type, file_name: Some(file_name), body }
    }

    fn not_found() -> Self {
        Self { status: 404, content_type: "text/plain", file_name: None, body: b"Not found".to_vec() }
    }
}

/// `attachment; filename*=UTF-8''...` with the name percent-encoded
pub fn content_disposition(file_name: &str) -> String {
    format!("attachment; filename*=UTF-8''{}", urlencoding::encode(file_name))
}

/// Start server, open browser, serve the report
pub fn start(port: u16, mut live: LiveReport, open_browser: bool) -> io::Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let url = format!("http://localhost:{}", port);
    info!(%url, heading = %live.report().heading, tabs = live.report().tabs.len(), "serving report");

    if open_browser {
        if let Err(e) = open::that(&url) {
            warn!(error = %e, "could not open browser");
        }
    }

    // One request at a time; the report has a single owner
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &mut live) {
            error!(error = %e, "request failed");
        }
    }

    Ok(())
}

fn handle_request(mut request: Request, live: &mut LiveReport) -> io::Result<()> {
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or("/").to_string();
    let method = request.method().clone();

    let mut body = String::new();
    if method == Method::Post {
        request.as_reader().read_to_string(&mut body)?;
    }

    debug!(%method, %path, "request");
    let reply = route(&method, &path, &body, live);

    let mut response = Response::from_data(reply.body)
        .with_status_code(reply.status)
        .with_header(header("Content-Type", reply.content_type)?);
    if let Some(name) = reply.file_name {
        response = response.with_header(header("Content-Disposition", &content_disposition(&name))?);
    }
    request.respond(response)
}

fn header(name: &str, value: &str) -> io::Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, format!("invalid header {}", name)))
}

/// Map a request to its reply, applying events to the report
pub fn route(method: &Method, path: &str, body: &str, live: &mut LiveReport) -> Reply {
    match (method, path) {
        (&Method::Get, "/") => Reply::html(html::render_live(live.report())),

        (&Method::Get, "/api/report") => {
            let snapshot = ReportSnapshot { report: live.report(), summary: Summary::from_report(live.report()) };
            Reply::json(200, &ApiResponse::success(snapshot))
        }

        (&Method::Post, "/api/event") => {
            let event: Event = match serde_json::from_str(body) {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "malformed event");
                    return Reply::json(400, &ApiResponse::failure(e.to_string()));
                }
            };
            match live.dispatch(&event) {
                Ok(outcome) => Reply::json(200, &ApiResponse::success(outcome)),
                Err(e) => Reply::json(400, &ApiResponse::failure(e.to_string())),
            }
        }

        (&Method::Get, "/api/export/html") => {
            let export = html::export_static(live.report());
            info!(file = %export.file_name, "static export");
            Reply::download(HTML, export.file_name, export.html.into_bytes())
        }

        (&Method::Get, "/api/export/xlsx") => match xlsx::export(live.report()) {
            Ok((file_name, bytes)) => {
                info!(file = %file_name, bytes = bytes.len(), "excel export");
                Reply::download(XLSX, file_name, bytes)
            }
            Err(e) => Reply::json(500, &ApiResponse::failure(e.to_string())),
        },

        _ => Reply::not_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuditInput, FactorAudit, ImageAudit, PageAudit};
    use serde_json::Value;

    fn live_report() -> LiveReport {
        let input = AuditInput {
            ticket_name: "SEO-42".into(),
            pages: vec![PageAudit {
                url: "https://www.aestura.com/kr/ko/atobarrier.html".into(),
                factors: vec![
                    FactorAudit { factor: "Title".into(), fix: "Atobarrier".into(), ..Default::default() },
                    FactorAudit { factor: "H1".into(), comment: "누락".into(), ..Default::default() },
                ],
                images: vec![ImageAudit { image_url: "https://cdn/x.png".into(), alt: "".into() }],
            }],
        };
        LiveReport::new(input.build())
    }

    fn json(reply: &Reply) -> Value {
        serde_json::from_slice(&reply.body).unwrap()
    }

    // ==========================================================================
    // PAGES + API
    // ==========================================================================

    #[test]
    fn test_index_serves_live_page() {
        let mut live = live_report();
        let reply = route(&Method::Get, "/", "", &mut live);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, HTML);
        let body = String::from_utf8(reply.body).unwrap();
        assert!(body.contains("SEO QA Report - SEO-42"));
        assert!(body.contains("contenteditable"));
    }

    #[test]
    fn test_report_json() {
        let mut live = live_report();
        let reply = route(&Method::Get, "/api/report", "", &mut live);
        let value = json(&reply);
        assert_eq!(value["ok"], true);
        assert_eq!(value["data"]["report"]["ticket"], "SEO-42");
        assert_eq!(value["data"]["summary"]["seo_issues"], 1);
    }

    #[test]
    fn test_event_updates_report() {
        let mut live = live_report();
        let body = r#"{"type":"edit","id":"t0-seo-1-comment","text":"이슈 없음"}"#;
        let reply = route(&Method::Post, "/api/event", body, &mut live);
        assert_eq!(reply.status, 200);
        let value = json(&reply);
        assert_eq!(value["data"]["kind"], "cell");
        assert_eq!(value["data"]["status"], "ok");
        assert_eq!(live.report().tabs[0].seo.rows[1].comment, "이슈 없음");
    }

    #[test]
    fn test_event_errors() {
        let mut live = live_report();
        let reply = route(&Method::Post, "/api/event", "{not json", &mut live);
        assert_eq!(reply.status, 400);
        assert_eq!(json(&reply)["ok"], false);

        let reply = route(&Method::Post, "/api/event", r#"{"type":"click","id":"t5-alt-0-toggle"}"#, &mut live);
        assert_eq!(reply.status, 400);
        assert_eq!(json(&reply)["error"], "Unknown element: t5-alt-0-toggle");
    }

    #[test]
    fn test_unknown_route() {
        let mut live = live_report();
        assert_eq!(route(&Method::Get, "/nope", "", &mut live).status, 404);
        assert_eq!(route(&Method::Get, "/api/event", "", &mut live).status, 404);
    }

    // ==========================================================================
    // EXPORTS
    // ==========================================================================

    #[test]
    fn test_static_export_download() {
        let mut live = live_report();
        route(&Method::Post, "/api/event", r#"{"type":"click","id":"t0-alt-0-toggle"}"#, &mut live);
        let reply = route(&Method::Get, "/api/export/html", "", &mut live);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.file_name.as_deref(), Some("SEO_QA_Report_-_SEO-42_Final.html"));
        let body = String::from_utf8(reply.body).unwrap();
        assert!(body.contains("이슈 없음"));
        assert!(!body.contains("contenteditable"));
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_xlsx_export_download() {
        let mut live = live_report();
        let reply = route(&Method::Get, "/api/export/xlsx", "", &mut live);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, XLSX);
        let name = reply.file_name.unwrap();
        assert!(name.starts_with("SEO-42_") && name.ends_with(".xlsx"));
        assert_eq!(&reply.body[..2], b"PK");
    }

    #[cfg(not(feature = "xlsx"))]
    #[test]
    fn test_xlsx_export_unavailable() {
        let mut live = live_report();
        let reply = route(&Method::Get, "/api/export/xlsx", "", &mut live);
        assert_eq!(reply.status, 500);
        assert_eq!(json(&reply)["ok"], false);
    }

    #[test]
    fn test_content_disposition_encoding() {
        assert_eq!(
            content_disposition("SEO QA_보고서.xlsx"),
            "attachment; filename*=UTF-8''SEO%20QA_%EB%B3%B4%EA%B3%A0%EC%84%9C.xlsx"
        );
    }
}
