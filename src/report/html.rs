//! HTML rendering: the live QA page and the frozen static export
//!
//! Both documents are projections of the same [`Report`]. The live page has
//! contenteditable fields, toggles, sortable headers and a script that keeps
//! the server's model in sync. The static export re-renders every tab with
//! fields flattened to plain text and the current highlight state baked into
//! the cell classes, plus a tiny script that can only switch tabs.

use crate::highlight::{Status, HIGHLIGHT_CLASS};
use crate::model::{element_id, AltTable, CellKind, CellView, HeaderSpec, Report, Tab, ALT_HEADERS, SEO_HEADERS};
use std::io::{self, Write};

/// Suffix appended to the title and heading of the static export
pub const FINAL_SUFFIX: &str = "(Final)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Live,
    Frozen,
}

/// A rendered static export, ready to be saved or downloaded
#[derive(Debug, Clone)]
pub struct StaticExport {
    pub file_name: String,
    pub html: String,
}

/// Escape text for HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Write the live page
pub fn write<W: Write>(writer: &mut W, report: &Report) -> io::Result<()> {
    writer.write_all(render_live(report).as_bytes())
}

/// Render the live, editable page
pub fn render_live(report: &Report) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang='ko'>\n<head>\n");
    html.push_str("<meta charset='UTF-8'>\n");
    html.push_str("<meta name='viewport' content='width=device-width, initial-scale=1.0'>\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&report.title)));
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n<div class='main-container'>\n");
    html.push_str(&format!("<h2>{}</h2>\n", escape_html(&report.heading)));
    html.push_str(
        "<div class='toolbar'>\
         <button class='export-button' onclick='exportStaticReport()'>HTML 내보내기</button>\
         <button class='export-button' onclick='exportToExcel()'>Excel 내보내기</button>\
         </div>\n",
    );
    html.push_str(&render_nav(report));
    for (index, tab) in report.tabs.iter().enumerate() {
        html.push_str(&render_tab(report, index, tab, Mode::Live));
    }
    html.push_str("</div>\n");
    html.push_str(&format!("<script>{}</script>\n", LIVE_SCRIPT));
    html.push_str("</body>\n</html>\n");
    html
}

/// File name of the static export: heading with spaces turned into underscores
pub fn static_file_name(heading: &str) -> String {
    format!("{}_Final.html", heading.replace(' ', "_"))
}

/// Render the frozen, non-editable copy of the report
pub fn export_static(report: &Report) -> StaticExport {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html lang='ko'><head><meta charset='UTF-8'>");
    html.push_str(&format!("<title>{} {}</title>", escape_html(&report.title), FINAL_SUFFIX));
    html.push_str(&format!("<style>{}</style>", STYLE));
    html.push_str(&format!("<script>{}</script></head><body>", STATIC_SCRIPT));
    html.push_str(&format!(
        "<div class='main-container'><h2>{} {}</h2>",
        escape_html(&report.heading),
        FINAL_SUFFIX
    ));
    html.push_str(&render_nav(report));
    for (index, tab) in report.tabs.iter().enumerate() {
        html.push_str(&render_tab(report, index, tab, Mode::Frozen));
    }
    html.push_str("</div></body></html>");

    StaticExport { file_name: static_file_name(&report.heading), html }
}

fn render_nav(report: &Report) -> String {
    let mut nav = String::from(
        "<div class='tabs-wrapper'>\
         <button class='scroll-arrow left'>&#9664;</button>\
         <div class='tab-container'>\n",
    );
    for (index, tab) in report.tabs.iter().enumerate() {
        let active = if report.tab_state.is_active(index) { " active" } else { "" };
        nav.push_str(&format!(
            "<button class='tab-button{}' data-id='{}' title='{}' onclick='showTab({})'>{}</button>\n",
            active,
            element_id::tab(index),
            escape_html(&tab.url),
            index,
            escape_html(&tab.label)
        ));
    }
    nav.push_str("</div><button class='scroll-arrow right'>&#9654;</button></div>\n");
    nav
}

fn render_tab(report: &Report, index: usize, tab: &Tab, mode: Mode) -> String {
    let active = if report.tab_state.is_active(index) { " active" } else { "" };
    let mut html = format!("<div id='urlContent_{}' class='tab-content{}'>\n", index, active);

    html.push_str("<h3>SEO QA</h3>\n<table class='seo-table'><thead><tr>");
    for header in &SEO_HEADERS {
        html.push_str(&render_header(header, header.text, None));
    }
    html.push_str("</tr></thead><tbody>\n");
    for row in &tab.seo.rows {
        html.push_str(&render_row(row.id, &row.cells(index), mode));
    }
    html.push_str("</tbody></table>\n");

    if let Some(alt) = &tab.alt {
        html.push_str(&render_alt_table(index, alt, mode));
    }

    html.push_str("</div>\n");
    html
}

fn render_alt_table(tab: usize, alt: &AltTable, mode: Mode) -> String {
    let mut html = String::from("<h3>Image Alt QA</h3>\n<table class='alt-table'><thead><tr>");
    for (column, header) in ALT_HEADERS.iter().enumerate() {
        let sort_attrs = header.sortable.then(|| {
            let mut attrs = format!(" data-id='{}'", element_id::alt_sort(tab, column));
            if let Some(direction) = alt.sort.direction(column) {
                attrs.push_str(&format!(" data-sort-order='{}'", direction.as_str()));
            }
            (attrs, alt.sort.glyph(column))
        });
        html.push_str(&render_header(header, header.text, sort_attrs));
    }
    html.push_str("</tr></thead><tbody>\n");
    for row in &alt.rows {
        html.push_str(&render_row(row.id, &row.cells(tab), mode));
    }
    html.push_str("</tbody></table>\n");
    html
}

fn render_header(header: &HeaderSpec, text: &str, sort: Option<(String, &str)>) -> String {
    let mut attrs = String::new();
    if let Some(class) = header.class {
        attrs.push_str(&format!(" class='{}'", class));
    }
    if let Some(width) = header.width {
        attrs.push_str(&format!(" style='width:{}'", width));
    }
    match sort {
        Some((sort_attrs, glyph)) => format!(
            "<th{}{}>{} <i class='sort-icon'>{}</i></th>",
            attrs,
            sort_attrs,
            escape_html(text),
            glyph
        ),
        None => format!("<th{}>{}</th>", attrs, escape_html(text)),
    }
}

fn render_row(id: usize, cells: &[CellView<'_>], mode: Mode) -> String {
    let mut html = format!("<tr data-row='{}'>\n", id);
    for cell in cells {
        html.push_str("  ");
        html.push_str(&render_cell(cell, mode));
        html.push('\n');
    }
    html.push_str("</tr>\n");
    html
}

fn render_cell(cell: &CellView<'_>, mode: Mode) -> String {
    let mut classes: Vec<&str> = cell.class.into_iter().collect();
    if cell.status.is_some_and(Status::is_issue) {
        classes.push(HIGHLIGHT_CLASS);
    }

    let mut attrs = String::new();
    if !classes.is_empty() {
        attrs.push_str(&format!(" class='{}'", classes.join(" ")));
    }
    if let Some(status) = cell.status {
        attrs.push_str(&format!(" data-status='{}'", status));
    }
    if cell.colspan > 1 {
        attrs.push_str(&format!(" colspan='{}'", cell.colspan));
    }

    let text = escape_html(cell.text);
    let content = match (&cell.kind, mode) {
        (CellKind::Image { src }, _) => {
            format!("<img src='{}' alt='Image Preview' loading='lazy'>", escape_html(src))
        }
        (CellKind::Field { id, editable }, Mode::Live) => {
            let editable = if *editable { " contenteditable='true'" } else { "" };
            format!("<div class='editable-field' data-id='{}'{}>{}</div>", id, editable, text)
        }
        (CellKind::Toggle { id }, Mode::Live) => {
            format!("<div class='alt-comment-toggle' data-id='{}'>{}</div>", id, text)
        }
        _ => text,
    };

    format!("<td{}>{}</td>", attrs, content)
}

const STATIC_SCRIPT: &str = "function showTab(t){document.querySelectorAll('.tab-button').forEach((e,n)=>e.classList.toggle('active',n===t));document.querySelectorAll('.tab-content').forEach((e,n)=>e.classList.toggle('active',n===t))}document.addEventListener('DOMContentLoaded',()=>showTab(0));";

const STYLE: &str = r#"
:root {
    --bg: #f6f8fa;
    --card: #ffffff;
    --border: #d0d7de;
    --text: #1f2328;
    --dim: #656d76;
    --accent: #0969da;
    --issue: #fff1c2;
    --issue-border: #d4a72c;
}
* { box-sizing: border-box; }
body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans KR', 'Malgun Gothic', sans-serif;
    background: var(--bg);
    color: var(--text);
    line-height: 1.5;
}
.main-container { max-width: 1600px; margin: 0 auto; padding: 2rem; }
h2 { margin: 0 0 1rem; }
h3 { margin: 1.5rem 0 0.5rem; color: var(--dim); }

/* Toolbar */
.toolbar { display: flex; gap: 0.5rem; margin-bottom: 1rem; }
.export-button {
    background: var(--accent);
    color: #fff;
    border: none;
    border-radius: 6px;
    padding: 0.5rem 1rem;
    cursor: pointer;
}
.export-button:hover { opacity: 0.9; }

/* Tabs */
.tabs-wrapper { display: flex; align-items: center; gap: 0.25rem; border-bottom: 1px solid var(--border); }
.tab-container { display: flex; overflow-x: auto; scroll-behavior: smooth; scrollbar-width: none; flex: 1; }
.scroll-arrow { background: none; border: none; color: var(--dim); cursor: pointer; padding: 0.5rem; }
.tab-button {
    background: none;
    border: none;
    border-bottom: 2px solid transparent;
    padding: 0.5rem 1rem;
    cursor: pointer;
    white-space: nowrap;
    color: var(--dim);
}
.tab-button.active { color: var(--text); border-bottom-color: var(--accent); font-weight: 600; }
.tab-content { display: none; padding-top: 0.5rem; }
.tab-content.active { display: block; }

/* Tables */
table { width: 100%; border-collapse: collapse; background: var(--card); table-layout: fixed; }
th, td { border: 1px solid var(--border); padding: 0.5rem 0.75rem; text-align: left; vertical-align: top; word-break: break-all; }
th { background: #eaeef2; font-size: 0.85rem; }
th.sortable { cursor: pointer; user-select: none; }
.sort-icon { font-style: normal; color: var(--dim); }
.len-col { width: 60px; text-align: center; color: var(--dim); }
.factor-name { font-weight: 600; }
.editable-field { min-height: 1.5em; outline: none; }
.editable-field[contenteditable='true'] { cursor: text; }
.editable-field[contenteditable='true']:focus { box-shadow: 0 0 0 2px var(--accent); }
.alt-comment-toggle {
    display: inline-block;
    padding: 0.1rem 0.6rem;
    border: 1px solid var(--border);
    border-radius: 12px;
    cursor: pointer;
    user-select: none;
}
.highlight-cell { background: var(--issue); box-shadow: inset 3px 0 0 var(--issue-border); }
.alt-table img { max-width: 120px; max-height: 120px; }
"#;

const LIVE_SCRIPT: &str = r##"
const NO_ISSUE = ['이슈 없음', 'n/a', ''];
const NO_ISSUE_LABEL = '이슈 없음';
const NEEDS_FIX_LABEL = '수정 필요';
const SERVED = location.protocol === 'http:' || location.protocol === 'https:';
const pendingEdits = {};

function sendEvent(ev) {
    if (!SERVED) return Promise.resolve(null);
    return fetch('/api/event', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(ev)
    })
        .then(r => r.json())
        .then(res => {
            if (!res.ok) console.error(res.error);
            return res.data;
        })
        .catch(err => {
            console.error(err);
            return null;
        });
}

function queueEdit(field) {
    const id = field.dataset.id;
    if (pendingEdits[id]) clearTimeout(pendingEdits[id].timer);
    const send = () => {
        delete pendingEdits[id];
        return sendEvent({ type: 'edit', id: id, text: field.textContent });
    };
    pendingEdits[id] = { send: send, timer: setTimeout(send, 250) };
}

function flushEdits() {
    return Promise.all(Object.keys(pendingEdits).map(id => {
        clearTimeout(pendingEdits[id].timer);
        return pendingEdits[id].send();
    }));
}

function showTab(tabIndex) {
    document.querySelectorAll('.tab-button').forEach((tab, index) => tab.classList.toggle('active', index === tabIndex));
    document.querySelectorAll('.tab-content').forEach((content, index) => content.classList.toggle('active', index === tabIndex));
    sendEvent({ type: 'click', id: 'tab-' + tabIndex });
}

function handleHighlight(cell, isIssue) {
    if (!cell) return;
    cell.dataset.status = isIssue ? 'issue' : 'ok';
    cell.classList.toggle('highlight-cell', isIssue);
}

function updateLength(field) {
    const counterCell = field.closest('tr').querySelector('.len-counter-fix');
    if (counterCell) counterCell.textContent = `${field.textContent.length}자`;
}

function initFields() {
    document.querySelectorAll(".editable-field[contenteditable='true']").forEach(field => {
        const cell = field.closest('td');
        if (!cell) return;
        const isComment = cell.classList.contains('comment-cell');
        const isFix = cell.classList.contains('fix-cell');
        field.addEventListener('input', () => {
            if (isComment) {
                handleHighlight(cell, !NO_ISSUE.includes(field.textContent.trim().toLowerCase()));
            } else if (isFix) {
                updateLength(field);
            }
            queueEdit(field);
        });
        if (isComment) handleHighlight(cell, cell.dataset.status === 'issue');
        if (isFix) updateLength(field);
    });
}

function initToggles() {
    document.querySelectorAll('.alt-comment-toggle').forEach(toggle => {
        const cell = toggle.closest('td');
        toggle.addEventListener('click', () => {
            toggle.textContent = toggle.textContent.trim() === NO_ISSUE_LABEL ? NEEDS_FIX_LABEL : NO_ISSUE_LABEL;
            handleHighlight(cell, toggle.textContent === NEEDS_FIX_LABEL);
            sendEvent({ type: 'click', id: toggle.dataset.id });
        });
        handleHighlight(cell, toggle.textContent.trim() === NEEDS_FIX_LABEL);
    });
}

function initSorting() {
    document.querySelectorAll('th.sortable').forEach(header => {
        header.addEventListener('click', () => {
            const tbody = header.closest('table').querySelector('tbody');
            if (!tbody) return;
            const rows = Array.from(tbody.querySelectorAll('tr'));
            const col = header.cellIndex;
            const order = (header.dataset.sortOrder || 'desc') === 'asc' ? 'desc' : 'asc';
            header.dataset.sortOrder = order;
            rows.sort((a, b) => {
                const c = a.children[col].textContent.trim().localeCompare(b.children[col].textContent.trim(), 'ko');
                return order === 'asc' ? c : -c;
            });
            rows.forEach(row => tbody.appendChild(row));
            header.querySelector('.sort-icon').textContent = order === 'asc' ? '▲' : '▼';
            sendEvent({ type: 'click', id: header.dataset.id }).then(result => {
                if (!result || !result.order) return;
                const byId = {};
                rows.forEach(row => { byId[row.dataset.row] = row; });
                result.order.forEach(id => { if (byId[id]) tbody.appendChild(byId[id]); });
            });
        });
    });
}

function initTabScrolling() {
    const container = document.querySelector('.tab-container');
    if (!container) return;
    const left = document.querySelector('.scroll-arrow.left');
    const right = document.querySelector('.scroll-arrow.right');
    if (left) left.addEventListener('click', () => { container.scrollLeft -= 200; });
    if (right) right.addEventListener('click', () => { container.scrollLeft += 200; });
}

function download(url) {
    return flushEdits()
        .then(() => fetch(url))
        .then(response => {
            if (!response.ok) {
                return response.json().then(res => { throw new Error(res.error || response.statusText); });
            }
            const disposition = response.headers.get('Content-Disposition') || '';
            const match = disposition.match(/filename\*=UTF-8''([^;]+)/);
            const name = match ? decodeURIComponent(match[1]) : 'report';
            return response.blob().then(blob => {
                const link = document.createElement('a');
                link.href = URL.createObjectURL(blob);
                link.download = name;
                link.click();
                URL.revokeObjectURL(link.href);
            });
        });
}

function runExport(url, label) {
    if (!SERVED) {
        alert(label + ' 내보내기는 `seoqa serve`로 연 보고서에서만 사용할 수 있습니다.');
        return;
    }
    download(url).catch(e => {
        console.error(e);
        alert(label + ' 내보내기 중 오류가 발생했습니다: ' + e.message);
    });
}

function exportStaticReport() {
    runExport('/api/export/html', 'HTML');
}

function exportToExcel() {
    runExport('/api/export/xlsx', 'Excel');
}

document.addEventListener('DOMContentLoaded', () => {
    showTab(0);
    initFields();
    initToggles();
    initSorting();
    initTabScrolling();
});
"##;
