/// Escape text content for HTML.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// One entry of the results panel: a link wrapping the page name and the
/// highlighted message copy. `snippet_html` is inserted as-is.
pub fn render_result_entry(link: &str, page_file: &str, snippet_html: &str) -> String {
    format!(
        concat!(
            "<div class=\"search-result\"><a href=\"{link}\">",
            "<div class=\"search-result-page\">{page}</div>",
            "<div class=\"search-result-content\">{snippet}</div>",
            "</a></div>"
        ),
        link = escape_attr(link),
        page = escape_text(page_file),
        snippet = snippet_html,
    )
}

const RESULTS_CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: #f5f5f5; color: #212121; margin: 0; padding: 16px; }
.search-modal-header { font-size: 1.1rem; padding: 8px 0; }
#search-status { padding: 8px 0; font-size: 0.85rem; color: #757575; border-bottom: 1px solid rgba(0,0,0,0.06); }
#search-results { padding: 16px 0; }
.search-result { margin-bottom: 16px; border-radius: 8px; overflow: hidden; box-shadow: 0 1px 3px rgba(0,0,0,0.1); background: #fff; }
.search-result a { display: block; text-decoration: none; color: inherit; }
.search-result a:hover { background: rgba(25, 118, 210, 0.05); }
.search-result-page { padding: 6px 12px; background: rgba(0,0,0,0.03); font-size: 0.8rem; color: #757575; border-bottom: 1px solid rgba(0,0,0,0.06); }
.search-result-content { padding: 12px; }
.search-result mark { background: #fff59d; padding: 1px 2px; border-radius: 2px; }
"#;

/// Standalone document listing rendered result entries under a status line.
pub fn render_results_page(query: &str, status: &str, entries: &[String]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>Search: {}</title>\n<style>{RESULTS_CSS}</style>\n</head>\n<body>\n",
        escape_text(query)
    ));
    html.push_str(&format!(
        "<div class=\"search-modal-header\">Search: <strong>{}</strong></div>\n",
        escape_text(query)
    ));
    html.push_str(&format!(
        "<div id=\"search-status\">{}</div>\n<div id=\"search-results\">\n",
        escape_text(status)
    ));
    for entry in entries {
        html.push_str(entry);
        html.push('\n');
    }
    html.push_str("</div>\n</body>\n</html>\n");
    html
}
