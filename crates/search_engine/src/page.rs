use ego_tree::NodeRef;
use scraper::node::{Element, Node};
use scraper::{ElementRef, Html, Selector};

use crate::highlight::Highlighter;
use crate::links::qualify_in_page_href;
use crate::render::escape_attr;
use crate::SearchHit;

const EXCERPT_CHARS: usize = 160;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content would run or restyle wherever a snippet is shown.
const ACTIVE_ELEMENTS: &[&str] = &["script", "style", "iframe", "object", "embed"];

/// Scan one fetched page for messages containing the query.
///
/// The page is parsed into its own detached tree; nothing in it executes and
/// the returned snippets are fresh copies.
pub fn scan_page(
    html: &str,
    page_file: &str,
    selector: &Selector,
    highlighter: &Highlighter,
) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    document
        .select(selector)
        .filter_map(|message| {
            let text: String = message.text().collect();
            if !highlighter.is_candidate(&text) {
                return None;
            }
            let message_id = message
                .value()
                .id()
                .filter(|id| !id.is_empty())
                .map(str::to_string);
            let link = match &message_id {
                Some(id) => format!("{page_file}#{id}"),
                None => page_file.to_string(),
            };
            let mut snippet_html = String::new();
            SnippetWriter {
                page_file,
                highlighter,
                out: &mut snippet_html,
            }
            .write_element(message);
            Some(SearchHit {
                page_file: page_file.to_string(),
                message_id,
                link,
                snippet_html,
                excerpt: excerpt(&text),
            })
        })
        .collect()
}

/// Serializes a copy of a message subtree, qualifying in-page links and
/// marking query occurrences in text nodes. Other tags and attributes pass
/// through; active elements and `on*` handler attributes are left out.
struct SnippetWriter<'a> {
    page_file: &'a str,
    highlighter: &'a Highlighter,
    out: &'a mut String,
}

impl SnippetWriter<'_> {
    fn write_element(&mut self, element: ElementRef<'_>) {
        let value = element.value();
        let name = value.name();
        if ACTIVE_ELEMENTS.contains(&name) {
            return;
        }
        self.write_start_tag(value);
        if VOID_ELEMENTS.contains(&name) {
            return;
        }
        for child in element.children() {
            self.write_node(child);
        }
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }

    fn write_start_tag(&mut self, element: &Element) {
        self.out.push('<');
        self.out.push_str(element.name());
        for (attr, value) in element.attrs() {
            if is_event_handler(attr) {
                continue;
            }
            let rewritten = if attr == "href" {
                qualify_in_page_href(self.page_file, value)
            } else {
                None
            };
            self.out.push(' ');
            self.out.push_str(attr);
            self.out.push_str("=\"");
            self.out
                .push_str(&escape_attr(rewritten.as_deref().unwrap_or(value)));
            self.out.push('"');
        }
        self.out.push('>');
    }

    fn write_node(&mut self, node: NodeRef<'_, Node>) {
        match node.value() {
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(node) {
                    self.write_element(element);
                }
            }
            Node::Text(text) => self.highlighter.write_html(text, self.out),
            Node::Comment(comment) => {
                self.out.push_str("<!--");
                self.out.push_str(comment);
                self.out.push_str("-->");
            }
            _ => {
                for child in node.children() {
                    self.write_node(child);
                }
            }
        }
    }
}

fn is_event_handler(attr: &str) -> bool {
    attr.len() > 2 && attr.get(..2).is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"))
}

fn excerpt(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &collapsed[..cut]),
        None => collapsed,
    }
}
