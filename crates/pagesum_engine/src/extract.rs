use pagesum_core::text::{collapse_whitespace, truncate_chars, MAX_PAGE_CHARS};
use pagesum_core::TabHandle;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::decode::decode_page;
use crate::fetch::{FetchSettings, PageFetcher};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("invalid tab target: {0}")]
    InvalidTab(String),
    #[error("page request timed out")]
    Timeout,
    #[error("page returned http status {0}")]
    HttpStatus(u16),
    #[error("page larger than {max_bytes} bytes")]
    TooLarge { max_bytes: u64 },
    #[error("unsupported content type {0}")]
    UnsupportedContentType(String),
    #[error("page fetch failed: {0}")]
    Fetch(String),
    #[error("page read failed: {0}")]
    Read(String),
}

/// Page-text extraction collaborator: visible text of a tab, whitespace
/// collapsed and capped to 5000 characters.
#[async_trait::async_trait]
pub trait PageExtractor: Send + Sync {
    async fn extract_text(&self, tab: &TabHandle) -> Result<String, ExtractError>;
}

#[derive(Debug, Clone)]
pub struct HtmlPageExtractor {
    fetcher: PageFetcher,
}

impl HtmlPageExtractor {
    pub fn new(settings: FetchSettings) -> Self {
        Self {
            fetcher: PageFetcher::new(settings),
        }
    }
}

impl Default for HtmlPageExtractor {
    fn default() -> Self {
        Self::new(FetchSettings::default())
    }
}

#[async_trait::async_trait]
impl PageExtractor for HtmlPageExtractor {
    async fn extract_text(&self, tab: &TabHandle) -> Result<String, ExtractError> {
        let page = self.fetcher.fetch(tab).await?;
        let decoded = decode_page(&page.bytes, page.content_type.as_deref());
        let is_plain = page
            .content_type
            .as_deref()
            .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("text/plain"))
            .unwrap_or(false);
        let raw = if is_plain {
            decoded.text
        } else {
            visible_text(&decoded.text)
        };
        let collapsed = collapse_whitespace(&raw);
        Ok(truncate_chars(&collapsed, MAX_PAGE_CHARS).to_string())
    }
}

const HIDDEN_ELEMENTS: [&str; 6] = ["script", "style", "noscript", "template", "head", "svg"];
const BLOCK_ELEMENTS: [&str; 36] = [
    "address", "article", "aside", "blockquote", "br", "caption", "dd", "details", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th",
    "tr", "ul",
];

/// Text a reader would see in `<body>`; falls back to the whole document.
pub fn visible_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let root = Selector::parse("body")
        .ok()
        .and_then(|sel| doc.select(&sel).next())
        .unwrap_or_else(|| doc.root_element());
    let mut out = String::new();
    collect_text(root, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if HIDDEN_ELEMENTS.contains(&el.name()) => {}
            Node::Element(el) => {
                // Inline markup must not split words; block boundaries do.
                let block = BLOCK_ELEMENTS.contains(&el.name());
                if block {
                    out.push(' ');
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::visible_text;
    use pagesum_core::text::collapse_whitespace;

    #[test]
    fn scripts_and_styles_are_skipped() {
        let html = r#"<html><head><title>T</title><style>p{}</style></head>
            <body><p>Hello <b>world</b></p><script>var x = 1;</script>
            <noscript>enable js</noscript><div>Bye</div></body></html>"#;
        assert_eq!(collapse_whitespace(&visible_text(html)), "Hello world Bye");
    }

    #[test]
    fn inline_markup_keeps_words_whole() {
        let html = "<body><p>un<b>believ</b>able <a href='#'>li</a>nk</p><p>next</p>line<br>break</body>";
        assert_eq!(
            collapse_whitespace(&visible_text(html)),
            "unbelievable link next line break"
        );
    }

    #[test]
    fn fragment_without_body_still_yields_text() {
        assert_eq!(collapse_whitespace(&visible_text("just text")), "just text");
    }
}
