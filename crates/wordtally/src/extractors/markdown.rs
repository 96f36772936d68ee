//! Markdown extractor.
//!
//! The source is decoded leniently, rendered to HTML with pulldown-cmark and
//! reduced back to plain text, so that link targets, code fence info strings and
//! other markup never reach the word counter.

use crate::Result;
use crate::extractors::TextExtractor;
use crate::text::encoding;
use once_cell::sync::Lazy;
use pulldown_cmark::{Options, Parser, html};
use regex::Regex;

static BLOCK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:p|div|h[1-6]|li|ul|ol|blockquote|pre|table|thead|tbody|tr|th|td|hr|br)\b[^>]*>")
        .expect("Block tag regex pattern is valid and should compile")
});

static ANY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("Tag regex pattern is valid and should compile"));

/// Markdown extractor.
///
/// Never fails: undecodable bytes are replaced rather than rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownExtractor;

impl MarkdownExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for MarkdownExtractor {
    fn name(&self) -> &str {
        "markdown-extractor"
    }

    fn extensions(&self) -> &[&str] {
        &["md"]
    }

    fn extract(&self, content: &[u8]) -> Result<String> {
        let source = encoding::decode_lossy(content);
        Ok(markdown_to_text(&source))
    }
}

/// Render `source` as CommonMark (with tables and strikethrough) and strip the markup.
pub fn markdown_to_text(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, options);
    let mut rendered = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut rendered, parser);

    strip_html(&rendered)
}

fn strip_html(html: &str) -> String {
    let text = BLOCK_TAG.replace_all(html, "\n");
    let text = ANY_TAG.replace_all(&text, "");
    unescape_entities(&text)
}

fn unescape_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
