//! DOCX text extraction over the raw OOXML parts.
//!
//! Supports: Microsoft Word (.docx)
//!
//! Text is emitted in a fixed order, every fragment on its own line:
//!
//! 1. top-level body paragraphs, in document order
//! 2. cells of top-level body tables, row-major; a nested table follows the
//!    paragraphs of the cell that hosts it
//! 3. for each section, the paragraphs and table cells of its default header,
//!    then those of its default footer
//!
//! A section that declares no default header (or footer) reuses the one of the
//! previous section, as Word does for "link to previous".
//!
//! Text boxes and other drawing content anchored in a run are not extracted.

use crate::Result;
use crate::error::TallyError;
use crate::extractors::TextExtractor;
use roxmltree::{Document, Node};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;

const W_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const RELS_NAMESPACE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const DOCUMENT_PART: &str = "word/document.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Extractor for Word documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for DocxExtractor {
    fn name(&self) -> &str {
        "docx-extractor"
    }

    fn extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn extract(&self, content: &[u8]) -> Result<String> {
        let mut container = DocxContainer::open(content)?;
        let fragments = container.collect_fragments()?;
        Ok(fragments.join("\n"))
    }
}

/// Header and footer relationship ids in effect for one section.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct SectionParts {
    header: Option<String>,
    footer: Option<String>,
}

struct DocxContainer<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> DocxContainer<'a> {
    fn open(content: &'a [u8]) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(content))?;
        Ok(Self { archive })
    }

    fn read_part(&mut self, path: &str) -> Result<Option<String>> {
        let mut file = match self.archive.by_name(path) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut xml = String::new();
        file.read_to_string(&mut xml)
            .map_err(|e| TallyError::parsing_with_source(format!("Failed to read {}: {}", path, e), e))?;
        Ok(Some(xml))
    }

    fn collect_fragments(&mut self) -> Result<Vec<String>> {
        let document_xml = self
            .read_part(DOCUMENT_PART)?
            .ok_or_else(|| TallyError::parsing(format!("DOCX is missing {}", DOCUMENT_PART)))?;
        let document = Document::parse(&document_xml)?;

        let body = document
            .root_element()
            .children()
            .find(|n| is_w(n, "body"))
            .ok_or_else(|| TallyError::parsing("DOCX document has no body"))?;

        let mut fragments = Vec::new();
        fragments.extend(body.children().filter(|n| is_w(n, "p")).map(paragraph_text));
        for table in body.children().filter(|n| is_w(n, "tbl")) {
            collect_table(table, &mut fragments);
        }

        let sections = section_parts(body);
        if sections.iter().all(|s| s.header.is_none() && s.footer.is_none()) {
            return Ok(fragments);
        }

        let relationships = match self.read_part(DOCUMENT_RELS_PART)? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        for section in &sections {
            for rel_id in [&section.header, &section.footer].into_iter().flatten() {
                let Some(target) = relationships.get(rel_id) else {
                    tracing::debug!(rel_id = rel_id.as_str(), "Header/footer relationship not found");
                    continue;
                };
                match self.read_part(&part_path(target))? {
                    Some(xml) => collect_story(&xml, &mut fragments)?,
                    None => tracing::debug!(target = target.as_str(), "Header/footer part missing from archive"),
                }
            }
        }

        Ok(fragments)
    }
}

fn is_w(node: &Node, name: &str) -> bool {
    node.is_element() && node.has_tag_name((W_NAMESPACE, name))
}

/// Text of one paragraph: run text, with tabs and breaks kept as whitespace.
/// Elements inside a paragraph that wrap runs without changing what they say.
const RUN_CONTAINERS: &[&str] = &[
    "hyperlink",
    "ins",
    "moveTo",
    "smartTag",
    "sdt",
    "sdtContent",
    "fldSimple",
    "customXml",
];

/// Visible text of one paragraph.
///
/// Only runs that belong to the paragraph itself are read. Drawings, VML shapes
/// and `mc:AlternateContent` blocks are skipped, so text-box paragraphs do not
/// leak into the host paragraph.
fn paragraph_text(paragraph: Node) -> String {
    let mut text = String::new();
    collect_runs(paragraph, &mut text);
    text
}

fn collect_runs(container: Node, text: &mut String) {
    for child in container.children().filter(|n| n.is_element()) {
        if is_w(&child, "r") {
            run_text(child, text);
        } else if RUN_CONTAINERS.iter().any(|name| is_w(&child, name)) {
            collect_runs(child, text);
        }
    }
}

fn run_text(run: Node, text: &mut String) {
    for node in run.children().filter(|n| n.is_element()) {
        if is_w(&node, "t") {
            text.push_str(node.text().unwrap_or_default());
        } else if is_w(&node, "tab") {
            text.push('\t');
        } else if is_w(&node, "br") || is_w(&node, "cr") {
            text.push('\n');
        }
    }
}

/// Append the cells of `table` row-major. Each cell yields its own paragraphs
/// joined by newlines, followed by any tables nested in it.
fn collect_table(table: Node, fragments: &mut Vec<String>) {
    for row in table.children().filter(|n| is_w(n, "tr")) {
        for cell in row.children().filter(|n| is_w(n, "tc")) {
            let text = cell
                .children()
                .filter(|n| is_w(n, "p"))
                .map(paragraph_text)
                .collect::<Vec<_>>()
                .join("\n");
            fragments.push(text);

            for nested in cell.children().filter(|n| is_w(n, "tbl")) {
                collect_table(nested, fragments);
            }
        }
    }
}

/// Append the paragraphs, then the table cells, of a header or footer part.
fn collect_story(xml: &str, fragments: &mut Vec<String>) -> Result<()> {
    let story = Document::parse(xml)?;
    let root = story.root_element();

    fragments.extend(root.children().filter(|n| is_w(n, "p")).map(paragraph_text));
    for table in root.children().filter(|n| is_w(n, "tbl")) {
        collect_table(table, fragments);
    }

    Ok(())
}

/// Resolve the default header/footer of every section in document order,
/// carrying references forward into sections that declare none.
fn section_parts(body: Node) -> Vec<SectionParts> {
    let mut sections = Vec::new();
    let mut current = SectionParts::default();

    let section_nodes = body.descendants().filter(|n| {
        is_w(n, "sectPr") && !n.ancestors().skip(1).any(|a| is_w(&a, "sectPrChange"))
    });

    for section in section_nodes {
        if let Some(id) = default_reference(section, "headerReference") {
            current.header = Some(id);
        }
        if let Some(id) = default_reference(section, "footerReference") {
            current.footer = Some(id);
        }
        sections.push(current.clone());
    }

    sections
}

fn default_reference(section: Node, kind: &str) -> Option<String> {
    section
        .children()
        .filter(|n| is_w(n, kind))
        .find(|n| n.attribute((W_NAMESPACE, "type")).unwrap_or("default") == "default")
        .and_then(|n| n.attribute((RELS_NAMESPACE, "id")))
        .map(str::to_string)
}

/// Map relationship id to target from a `.rels` part.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let doc = Document::parse(xml)?;
    let mut relationships = HashMap::new();

    for node in doc.descendants() {
        if node.has_tag_name("Relationship")
            && let Some(id) = node.attribute("Id")
            && let Some(target) = node.attribute("Target")
        {
            relationships.insert(id.to_string(), target.to_string());
        }
    }

    Ok(relationships)
}

/// Archive path of a relationship target, which is relative to `word/` unless absolute.
fn part_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("word/{}", target),
    }
}
