//! Lenient markup parsing and serialization
//!
//! Parsing accepts the HTML most pages actually contain: void elements
//! without a closing slash, mismatched or stray end tags, valueless
//! attributes and HTML entities. Every parsed node keeps its source slice so
//! that serializing an unmodified tree reproduces the input exactly.

use std::sync::LazyLock;

use quick_xml::{
    events::{BytesEnd, BytesStart, BytesText, Event},
    name::QName,
    Reader, Writer,
};
use regex::Regex;
use tracing::debug;

use super::{DocumentTree, ElementData, EntitySpan, NodeId, NodeKind, TextData};
use crate::error::{ProofError, Result};

/// Elements that never have children
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text, not markup
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

static BETWEEN_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\s+<").expect("valid regex"));
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static ENTITY_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);").expect("valid regex")
});

impl DocumentTree {
    /// Parse a markup string into a tree
    pub fn parse_html(input: &str) -> Result<Self> {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let mut open: Vec<NodeId> = vec![root];

        // Raw text bodies are scanned directly, then parsing resumes from
        // `base` with a fresh reader.
        let mut base = 0;
        let mut reader = lenient_reader(input);

        loop {
            let start = base + reader.buffer_position();
            let event = reader
                .read_event()
                .map_err(|err| ProofError::Markup(format!("at byte {}: {}", start, err)))?;
            let end = base + reader.buffer_position();
            let source = &input[start..end];
            let parent = open.last().copied().unwrap_or(root);

            match event {
                Event::Start(e) => {
                    let tag = tag_name(e.name());
                    let mut data = ElementData::new(tag.clone(), attributes(&e));
                    data.source = Some(source.to_string());
                    let id = tree.append(parent, NodeKind::Element(data))?;

                    if is_listed(VOID_TAGS, &tag) {
                        continue;
                    }
                    if is_listed(RAW_TEXT_TAGS, &tag) {
                        let (content, end_tag) = split_raw_text(&input[end..], &tag);
                        if !content.is_empty() {
                            let text = TextData {
                                content: content.to_string(),
                                source: Some(content.to_string()),
                                references: Vec::new(),
                            };
                            tree.append(id, NodeKind::Text(text))?;
                        }
                        if let Some(element) = tree.element_mut(id) {
                            element.end_source = (!end_tag.is_empty()).then(|| end_tag.to_string());
                        }

                        base = end + content.len() + end_tag.len();
                        reader = lenient_reader(&input[base..]);
                        continue;
                    }
                    open.push(id);
                }
                Event::Empty(e) => {
                    let mut data = ElementData::new(tag_name(e.name()), attributes(&e));
                    data.self_closing = true;
                    data.source = Some(source.to_string());
                    tree.append(parent, NodeKind::Element(data))?;
                }
                Event::End(e) => {
                    let tag = tag_name(e.name());
                    let matching = open.iter().rposition(|&id| {
                        tree.element(id)
                            .map_or(false, |el| el.tag.eq_ignore_ascii_case(&tag))
                    });

                    match matching {
                        Some(depth) => {
                            let id = open[depth];
                            open.truncate(depth);
                            if let Some(element) = tree.element_mut(id) {
                                element.end_source = Some(source.to_string());
                            }
                        }
                        None => {
                            debug!(tag = %tag, "keeping unmatched end tag as raw markup");
                            tree.append(parent, NodeKind::Raw(source.to_string()))?;
                        }
                    }
                }
                Event::Text(_) => {
                    let (content, references) = decode_text(source);
                    let text = TextData {
                        content,
                        source: Some(source.to_string()),
                        references,
                    };
                    tree.append(parent, NodeKind::Text(text))?;
                }
                Event::Comment(_) => {
                    let body = source
                        .strip_prefix("<!--")
                        .and_then(|s| s.strip_suffix("-->"))
                        .unwrap_or(source);
                    tree.append(parent, NodeKind::Comment(body.to_string()))?;
                }
                Event::Eof => break,
                _ => {
                    tree.append(parent, NodeKind::Raw(source.to_string()))?;
                }
            }
        }

        Ok(tree)
    }

    /// Parse raw document bytes of unknown encoding
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self> {
        Self::parse_html(&decode_bytes(bytes))
    }

    /// Serialize the tree back to markup
    pub fn to_html(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        for &child in self.children(self.root()) {
            self.write_node(&mut writer, child)?;
        }
        String::from_utf8(writer.into_inner()).map_err(|err| ProofError::Markup(err.to_string()))
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> Result<()> {
        match self.kind(id) {
            Some(NodeKind::Element(element)) => {
                match &element.source {
                    Some(source) => writer.get_mut().extend_from_slice(source.as_bytes()),
                    None => {
                        let mut start = BytesStart::new(element.tag.as_str());
                        for (key, value) in &element.attributes {
                            start.push_attribute((key.as_str(), value.as_str()));
                        }
                        let leaf = element.self_closing || is_listed(VOID_TAGS, &element.tag);
                        if leaf && self.children(id).is_empty() {
                            writer.write_event(Event::Empty(start))?;
                            return Ok(());
                        }
                        writer.write_event(Event::Start(start))?;
                    }
                }

                for &child in self.children(id) {
                    self.write_node(writer, child)?;
                }

                match (&element.source, &element.end_source) {
                    (_, Some(end)) => writer.get_mut().extend_from_slice(end.as_bytes()),
                    (Some(_), None) => {}
                    (None, None) => {
                        writer.write_event(Event::End(BytesEnd::new(element.tag.as_str())))?;
                    }
                }
            }
            Some(NodeKind::Text(text)) => match &text.source {
                Some(source) => writer.get_mut().extend_from_slice(source.as_bytes()),
                None => {
                    let escaped = html_escape::encode_text(&text.content);
                    writer.write_event(Event::Text(BytesText::from_escaped(escaped)))?;
                }
            },
            Some(NodeKind::Comment(body)) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(body.as_str())))?;
            }
            Some(NodeKind::Raw(raw)) => writer.get_mut().extend_from_slice(raw.as_bytes()),
            Some(NodeKind::Document) | None => {}
        }
        Ok(())
    }
}

fn lenient_reader(input: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(input);
    reader.trim_text(false);
    reader.check_end_names(false);
    reader
}

/// Split the text following a raw text element's open tag into its body and
/// its end tag. An unterminated body runs to the end of input.
fn split_raw_text<'a>(rest: &'a str, tag: &str) -> (&'a str, &'a str) {
    let closing = format!("</{}", tag);
    let Some(body_len) = rest.to_ascii_lowercase().find(&closing) else {
        return (rest, "");
    };

    let after = &rest[body_len..];
    let end_len = after.find('>').map_or(after.len(), |i| i + 1);
    (&rest[..body_len], &after[..end_len])
}

fn tag_name(name: QName<'_>) -> String {
    String::from_utf8_lossy(name.as_ref()).to_ascii_lowercase()
}

fn attributes(start: &BytesStart<'_>) -> Vec<(String, String)> {
    start
        .html_attributes()
        .with_checks(false)
        .filter_map(|attr| match attr {
            Ok(attr) => {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let raw = String::from_utf8_lossy(&attr.value);
                Some((key, html_escape::decode_html_entities(&raw).into_owned()))
            }
            Err(err) => {
                debug!(%err, "skipping malformed attribute");
                None
            }
        })
        .collect()
}

fn is_listed(tags: &[&str], tag: &str) -> bool {
    tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Resolve each character or entity reference on its own. Unknown
/// references and a bare `&` stay literal.
fn decode_text(raw: &str) -> (String, Vec<EntitySpan>) {
    let mut content = String::with_capacity(raw.len());
    let mut references = Vec::new();
    let mut cursor = 0;

    for reference in ENTITY_REFERENCE.find_iter(raw) {
        let decoded = html_escape::decode_html_entities(reference.as_str());
        if decoded == reference.as_str() {
            continue;
        }
        content.push_str(&raw[cursor..reference.start()]);
        let start = content.len();
        content.push_str(&decoded);
        references.push(EntitySpan {
            content: start..content.len(),
            source: reference.range(),
        });
        cursor = reference.end();
    }

    content.push_str(&raw[cursor..]);
    (content, references)
}

/// Decode document bytes: UTF-8 (BOM optional), UTF-16 with a BOM, and
/// Latin-1 for anything else
pub fn decode_bytes(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!("document is not UTF-8, decoding as Latin-1");
            bytes.iter().map(|&b| b as char).collect()
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Collapse whitespace between tags and whitespace runs inside text
pub fn compact_html(html: &str) -> String {
    let compacted = BETWEEN_TAGS.replace_all(html.trim(), "><");
    WHITESPACE_RUN.replace_all(&compacted, " ").into_owned()
}
