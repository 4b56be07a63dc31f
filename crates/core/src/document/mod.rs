//! Arena document tree
//!
//! Nodes live in a flat arena and are addressed by stable [`NodeId`]s, so a
//! caller can collect ids, then mutate the tree without holding borrows into
//! it. Replacing a node detaches it from its parent but never invalidates
//! other ids.
//!
//! Parsed nodes remember the exact source text they came from; a node that
//! is never modified serializes back to those same bytes.

pub mod markup;

use std::ops::Range;

use crate::error::{ProofError, Result};

/// Elements whose text is collected for correction
pub const CONTENT_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "div", "li", "span", "a", "strong", "em", "b", "i",
];

/// Stable handle to a node in a [`DocumentTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Element name and attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    /// `<br/>`-style element with no children and no end tag
    pub self_closing: bool,
    /// Original open tag, written verbatim on serialization
    pub(crate) source: Option<String>,
    /// Original end tag; `None` for a parsed element left unclosed
    pub(crate) end_source: Option<String>,
}

impl ElementData {
    pub fn new(tag: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        Self {
            tag: tag.into(),
            attributes,
            self_closing: false,
            source: None,
            end_source: None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Text content of a text node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextData {
    /// Decoded text
    pub content: String,
    /// Original source slice (entities still escaped)
    pub(crate) source: Option<String>,
    /// Resolved references, in source order
    pub(crate) references: Vec<EntitySpan>,
}

/// A character or entity reference resolved while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EntitySpan {
    /// Decoded text in `content`
    pub(crate) content: Range<usize>,
    /// The reference in `source`
    pub(crate) source: Range<usize>,
}

impl TextData {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: None,
            references: Vec::new(),
        }
    }

    /// Source spelling of `content[range]`. `None` for built text or when
    /// the range splits a reference.
    pub(crate) fn source_slice(&self, range: Range<usize>) -> Option<&str> {
        let source = self.source.as_deref()?;
        let start = self.source_offset(range.start)?;
        let end = self.source_offset(range.end)?;
        source.get(start..end)
    }

    fn source_offset(&self, offset: usize) -> Option<usize> {
        let (mut content_at, mut source_at) = (0, 0);
        for entity in &self.references {
            if offset <= entity.content.start {
                break;
            }
            if offset < entity.content.end {
                return None;
            }
            content_at = entity.content.end;
            source_at = entity.source.end;
        }
        Some(source_at + (offset - content_at))
    }
}

/// What a node is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The root
    Document,
    Element(ElementData),
    Text(TextData),
    /// Comment body, without delimiters
    Comment(String),
    /// Doctype, declaration or processing instruction, kept verbatim
    Raw(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Structural content spliced into a tree in place of a text node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentNode {
    Text(String),
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<FragmentNode>,
    },
}

impl FragmentNode {
    pub fn text(text: impl Into<String>) -> Self {
        FragmentNode::Text(text.into())
    }

    /// Element holding a single text child
    pub fn wrap(tag: impl Into<String>, attributes: Vec<(String, String)>, text: impl Into<String>) -> Self {
        FragmentNode::Element {
            tag: tag.into(),
            attributes,
            children: vec![FragmentNode::Text(text.into())],
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            FragmentNode::Text(_) => Ok(()),
            FragmentNode::Element {
                tag,
                attributes,
                children,
            } => {
                if !is_valid_name(tag) {
                    return Err(ProofError::MalformedFragment(format!(
                        "invalid element name {:?}",
                        tag
                    )));
                }
                if let Some((name, _)) = attributes.iter().find(|(name, _)| !is_valid_name(name)) {
                    return Err(ProofError::MalformedFragment(format!(
                        "invalid attribute name {:?}",
                        name
                    )));
                }
                children.iter().try_for_each(FragmentNode::validate)
            }
        }
    }
}

/// Element and attribute names: an ASCII letter followed by ASCII
/// alphanumerics or `-`
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// A mutable document tree
#[derive(Debug, Clone)]
pub struct DocumentTree {
    nodes: Vec<Node>,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree {
    /// Create a tree holding only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.0).map(|n| &n.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.kind(id)? {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.kind)? {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text(data) => Some(&data.content),
            _ => None,
        }
    }

    /// Source spelling of part of a parsed text node's content
    pub(crate) fn text_source(&self, id: NodeId, range: Range<usize>) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text(data) => data.source_slice(range),
            _ => None,
        }
    }

    /// Serialize a text node as `source` instead of escaping its content.
    /// `source` must spell the node's content.
    pub(crate) fn set_text_source(&mut self, id: NodeId, source: &str) {
        if let Some(NodeKind::Text(data)) = self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            data.source = Some(source.to_string());
        }
    }

    /// Tag name of the node's parent element, if the parent is an element
    pub fn parent_tag(&self, id: NodeId) -> Option<&str> {
        self.parent(id)
            .and_then(|p| self.element(p))
            .map(|e| e.tag.as_str())
    }

    /// Append a node of any kind as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId> {
        match self.kind(parent) {
            Some(NodeKind::Document | NodeKind::Element(_)) => {}
            Some(_) => {
                return Err(ProofError::MalformedFragment(format!(
                    "node {} cannot have children",
                    parent.0
                )))
            }
            None => return Err(ProofError::NodeNotFound(parent.0)),
        }

        let id = self.push_node(Some(parent), kind);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
        attributes: Vec<(String, String)>,
    ) -> Result<NodeId> {
        self.append(parent, NodeKind::Element(ElementData::new(tag, attributes)))
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> Result<NodeId> {
        self.append(parent, NodeKind::Text(TextData::new(text)))
    }

    /// Overwrite a text node's content in place
    pub fn set_text(&mut self, id: NodeId, content: impl Into<String>) -> Result<()> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            Some(NodeKind::Text(data)) => {
                *data = TextData::new(content);
                Ok(())
            }
            Some(_) => Err(ProofError::MalformedFragment(format!(
                "node {} is not a text node",
                id.0
            ))),
            None => Err(ProofError::NodeNotFound(id.0)),
        }
    }

    /// Replace one attached text node with a fragment, keeping sibling order.
    ///
    /// The fragment is validated before anything is touched, so on error the
    /// tree is unchanged. Returns the ids of the new top-level nodes.
    pub fn replace_text_with_fragment(
        &mut self,
        id: NodeId,
        fragment: &[FragmentNode],
    ) -> Result<Vec<NodeId>> {
        if self.text(id).is_none() {
            return match self.kind(id) {
                Some(_) => Err(ProofError::MalformedFragment(format!(
                    "node {} is not a text node",
                    id.0
                ))),
                None => Err(ProofError::NodeNotFound(id.0)),
            };
        }

        let parent = self
            .parent(id)
            .ok_or_else(|| ProofError::MalformedFragment(format!("node {} is detached", id.0)))?;
        let slot = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == id)
            .ok_or_else(|| ProofError::MalformedFragment(format!("node {} is detached", id.0)))?;

        fragment.iter().try_for_each(FragmentNode::validate)?;

        let new_ids: Vec<NodeId> = fragment
            .iter()
            .map(|node| self.build_fragment(parent, node))
            .collect();

        self.nodes[parent.0]
            .children
            .splice(slot..=slot, new_ids.iter().copied());
        self.nodes[id.0].parent = None;

        Ok(new_ids)
    }

    fn build_fragment(&mut self, parent: NodeId, node: &FragmentNode) -> NodeId {
        match node {
            FragmentNode::Text(text) => self.push_node(Some(parent), NodeKind::Text(TextData::new(text.clone()))),
            FragmentNode::Element {
                tag,
                attributes,
                children,
            } => {
                let kind = NodeKind::Element(ElementData::new(tag.clone(), attributes.clone()));
                let id = self.push_node(Some(parent), kind);
                for child in children {
                    let child_id = self.build_fragment(id, child);
                    self.nodes[id.0].children.push(child_id);
                }
                id
            }
        }
    }

    fn push_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Nodes reachable from `id` in document order, `id` first
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            if current.0 >= self.nodes.len() {
                continue;
            }
            order.push(current);
            stack.extend(self.nodes[current.0].children.iter().rev());
        }

        order
    }

    /// Attached text nodes in document order
    pub fn text_nodes(&self) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&id| self.text(id).is_some())
            .collect()
    }

    /// Concatenated text of every text node under `id`
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &[], &mut out);
        out
    }

    /// Text sent for correction.
    ///
    /// Each outermost content element ([`CONTENT_TAGS`]) with non-blank text
    /// contributes its text followed by a newline. Without any, the whole
    /// document's text is used. Text under `skip_tags` is never included.
    pub fn extract_text(&self, skip_tags: &[String]) -> String {
        let mut extracted = String::new();
        let mut stack = vec![self.root()];

        while let Some(id) = stack.pop() {
            if let Some(element) = self.element(id) {
                if is_listed(skip_tags, &element.tag) {
                    continue;
                }
                if CONTENT_TAGS.iter().any(|t| t.eq_ignore_ascii_case(&element.tag)) {
                    let mut text = String::new();
                    self.collect_text(id, skip_tags, &mut text);
                    if !text.trim().is_empty() {
                        extracted.push_str(&text);
                        extracted.push('\n');
                    }
                    continue;
                }
            }
            stack.extend(self.children(id).iter().rev());
        }

        if extracted.is_empty() {
            self.collect_text(self.root(), skip_tags, &mut extracted);
        }

        extracted
    }

    fn collect_text(&self, id: NodeId, skip_tags: &[String], out: &mut String) {
        match self.kind(id) {
            Some(NodeKind::Text(data)) => out.push_str(&data.content),
            Some(NodeKind::Element(element)) if is_listed(skip_tags, &element.tag) => {}
            Some(NodeKind::Document | NodeKind::Element(_)) => {
                for &child in self.children(id) {
                    self.collect_text(child, skip_tags, out);
                }
            }
            _ => {}
        }
    }
}

fn is_listed(tags: &[String], tag: &str) -> bool {
    tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DocumentTree, NodeId, NodeId) {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let body = tree.append_element(root, "body", vec![]).unwrap();
        let p = tree
            .append_element(body, "p", vec![("class".into(), "lead".into())])
            .unwrap();
        let text = tree.append_text(p, "This are wrong.").unwrap();
        (tree, p, text)
    }

    #[test]
    fn test_build_and_query() {
        let (tree, p, text) = sample();
        assert_eq!(tree.parent(text), Some(p));
        assert_eq!(tree.parent_tag(text), Some("p"));
        assert_eq!(tree.element(p).unwrap().attribute("CLASS"), Some("lead"));
        assert_eq!(tree.text_nodes(), vec![text]);
        assert_eq!(tree.text_content(tree.root()), "This are wrong.");
    }

    #[test]
    fn test_text_cannot_have_children() {
        let (mut tree, _, text) = sample();
        assert!(matches!(
            tree.append_text(text, "x"),
            Err(ProofError::MalformedFragment(_))
        ));
        assert!(matches!(
            tree.append_text(NodeId(999), "x"),
            Err(ProofError::NodeNotFound(999))
        ));
    }

    #[test]
    fn test_replace_text_with_fragment_keeps_sibling_order() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let p = tree.append_element(root, "p", vec![]).unwrap();
        let before = tree.append_element(p, "b", vec![]).unwrap();
        let text = tree.append_text(p, "This are wrong.").unwrap();
        let after = tree.append_element(p, "i", vec![]).unwrap();

        let new_ids = tree
            .replace_text_with_fragment(
                text,
                &[
                    FragmentNode::text("This "),
                    FragmentNode::wrap("u", vec![], "are"),
                    FragmentNode::text(" wrong."),
                ],
            )
            .unwrap();

        let children = tree.children(p).to_vec();
        assert_eq!(children.len(), 5);
        assert_eq!(children[0], before);
        assert_eq!(&children[1..4], new_ids.as_slice());
        assert_eq!(children[4], after);
        assert_eq!(tree.parent(text), None);
        assert_eq!(tree.element(new_ids[1]).unwrap().tag, "u");
        assert_eq!(tree.text_content(p), "This are wrong.");
    }

    #[test]
    fn test_malformed_fragment_leaves_tree_untouched() {
        let (mut tree, p, text) = sample();
        let result = tree.replace_text_with_fragment(
            text,
            &[FragmentNode::text("ok"), FragmentNode::wrap("bad tag", vec![], "x")],
        );

        assert!(matches!(result, Err(ProofError::MalformedFragment(_))));
        assert_eq!(tree.children(p), &[text]);
        assert_eq!(tree.parent(text), Some(p));
    }

    #[test]
    fn test_replace_detached_node_fails() {
        let (mut tree, _, text) = sample();
        tree.replace_text_with_fragment(text, &[FragmentNode::text("x")]).unwrap();
        assert!(tree
            .replace_text_with_fragment(text, &[FragmentNode::text("y")])
            .is_err());
    }

    #[test]
    fn test_set_text() {
        let (mut tree, p, text) = sample();
        tree.set_text(text, "This is wrong.").unwrap();
        assert_eq!(tree.text_content(p), "This is wrong.");
        assert!(tree.set_text(p, "nope").is_err());
    }

    #[test]
    fn test_extract_text_outermost_content_elements() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let body = tree.append_element(root, "body", vec![]).unwrap();
        let h1 = tree.append_element(body, "h1", vec![]).unwrap();
        tree.append_text(h1, "Title").unwrap();
        let p = tree.append_element(body, "p", vec![]).unwrap();
        tree.append_text(p, "Some ").unwrap();
        let strong = tree.append_element(p, "strong", vec![]).unwrap();
        tree.append_text(strong, "bold").unwrap();
        tree.append_text(p, " text.").unwrap();
        let empty = tree.append_element(body, "div", vec![]).unwrap();
        tree.append_text(empty, "   ").unwrap();
        let script = tree.append_element(body, "script", vec![]).unwrap();
        tree.append_text(script, "var x;").unwrap();

        let skip = vec!["script".to_string(), "style".to_string()];
        assert_eq!(tree.extract_text(&skip), "Title\nSome bold text.\n");
    }

    #[test]
    fn test_extract_text_falls_back_to_document_text() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let td = tree.append_element(root, "td", vec![]).unwrap();
        tree.append_text(td, "cell text").unwrap();

        assert_eq!(tree.extract_text(&[]), "cell text");
    }

    #[test]
    fn test_names() {
        assert!(is_valid_name("mark"));
        assert!(is_valid_name("data-x"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("9a"));
        assert!(!is_valid_name("a b"));
    }
}
