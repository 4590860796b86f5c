//! Owned SVG document tree.
//!
//! The document is an explicit arena of nodes with parent/child indices,
//! owned by a single [`SvgDocument`] value, standing in for the live DOM
//! a browser host would mutate. The canvas is the only mutator for the
//! lifetime of a mounted document.
//!
//! Parsing goes through `roxmltree`; the read-only parse tree is lowered
//! into the arena once, after which all structure and attribute changes
//! happen in place. The mutated tree can be serialized back to SVG text
//! with [`SvgDocument::to_svg_string`].

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, TransformList};
use crate::{CanvasError, CanvasResult};

/// Element names the canvas treats as atomic visual shapes.
///
/// Matches the set the generation service emits: closed shapes, paths,
/// line primitives, text and embedded images.
pub const SHAPE_NAMES: &[&str] = &[
    "path", "rect", "circle", "ellipse", "polygon", "polyline", "line", "text", "image",
];

/// Attribute used to tag interactive groups in serialized output, so that
/// exported documents survive a re-mount without double-wrapping.
const DRAGGABLE_ATTR: &str = "data-draggable";

/// Attribute used to tag hit-area rectangles in serialized output.
const HIT_AREA_ATTR: &str = "data-hit-area";

/// Index of a node in the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// The raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural role of a node, checked by exact match.
///
/// Serialized documents carry the role as a `data-draggable` /
/// `data-hit-area` attribute; in the arena membership is a typed tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeTag {
    /// Plain content.
    #[default]
    None,
    /// Wrapper group created by shape normalization.
    InteractiveGroup,
    /// Invisible hit rectangle inside an interactive group.
    HitArea,
    /// The single highlight overlay rectangle.
    HighlightOverlay,
}

/// Node content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum NodeKind {
    /// An element with a local name and ordered attributes.
    Element {
        /// Local element name (`rect`, `g`, ...).
        name: String,
        /// Attributes in document order, `transform` excluded.
        attributes: Vec<(String, String)>,
    },
    /// A text node.
    Text(String),
}

/// A single node in the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Arena index of this node.
    pub id: NodeId,
    /// Element or text content.
    pub kind: NodeKind,
    /// Parent node, `None` for the root.
    pub parent: Option<NodeId>,
    /// Children in rendering order.
    pub children: Vec<NodeId>,
    /// Parsed `transform` attribute (empty list = identity).
    pub transforms: TransformList,
    /// Structural role.
    pub tag: NodeTag,
}

impl Node {
    /// The element name, or `None` for text nodes.
    #[must_use]
    pub fn element_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { name, .. } => Some(name),
            NodeKind::Text(_) => None,
        }
    }
}

/// An owned, mutable SVG document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvgDocument {
    nodes: Vec<Node>,
    root: NodeId,
    /// The root `viewBox`, if present.
    pub view_box: Option<Rect>,
}

impl SvgDocument {
    /// Parse an SVG document from text.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Parse`] for malformed XML and
    /// [`CanvasError::InvalidTransform`] for unparsable `transform`
    /// attributes.
    pub fn parse(svg: &str) -> CanvasResult<Self> {
        let tree = roxmltree::Document::parse(svg)?;
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            view_box: None,
        };
        let root = doc.lower(tree.root_element(), None)?;
        doc.root = root;
        doc.view_box = doc
            .attribute(root, "viewBox")
            .and_then(parse_view_box);
        Ok(doc)
    }

    fn lower(&mut self, src: roxmltree::Node<'_, '_>, parent: Option<NodeId>) -> CanvasResult<NodeId> {
        let mut attributes = Vec::new();
        let mut transforms = TransformList::new();
        let mut tag = NodeTag::None;
        for attr in src.attributes() {
            match attr.name() {
                "transform" => transforms = TransformList::parse(attr.value())?,
                DRAGGABLE_ATTR => tag = NodeTag::InteractiveGroup,
                HIT_AREA_ATTR => tag = NodeTag::HitArea,
                name => attributes.push((name.to_string(), attr.value().to_string())),
            }
        }
        let id = self.push(
            NodeKind::Element {
                name: src.tag_name().name().to_string(),
                attributes,
            },
            parent,
        );
        self.node_mut_internal(id).transforms = transforms;
        self.node_mut_internal(id).tag = tag;

        for child in src.children() {
            if child.is_element() {
                let child_id = self.lower(child, Some(id))?;
                self.node_mut_internal(id).children.push(child_id);
            } else if child.is_text() {
                let text = child.text().unwrap_or_default();
                if !text.trim().is_empty() {
                    let child_id = self.push(NodeKind::Text(text.to_string()), Some(id));
                    self.node_mut_internal(id).children.push(child_id);
                }
            }
        }
        Ok(id)
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            kind,
            parent,
            children: Vec::new(),
            transforms: TransformList::new(),
            tag: NodeTag::None,
        });
        id
    }

    fn node_mut_internal(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// The root element.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable node by ID.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All node IDs in document (pre-order) traversal.
    #[must_use]
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            // Push children reversed so the left-most is visited first
            for &child in self.nodes[id.0].children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Interactive groups in document order (back-most first).
    #[must_use]
    pub fn interactive_groups(&self) -> Vec<NodeId> {
        self.descendants()
            .into_iter()
            .filter(|&id| self.nodes[id.0].tag == NodeTag::InteractiveGroup)
            .collect()
    }

    /// The nearest interactive group at or above a node.
    ///
    /// Walks the ancestor chain starting from the node itself; this is how
    /// a pointer target inside a wrapped shape resolves to its group.
    #[must_use]
    pub fn nearest_interactive_group(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.nodes.get(current.0)?;
            if node.tag == NodeTag::InteractiveGroup {
                return Some(current);
            }
            cursor = node.parent;
        }
        None
    }

    /// Whether the node is an atomic shape eligible for wrapping.
    #[must_use]
    pub fn is_shape(&self, id: NodeId) -> bool {
        let node = &self.nodes[id.0];
        node.tag == NodeTag::None
            && node
                .element_name()
                .is_some_and(|name| SHAPE_NAMES.contains(&name))
    }

    /// Look up an attribute value on an element.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// Set (or replace) an attribute on an element. No-op on text nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            if let NodeKind::Element { attributes, .. } = &mut node.kind {
                let value = value.into();
                if let Some(entry) = attributes.iter_mut().find(|(key, _)| key == name) {
                    entry.1 = value;
                } else {
                    attributes.push((name.to_string(), value));
                }
            }
        }
    }

    /// Remove an attribute from an element.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            if let NodeKind::Element { attributes, .. } = &mut node.kind {
                attributes.retain(|(key, _)| key != name);
            }
        }
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(
            NodeKind::Element {
                name: name.to_string(),
                attributes: Vec::new(),
            },
            None,
        )
    }

    /// Append a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert a detached node into `parent` immediately before `reference`.
    ///
    /// Falls back to appending when `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, new: NodeId, reference: NodeId) {
        self.nodes[new.0].parent = Some(parent);
        let children = &mut self.nodes[parent.0].children;
        match children.iter().position(|&c| c == reference) {
            Some(pos) => children.insert(pos, new),
            None => children.push(new),
        }
    }

    /// Reparent `target` into a detached `wrapper`, with the wrapper taking
    /// the target's position among its former siblings.
    ///
    /// Rendering order is unchanged: the wrapper occupies exactly the slot
    /// the target held. No-op when `target` is the root.
    pub fn wrap_node(&mut self, target: NodeId, wrapper: NodeId) {
        let Some(parent) = self.nodes[target.0].parent else {
            return;
        };
        let children = &mut self.nodes[parent.0].children;
        let Some(pos) = children.iter().position(|&c| c == target) else {
            return;
        };
        children[pos] = wrapper;
        self.nodes[wrapper.0].parent = Some(parent);
        self.nodes[wrapper.0].children.push(target);
        self.nodes[target.0].parent = Some(wrapper);
    }

    /// Serialize the document back to SVG text.
    ///
    /// The highlight overlay is interaction chrome, not content, and is
    /// skipped. Interactive-group and hit-area tags are re-emitted as
    /// `data-` attributes so a re-mounted export is not double-wrapped.
    #[must_use]
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        if node.tag == NodeTag::HighlightOverlay {
            return;
        }
        match &node.kind {
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Element { name, attributes } => {
                out.push('<');
                out.push_str(name);
                if id == self.root && name == "svg" {
                    out.push_str(" xmlns=\"http://www.w3.org/2000/svg\"");
                }
                for (key, value) in attributes {
                    if key.starts_with("xmlns") {
                        continue;
                    }
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                if !node.transforms.is_empty() {
                    out.push_str(" transform=\"");
                    out.push_str(&escape_attr(&node.transforms.to_attribute()));
                    out.push('"');
                }
                match node.tag {
                    NodeTag::InteractiveGroup => {
                        out.push(' ');
                        out.push_str(DRAGGABLE_ATTR);
                        out.push_str("=\"true\"");
                    }
                    NodeTag::HitArea => {
                        out.push(' ');
                        out.push_str(HIT_AREA_ATTR);
                        out.push_str("=\"true\"");
                    }
                    NodeTag::None | NodeTag::HighlightOverlay => {}
                }
                if node.children.is_empty() {
                    out.push_str("/>");
                } else {
                    out.push('>');
                    for &child in &node.children {
                        self.write_node(child, out);
                    }
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            }
        }
    }

    /// Serialize the arena to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string(self).map_err(CanvasError::Serialization)
    }

    /// Deserialize an arena from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        serde_json::from_str(json).map_err(CanvasError::Serialization)
    }
}

fn parse_view_box(value: &str) -> Option<Rect> {
    let parts: Vec<f64> = value
        .split(|ch: char| ch.is_whitespace() || ch == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [x, y, w, h] => Some(Rect::new(*x, *y, *w, *h)),
        _ => None,
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_document() {
        let doc = SvgDocument::parse(
            r#"<svg viewBox="0 0 100 50"><rect x="1" y="2" width="3" height="4"/></svg>"#,
        )
        .expect("parses");
        assert_eq!(doc.node_count(), 2);
        let vb = doc.view_box.expect("has viewBox");
        assert!((vb.width - 100.0).abs() < f64::EPSILON);
        assert!((vb.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_reports_malformed_xml() {
        let err = SvgDocument::parse("<svg><rect</svg>");
        assert!(matches!(err, Err(CanvasError::Parse(_))));
    }

    #[test]
    fn test_parse_lifts_transform_attribute() {
        let doc = SvgDocument::parse(r#"<svg><g transform="translate(5 6)"><rect/></g></svg>"#)
            .expect("parses");
        let g = doc.descendants()[1];
        let node = doc.node(g).expect("exists");
        assert_eq!(node.transforms.len(), 1);
        assert!(doc.attribute(g, "transform").is_none());
    }

    #[test]
    fn test_parse_rejects_bad_transform() {
        let err = SvgDocument::parse(r#"<svg><g transform="warp(9)"/></svg>"#);
        assert!(matches!(err, Err(CanvasError::InvalidTransform(_))));
    }

    #[test]
    fn test_is_shape() {
        let doc = SvgDocument::parse("<svg><rect/><g/><defs/></svg>").expect("parses");
        let ids = doc.descendants();
        assert!(doc.is_shape(ids[1]));
        assert!(!doc.is_shape(ids[2]));
        assert!(!doc.is_shape(ids[3]));
        assert!(!doc.is_shape(doc.root()));
    }

    #[test]
    fn test_nearest_interactive_group_walks_ancestors() {
        let doc = SvgDocument::parse(
            r#"<svg><g data-draggable="true"><rect data-hit-area="true"/><rect/></g><circle/></svg>"#,
        )
        .expect("parses");
        let ids = doc.descendants();
        let group = ids[1];
        let shape = ids[3];
        let loose = ids[4];
        assert_eq!(doc.nearest_interactive_group(shape), Some(group));
        assert_eq!(doc.nearest_interactive_group(group), Some(group));
        assert_eq!(doc.nearest_interactive_group(loose), None);
    }

    #[test]
    fn test_wrap_node_preserves_position() {
        let mut doc =
            SvgDocument::parse("<svg><circle/><rect/><ellipse/></svg>").expect("parses");
        let rect = doc.descendants()[2];
        let wrapper = doc.create_element("g");
        doc.wrap_node(rect, wrapper);

        let root_children = &doc.node(doc.root()).expect("root").children;
        assert_eq!(root_children.len(), 3);
        assert_eq!(root_children[1], wrapper);
        assert_eq!(doc.node(wrapper).expect("wrapper").children, vec![rect]);
        assert_eq!(doc.node(rect).expect("rect").parent, Some(wrapper));
    }

    #[test]
    fn test_attribute_set_and_replace() {
        let mut doc = SvgDocument::parse("<svg><rect x=\"1\"/></svg>").expect("parses");
        let rect = doc.descendants()[1];
        assert_eq!(doc.attribute(rect, "x"), Some("1"));
        doc.set_attribute(rect, "x", "9");
        doc.set_attribute(rect, "fill", "red");
        assert_eq!(doc.attribute(rect, "x"), Some("9"));
        assert_eq!(doc.attribute(rect, "fill"), Some("red"));
        doc.remove_attribute(rect, "fill");
        assert_eq!(doc.attribute(rect, "fill"), None);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let svg = r#"<svg viewBox="0 0 10 10"><g transform="translate(1 2)"><rect x="0" y="0" width="5" height="5"/><text>a &amp; b</text></g></svg>"#;
        let doc = SvgDocument::parse(svg).expect("parses");
        let out = doc.to_svg_string();
        let reparsed = SvgDocument::parse(&out).expect("reparses");
        assert_eq!(doc.node_count(), reparsed.node_count());
        assert_eq!(doc.view_box, reparsed.view_box);
    }

    #[test]
    fn test_serialize_keeps_interactive_tags() {
        let svg = r#"<svg><g data-draggable="true"><rect data-hit-area="true"/><rect/></g></svg>"#;
        let doc = SvgDocument::parse(svg).expect("parses");
        let ids = doc.descendants();
        assert_eq!(doc.node(ids[1]).expect("g").tag, NodeTag::InteractiveGroup);
        assert_eq!(doc.node(ids[2]).expect("hit").tag, NodeTag::HitArea);
        let out = doc.to_svg_string();
        assert!(out.contains("data-draggable"));
        assert!(out.contains("data-hit-area"));
    }

    #[test]
    fn test_json_roundtrip() {
        let doc = SvgDocument::parse("<svg><rect/></svg>").expect("parses");
        let json = doc.to_json().expect("serializes");
        let back = SvgDocument::from_json(&json).expect("deserializes");
        assert_eq!(doc, back);
    }
}
