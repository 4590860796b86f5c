//! Shape normalization: wrapping atomic shapes in interactive groups.
//!
//! Every atomic shape in a freshly mounted document is wrapped in its own
//! `<g>` tagged [`NodeTag::InteractiveGroup`], containing an invisible
//! hit rectangle sized to the shape's pre-wrap bounding box followed by
//! the shape itself. The hit rectangle sits behind the shape, so visual
//! stacking is unchanged while the whole bounding box becomes clickable.
//!
//! Wrapping is idempotent: a shape whose immediate parent already carries
//! the interactive-group tag is skipped, so re-running normalization on
//! the same document never double-wraps.

use crate::bbox::shape_bbox;
use crate::document::{NodeTag, SvgDocument};
use crate::geometry::Rect;

/// Minimum hit-area edge length in user units.
///
/// A shape with a zero-size bounding box (an empty path, say) still gets
/// wrapped; its hit rectangle is inflated to this size, centered on the
/// degenerate box, so the shape remains selectable and draggable.
pub const MIN_HIT_SIZE: f64 = 8.0;

/// Wrap every not-yet-wrapped atomic shape in the document.
///
/// Returns the number of shapes wrapped by this pass.
pub fn wrap_shapes(doc: &mut SvgDocument) -> usize {
    let candidates: Vec<_> = doc
        .descendants()
        .into_iter()
        .filter(|&id| doc.is_shape(id))
        .filter(|&id| {
            // Immediate-parent tag check: already-wrapped shapes are skipped
            doc.node(id)
                .and_then(|node| node.parent)
                .and_then(|parent| doc.node(parent))
                .is_none_or(|parent| parent.tag != NodeTag::InteractiveGroup)
        })
        .collect();

    for &shape in &candidates {
        let bounds = ensure_min_size(shape_bbox(doc, shape));

        let group = doc.create_element("g");
        if let Some(node) = doc.node_mut(group) {
            node.tag = NodeTag::InteractiveGroup;
        }
        doc.wrap_node(shape, group);

        let hit = doc.create_element("rect");
        doc.set_attribute(hit, "x", fmt(bounds.x));
        doc.set_attribute(hit, "y", fmt(bounds.y));
        doc.set_attribute(hit, "width", fmt(bounds.width));
        doc.set_attribute(hit, "height", fmt(bounds.height));
        doc.set_attribute(hit, "fill", "transparent");
        doc.set_attribute(hit, "pointer-events", "fill");
        if let Some(node) = doc.node_mut(hit) {
            node.tag = NodeTag::HitArea;
        }
        doc.insert_before(group, hit, shape);
    }

    candidates.len()
}

fn ensure_min_size(mut r: Rect) -> Rect {
    if r.width < MIN_HIT_SIZE {
        r.x -= (MIN_HIT_SIZE - r.width) / 2.0;
        r.width = MIN_HIT_SIZE;
    }
    if r.height < MIN_HIT_SIZE {
        r.y -= (MIN_HIT_SIZE - r.height) / 2.0;
        r.height = MIN_HIT_SIZE;
    }
    r
}

fn fmt(value: f64) -> String {
    // Trim trailing ".0" noise from whole numbers
    if (value.fract()).abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeKind;

    fn group_and_children(doc: &SvgDocument) -> (Vec<usize>, usize) {
        let groups = doc.interactive_groups();
        (
            groups.iter().map(|id| id.index()).collect(),
            groups.len(),
        )
    }

    #[test]
    fn test_wraps_single_rect() {
        let mut doc = SvgDocument::parse(
            r#"<svg><rect x="10" y="20" width="30" height="40"/></svg>"#,
        )
        .expect("parses");
        assert_eq!(wrap_shapes(&mut doc), 1);

        let groups = doc.interactive_groups();
        assert_eq!(groups.len(), 1);
        let group = doc.node(groups[0]).expect("group");
        assert_eq!(group.children.len(), 2);

        // Hit rect first (behind), original shape second
        let hit = doc.node(group.children[0]).expect("hit");
        assert_eq!(hit.tag, NodeTag::HitArea);
        assert_eq!(doc.attribute(hit.id, "x"), Some("10"));
        assert_eq!(doc.attribute(hit.id, "width"), Some("30"));
        assert_eq!(doc.attribute(hit.id, "pointer-events"), Some("fill"));

        let shape = doc.node(group.children[1]).expect("shape");
        assert_eq!(shape.element_name(), Some("rect"));
        assert_eq!(shape.tag, NodeTag::None);
    }

    #[test]
    fn test_wrapping_is_idempotent() {
        let mut doc = SvgDocument::parse(
            r#"<svg><rect width="5" height="5"/><circle cx="1" cy="1" r="1"/></svg>"#,
        )
        .expect("parses");
        assert_eq!(wrap_shapes(&mut doc), 2);
        let after_first = doc.clone();
        assert_eq!(wrap_shapes(&mut doc), 0);
        assert_eq!(doc, after_first);
        let (_, count) = group_and_children(&doc);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_preserves_sibling_order() {
        let mut doc = SvgDocument::parse(
            r#"<svg><rect width="1" height="1"/><circle r="1"/><ellipse rx="1" ry="1"/></svg>"#,
        )
        .expect("parses");
        wrap_shapes(&mut doc);
        let root = doc.node(doc.root()).expect("root");
        let names: Vec<_> = root
            .children
            .iter()
            .map(|&g| {
                let group = doc.node(g).expect("group");
                let shape = *group.children.last().expect("shape");
                match &doc.node(shape).expect("shape").kind {
                    NodeKind::Element { name, .. } => name.clone(),
                    NodeKind::Text(_) => String::new(),
                }
            })
            .collect();
        assert_eq!(names, vec!["rect", "circle", "ellipse"]);
    }

    #[test]
    fn test_zero_size_shape_gets_minimum_hit_area() {
        let mut doc = SvgDocument::parse(r#"<svg><path d=""/></svg>"#).expect("parses");
        wrap_shapes(&mut doc);
        let groups = doc.interactive_groups();
        let hit = doc.node(groups[0]).expect("group").children[0];
        let w: f64 = doc
            .attribute(hit, "width")
            .and_then(|v| v.parse().ok())
            .expect("width");
        let h: f64 = doc
            .attribute(hit, "height")
            .and_then(|v| v.parse().ok())
            .expect("height");
        assert!((w - MIN_HIT_SIZE).abs() < f64::EPSILON);
        assert!((h - MIN_HIT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_nested_shapes_are_wrapped_in_place() {
        let mut doc = SvgDocument::parse(
            r#"<svg><g transform="translate(5 5)"><rect width="2" height="2"/></g></svg>"#,
        )
        .expect("parses");
        wrap_shapes(&mut doc);
        let groups = doc.interactive_groups();
        assert_eq!(groups.len(), 1);
        // The wrapper lives inside the original outer <g>
        let wrapper = doc.node(groups[0]).expect("wrapper");
        let outer = wrapper.parent.expect("outer");
        assert_eq!(doc.node(outer).expect("outer").element_name(), Some("g"));
    }
}
