//! Bounding-box computation for document nodes.
//!
//! With no live DOM to ask for `getBBox()`, the owned tree computes
//! boxes itself. Geometry is exact for rects, circles, ellipses, lines
//! and polygons, conservative for paths (control points are included in
//! the envelope), and estimated for text from the font size.

use crate::document::{NodeId, NodeKind, NodeTag, SvgDocument};
use crate::geometry::{Matrix, Point, Rect};

/// Estimated advance width per character, as a fraction of font size.
const TEXT_ADVANCE: f64 = 0.6;

/// Estimated ascent above the baseline, as a fraction of font size.
const TEXT_ASCENT: f64 = 0.8;

/// Default SVG font size in user units.
const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Bounding box of a node's own geometry, in its local coordinates
/// (before the node's own transform).
///
/// Returns a zero rectangle at the shape's origin for shapes without
/// usable geometry, never panics.
#[must_use]
pub fn shape_bbox(doc: &SvgDocument, id: NodeId) -> Rect {
    let Some(node) = doc.node(id) else {
        return Rect::default();
    };
    let Some(name) = node.element_name() else {
        return Rect::default();
    };
    let attr = |key: &str| -> f64 {
        doc.attribute(id, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0.0)
    };
    match name {
        "rect" | "image" => Rect::new(attr("x"), attr("y"), attr("width"), attr("height")),
        "circle" => {
            let r = attr("r");
            Rect::new(attr("cx") - r, attr("cy") - r, 2.0 * r, 2.0 * r)
        }
        "ellipse" => {
            let rx = attr("rx");
            let ry = attr("ry");
            Rect::new(attr("cx") - rx, attr("cy") - ry, 2.0 * rx, 2.0 * ry)
        }
        "line" => {
            let points = [
                Point::new(attr("x1"), attr("y1")),
                Point::new(attr("x2"), attr("y2")),
            ];
            Rect::from_points(&points)
        }
        "polygon" | "polyline" => {
            let points = doc
                .attribute(id, "points")
                .map(parse_points)
                .unwrap_or_default();
            Rect::from_points(&points)
        }
        "path" => doc
            .attribute(id, "d")
            .map(path_bbox)
            .unwrap_or_default(),
        "text" => text_bbox(doc, id),
        _ => Rect::default(),
    }
}

/// Bounding box of a node and its descendants, in the node's local
/// coordinates (the node's own transform is not applied; each child's is).
#[must_use]
pub fn local_bbox(doc: &SvgDocument, id: NodeId) -> Rect {
    local_bbox_inner(doc, id).unwrap_or_default()
}

/// `None` when the subtree carries no geometry at all, so children like
/// `tspan` never contribute a phantom box at the origin.
fn local_bbox_inner(doc: &SvgDocument, id: NodeId) -> Option<Rect> {
    let node = doc.node(id)?;
    let mut result: Option<Rect> = if doc.is_shape(id) || node.tag == NodeTag::HitArea {
        Some(shape_bbox(doc, id))
    } else {
        None
    };
    for &child in &node.children {
        let Some(child_node) = doc.node(child) else {
            continue;
        };
        if child_node.tag == NodeTag::HighlightOverlay {
            continue;
        }
        if matches!(child_node.kind, NodeKind::Text(_)) {
            continue;
        }
        let Some(inner) = local_bbox_inner(doc, child) else {
            continue;
        };
        let child_box = child_node.transforms.consolidate().transform_rect(&inner);
        result = Some(match result {
            Some(acc) => acc.union(&child_box),
            None => child_box,
        });
    }
    result
}

/// The node's transform composed with all ancestor transforms, mapping the
/// node's local coordinates into root user space.
#[must_use]
pub fn node_ctm(doc: &SvgDocument, id: NodeId) -> Matrix {
    let mut chain = Vec::new();
    let mut cursor = Some(id);
    while let Some(current) = cursor {
        let Some(node) = doc.node(current) else {
            break;
        };
        chain.push(node.transforms.consolidate());
        cursor = node.parent;
    }
    chain
        .into_iter()
        .rev()
        .fold(Matrix::identity(), |acc, m| acc.multiply(&m))
}

/// Bounding box of a node and its descendants in root user space.
///
/// This is the arena equivalent of `getBoundingClientRect()` mapped back
/// through the screen CTM: the box the highlight overlay is pinned to.
#[must_use]
pub fn user_bbox(doc: &SvgDocument, id: NodeId) -> Rect {
    node_ctm(doc, id).transform_rect(&local_bbox(doc, id))
}

fn text_bbox(doc: &SvgDocument, id: NodeId) -> Rect {
    let font_size = doc
        .attribute(id, "font-size")
        .and_then(|v| v.trim().trim_end_matches("px").parse().ok())
        .unwrap_or(DEFAULT_FONT_SIZE);
    let chars = text_char_count(doc, id);
    let x = doc
        .attribute(id, "x")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0.0);
    let y: f64 = doc
        .attribute(id, "y")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0.0);
    #[allow(clippy::cast_precision_loss)] // Label lengths are tiny
    let width = TEXT_ADVANCE * font_size * chars as f64;
    Rect::new(x, y - TEXT_ASCENT * font_size, width, font_size)
}

/// Characters in a text element's subtree, nested `tspan`s included.
fn text_char_count(doc: &SvgDocument, id: NodeId) -> usize {
    let Some(node) = doc.node(id) else {
        return 0;
    };
    match &node.kind {
        NodeKind::Text(text) => text.chars().count(),
        NodeKind::Element { .. } => node
            .children
            .iter()
            .map(|&child| text_char_count(doc, child))
            .sum(),
    }
}

fn parse_points(value: &str) -> Vec<Point> {
    let coords: Vec<f64> = value
        .split(|ch: char| ch.is_whitespace() || ch == ',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();
    coords
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect()
}

/// Conservative bounding box of a path's `d` data.
///
/// Scans every coordinate the path touches, including cubic/quadratic
/// control points, which can only over-estimate the true envelope. Arc
/// segments contribute their endpoints.
#[must_use]
pub fn path_bbox(data: &str) -> Rect {
    let tokens = tokenize_path(data);
    let mut points = Vec::new();
    let mut cursor = Point::default();
    let mut subpath_start = Point::default();
    let mut idx = 0;

    while idx < tokens.len() {
        let PathToken::Command(cmd) = tokens[idx] else {
            // Stray number without a command; skip it
            idx += 1;
            continue;
        };
        idx += 1;
        let relative = cmd.is_ascii_lowercase();
        let upper = cmd.to_ascii_uppercase();
        match upper {
            'Z' => {
                cursor = subpath_start;
            }
            'M' | 'L' | 'T' => {
                let mut first = upper == 'M';
                while let Some([x, y]) = take_numbers::<2>(&tokens, &mut idx) {
                    cursor = resolve(cursor, x, y, relative);
                    points.push(cursor);
                    if first {
                        subpath_start = cursor;
                        first = false;
                    }
                }
            }
            'H' => {
                while let Some([x]) = take_numbers::<1>(&tokens, &mut idx) {
                    cursor.x = if relative { cursor.x + x } else { x };
                    points.push(cursor);
                }
            }
            'V' => {
                while let Some([y]) = take_numbers::<1>(&tokens, &mut idx) {
                    cursor.y = if relative { cursor.y + y } else { y };
                    points.push(cursor);
                }
            }
            'C' => {
                while let Some([x1, y1, x2, y2, x, y]) = take_numbers::<6>(&tokens, &mut idx) {
                    points.push(resolve(cursor, x1, y1, relative));
                    points.push(resolve(cursor, x2, y2, relative));
                    cursor = resolve(cursor, x, y, relative);
                    points.push(cursor);
                }
            }
            'S' | 'Q' => {
                while let Some([x1, y1, x, y]) = take_numbers::<4>(&tokens, &mut idx) {
                    points.push(resolve(cursor, x1, y1, relative));
                    cursor = resolve(cursor, x, y, relative);
                    points.push(cursor);
                }
            }
            'A' => {
                while let Some([_rx, _ry, _rot, _large, _sweep, x, y]) =
                    take_numbers::<7>(&tokens, &mut idx)
                {
                    cursor = resolve(cursor, x, y, relative);
                    points.push(cursor);
                }
            }
            _ => {}
        }
    }
    Rect::from_points(&points)
}

fn resolve(cursor: Point, x: f64, y: f64, relative: bool) -> Point {
    if relative {
        Point::new(cursor.x + x, cursor.y + y)
    } else {
        Point::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PathToken {
    Command(char),
    Number(f64),
}

fn take_numbers<const N: usize>(tokens: &[PathToken], idx: &mut usize) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    for (offset, slot) in out.iter_mut().enumerate() {
        match tokens.get(*idx + offset) {
            Some(PathToken::Number(n)) => *slot = *n,
            _ => return None,
        }
    }
    *idx += N;
    Some(out)
}

fn tokenize_path(data: &str) -> Vec<PathToken> {
    let mut tokens = Vec::new();
    let bytes = data.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        let ch = bytes[pos] as char;
        if ch.is_ascii_alphabetic() {
            tokens.push(PathToken::Command(ch));
            pos += 1;
        } else if ch.is_ascii_digit() || ch == '-' || ch == '+' || ch == '.' {
            let start = pos;
            pos += 1;
            let mut seen_dot = ch == '.';
            let mut seen_exp = false;
            while pos < bytes.len() {
                let next = bytes[pos] as char;
                match next {
                    '0'..='9' => pos += 1,
                    '.' if !seen_dot && !seen_exp => {
                        seen_dot = true;
                        pos += 1;
                    }
                    'e' | 'E' if !seen_exp => {
                        seen_exp = true;
                        pos += 1;
                        if pos < bytes.len() && (bytes[pos] == b'-' || bytes[pos] == b'+') {
                            pos += 1;
                        }
                    }
                    _ => break,
                }
            }
            if let Ok(n) = data[start..pos].parse() {
                tokens.push(PathToken::Number(n));
            }
        } else {
            pos += 1;
        }
    }
    tokens
}
