//! 2D geometry primitives for canvas coordinate math.
//!
//! All pointer math in the canvas converts between screen space (device
//! pixels) and user space (the document's own coordinate system, affected
//! by `viewBox` scaling). The conversion goes through [`Matrix`], a 2D
//! affine transform using the SVG `matrix(a b c d e f)` convention:
//!
//! ```text
//! | a  c  e |   | x |
//! | b  d  f | * | y |
//! | 0  0  1 |   | 1 |
//! ```

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult};

/// A point in either screen or user space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle (bounding box).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X of the top-left corner.
    pub x: f64,
    /// Y of the top-left corner.
    pub y: f64,
    /// Width (non-negative).
    pub width: f64,
    /// Height (non-negative).
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The top-left corner.
    #[must_use]
    pub const fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The right edge.
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// The bottom edge.
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the rectangle has zero area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether a point lies inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.max_x() && p.y >= self.y && p.y <= self.max_y()
    }

    /// The smallest rectangle covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Self::new(x, y, max_x - x, max_y - y)
    }

    /// The smallest rectangle covering a set of points.
    ///
    /// Returns a zero rectangle at the origin for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let mut min_x = first.x;
        let mut min_y = first.y;
        let mut max_x = first.x;
        let mut max_y = first.y;
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

/// A 2D affine transform matrix in SVG `matrix(a b c d e f)` layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)] // Component names follow the SVG specification
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    /// The identity matrix.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// A pure translation.
    #[must_use]
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: tx,
            f: ty,
        }
    }

    /// A pure scale about the origin.
    #[must_use]
    pub const fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            e: 0.0,
            f: 0.0,
        }
    }

    /// A rotation by `degrees` about the origin.
    #[must_use]
    pub fn rotation(degrees: f64) -> Self {
        let r = degrees.to_radians();
        let (sin, cos) = r.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Matrix product `self * other`.
    ///
    /// Applying the result to a point is equivalent to applying `other`
    /// first, then `self`.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// The inverse matrix, or `None` if the matrix is singular.
    #[must_use]
    pub fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    /// Apply the transform to a point.
    #[must_use]
    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// The axis-aligned envelope of a rectangle under this transform.
    #[must_use]
    pub fn transform_rect(&self, r: &Rect) -> Rect {
        let corners = [
            self.transform_point(Point::new(r.x, r.y)),
            self.transform_point(Point::new(r.max_x(), r.y)),
            self.transform_point(Point::new(r.x, r.max_y())),
            self.transform_point(Point::new(r.max_x(), r.max_y())),
        ];
        Rect::from_points(&corners)
    }

    /// The translation components `(e, f)`.
    ///
    /// This is what a drag gesture reads off the consolidated transform at
    /// gesture start.
    #[must_use]
    pub const fn translation_components(&self) -> (f64, f64) {
        (self.e, self.f)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

/// One entry of an SVG transform list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Transform {
    /// `translate(tx, ty)`.
    Translate {
        /// X offset.
        tx: f64,
        /// Y offset.
        ty: f64,
    },
    /// `scale(sx, sy)`.
    Scale {
        /// Horizontal factor.
        sx: f64,
        /// Vertical factor.
        sy: f64,
    },
    /// `matrix(a b c d e f)` - also the lowered form of `rotate`.
    Matrix(Matrix),
}

impl Transform {
    /// The matrix form of this entry.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix {
        match *self {
            Self::Translate { tx, ty } => Matrix::translation(tx, ty),
            Self::Scale { sx, sy } => Matrix::scaling(sx, sy),
            Self::Matrix(m) => m,
        }
    }
}

/// An ordered list of transform entries, as found in a `transform`
/// attribute. The left-most entry is applied last (outermost), matching
/// SVG semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformList(Vec<Transform>);

impl TransformList {
    /// An empty list (identity).
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Parse a `transform` attribute value.
    ///
    /// Supports `translate`, `scale`, `matrix` and `rotate` (lowered to a
    /// matrix entry).
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidTransform`] for unknown functions,
    /// malformed arguments, or wrong argument counts.
    pub fn parse(attr: &str) -> CanvasResult<Self> {
        let mut entries = Vec::new();
        let mut rest = attr.trim();
        while !rest.is_empty() {
            let open = rest
                .find('(')
                .ok_or_else(|| CanvasError::InvalidTransform(attr.to_string()))?;
            let close = rest
                .find(')')
                .ok_or_else(|| CanvasError::InvalidTransform(attr.to_string()))?;
            if close < open {
                return Err(CanvasError::InvalidTransform(attr.to_string()));
            }
            let name = rest[..open].trim();
            let args: Vec<f64> = rest[open + 1..close]
                .split(|ch: char| ch.is_whitespace() || ch == ',')
                .filter(|s| !s.is_empty())
                .map(str::parse)
                .collect::<Result<_, _>>()
                .map_err(|_| CanvasError::InvalidTransform(attr.to_string()))?;
            entries.push(Self::parse_entry(name, &args, attr)?);
            rest = rest[close + 1..].trim_start_matches([' ', '\t', '\n', '\r', ',']);
        }
        Ok(Self(entries))
    }

    fn parse_entry(name: &str, args: &[f64], attr: &str) -> CanvasResult<Transform> {
        let invalid = || CanvasError::InvalidTransform(attr.to_string());
        match (name, args) {
            ("translate", [tx]) => Ok(Transform::Translate { tx: *tx, ty: 0.0 }),
            ("translate", [tx, ty]) => Ok(Transform::Translate { tx: *tx, ty: *ty }),
            ("scale", [s]) => Ok(Transform::Scale { sx: *s, sy: *s }),
            ("scale", [sx, sy]) => Ok(Transform::Scale { sx: *sx, sy: *sy }),
            ("matrix", [a, b, c, d, e, f]) => Ok(Transform::Matrix(Matrix {
                a: *a,
                b: *b,
                c: *c,
                d: *d,
                e: *e,
                f: *f,
            })),
            ("rotate", [deg]) => Ok(Transform::Matrix(Matrix::rotation(*deg))),
            ("rotate", [deg, cx, cy]) => {
                // rotate(a cx cy) == translate(cx cy) rotate(a) translate(-cx -cy)
                let m = Matrix::translation(*cx, *cy)
                    .multiply(&Matrix::rotation(*deg))
                    .multiply(&Matrix::translation(-cx, -cy));
                Ok(Transform::Matrix(m))
            }
            _ => Err(invalid()),
        }
    }

    /// Whether the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Consolidate all entries into a single matrix, left to right.
    ///
    /// An empty list consolidates to the identity: an absent `transform`
    /// attribute is an identity transform.
    #[must_use]
    pub fn consolidate(&self) -> Matrix {
        self.0
            .iter()
            .fold(Matrix::identity(), |acc, t| acc.multiply(&t.to_matrix()))
    }

    /// Replace the first entry, or append when the list is empty.
    pub fn set_first(&mut self, transform: Transform) {
        if self.0.is_empty() {
            self.0.push(transform);
        } else {
            self.0[0] = transform;
        }
    }

    /// Collapse the list to a single entry carrying the given matrix.
    pub fn set_matrix(&mut self, matrix: Matrix) {
        self.0.clear();
        self.0.push(Transform::Matrix(matrix));
    }

    /// Serialize back to SVG `transform` attribute syntax.
    #[must_use]
    pub fn to_attribute(&self) -> String {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|t| match *t {
                Transform::Translate { tx, ty } => format!("translate({tx} {ty})"),
                Transform::Scale { sx, sy } => format!("scale({sx} {sy})"),
                Transform::Matrix(m) => format!(
                    "matrix({} {} {} {} {} {})",
                    m.a, m.b, m.c, m.d, m.e, m.f
                ),
            })
            .collect();
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let u = a.union(&b);
        assert!(approx_eq(u.x, 0.0));
        assert!(approx_eq(u.y, 0.0));
        assert!(approx_eq(u.width, 15.0));
        assert!(approx_eq(u.height, 15.0));
    }

    #[test]
    fn test_rect_contains_edges() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(30.0, 30.0)));
        assert!(!r.contains(Point::new(9.9, 15.0)));
    }

    #[test]
    fn test_matrix_multiply_order() {
        // translate then scale: scale applied first
        let m = Matrix::translation(10.0, 0.0).multiply(&Matrix::scaling(2.0, 2.0));
        let p = m.transform_point(Point::new(1.0, 1.0));
        assert!(approx_eq(p.x, 12.0));
        assert!(approx_eq(p.y, 2.0));
    }

    #[test]
    fn test_matrix_invert_roundtrip() {
        let m = Matrix::translation(5.0, -3.0).multiply(&Matrix::scaling(2.0, 0.5));
        let inv = m.invert().expect("invertible");
        let p = Point::new(7.0, 11.0);
        let back = inv.transform_point(m.transform_point(p));
        assert!(approx_eq(back.x, p.x));
        assert!(approx_eq(back.y, p.y));
    }

    #[test]
    fn test_matrix_invert_singular() {
        let m = Matrix::scaling(0.0, 1.0);
        assert!(m.invert().is_none());
    }

    #[test]
    fn test_transform_rect_rotated_envelope() {
        let m = Matrix::rotation(90.0);
        let r = m.transform_rect(&Rect::new(0.0, 0.0, 10.0, 20.0));
        // Rotating 90 degrees swaps width and height
        assert!(approx_eq(r.width, 20.0));
        assert!(approx_eq(r.height, 10.0));
    }

    #[test]
    fn test_parse_translate_and_scale() {
        let list = TransformList::parse("translate(10, 20) scale(2)").expect("parses");
        assert_eq!(list.len(), 2);
        let m = list.consolidate();
        let p = m.transform_point(Point::new(1.0, 1.0));
        assert!(approx_eq(p.x, 12.0));
        assert!(approx_eq(p.y, 22.0));
    }

    #[test]
    fn test_parse_matrix() {
        let list = TransformList::parse("matrix(1 0 0 1 5 6)").expect("parses");
        let (e, f) = list.consolidate().translation_components();
        assert!(approx_eq(e, 5.0));
        assert!(approx_eq(f, 6.0));
    }

    #[test]
    fn test_parse_rotate_about_center() {
        let list = TransformList::parse("rotate(180 5 5)").expect("parses");
        let p = list.consolidate().transform_point(Point::new(0.0, 0.0));
        assert!(approx_eq(p.x, 10.0));
        assert!(approx_eq(p.y, 10.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TransformList::parse("frobnicate(1 2)").is_err());
        assert!(TransformList::parse("translate(1").is_err());
        assert!(TransformList::parse("scale(abc)").is_err());
    }

    #[test]
    fn test_consolidate_empty_is_identity() {
        let list = TransformList::new();
        assert_eq!(list.consolidate(), Matrix::identity());
    }

    #[test]
    fn test_set_first_appends_when_empty() {
        let mut list = TransformList::new();
        list.set_first(Transform::Translate { tx: 1.0, ty: 2.0 });
        assert_eq!(list.len(), 1);
        list.set_first(Transform::Translate { tx: 3.0, ty: 4.0 });
        assert_eq!(list.len(), 1);
        let (e, f) = list.consolidate().translation_components();
        assert!(approx_eq(e, 3.0));
        assert!(approx_eq(f, 4.0));
    }

    #[test]
    fn test_to_attribute_roundtrip() {
        let list = TransformList::parse("translate(3 4) scale(2 2)").expect("parses");
        let reparsed = TransformList::parse(&list.to_attribute()).expect("reparses");
        assert_eq!(list.consolidate(), reparsed.consolidate());
    }
}
