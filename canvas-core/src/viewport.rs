//! Screen-space to user-space mapping.
//!
//! The document's `viewBox` plus the host viewport size determine the
//! screen CTM. The mapping uses a uniform scale with centering, the
//! default `preserveAspectRatio="xMidYMid meet"` a browser applies when
//! fitting an SVG to its container. Pointer math must go through this
//! mapping: screen pixel deltas are not user-space deltas.

use serde::{Deserialize, Serialize};

use crate::geometry::{Matrix, Point, Rect};

/// Host viewport dimensions in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a new viewport.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The matrix mapping root user space to screen pixels.
    ///
    /// Identity when the document has no `viewBox` or the viewport is
    /// degenerate (user space then coincides with screen space).
    #[must_use]
    pub fn screen_ctm(&self, view_box: Option<&Rect>) -> Matrix {
        let Some(vb) = view_box else {
            return Matrix::identity();
        };
        if vb.is_empty() || self.width <= 0.0 || self.height <= 0.0 {
            return Matrix::identity();
        }
        // xMidYMid meet: uniform scale, centered on both axes
        let scale = (self.width / vb.width).min(self.height / vb.height);
        let tx = (self.width - scale * vb.width) / 2.0 - scale * vb.x;
        let ty = (self.height - scale * vb.height) / 2.0 - scale * vb.y;
        Matrix {
            a: scale,
            b: 0.0,
            c: 0.0,
            d: scale,
            e: tx,
            f: ty,
        }
    }

    /// Convert a screen-space point to root user space.
    ///
    /// `None` when the CTM is singular; callers treat that as a guarded
    /// no-op rather than a fault.
    #[must_use]
    pub fn screen_to_user(&self, view_box: Option<&Rect>, p: Point) -> Option<Point> {
        self.screen_ctm(view_box)
            .invert()
            .map(|inv| inv.transform_point(p))
    }
}
