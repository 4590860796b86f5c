//! The interactive SVG canvas.
//!
//! [`SvgCanvas`] ingests an externally generated SVG document string,
//! normalizes its shapes into interactive groups, and thereafter owns all
//! mutation in response to pointer input: hover highlighting, exclusive
//! selection, pointer-tracking drag, and uniform resize.
//!
//! All state transitions happen synchronously inside
//! [`SvgCanvas::handle_event`]; there is no background work. Events that
//! arrive without a matching target or gesture (stale input after an
//! unmount, a drag update with no pointer down) are guarded no-ops.

use crate::bbox::{local_bbox, node_ctm, shape_bbox, user_bbox};
use crate::document::{NodeId, NodeTag, SvgDocument};
use crate::event::{Cursor, PointerEvent};
use crate::geometry::{Matrix, Point, Rect};
use crate::normalize::wrap_shapes;
use crate::viewport::Viewport;
use crate::CanvasResult;

/// Ephemeral per-gesture drag state.
///
/// Lives from pointer-down to the matching pointer-up, then discarded.
#[derive(Debug, Clone, Copy)]
struct DragSession {
    /// Group the gesture started on; updates for any other selection
    /// are stale and drop the session.
    target: NodeId,
    /// Consolidated transform of the group at gesture start.
    start_matrix: Matrix,
    /// User-space bounding-box top-left at gesture start.
    start_top_left: Point,
    /// Fixed pointer-to-top-left offset in user space.
    offset: Point,
}

/// Ephemeral resize state, captured by [`SvgCanvas::begin_resize`].
#[derive(Debug, Clone, Copy)]
struct ResizeSession {
    /// Group the gesture started on.
    target: NodeId,
    /// Consolidated transform of the group at capture.
    start_matrix: Matrix,
    /// Visible (user-space) bounding box at capture; scale ratios are
    /// computed against its dimensions.
    start_box: Rect,
    /// Scale anchor: the content bounding box top-left in the group's
    /// local coordinates.
    anchor: Point,
}

/// The interactive SVG canvas core.
///
/// Owns the mounted document tree, the single highlight overlay, and the
/// hover/selection/gesture state. External collaborators hand it a
/// ready-made SVG string and must not mutate the document concurrently.
#[derive(Debug, Default)]
pub struct SvgCanvas {
    document: Option<SvgDocument>,
    viewport: Viewport,
    hovered: Option<NodeId>,
    selected: Option<NodeId>,
    overlay: Option<NodeId>,
    overlay_rect: Option<Rect>,
    drag: Option<DragSession>,
    resize: Option<ResizeSession>,
    cursor: Cursor,
    scale_prompt: bool,
}

impl SvgCanvas {
    /// Create an empty, unmounted canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a canvas with the given viewport size in screen pixels.
    #[must_use]
    pub fn with_viewport(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            ..Self::default()
        }
    }

    /// Mount an SVG document, replacing any previously mounted one.
    ///
    /// Shapes are wrapped into interactive groups and the highlight
    /// overlay is created. Empty or whitespace-only input unmounts the
    /// canvas silently (the "no data yet" case); present-but-malformed
    /// input is reported to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CanvasError::Parse`] or
    /// [`crate::CanvasError::InvalidTransform`] when the input cannot be
    /// parsed. The previous document is unmounted either way.
    pub fn mount(&mut self, svg: &str) -> CanvasResult<()> {
        self.unmount();
        if svg.trim().is_empty() {
            return Ok(());
        }
        let mut doc = SvgDocument::parse(svg)?;
        let wrapped = wrap_shapes(&mut doc);
        let overlay = create_overlay(&mut doc);
        tracing::debug!(
            nodes = doc.node_count(),
            wrapped,
            "mounted SVG document"
        );
        self.document = Some(doc);
        self.overlay = Some(overlay);
        Ok(())
    }

    /// Unmount the current document and reset all interaction state.
    pub fn unmount(&mut self) {
        self.document = None;
        self.overlay = None;
        self.overlay_rect = None;
        self.hovered = None;
        self.selected = None;
        self.drag = None;
        self.resize = None;
        self.cursor = Cursor::Default;
        self.scale_prompt = false;
    }

    /// Set the host viewport size in screen pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
    }

    /// Re-run shape normalization on the mounted document.
    ///
    /// Idempotent: already-wrapped shapes are skipped. Returns the number
    /// of newly wrapped shapes (zero on an unmounted canvas).
    pub fn normalize(&mut self) -> usize {
        self.document.as_mut().map_or(0, wrap_shapes)
    }

    /// Process one pointer event.
    ///
    /// Total over all inputs: events against an unmounted canvas or
    /// without a matching gesture are no-ops.
    pub fn handle_event(&mut self, event: PointerEvent) {
        if self.document.is_none() {
            return;
        }
        match event {
            PointerEvent::Move { x, y } => {
                if self.drag.is_some() {
                    self.drag_update(Point::new(x, y));
                } else {
                    self.hover_update(Point::new(x, y));
                }
            }
            PointerEvent::Down { x, y } => self.drag_start(Point::new(x, y)),
            PointerEvent::Up => self.gesture_end(),
            PointerEvent::Leave => {
                self.gesture_end();
                if self.selected.is_none() {
                    self.clear_hover();
                }
            }
            PointerEvent::Click { x, y } => self.click(Point::new(x, y)),
            PointerEvent::DoubleClick { x, y } => self.double_click(Point::new(x, y)),
        }
    }

    // --- Hover routing ---

    fn hover_update(&mut self, screen: Point) {
        // Selection pins the highlight; hover updates are suppressed
        if self.selected.is_some() {
            return;
        }
        let Some(user) = self.screen_to_user(screen) else {
            return;
        };
        match self.hit_test(user) {
            Some(group) => {
                if self.hovered != Some(group) {
                    self.hovered = Some(group);
                    tracing::trace!(group = %group, "hover enter");
                }
                self.cursor = Cursor::Pointer;
                self.move_overlay_to(group);
            }
            None => self.clear_hover(),
        }
    }

    fn clear_hover(&mut self) {
        if self.selected.is_some() {
            return;
        }
        self.hovered = None;
        self.hide_overlay();
        self.cursor = Cursor::Default;
    }

    // --- Selection ---

    fn click(&mut self, screen: Point) {
        let Some(user) = self.screen_to_user(screen) else {
            return;
        };
        match self.hit_test(user) {
            Some(group) => self.select(group),
            None => self.deselect(),
        }
    }

    fn select(&mut self, group: NodeId) {
        // Always deselect first: at most one selection, by construction
        self.selected = None;
        self.selected = Some(group);
        self.cursor = Cursor::Pointer;
        self.move_overlay_to(group);
        tracing::debug!(group = %group, "selected");
    }

    fn deselect(&mut self) {
        if self.selected.take().is_some() {
            tracing::debug!("deselected");
        }
        self.hovered = None;
        self.hide_overlay();
        self.cursor = Cursor::Default;
    }

    // --- Drag ---

    fn drag_start(&mut self, screen: Point) {
        let Some(selected) = self.selected else {
            return;
        };
        let Some(user) = self.screen_to_user(screen) else {
            return;
        };
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        let Some(node) = doc.node_mut(selected) else {
            return;
        };
        // Collapse the transform list to a single matrix entry; every
        // drag update reassigns that one entry wholesale
        let start_matrix = node.transforms.consolidate();
        node.transforms.set_matrix(start_matrix);

        let start_top_left = user_bbox(doc, selected).top_left();
        self.drag = Some(DragSession {
            target: selected,
            start_matrix,
            start_top_left,
            offset: Point::new(user.x - start_top_left.x, user.y - start_top_left.y),
        });
        self.cursor = Cursor::Move;
        tracing::debug!(group = %selected, "drag start");
    }

    fn drag_update(&mut self, screen: Point) {
        let (Some(session), Some(selected)) = (self.drag, self.selected) else {
            return;
        };
        // A click mid-gesture can reselect; the session is stale then
        if session.target != selected {
            self.drag = None;
            return;
        }
        let Some(user) = self.screen_to_user(screen) else {
            return;
        };
        // Target top-left keeps the pointer offset constant; the delta
        // from the gesture-start top-left is added to the gesture-start
        // translation, leaving any scale component untouched
        let dx = (user.x - session.offset.x) - session.start_top_left.x;
        let dy = (user.y - session.offset.y) - session.start_top_left.y;
        let mut matrix = session.start_matrix;
        matrix.e = session.start_matrix.e + dx;
        matrix.f = session.start_matrix.f + dy;

        let Some(doc) = self.document.as_mut() else {
            return;
        };
        if let Some(node) = doc.node_mut(selected) {
            node.transforms.set_matrix(matrix);
        }
        self.move_overlay_to(selected);
    }

    fn gesture_end(&mut self) {
        if self.drag.take().is_some() {
            tracing::debug!("drag end");
        }
        self.resize = None;
        self.cursor = if self.selected.is_some() {
            Cursor::Pointer
        } else {
            Cursor::Default
        };
    }

    // --- Resize / scale ---

    /// Begin a resize gesture on the current selection.
    ///
    /// Captures the selected group's bounding box; subsequent
    /// [`resize_to`](Self::resize_to) calls scale relative to it. No-op
    /// without a selection.
    pub fn begin_resize(&mut self) {
        let Some(selected) = self.selected else {
            return;
        };
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        let start_box = user_bbox(doc, selected);
        if start_box.is_empty() {
            return;
        }
        let anchor = local_bbox(doc, selected).top_left();
        let start_matrix = doc
            .node(selected)
            .map(|node| node.transforms.consolidate())
            .unwrap_or_default();
        if let Some(node) = doc.node_mut(selected) {
            node.transforms.set_matrix(start_matrix);
        }
        self.resize = Some(ResizeSession {
            target: selected,
            start_matrix,
            start_box,
            anchor,
        });
        tracing::debug!(group = %selected, "resize start");
    }

    /// Resize the selection toward the given visible dimensions.
    ///
    /// Horizontal and vertical ratios are computed against the captured
    /// box and the *minimum* of the two is applied as a single uniform
    /// scale anchored at the box's top-left corner, avoiding non-uniform
    /// distortion. No-op without an active resize gesture.
    pub fn resize_to(&mut self, width: f64, height: f64) {
        let (Some(session), Some(selected)) = (self.resize, self.selected) else {
            return;
        };
        if session.target != selected {
            self.resize = None;
            return;
        }
        let ratio_x = width / session.start_box.width;
        let ratio_y = height / session.start_box.height;
        let factor = ratio_x.min(ratio_y);
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let matrix = session.start_matrix.multiply(&scale_about(
            session.anchor,
            factor,
        ));
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        if let Some(node) = doc.node_mut(selected) {
            node.transforms.set_matrix(matrix);
        }
        self.move_overlay_to(selected);
    }

    /// End the active resize gesture, keeping the last applied scale.
    pub fn end_resize(&mut self) {
        if self.resize.take().is_some() {
            tracing::debug!("resize end");
        }
    }

    /// Apply an explicit scale factor, parsed from user input, as a
    /// uniform scale about the selected group's own origin.
    ///
    /// Invalid, non-numeric, or non-positive input is a no-op. Returns
    /// whether a scale was applied.
    pub fn apply_scale_input(&mut self, input: &str) -> bool {
        let Ok(factor) = input.trim().parse::<f64>() else {
            return false;
        };
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let Some(selected) = self.selected else {
            return false;
        };
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        let Some(node) = doc.node_mut(selected) else {
            return false;
        };
        let matrix = node
            .transforms
            .consolidate()
            .multiply(&Matrix::scaling(factor, factor));
        node.transforms.set_matrix(matrix);
        self.move_overlay_to(selected);
        tracing::debug!(group = %selected, factor, "applied explicit scale");
        true
    }

    fn double_click(&mut self, screen: Point) {
        let Some(user) = self.screen_to_user(screen) else {
            return;
        };
        if let Some(group) = self.hit_test(user) {
            self.select(group);
            self.scale_prompt = true;
        }
    }

    /// Whether a double-click requested the explicit-scale prompt.
    ///
    /// Reading the flag clears it; the host follows up with
    /// [`apply_scale_input`](Self::apply_scale_input).
    pub fn take_scale_prompt(&mut self) -> bool {
        std::mem::take(&mut self.scale_prompt)
    }

    // --- Hit testing ---

    /// The topmost interactive group under a user-space point, if any.
    #[must_use]
    pub fn hit_test(&self, user: Point) -> Option<NodeId> {
        let doc = self.document.as_ref()?;
        let mut hit = None;
        for group in doc.interactive_groups() {
            // Test in the group's local space: exact under any affine
            let Some(inverse) = node_ctm(doc, group).invert() else {
                continue;
            };
            let local = inverse.transform_point(user);
            if hit_bounds(doc, group).contains(local) {
                // Later in document order paints on top
                hit = Some(group);
            }
        }
        hit
    }

    // --- Highlight overlay ---

    fn move_overlay_to(&mut self, group: NodeId) {
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        let bounds = user_bbox(doc, group);
        if let Some(overlay) = self.overlay {
            doc.set_attribute(overlay, "x", bounds.x.to_string());
            doc.set_attribute(overlay, "y", bounds.y.to_string());
            doc.set_attribute(overlay, "width", bounds.width.to_string());
            doc.set_attribute(overlay, "height", bounds.height.to_string());
            doc.remove_attribute(overlay, "display");
        }
        self.overlay_rect = Some(bounds);
    }

    fn hide_overlay(&mut self) {
        if let (Some(doc), Some(overlay)) = (self.document.as_mut(), self.overlay) {
            doc.set_attribute(overlay, "display", "none");
        }
        self.overlay_rect = None;
    }

    // --- Queries ---

    fn screen_to_user(&self, screen: Point) -> Option<Point> {
        let doc = self.document.as_ref()?;
        self.viewport.screen_to_user(doc.view_box.as_ref(), screen)
    }

    /// Whether a document is mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.document.is_some()
    }

    /// The currently hovered interactive group.
    #[must_use]
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// The currently selected interactive group.
    #[must_use]
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// The pointer affordance the host should display.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The highlight overlay rectangle in user space, `None` when hidden.
    #[must_use]
    pub fn highlight_rect(&self) -> Option<Rect> {
        self.overlay_rect
    }

    /// Whether a drag gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether a resize gesture is in progress.
    #[must_use]
    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// The mounted document.
    #[must_use]
    pub fn document(&self) -> Option<&SvgDocument> {
        self.document.as_ref()
    }

    /// Serialize the mounted document (without the overlay) to SVG text.
    #[must_use]
    pub fn to_svg_string(&self) -> Option<String> {
        self.document.as_ref().map(SvgDocument::to_svg_string)
    }
}

/// Bounds used for hit testing, in the group's local coordinates.
///
/// Prefers the invisible hit rectangle created by normalization; groups
/// without one (hand-tagged input) fall back to their content box.
fn hit_bounds(doc: &SvgDocument, group: NodeId) -> Rect {
    let hit_rect = doc.node(group).and_then(|node| {
        node.children
            .iter()
            .find(|&&child| doc.node(child).is_some_and(|n| n.tag == NodeTag::HitArea))
            .copied()
    });
    match hit_rect {
        Some(hit) => shape_bbox(doc, hit),
        None => local_bbox(doc, group),
    }
}

/// A uniform scale that keeps `anchor` fixed.
fn scale_about(anchor: Point, factor: f64) -> Matrix {
    Matrix::translation(anchor.x, anchor.y)
        .multiply(&Matrix::scaling(factor, factor))
        .multiply(&Matrix::translation(-anchor.x, -anchor.y))
}

/// Create the highlight overlay rectangle and append it to the root.
fn create_overlay(doc: &mut SvgDocument) -> NodeId {
    let overlay = doc.create_element("rect");
    doc.set_attribute(overlay, "fill", "none");
    doc.set_attribute(overlay, "stroke", "red");
    doc.set_attribute(overlay, "stroke-width", "2");
    doc.set_attribute(overlay, "pointer-events", "none");
    doc.set_attribute(overlay, "display", "none");
    if let Some(node) = doc.node_mut(overlay) {
        node.tag = NodeTag::HighlightOverlay;
    }
    let root = doc.root();
    doc.append_child(root, overlay);
    overlay
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    const ONE_RECT: &str =
        r#"<svg viewBox="0 0 100 100"><rect x="10" y="10" width="20" height="20"/></svg>"#;

    fn mounted(svg: &str) -> SvgCanvas {
        let mut canvas = SvgCanvas::with_viewport(100.0, 100.0);
        canvas.mount(svg).expect("mounts");
        canvas
    }

    #[test]
    fn test_mount_empty_is_silent_noop() {
        let mut canvas = SvgCanvas::new();
        assert!(canvas.mount("").is_ok());
        assert!(canvas.mount("   \n ").is_ok());
        assert!(!canvas.is_mounted());
    }

    #[test]
    fn test_mount_malformed_is_reported() {
        let mut canvas = SvgCanvas::new();
        assert!(canvas.mount("<svg><rect").is_err());
        assert!(!canvas.is_mounted());
    }

    #[test]
    fn test_events_before_mount_are_noops() {
        let mut canvas = SvgCanvas::new();
        canvas.handle_event(PointerEvent::Move { x: 5.0, y: 5.0 });
        canvas.handle_event(PointerEvent::Down { x: 5.0, y: 5.0 });
        canvas.handle_event(PointerEvent::Up);
        canvas.handle_event(PointerEvent::Click { x: 5.0, y: 5.0 });
        assert_eq!(canvas.cursor(), Cursor::Default);
        assert!(canvas.hovered().is_none());
    }

    #[test]
    fn test_hover_enter_and_leave() {
        let mut canvas = mounted(ONE_RECT);
        canvas.handle_event(PointerEvent::Move { x: 15.0, y: 15.0 });
        assert!(canvas.hovered().is_some());
        assert_eq!(canvas.cursor(), Cursor::Pointer);
        assert!(canvas.highlight_rect().is_some());

        canvas.handle_event(PointerEvent::Move { x: 90.0, y: 90.0 });
        assert!(canvas.hovered().is_none());
        assert_eq!(canvas.cursor(), Cursor::Default);
        assert!(canvas.highlight_rect().is_none());
    }

    #[test]
    fn test_click_selects_and_empty_click_deselects() {
        let mut canvas = mounted(ONE_RECT);
        canvas.handle_event(PointerEvent::Click { x: 15.0, y: 15.0 });
        let selected = canvas.selected().expect("selected");

        // Hover elsewhere is suppressed while selected
        canvas.handle_event(PointerEvent::Move { x: 90.0, y: 90.0 });
        assert_eq!(canvas.selected(), Some(selected));
        assert!(canvas.highlight_rect().is_some());

        canvas.handle_event(PointerEvent::Click { x: 90.0, y: 90.0 });
        assert!(canvas.selected().is_none());
        assert!(canvas.highlight_rect().is_none());
        assert_eq!(canvas.cursor(), Cursor::Default);
    }

    #[test]
    fn test_drag_moves_selection() {
        let mut canvas = mounted(ONE_RECT);
        canvas.handle_event(PointerEvent::Click { x: 15.0, y: 15.0 });
        canvas.handle_event(PointerEvent::Down { x: 15.0, y: 15.0 });
        assert!(canvas.is_dragging());
        assert_eq!(canvas.cursor(), Cursor::Move);

        canvas.handle_event(PointerEvent::Move { x: 25.0, y: 20.0 });
        canvas.handle_event(PointerEvent::Up);
        assert!(!canvas.is_dragging());
        assert_eq!(canvas.cursor(), Cursor::Pointer);

        let selected = canvas.selected().expect("selected");
        let doc = canvas.document().expect("doc");
        let (e, f) = doc
            .node(selected)
            .expect("node")
            .transforms
            .consolidate()
            .translation_components();
        assert!(approx_eq(e, 10.0));
        assert!(approx_eq(f, 5.0));
    }

    #[test]
    fn test_drag_without_selection_is_noop() {
        let mut canvas = mounted(ONE_RECT);
        canvas.handle_event(PointerEvent::Down { x: 15.0, y: 15.0 });
        assert!(!canvas.is_dragging());
        canvas.handle_event(PointerEvent::Move { x: 25.0, y: 25.0 });
        canvas.handle_event(PointerEvent::Up);
        assert_eq!(canvas.cursor(), Cursor::Default);
    }

    #[test]
    fn test_click_mid_drag_drops_the_stale_session() {
        let mut canvas = mounted(
            r#"<svg viewBox="0 0 100 100"><rect x="10" y="10" width="20" height="20"/><rect x="60" y="60" width="20" height="20"/></svg>"#,
        );
        canvas.handle_event(PointerEvent::Click { x: 15.0, y: 15.0 });
        let a = canvas.selected().expect("first selected");
        canvas.handle_event(PointerEvent::Down { x: 15.0, y: 15.0 });

        // Reselect the other rect while the drag is still open
        canvas.handle_event(PointerEvent::Click { x: 70.0, y: 70.0 });
        let b = canvas.selected().expect("second selected");
        assert_ne!(a, b);

        // The next update must not replay the old session onto b
        canvas.handle_event(PointerEvent::Move { x: 16.0, y: 15.0 });
        assert!(!canvas.is_dragging());
        let doc = canvas.document().expect("doc");
        assert_eq!(
            doc.node(b).expect("b").transforms.consolidate(),
            Matrix::identity()
        );
        assert_eq!(
            doc.node(a).expect("a").transforms.consolidate(),
            Matrix::identity()
        );
    }

    #[test]
    fn test_reselect_mid_resize_drops_the_stale_session() {
        let mut canvas = mounted(
            r#"<svg viewBox="0 0 100 100"><rect x="10" y="10" width="20" height="20"/><rect x="60" y="60" width="20" height="20"/></svg>"#,
        );
        canvas.handle_event(PointerEvent::Click { x: 15.0, y: 15.0 });
        canvas.begin_resize();
        canvas.handle_event(PointerEvent::Click { x: 70.0, y: 70.0 });
        let b = canvas.selected().expect("second selected");

        canvas.resize_to(40.0, 40.0);
        assert!(!canvas.is_resizing());
        let doc = canvas.document().expect("doc");
        assert!(doc.node(b).expect("b").transforms.is_empty());
    }

    #[test]
    fn test_pointer_leave_terminates_drag() {
        let mut canvas = mounted(ONE_RECT);
        canvas.handle_event(PointerEvent::Click { x: 15.0, y: 15.0 });
        canvas.handle_event(PointerEvent::Down { x: 15.0, y: 15.0 });
        canvas.handle_event(PointerEvent::Leave);
        assert!(!canvas.is_dragging());
        // Selection persists, so the highlight stays pinned
        assert!(canvas.selected().is_some());
        assert!(canvas.highlight_rect().is_some());
    }

    #[test]
    fn test_resize_applies_minimum_ratio() {
        let mut canvas = mounted(
            r#"<svg viewBox="0 0 200 200"><rect x="0" y="0" width="100" height="50"/></svg>"#,
        );
        canvas.set_viewport(200.0, 200.0);
        canvas.handle_event(PointerEvent::Click { x: 50.0, y: 25.0 });
        canvas.begin_resize();
        assert!(canvas.is_resizing());

        // Ratios 1.5 and 1.0: the applied uniform factor is 1.0
        canvas.resize_to(150.0, 50.0);
        canvas.end_resize();

        let selected = canvas.selected().expect("selected");
        let doc = canvas.document().expect("doc");
        let m = doc.node(selected).expect("node").transforms.consolidate();
        assert!(approx_eq(m.a, 1.0));
        assert!(approx_eq(m.d, 1.0));
    }

    #[test]
    fn test_resize_scales_about_top_left() {
        let mut canvas = mounted(
            r#"<svg viewBox="0 0 200 200"><rect x="10" y="10" width="100" height="50"/></svg>"#,
        );
        canvas.set_viewport(200.0, 200.0);
        canvas.handle_event(PointerEvent::Click { x: 50.0, y: 25.0 });
        canvas.begin_resize();
        canvas.resize_to(200.0, 100.0);
        canvas.end_resize();

        let selected = canvas.selected().expect("selected");
        let doc = canvas.document().expect("doc");
        let bounds = user_bbox(doc, selected);
        // Top-left fixed, both dimensions doubled
        assert!(approx_eq(bounds.x, 10.0));
        assert!(approx_eq(bounds.y, 10.0));
        assert!(approx_eq(bounds.width, 200.0));
        assert!(approx_eq(bounds.height, 100.0));
    }

    #[test]
    fn test_resize_without_gesture_is_noop() {
        let mut canvas = mounted(ONE_RECT);
        canvas.handle_event(PointerEvent::Click { x: 15.0, y: 15.0 });
        canvas.resize_to(300.0, 300.0);
        let selected = canvas.selected().expect("selected");
        let doc = canvas.document().expect("doc");
        assert!(doc.node(selected).expect("node").transforms.is_empty());
    }

    #[test]
    fn test_apply_scale_input_rejects_garbage() {
        let mut canvas = mounted(ONE_RECT);
        canvas.handle_event(PointerEvent::Click { x: 15.0, y: 15.0 });
        assert!(!canvas.apply_scale_input("huge"));
        assert!(!canvas.apply_scale_input(""));
        assert!(!canvas.apply_scale_input("-2"));
        assert!(!canvas.apply_scale_input("NaN"));
        assert!(canvas.apply_scale_input("1.5"));
    }

    #[test]
    fn test_double_click_requests_scale_prompt() {
        let mut canvas = mounted(ONE_RECT);
        canvas.handle_event(PointerEvent::DoubleClick { x: 15.0, y: 15.0 });
        assert!(canvas.selected().is_some());
        assert!(canvas.take_scale_prompt());
        assert!(!canvas.take_scale_prompt());

        canvas.handle_event(PointerEvent::DoubleClick { x: 90.0, y: 90.0 });
        assert!(!canvas.take_scale_prompt());
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut canvas = mounted(
            r#"<svg viewBox="0 0 100 100"><rect x="10" y="10" width="20" height="20"/><rect x="15" y="15" width="20" height="20"/></svg>"#,
        );
        canvas.handle_event(PointerEvent::Click { x: 20.0, y: 20.0 });
        let selected = canvas.selected().expect("selected");
        let doc = canvas.document().expect("doc");
        let groups = doc.interactive_groups();
        assert_eq!(selected, groups[1]);
    }
}
