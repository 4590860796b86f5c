//! WebAssembly bindings for svg-canvas-core.
//!
//! This module provides JavaScript-callable functions when compiled to
//! WASM. The host wires DOM pointer listeners to the `pointer*` methods
//! and applies the returned cursor/highlight state to its own elements.

use wasm_bindgen::prelude::*;

use crate::{PointerEvent, SvgCanvas};

/// Initialize the canvas WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();
}

/// Canvas instance for WASM.
#[wasm_bindgen]
pub struct WasmCanvas {
    canvas: SvgCanvas,
}

#[wasm_bindgen]
impl WasmCanvas {
    /// Create a new canvas instance.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            canvas: SvgCanvas::new(),
        }
    }

    /// Mount an SVG document string.
    ///
    /// # Errors
    ///
    /// Returns an error string if the SVG cannot be parsed.
    pub fn mount(&mut self, svg: &str) -> Result<(), String> {
        self.canvas.mount(svg).map_err(|e| e.to_string())
    }

    /// Unmount the current document.
    pub fn unmount(&mut self) {
        self.canvas.unmount();
    }

    /// Set the host viewport size in CSS pixels.
    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.canvas.set_viewport(width, height);
    }

    /// Forward a pointer move.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.canvas.handle_event(PointerEvent::Move { x, y });
    }

    /// Forward a pointer down.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.canvas.handle_event(PointerEvent::Down { x, y });
    }

    /// Forward a pointer up.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.canvas.handle_event(PointerEvent::Up);
    }

    /// Forward the pointer leaving the canvas.
    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        self.canvas.handle_event(PointerEvent::Leave);
    }

    /// Forward a click.
    pub fn click(&mut self, x: f64, y: f64) {
        self.canvas.handle_event(PointerEvent::Click { x, y });
    }

    /// Forward a double click.
    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&mut self, x: f64, y: f64) {
        self.canvas.handle_event(PointerEvent::DoubleClick { x, y });
    }

    /// Whether the last double click requested a scale prompt.
    ///
    /// Reading the flag clears it.
    #[wasm_bindgen(js_name = takeScalePrompt)]
    pub fn take_scale_prompt(&mut self) -> bool {
        self.canvas.take_scale_prompt()
    }

    /// Apply a user-entered scale factor. Invalid input is a no-op.
    #[wasm_bindgen(js_name = applyScaleInput)]
    pub fn apply_scale_input(&mut self, input: &str) -> bool {
        self.canvas.apply_scale_input(input)
    }

    /// Begin a resize gesture on the selection.
    #[wasm_bindgen(js_name = beginResize)]
    pub fn begin_resize(&mut self) {
        self.canvas.begin_resize();
    }

    /// Resize the selection toward the given visible dimensions.
    #[wasm_bindgen(js_name = resizeTo)]
    pub fn resize_to(&mut self, width: f64, height: f64) {
        self.canvas.resize_to(width, height);
    }

    /// End the active resize gesture.
    #[wasm_bindgen(js_name = endResize)]
    pub fn end_resize(&mut self) {
        self.canvas.end_resize();
    }

    /// The CSS cursor keyword the host should apply.
    #[must_use]
    pub fn cursor(&self) -> String {
        self.canvas.cursor().as_css().to_string()
    }

    /// The arena index of the selected group, or `None`.
    #[wasm_bindgen(js_name = selectedId)]
    #[must_use]
    pub fn selected_id(&self) -> Option<usize> {
        self.canvas.selected().map(crate::NodeId::index)
    }

    /// The highlight overlay rectangle as JSON, or `None` when hidden.
    #[wasm_bindgen(js_name = highlightRect)]
    #[must_use]
    pub fn highlight_rect(&self) -> Option<String> {
        self.canvas
            .highlight_rect()
            .and_then(|r| serde_json::to_string(&r).ok())
    }

    /// Serialize the mounted (and possibly user-modified) document back
    /// to SVG text, or `None` when nothing is mounted.
    #[wasm_bindgen(js_name = toSvg)]
    #[must_use]
    pub fn to_svg(&self) -> Option<String> {
        self.canvas.to_svg_string()
    }
}

impl Default for WasmCanvas {
    fn default() -> Self {
        Self::new()
    }
}
