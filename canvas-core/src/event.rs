//! Input events for canvas interaction.
//!
//! The host translates its DOM pointer listeners into one typed event
//! stream fed to [`crate::SvgCanvas::handle_event`], which makes the
//! hover/selection/drag state machine testable without a live rendering
//! surface. All coordinates are screen-space pixels; the canvas
//! converts to user space internally.

use serde::{Deserialize, Serialize};

/// A pointer event dispatched by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerEvent {
    /// Pointer moved over the canvas.
    Move {
        /// Screen X.
        x: f64,
        /// Screen Y.
        y: f64,
    },
    /// Primary button pressed.
    Down {
        /// Screen X.
        x: f64,
        /// Screen Y.
        y: f64,
    },
    /// Primary button released.
    Up,
    /// Pointer left the canvas surface.
    Leave,
    /// A completed click.
    Click {
        /// Screen X.
        x: f64,
        /// Screen Y.
        y: f64,
    },
    /// A completed double click (requests the explicit-scale affordance).
    DoubleClick {
        /// Screen X.
        x: f64,
        /// Screen Y.
        y: f64,
    },
}

/// Pointer affordance the host should display.
///
/// The host applies the matching CSS cursor style to its container; the
/// core only tracks which one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    /// Nothing hovered or selected.
    #[default]
    Default,
    /// Over (or holding) an interactive target.
    Pointer,
    /// A drag gesture is in progress.
    Move,
}

impl Cursor {
    /// The CSS cursor keyword for this affordance.
    #[must_use]
    pub const fn as_css(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Pointer => "pointer",
            Self::Move => "move",
        }
    }
}
