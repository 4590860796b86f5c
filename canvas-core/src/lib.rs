//! # SVG Canvas Core
//!
//! Core logic for an interactive SVG canvas: an externally generated SVG
//! diagram is mounted, its shapes are normalized into individually
//! selectable/draggable/resizable interactive groups, and a single
//! highlight overlay tracks the hovered or selected target under pointer
//! input. Compiles to WASM for browser hosts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               svg-canvas-core               │
//! ├─────────────────────────────────────────────┤
//! │  Document Arena  │  Interaction Machine     │
//! │  - Owned tree    │  - Hover routing         │
//! │  - Transforms    │  - Exclusive selection   │
//! │  - Bounding box  │  - Drag / resize math    │
//! ├─────────────────────────────────────────────┤
//! │  Normalization   │  Coordinate Spaces       │
//! │  - Shape wrapping│  - viewBox / screen CTM  │
//! │  - Hit areas     │  - Highlight overlay     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The host feeds a ready-made SVG string into [`SvgCanvas::mount`] and a
//! stream of [`PointerEvent`]s into [`SvgCanvas::handle_event`]; the
//! canvas owns all document mutation from then on.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bbox;
pub mod canvas;
pub mod document;
pub mod error;
pub mod event;
pub mod geometry;
pub mod normalize;
pub mod viewport;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use canvas::SvgCanvas;
pub use document::{Node, NodeId, NodeKind, NodeTag, SvgDocument};
pub use error::{CanvasError, CanvasResult};
pub use event::{Cursor, PointerEvent};
pub use geometry::{Matrix, Point, Rect, Transform, TransformList};
pub use normalize::MIN_HIT_SIZE;
pub use viewport::Viewport;

/// Canvas core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
