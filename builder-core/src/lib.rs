//! # Builder Core
//!
//! Core layout model for the grid canvas builder: components with
//! per-device geometry on a fixed 43-column grid, the parent/child
//! index, the authoritative layout store, and canvas sizing.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                builder-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Data model      │  Grid math               │
//! │  - Components    │  - px ↔ percent          │
//! │  - Layouts       │  - column snapping       │
//! │  - Device keys   │  - deterministic         │
//! ├─────────────────────────────────────────────┤
//! │  LayoutStore     │  ComponentTree / Sizer   │
//! │  - move/resize   │  - parent→children index │
//! │  - bulk set      │  - cascade delete        │
//! │  - containment   │  - canvas height         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Interaction handling and undo/redo live in the `builder-editor`
//! crate on top of this one.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod component;
pub mod error;
pub mod grid;
pub mod sizer;
pub mod store;
pub mod tree;

pub use component::{
    Component, ComponentId, Definition, DeviceKey, Layout, LayoutSet, ResolvedLayout,
};
pub use error::{BuilderError, BuilderResult};
pub use grid::{GridModel, COLUMN_COUNT, ROW_HEIGHT_PX};
pub use sizer::{CanvasMode, CanvasSizer};
pub use store::{LayoutStore, MoveDelta, ResizeAnchor, ResizeDelta, MIN_HEIGHT_PX};
pub use tree::ComponentTree;

/// Builder core version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
