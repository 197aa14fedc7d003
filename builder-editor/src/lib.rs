//! # Builder Editor
//!
//! Interactive editing layer for the grid canvas builder: translates
//! pointer interactions into committed layout mutations, records every
//! commit as a forward/inverse patch pair in a bounded history, and
//! rebroadcasts committed changes to persistence/render collaborators.
//!
//! ## Architecture
//!
//! ```text
//! pointer events
//!   └─► DragResizeController ── transient preview (never versioned)
//!           │ commit points only
//!           ▼
//!       LayoutStore (builder-core) ── ComponentTree rebuild
//!           │
//!           ├─► CanvasSizer recompute
//!           ├─► VersioningEngine (redo/undo patch pair, window W)
//!           └─► TreeChange listener (persistence collaborator)
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod controller;
pub mod editor;
pub mod history;
pub mod patch;

pub use controller::{
    AcceptAllWidgets, DragResizeController, DropOutcome, DropTarget, InteractionState,
    WidgetSupport,
};
pub use editor::{CanvasEditor, TreeChange};
pub use history::{VersioningEngine, DEFAULT_CAPACITY};
pub use patch::{diff, Patch, PatchOp, VersionEntry};

/// Builder editor version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
