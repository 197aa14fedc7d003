//! Canvas height derivation.
//!
//! Derives a display value from committed geometry; never mutates
//! component data. Recomputed on committed mutations and component
//! count changes only, not on pointer-move.

use serde::{Deserialize, Serialize};

use crate::component::DeviceKey;
use crate::store::LayoutStore;

/// Whether the canvas is being edited or viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasMode {
    /// Builder canvas; extra bottom padding leaves room for dropping.
    Edit,
    /// Read-only viewer; tighter bounds.
    View,
}

impl CanvasMode {
    /// Bottom padding below the lowest component.
    #[must_use]
    const fn padding_px(self) -> f32 {
        match self {
            Self::Edit => 100.0,
            Self::View => 20.0,
        }
    }

    /// Vertical chrome (toolbars, headers) subtracted from the
    /// viewport before comparing against content height.
    #[must_use]
    const fn chrome_px(self) -> f32 {
        match self {
            Self::Edit => 80.0,
            Self::View => 40.0,
        }
    }
}

/// Derives the visible canvas height from store contents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSizer {
    viewport_height_px: f32,
    height_px: f32,
}

impl CanvasSizer {
    /// Create a sizer for a viewport of the given height.
    #[must_use]
    pub fn new(viewport_height_px: f32) -> Self {
        Self {
            viewport_height_px,
            height_px: viewport_height_px,
        }
    }

    /// Update the viewport height (window resize).
    pub fn set_viewport_height(&mut self, viewport_height_px: f32) {
        self.viewport_height_px = viewport_height_px;
    }

    /// Current derived canvas height in pixels.
    #[must_use]
    pub const fn height_px(&self) -> f32 {
        self.height_px
    }

    /// CSS-ready height expression for the render collaborator.
    #[must_use]
    pub fn height_expression(&self) -> String {
        format!("{}px", self.height_px.ceil())
    }

    /// Recompute the canvas height from the store's committed
    /// geometry for the active device.
    pub fn recompute(&mut self, store: &LayoutStore, device: DeviceKey, mode: CanvasMode) -> f32 {
        let max_bottom = store
            .components()
            .values()
            .map(|c| c.layouts.resolve(device).layout.bottom())
            .fold(0.0_f32, f32::max);

        let floor = self.viewport_height_px - mode.chrome_px();
        self.height_px = floor.max(max_bottom + mode.padding_px());
        self.height_px
    }
}
