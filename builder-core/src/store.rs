//! Authoritative per-device geometry store.
//!
//! All committed geometry lives here. Deltas are applied to the
//! *persisted* layout rather than to an intermediate pointer position,
//! so repeated moves cannot drift. The parent/child index is rebuilt
//! after every mutating call.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentId, DeviceKey};
use crate::error::{BuilderError, BuilderResult};
use crate::grid::{GridModel, COLUMN_COUNT};
use crate::tree::ComponentTree;

/// Minimum component height in pixels; resize requests below this are
/// clamped, never rejected.
pub const MIN_HEIGHT_PX: f32 = 10.0;

/// A committed positional delta in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveDelta {
    /// Vertical delta in pixels.
    pub top_px: f32,
    /// Horizontal delta in pixels.
    pub left_px: f32,
}

/// The corner a resize interaction grabs. The opposite edge of the box
/// stays fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeAnchor {
    /// Top-left handle.
    TopLeft,
    /// Top-right handle.
    TopRight,
    /// Bottom-left handle.
    BottomLeft,
    /// Bottom-right handle.
    BottomRight,
}

impl ResizeAnchor {
    /// Whether this anchor moves the left edge.
    #[must_use]
    pub const fn moves_left_edge(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    /// Whether this anchor moves the top edge.
    #[must_use]
    pub const fn moves_top_edge(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }
}

/// A committed resize delta in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeDelta {
    /// Width delta in pixels (quantized to whole columns on apply).
    pub width_px: f32,
    /// Height delta in pixels.
    pub height_px: f32,
    /// The grabbed handle.
    pub anchor: ResizeAnchor,
}

/// Authoritative store of components and their per-device geometry.
#[derive(Debug, Clone, Default)]
pub struct LayoutStore {
    components: HashMap<ComponentId, Component>,
    tree: ComponentTree,
}

impl LayoutStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an existing component map (e.g. a page
    /// handed over by the persistence collaborator).
    #[must_use]
    pub fn from_components(components: HashMap<ComponentId, Component>) -> Self {
        let tree = ComponentTree::build(&components);
        Self { components, tree }
    }

    /// The flat component map.
    #[must_use]
    pub fn components(&self) -> &HashMap<ComponentId, Component> {
        &self.components
    }

    /// The derived parent/child index.
    #[must_use]
    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    /// Get a component by ID.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::ComponentNotFound`] if absent.
    pub fn get(&self, id: ComponentId) -> BuilderResult<&Component> {
        self.components
            .get(&id)
            .ok_or_else(|| BuilderError::ComponentNotFound(id.to_string()))
    }

    /// Number of components on the page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the page has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Replace the entire component map (undo/redo patch replay).
    pub fn replace_components(&mut self, components: HashMap<ComponentId, Component>) {
        self.components = components;
        self.rebuild();
    }

    /// Move a single component by a pixel delta.
    ///
    /// `left` is clamped to `[0, 100 - width%]` and `top` to `>= 0`.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::ComponentNotFound`] if absent.
    pub fn move_component(
        &mut self,
        id: ComponentId,
        device: DeviceKey,
        grid: &GridModel,
        delta: MoveDelta,
    ) -> BuilderResult<()> {
        let component = self
            .components
            .get_mut(&id)
            .ok_or_else(|| BuilderError::ComponentNotFound(id.to_string()))?;
        let layout = component.layouts.materialize(device);
        layout.top = (layout.top + delta.top_px).max(0.0);
        layout.left = clamp_left(layout.left + grid.px_to_percent(delta.left_px), layout.width);
        tracing::debug!(%id, top = layout.top, left = layout.left, "moved component");
        self.rebuild();
        Ok(())
    }

    /// Move several components by the same pixel delta, preserving
    /// their relative formation.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::ComponentNotFound`] if any id is
    /// absent. Ids are validated up front, so on error nothing moved.
    pub fn move_components(
        &mut self,
        ids: &[ComponentId],
        device: DeviceKey,
        grid: &GridModel,
        delta: MoveDelta,
    ) -> BuilderResult<()> {
        for &id in ids {
            if !self.components.contains_key(&id) {
                return Err(BuilderError::ComponentNotFound(id.to_string()));
            }
        }
        for &id in ids {
            if let Some(component) = self.components.get_mut(&id) {
                let layout = component.layouts.materialize(device);
                layout.top = (layout.top + delta.top_px).max(0.0);
                layout.left =
                    clamp_left(layout.left + grid.px_to_percent(delta.left_px), layout.width);
            }
        }
        self.rebuild();
        Ok(())
    }

    /// Resize a component. Width is quantized to whole grid columns
    /// and clamped to `[1, COLUMN_COUNT]`; height grows without bound
    /// but is floored at [`MIN_HEIGHT_PX`]. When the anchor moves the
    /// left or top edge, that edge shifts so the opposite edge stays
    /// fixed.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::ComponentNotFound`] if absent.
    pub fn resize_component(
        &mut self,
        id: ComponentId,
        device: DeviceKey,
        grid: &GridModel,
        delta: ResizeDelta,
    ) -> BuilderResult<()> {
        let component = self
            .components
            .get_mut(&id)
            .ok_or_else(|| BuilderError::ComponentNotFound(id.to_string()))?;
        let layout = component.layouts.materialize(device);

        let delta_cols = grid.snap_cols(delta.width_px);
        let old_width = layout.width;
        let new_width = i64::from(old_width)
            .saturating_add(i64::from(delta_cols))
            .clamp(1, i64::from(COLUMN_COUNT));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let new_width = new_width as u32;
        // Applied (post-clamp) column change drives the left shift.
        let applied_cols = i64::from(new_width) - i64::from(old_width);

        let old_height = layout.height;
        let new_height = (old_height + delta.height_px).max(MIN_HEIGHT_PX);
        let applied_height = new_height - old_height;

        layout.width = new_width;
        layout.height = new_height;
        if delta.anchor.moves_left_edge() {
            #[allow(clippy::cast_precision_loss)]
            let shift = applied_cols as f32 * 100.0 / COLUMN_COUNT as f32;
            layout.left -= shift;
        }
        if delta.anchor.moves_top_edge() {
            layout.top -= applied_height;
        }
        layout.left = clamp_left(layout.left, layout.width);
        layout.top = layout.top.max(0.0);

        tracing::debug!(%id, width = layout.width, height = layout.height, "resized component");
        self.rebuild();
        Ok(())
    }

    /// Atomically upsert a batch of components (paste, programmatic
    /// repositioning). Relative offsets among the batch are preserved
    /// by construction since each entry carries its own layout.
    pub fn set_components_bulk(&mut self, components: Vec<Component>) {
        for component in components {
            self.components.insert(component.id, component);
        }
        self.rebuild();
    }

    /// Insert a single component.
    pub fn insert(&mut self, component: Component) -> ComponentId {
        let id = component.id;
        self.components.insert(id, component);
        self.rebuild();
        id
    }

    /// Reparent a component. The caller (the interaction controller)
    /// is responsible for rejecting reparents into the component's own
    /// subtree before calling this.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::ComponentNotFound`] if absent.
    pub fn set_parent(
        &mut self,
        id: ComponentId,
        parent: Option<ComponentId>,
    ) -> BuilderResult<()> {
        let component = self
            .components
            .get_mut(&id)
            .ok_or_else(|| BuilderError::ComponentNotFound(id.to_string()))?;
        component.parent = parent;
        self.rebuild();
        Ok(())
    }

    /// Remove a component and its whole subtree. Returns the removed
    /// components (for inverse patches); no dangling `parent`
    /// references remain.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::ComponentNotFound`] if absent.
    pub fn remove_cascade(&mut self, id: ComponentId) -> BuilderResult<Vec<Component>> {
        if !self.components.contains_key(&id) {
            return Err(BuilderError::ComponentNotFound(id.to_string()));
        }
        let mut doomed = self.tree.descendants_of(id);
        doomed.push(id);

        let mut removed = Vec::with_capacity(doomed.len());
        for id in doomed {
            if let Some(component) = self.components.remove(&id) {
                removed.push(component);
            }
        }
        tracing::debug!(count = removed.len(), "removed component subtree");
        self.rebuild();
        Ok(removed)
    }

    fn rebuild(&mut self) {
        self.tree = ComponentTree::build(&self.components);
    }
}

/// Clamp a left percentage so `left + width` stays on the canvas.
fn clamp_left(left: f32, width: u32) -> f32 {
    let max_left = (100.0 - GridModel::cols_to_percent(width)).max(0.0);
    left.clamp(0.0, max_left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Layout;

    fn grid() -> GridModel {
        GridModel::new(1000.0)
    }

    fn store_with(component: Component) -> LayoutStore {
        let mut store = LayoutStore::new();
        store.insert(component);
        store
    }

    #[test]
    fn test_move_applies_to_persisted_layout() {
        let component = Component::new("button", Layout::new(100.0, 10.0, 6, 40.0));
        let id = component.id;
        let mut store = store_with(component);

        store
            .move_component(
                id,
                DeviceKey::Desktop,
                &grid(),
                MoveDelta {
                    top_px: 50.0,
                    left_px: 100.0,
                },
            )
            .expect("move");

        let layout = store.get(id).expect("exists").layouts.desktop;
        assert!((layout.top - 150.0).abs() < 1e-3);
        assert!((layout.left - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_move_clamps_left_to_canvas() {
        let component = Component::new("button", Layout::new(0.0, 90.0, 10, 40.0));
        let id = component.id;
        let mut store = store_with(component);

        store
            .move_component(
                id,
                DeviceKey::Desktop,
                &grid(),
                MoveDelta {
                    top_px: 0.0,
                    left_px: 500.0,
                },
            )
            .expect("move");

        let layout = store.get(id).expect("exists").layouts.desktop;
        let max_left = 100.0 - GridModel::cols_to_percent(10);
        assert!((layout.left - max_left).abs() < 1e-3);
    }

    #[test]
    fn test_move_clamps_top_to_zero() {
        let component = Component::new("button", Layout::new(20.0, 0.0, 6, 40.0));
        let id = component.id;
        let mut store = store_with(component);

        store
            .move_component(
                id,
                DeviceKey::Desktop,
                &grid(),
                MoveDelta {
                    top_px: -500.0,
                    left_px: 0.0,
                },
            )
            .expect("move");

        assert!(store.get(id).expect("exists").layouts.desktop.top.abs() < f32::EPSILON);
    }

    #[test]
    fn test_move_missing_component_fails() {
        let mut store = LayoutStore::new();
        let result = store.move_component(
            ComponentId::new(),
            DeviceKey::Desktop,
            &grid(),
            MoveDelta {
                top_px: 1.0,
                left_px: 1.0,
            },
        );
        assert!(matches!(result, Err(BuilderError::ComponentNotFound(_))));
    }

    #[test]
    fn test_resize_snaps_to_whole_columns() {
        // Reference scenario: width 10 + round(50 / 23.26) = 12.
        let component = Component::new("table", Layout::new(0.0, 0.0, 10, 200.0));
        let id = component.id;
        let mut store = store_with(component);

        store
            .resize_component(
                id,
                DeviceKey::Desktop,
                &grid(),
                ResizeDelta {
                    width_px: 50.0,
                    height_px: 0.0,
                    anchor: ResizeAnchor::BottomRight,
                },
            )
            .expect("resize");

        assert_eq!(store.get(id).expect("exists").layouts.desktop.width, 12);
    }

    #[test]
    fn test_resize_left_anchor_keeps_right_edge_fixed() {
        let component = Component::new("table", Layout::new(0.0, 50.0, 10, 200.0));
        let id = component.id;
        let mut store = store_with(component);

        store
            .resize_component(
                id,
                DeviceKey::Desktop,
                &grid(),
                ResizeDelta {
                    width_px: 50.0,
                    height_px: 0.0,
                    anchor: ResizeAnchor::BottomLeft,
                },
            )
            .expect("resize");

        let layout = store.get(id).expect("exists").layouts.desktop;
        assert_eq!(layout.width, 12);
        // Left shifted by exactly the applied column growth.
        let expected_left = 50.0 - GridModel::cols_to_percent(2);
        assert!((layout.left - expected_left).abs() < 1e-3);
    }

    #[test]
    fn test_resize_top_anchor_keeps_bottom_edge_fixed() {
        let component = Component::new("image", Layout::new(100.0, 0.0, 10, 200.0));
        let id = component.id;
        let mut store = store_with(component);

        store
            .resize_component(
                id,
                DeviceKey::Desktop,
                &grid(),
                ResizeDelta {
                    width_px: 0.0,
                    height_px: 30.0,
                    anchor: ResizeAnchor::TopRight,
                },
            )
            .expect("resize");

        let layout = store.get(id).expect("exists").layouts.desktop;
        assert!((layout.height - 230.0).abs() < 1e-3);
        assert!((layout.top - 70.0).abs() < 1e-3);
        assert!((layout.bottom() - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_resize_clamps_to_minimums() {
        let component = Component::new("button", Layout::new(0.0, 0.0, 2, 40.0));
        let id = component.id;
        let mut store = store_with(component);

        store
            .resize_component(
                id,
                DeviceKey::Desktop,
                &grid(),
                ResizeDelta {
                    width_px: -1000.0,
                    height_px: -1000.0,
                    anchor: ResizeAnchor::BottomRight,
                },
            )
            .expect("resize");

        let layout = store.get(id).expect("exists").layouts.desktop;
        assert_eq!(layout.width, 1);
        assert!((layout.height - MIN_HEIGHT_PX).abs() < f32::EPSILON);
    }

    #[test]
    fn test_mobile_edit_materializes_mobile_layout() {
        let component = Component::new("button", Layout::new(10.0, 10.0, 6, 40.0));
        let id = component.id;
        let mut store = store_with(component);

        store
            .move_component(
                id,
                DeviceKey::Mobile,
                &grid(),
                MoveDelta {
                    top_px: 5.0,
                    left_px: 0.0,
                },
            )
            .expect("move");

        let layouts = &store.get(id).expect("exists").layouts;
        assert!(!layouts.resolve(DeviceKey::Mobile).inherited);
        // Desktop layout untouched
        assert!((layouts.desktop.top - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_remove_cascade_clears_subtree() {
        let root = Component::new("container", Layout::default());
        let child = Component::new("container", Layout::default()).with_parent(root.id);
        let grandchild = Component::new("button", Layout::default()).with_parent(child.id);
        let sibling = Component::new("button", Layout::default());
        let (root_id, sibling_id) = (root.id, sibling.id);

        let mut store = LayoutStore::new();
        store.set_components_bulk(vec![root, child, grandchild, sibling]);
        assert_eq!(store.len(), 4);

        let removed = store.remove_cascade(root_id).expect("remove");
        assert_eq!(removed.len(), 3);
        assert_eq!(store.len(), 1);
        assert!(store.get(sibling_id).is_ok());

        // No dangling parent references remain
        for component in store.components().values() {
            if let Some(parent) = component.parent {
                assert!(store.components().contains_key(&parent));
            }
        }
    }

    #[test]
    fn test_remove_missing_component_fails() {
        let mut store = LayoutStore::new();
        assert!(matches!(
            store.remove_cascade(ComponentId::new()),
            Err(BuilderError::ComponentNotFound(_))
        ));
    }

    #[test]
    fn test_bulk_set_preserves_relative_offsets() {
        let a = Component::new("button", Layout::new(100.0, 0.0, 6, 40.0));
        let b = Component::new("button", Layout::new(100.0, 20.0, 6, 40.0));
        let (a_id, b_id) = (a.id, b.id);

        let mut store = LayoutStore::new();
        store.set_components_bulk(vec![a, b]);

        let a_layout = store.get(a_id).expect("a").layouts.desktop;
        let b_layout = store.get(b_id).expect("b").layouts.desktop;
        assert!((b_layout.left - a_layout.left - 20.0).abs() < 1e-3);
    }
}
