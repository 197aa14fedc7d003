//! The editor facade exposed to collaborators.
//!
//! Owns the store, the interaction controller, the version history
//! and the canvas sizer, and funnels every committed mutation through
//! one pipeline: mutate → diff → record → rebuild → resize → notify.
//! Persistence is the listener's problem; the editor fires the change
//! event and moves on (no blocking, no retry).

use std::collections::HashMap;

use builder_core::{
    BuilderResult, CanvasMode, CanvasSizer, Component, ComponentId, ComponentTree, DeviceKey,
    GridModel, LayoutStore, MoveDelta, ResizeDelta,
};

use crate::controller::{
    AcceptAllWidgets, DragResizeController, DropOutcome, DropTarget, WidgetSupport,
};
use crate::history::VersioningEngine;
use crate::patch;

/// Structured summary of one committed mutation, handed to the
/// persistence collaborator so it can pick a differential save
/// strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeChange {
    /// Parent/child relationships changed (reparent, add or remove
    /// inside a container).
    pub container_changes: bool,
    /// A new component was added.
    pub component_added: bool,
}

type ChangeListener = Box<dyn FnMut(&TreeChange)>;

/// The canvas editor: single owner of the component map.
pub struct CanvasEditor {
    store: LayoutStore,
    controller: DragResizeController,
    history: VersioningEngine,
    sizer: CanvasSizer,
    device: DeviceKey,
    mode: CanvasMode,
    canvas_width_px: f32,
    widget_support: Box<dyn WidgetSupport>,
    listener: Option<ChangeListener>,
}

impl CanvasEditor {
    /// Create an editor for an empty page.
    #[must_use]
    pub fn new(canvas_width_px: f32, viewport_height_px: f32) -> Self {
        Self::from_components(HashMap::new(), canvas_width_px, viewport_height_px)
    }

    /// Create an editor over an existing page (handed over by the
    /// persistence collaborator via `getComponentTree`).
    #[must_use]
    pub fn from_components(
        components: HashMap<ComponentId, Component>,
        canvas_width_px: f32,
        viewport_height_px: f32,
    ) -> Self {
        let store = LayoutStore::from_components(components);
        let mut sizer = CanvasSizer::new(viewport_height_px);
        sizer.recompute(&store, DeviceKey::Desktop, CanvasMode::Edit);
        Self {
            store,
            controller: DragResizeController::new(),
            history: VersioningEngine::new(),
            sizer,
            device: DeviceKey::Desktop,
            mode: CanvasMode::Edit,
            canvas_width_px,
            widget_support: Box::new(AcceptAllWidgets),
            listener: None,
        }
    }

    // -----------------------------------------------------------------------
    // Collaborator wiring
    // -----------------------------------------------------------------------

    /// Register the app-definition-changed listener.
    pub fn set_change_listener(&mut self, listener: impl FnMut(&TreeChange) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Install the widget-registry support check for palette drops.
    pub fn set_widget_support(&mut self, support: impl WidgetSupport + 'static) {
        self.widget_support = Box::new(support);
    }

    /// Switch the active device layout. Pushed by the
    /// responsive-layout collaborator together with the new width.
    pub fn set_device(&mut self, device: DeviceKey, canvas_width_px: f32) {
        self.device = device;
        self.canvas_width_px = canvas_width_px;
        self.sizer.recompute(&self.store, device, self.mode);
    }

    /// Switch between edit and view canvas bounds.
    pub fn set_mode(&mut self, mode: CanvasMode) {
        self.mode = mode;
        self.sizer.recompute(&self.store, self.device, mode);
    }

    /// The active device.
    #[must_use]
    pub const fn device(&self) -> DeviceKey {
        self.device
    }

    /// Grid math for the current canvas width.
    #[must_use]
    pub fn grid(&self) -> GridModel {
        GridModel::new(self.canvas_width_px)
    }

    /// The component map (read-only; mutations go through the editor).
    #[must_use]
    pub fn components(&self) -> &HashMap<ComponentId, Component> {
        self.store.components()
    }

    /// The parent/child index.
    #[must_use]
    pub fn tree(&self) -> &ComponentTree {
        self.store.tree()
    }

    /// The interaction controller (for preview/phase queries).
    #[must_use]
    pub const fn controller(&self) -> &DragResizeController {
        &self.controller
    }

    /// Derived canvas height in pixels.
    #[must_use]
    pub const fn canvas_height_px(&self) -> f32 {
        self.sizer.height_px()
    }

    /// CSS height expression for the render collaborator.
    #[must_use]
    pub fn height_expression(&self) -> String {
        self.sizer.height_expression()
    }

    /// Whether an undo step is available.
    #[must_use]
    pub const fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The version the page is currently at.
    #[must_use]
    pub const fn current_version(&self) -> u64 {
        self.history.current_version()
    }

    // -----------------------------------------------------------------------
    // Committed mutations
    // -----------------------------------------------------------------------

    /// Move components by a pixel delta (keyboard nudge, programmatic
    /// repositioning). One history entry for the whole set.
    ///
    /// # Errors
    ///
    /// Returns [`builder_core::BuilderError::ComponentNotFound`] if
    /// any id is absent; the store is left unchanged in that case.
    pub fn move_components(&mut self, ids: &[ComponentId], delta: MoveDelta) -> BuilderResult<()> {
        let before = self.store.components().clone();
        let grid = self.grid();
        self.store.move_components(ids, self.device, &grid, delta)?;
        self.finish_commit(&before, false);
        Ok(())
    }

    /// Resize a component by pixel deltas; width snaps to whole grid
    /// columns.
    ///
    /// # Errors
    ///
    /// Returns [`builder_core::BuilderError::ComponentNotFound`] if
    /// the id is absent.
    pub fn resize_component(&mut self, id: ComponentId, delta: ResizeDelta) -> BuilderResult<()> {
        let before = self.store.components().clone();
        let grid = self.grid();
        self.store.resize_component(id, self.device, &grid, delta)?;
        self.finish_commit(&before, false);
        Ok(())
    }

    /// Paste or programmatically place a batch of components,
    /// preserving their relative offsets. One history entry.
    pub fn set_components_bulk(&mut self, components: Vec<Component>) {
        let before = self.store.components().clone();
        self.store.set_components_bulk(components);
        self.finish_commit(&before, true);
    }

    /// Drop a new widget from the palette.
    ///
    /// # Errors
    ///
    /// Returns [`builder_core::BuilderError::ComponentNotFound`] if
    /// the target container is absent.
    pub fn insert_component(
        &mut self,
        widget_type: &str,
        drop_x_px: f32,
        drop_y_px: f32,
        target: DropTarget,
    ) -> BuilderResult<DropOutcome> {
        let before = self.store.components().clone();
        let grid = self.grid();
        let outcome = self.controller.drop_from_palette(
            &mut self.store,
            &grid,
            self.device,
            widget_type,
            drop_x_px,
            drop_y_px,
            target,
            self.widget_support.as_ref(),
        )?;
        if matches!(outcome, DropOutcome::Committed { .. }) {
            self.finish_commit(&before, true);
        }
        Ok(outcome)
    }

    /// Remove a component and its whole subtree. One history entry
    /// for the cascade.
    ///
    /// # Errors
    ///
    /// Returns [`builder_core::BuilderError::ComponentNotFound`] if
    /// the id is absent.
    pub fn remove_component(&mut self, id: ComponentId) -> BuilderResult<()> {
        let before = self.store.components().clone();
        self.store.remove_cascade(id)?;
        self.finish_commit(&before, false);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Interaction lifecycle
    // -----------------------------------------------------------------------

    /// Start dragging the current selection (from the selection-model
    /// collaborator).
    ///
    /// # Errors
    ///
    /// See [`DragResizeController::begin_drag`].
    pub fn begin_drag(
        &mut self,
        selection: &[ComponentId],
        primary: ComponentId,
    ) -> BuilderResult<()> {
        self.controller
            .begin_drag(&self.store, self.device, selection, primary)
    }

    /// High-frequency pointer-move update; transient only.
    pub fn drag_to(&mut self, offset: MoveDelta) {
        self.controller.drag_to(offset);
    }

    /// Commit the drag at the dropped DOM position of the primary
    /// component. The single versioned mutation of the interaction.
    ///
    /// # Errors
    ///
    /// See [`DragResizeController::end_drag`].
    pub fn end_drag(
        &mut self,
        dropped_top_px: f32,
        dropped_left_px: f32,
        target: DropTarget,
    ) -> BuilderResult<DropOutcome> {
        let before = self.store.components().clone();
        let grid = self.grid();
        let outcome = self.controller.end_drag(
            &mut self.store,
            &grid,
            self.device,
            dropped_top_px,
            dropped_left_px,
            target,
        )?;
        if matches!(outcome, DropOutcome::Committed { .. }) {
            self.finish_commit(&before, false);
        }
        Ok(outcome)
    }

    /// Start resizing a component.
    ///
    /// # Errors
    ///
    /// See [`DragResizeController::begin_resize`].
    pub fn begin_resize(&mut self, id: ComponentId) -> BuilderResult<()> {
        self.controller.begin_resize(&self.store, self.device, id)
    }

    /// Commit the resize.
    ///
    /// # Errors
    ///
    /// See [`DragResizeController::end_resize`].
    pub fn end_resize(&mut self, delta: ResizeDelta) -> BuilderResult<DropOutcome> {
        let before = self.store.components().clone();
        let grid = self.grid();
        let outcome =
            self.controller
                .end_resize(&mut self.store, &grid, self.device, delta)?;
        if matches!(outcome, DropOutcome::Committed { .. }) {
            self.finish_commit(&before, false);
        }
        Ok(outcome)
    }

    /// Cancel the in-flight interaction with no history entry.
    pub fn cancel_interaction(&mut self) {
        self.controller.cancel();
    }

    // -----------------------------------------------------------------------
    // Undo / redo
    // -----------------------------------------------------------------------

    /// Undo the last committed mutation. Silent no-op (returns
    /// `false`) when there is nothing to undo; global hotkeys must
    /// never crash the editor.
    pub fn undo(&mut self) -> bool {
        let Some(inverse) = self.history.undo() else {
            return false;
        };
        self.apply_patch_and_notify(&inverse);
        true
    }

    /// Redo the last undone mutation. Silent no-op when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(forward) = self.history.redo() else {
            return false;
        };
        self.apply_patch_and_notify(&forward);
        true
    }

    // -----------------------------------------------------------------------
    // Commit pipeline
    // -----------------------------------------------------------------------

    fn apply_patch_and_notify(&mut self, patch: &patch::Patch) {
        let before = self.store.components().clone();
        let mut components = before.clone();
        patch.apply(&mut components);
        self.store.replace_components(components);

        let change = TreeChange {
            container_changes: container_changes(&before, self.store.components()),
            component_added: false,
        };
        self.after_commit(&change);
    }

    fn finish_commit(
        &mut self,
        before: &HashMap<ComponentId, Component>,
        component_added: bool,
    ) {
        let entry = patch::diff(before, self.store.components());
        if entry.is_noop() {
            return;
        }
        let change = TreeChange {
            container_changes: container_changes(before, self.store.components()),
            component_added,
        };
        self.history.record(entry);
        self.after_commit(&change);
    }

    fn after_commit(&mut self, change: &TreeChange) {
        self.sizer.recompute(&self.store, self.device, self.mode);
        tracing::debug!(
            container_changes = change.container_changes,
            component_added = change.component_added,
            version = self.history.current_version(),
            "mutation committed"
        );
        if let Some(listener) = self.listener.as_mut() {
            listener(change);
        }
    }
}

/// Whether any parent/child relationship differs between two maps.
fn container_changes(
    before: &HashMap<ComponentId, Component>,
    after: &HashMap<ComponentId, Component>,
) -> bool {
    for (id, component) in after {
        match before.get(id) {
            Some(old) => {
                if old.parent != component.parent {
                    return true;
                }
            }
            None => {
                if component.parent.is_some() {
                    return true;
                }
            }
        }
    }
    before
        .iter()
        .any(|(id, old)| !after.contains_key(id) && old.parent.is_some())
}
