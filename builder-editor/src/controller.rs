//! Pointer-interaction handling.
//!
//! The controller is the only component that mutates the
//! [`LayoutStore`] during continuous motion, and it does so exactly
//! once per interaction, at the commit point. Pointer-move updates a
//! transient preview offset only; because the store is untouched until
//! the stop event, cancelling an in-flight interaction simply discards
//! the transient state.

use std::collections::HashMap;

use builder_core::{
    BuilderError, BuilderResult, Component, ComponentId, DeviceKey, GridModel, Layout, LayoutStore,
    MoveDelta, ResizeDelta, COLUMN_COUNT,
};

/// Decides whether the active render target can host a widget type.
///
/// Owned by the widget-registry collaborator; the default accepts
/// everything.
pub trait WidgetSupport {
    /// Whether `widget_type` can be rendered on the current target.
    fn supports(&self, widget_type: &str) -> bool;
}

/// [`WidgetSupport`] that accepts every widget type.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllWidgets;

impl WidgetSupport for AcceptAllWidgets {
    fn supports(&self, _widget_type: &str) -> bool {
        true
    }
}

/// Where a drag or palette drop landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// The page canvas (top level).
    Canvas,
    /// Inside a container component.
    Container(ComponentId),
}

impl DropTarget {
    const fn parent(self) -> Option<ComponentId> {
        match self {
            Self::Canvas => None,
            Self::Container(id) => Some(id),
        }
    }
}

/// Outcome of a commit-point interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The mutation was applied to the store.
    Committed {
        /// Component created by a palette drop, if any.
        created: Option<ComponentId>,
    },
    /// No interaction was in flight, or the drop landed where it
    /// started.
    NoChange,
    /// Rejected with a user-facing notice; the store is untouched.
    Rejected {
        /// Message for the editor UI.
        notice: String,
    },
}

/// In-flight interaction phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    /// No interaction in flight.
    #[default]
    Idle,
    /// A drag is in progress.
    Dragging,
    /// A resize is in progress.
    Resizing,
}

/// Default geometry for palette drops.
const DROP_WIDTH_COLS: u32 = 6;
const DROP_HEIGHT_PX: f32 = 40.0;

/// Translates pointer events into store mutations.
#[derive(Debug, Clone, Default)]
pub struct DragResizeController {
    state: InteractionState,
    /// Pre-interaction layouts of every moved component, immutable
    /// for the duration of the interaction.
    snapshots: HashMap<ComponentId, Layout>,
    moved: Vec<ComponentId>,
    primary: Option<ComponentId>,
    preview: Option<MoveDelta>,
}

impl DragResizeController {
    /// Create an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current interaction phase.
    #[must_use]
    pub const fn state(&self) -> InteractionState {
        self.state
    }

    /// Transient visual offset of the in-flight drag, if any.
    #[must_use]
    pub const fn preview_offset(&self) -> Option<MoveDelta> {
        self.preview
    }

    /// Start a drag of the current selection.
    ///
    /// Multi-select reduces to the highest-level members: a selected
    /// descendant of a selected container moves implicitly with its
    /// parent's coordinate frame and is dropped from the moved set.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::ComponentNotFound`] if any selected id
    /// is absent, and [`BuilderError::InvalidOperation`] if an
    /// interaction is already in flight.
    pub fn begin_drag(
        &mut self,
        store: &LayoutStore,
        device: DeviceKey,
        selection: &[ComponentId],
        primary: ComponentId,
    ) -> BuilderResult<()> {
        if self.state != InteractionState::Idle {
            return Err(BuilderError::InvalidOperation(
                "interaction already in flight".into(),
            ));
        }
        for &id in selection {
            store.get(id)?;
        }
        store.get(primary)?;

        let moved = store.tree().highest_level_selection(selection);
        // The commit diff is computed against the primary; if the
        // primary was reduced away, its covering ancestor stands in.
        let effective_primary = moved
            .iter()
            .copied()
            .find(|&m| m == primary || store.tree().is_descendant(primary, m))
            .or_else(|| moved.first().copied());

        self.snapshots = moved
            .iter()
            .filter_map(|&id| {
                store
                    .get(id)
                    .ok()
                    .map(|c| (id, c.layouts.resolve(device).layout))
            })
            .collect();
        self.moved = moved;
        self.primary = effective_primary;
        self.preview = None;
        self.state = InteractionState::Dragging;
        tracing::debug!(count = self.moved.len(), "drag started");
        Ok(())
    }

    /// High-frequency pointer-move update. Touches only the transient
    /// preview; never the store, never history.
    pub fn drag_to(&mut self, offset: MoveDelta) {
        if self.state == InteractionState::Dragging {
            self.preview = Some(offset);
        }
    }

    /// Commit the in-flight drag.
    ///
    /// `dropped_top_px`/`dropped_left_px` are the DOM position of the
    /// primary component at drop time. The diff against its persisted
    /// layout is quantized to the grid and applied identically to
    /// every moved component, preserving the selection's relative
    /// formation. Dropping into the moved set's own subtree rejects
    /// the whole interaction with no mutation.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::ComponentNotFound`] if a moved
    /// component disappeared mid-interaction.
    pub fn end_drag(
        &mut self,
        store: &mut LayoutStore,
        grid: &GridModel,
        device: DeviceKey,
        dropped_top_px: f32,
        dropped_left_px: f32,
        target: DropTarget,
    ) -> BuilderResult<DropOutcome> {
        if self.state != InteractionState::Dragging {
            return Ok(DropOutcome::NoChange);
        }

        if let DropTarget::Container(container) = target {
            let own_subtree = self
                .moved
                .iter()
                .any(|&m| container == m || store.tree().is_descendant(container, m));
            if own_subtree {
                tracing::warn!(%container, "rejected drop into own subtree");
                self.reset();
                return Ok(DropOutcome::Rejected {
                    notice: "Cannot move a container inside itself".into(),
                });
            }
            store.get(container)?;
        }

        let Some(primary) = self.primary else {
            self.reset();
            return Ok(DropOutcome::NoChange);
        };
        let Some(snapshot) = self.snapshots.get(&primary).copied() else {
            self.reset();
            return Ok(DropOutcome::NoChange);
        };

        let top_diff = GridModel::snap_top_px(dropped_top_px - snapshot.top);
        let left_diff_px = grid.snap_width_px(dropped_left_px - grid.percent_to_px(snapshot.left));

        let moved = std::mem::take(&mut self.moved);
        store.move_components(
            &moved,
            device,
            grid,
            MoveDelta {
                top_px: top_diff,
                left_px: left_diff_px,
            },
        )?;
        for &id in &moved {
            let current_parent = store.get(id)?.parent;
            if current_parent != target.parent() {
                store.set_parent(id, target.parent())?;
            }
        }

        self.reset();
        Ok(DropOutcome::Committed { created: None })
    }

    /// Start a resize of a single component.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::ComponentNotFound`] if absent, and
    /// [`BuilderError::InvalidOperation`] if an interaction is already
    /// in flight.
    pub fn begin_resize(
        &mut self,
        store: &LayoutStore,
        device: DeviceKey,
        id: ComponentId,
    ) -> BuilderResult<()> {
        if self.state != InteractionState::Idle {
            return Err(BuilderError::InvalidOperation(
                "interaction already in flight".into(),
            ));
        }
        let layout = store.get(id)?.layouts.resolve(device).layout;
        self.snapshots = HashMap::from([(id, layout)]);
        self.primary = Some(id);
        self.state = InteractionState::Resizing;
        Ok(())
    }

    /// Commit the in-flight resize. Width quantization and minimum
    /// clamping happen in the store.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::ComponentNotFound`] if the component
    /// disappeared mid-interaction.
    pub fn end_resize(
        &mut self,
        store: &mut LayoutStore,
        grid: &GridModel,
        device: DeviceKey,
        delta: ResizeDelta,
    ) -> BuilderResult<DropOutcome> {
        if self.state != InteractionState::Resizing {
            return Ok(DropOutcome::NoChange);
        }
        let Some(id) = self.primary else {
            self.reset();
            return Ok(DropOutcome::NoChange);
        };
        store.resize_component(id, device, grid, delta)?;
        self.reset();
        Ok(DropOutcome::Committed { created: None })
    }

    /// Cancel the in-flight interaction (escape key, invalid drop).
    ///
    /// The store was never touched during motion, so pre-interaction
    /// geometry is intact and no history entry exists to clean up.
    pub fn cancel(&mut self) {
        if self.state != InteractionState::Idle {
            tracing::debug!("interaction cancelled");
        }
        self.reset();
    }

    /// Drop a new widget from the palette onto the canvas.
    ///
    /// The drop point is quantized to the grid. Widget types the
    /// active render target cannot host are rejected with a notice and
    /// no mutation.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::ComponentNotFound`] if the target
    /// container is absent.
    #[allow(clippy::too_many_arguments)]
    pub fn drop_from_palette(
        &mut self,
        store: &mut LayoutStore,
        grid: &GridModel,
        device: DeviceKey,
        widget_type: &str,
        drop_x_px: f32,
        drop_y_px: f32,
        target: DropTarget,
        support: &dyn WidgetSupport,
    ) -> BuilderResult<DropOutcome> {
        if !support.supports(widget_type) {
            tracing::warn!(widget_type, "widget type unsupported on this target");
            return Ok(DropOutcome::Rejected {
                notice: format!("\"{widget_type}\" is not supported on this device"),
            });
        }
        if let DropTarget::Container(container) = target {
            store.get(container)?;
        }

        let max_col = i32::try_from(COLUMN_COUNT - DROP_WIDTH_COLS).unwrap_or(i32::MAX);
        let col = grid.snap_cols(drop_x_px).clamp(0, max_col);
        #[allow(clippy::cast_sign_loss)]
        let left = GridModel::cols_to_percent(col as u32);
        let top = GridModel::snap_top_px(drop_y_px).max(0.0);

        let layout = Layout::new(top, left, DROP_WIDTH_COLS, DROP_HEIGHT_PX);
        let mut component = Component::new(widget_type, layout);
        if device == DeviceKey::Mobile {
            // Dropped on the mobile canvas: pin an explicit mobile
            // layout instead of inheriting desktop.
            component.layouts.mobile = Some(layout);
        }
        component.parent = target.parent();
        let id = component.id;
        // Single-entry bulk set keeps palette drops on the same code
        // path as paste.
        store.set_components_bulk(vec![component]);

        tracing::debug!(%id, widget_type, "palette drop committed");
        Ok(DropOutcome::Committed { created: Some(id) })
    }

    fn reset(&mut self) {
        self.state = InteractionState::Idle;
        self.snapshots.clear();
        self.moved.clear();
        self.primary = None;
        self.preview = None;
    }
}
