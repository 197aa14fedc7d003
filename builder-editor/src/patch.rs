//! Forward/inverse patches over the component map.
//!
//! A patch is a structural diff, not a copy of the whole tree. Pairs
//! are produced by [`diff`] at commit time (clone-and-diff; component
//! counts per page are small) and replayed by [`Patch::apply`] during
//! undo/redo.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use builder_core::{Component, ComponentId};

/// A single structural change to the component map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOp {
    /// Insert or replace a component.
    Upsert {
        /// The full component state after the op.
        component: Component,
    },
    /// Remove a component.
    Remove {
        /// The component to remove.
        id: ComponentId,
    },
}

/// An ordered list of ops applied atomically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    ops: Vec<PatchOp>,
}

impl Patch {
    /// Whether this patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The ops in application order.
    #[must_use]
    pub fn ops(&self) -> &[PatchOp] {
        &self.ops
    }

    /// Append an op. Exposed for op-log style patch construction.
    pub fn push(&mut self, op: PatchOp) {
        self.ops.push(op);
    }

    /// Apply all ops to a component map.
    pub fn apply(&self, components: &mut HashMap<ComponentId, Component>) {
        for op in &self.ops {
            match op {
                PatchOp::Upsert { component } => {
                    components.insert(component.id, component.clone());
                }
                PatchOp::Remove { id } => {
                    components.remove(id);
                }
            }
        }
    }
}

/// A forward/inverse patch pair for one committed mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Patch that replays the mutation.
    pub redo: Patch,
    /// Patch that reverts the mutation.
    pub undo: Patch,
}

impl VersionEntry {
    /// Whether the entry nets to no change. Such entries must not
    /// consume history.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        (self.redo.is_empty() && self.undo.is_empty()) || self.redo == self.undo
    }
}

/// Diff two component maps into a forward/inverse patch pair.
///
/// Keys are visited in sorted order so replay is deterministic.
#[must_use]
pub fn diff(
    before: &HashMap<ComponentId, Component>,
    after: &HashMap<ComponentId, Component>,
) -> VersionEntry {
    let mut keys: Vec<ComponentId> = before.keys().chain(after.keys()).copied().collect();
    keys.sort_unstable();
    keys.dedup();

    let mut redo = Patch::default();
    let mut undo = Patch::default();

    for id in keys {
        match (before.get(&id), after.get(&id)) {
            (None, Some(new)) => {
                redo.ops.push(PatchOp::Upsert {
                    component: new.clone(),
                });
                undo.ops.push(PatchOp::Remove { id });
            }
            (Some(old), None) => {
                redo.ops.push(PatchOp::Remove { id });
                undo.ops.push(PatchOp::Upsert {
                    component: old.clone(),
                });
            }
            (Some(old), Some(new)) if old != new => {
                redo.ops.push(PatchOp::Upsert {
                    component: new.clone(),
                });
                undo.ops.push(PatchOp::Upsert {
                    component: old.clone(),
                });
            }
            _ => {}
        }
    }

    VersionEntry { redo, undo }
}

#[cfg(test)]
mod tests {
    use super::*;
    use builder_core::Layout;

    fn map_of(components: Vec<Component>) -> HashMap<ComponentId, Component> {
        components.into_iter().map(|c| (c.id, c)).collect()
    }

    #[test]
    fn test_diff_of_equal_maps_is_noop() {
        let map = map_of(vec![Component::new("button", Layout::default())]);
        let entry = diff(&map, &map.clone());
        assert!(entry.is_noop());
        assert!(entry.redo.is_empty());
    }

    #[test]
    fn test_diff_captures_insertion() {
        let before = HashMap::new();
        let after = map_of(vec![Component::new("button", Layout::default())]);

        let entry = diff(&before, &after);
        assert_eq!(entry.redo.ops().len(), 1);
        assert!(matches!(entry.redo.ops()[0], PatchOp::Upsert { .. }));
        assert!(matches!(entry.undo.ops()[0], PatchOp::Remove { .. }));
    }

    #[test]
    fn test_apply_round_trips() {
        let a = Component::new("button", Layout::new(0.0, 0.0, 6, 40.0));
        let mut b = a.clone();
        b.layouts.desktop.top = 250.0;

        let before = map_of(vec![a]);
        let after = map_of(vec![b]);
        let entry = diff(&before, &after);

        let mut working = before.clone();
        entry.redo.apply(&mut working);
        assert_eq!(working, after);

        entry.undo.apply(&mut working);
        assert_eq!(working, before);
    }

    #[test]
    fn test_diff_mixed_ops() {
        let kept = Component::new("text", Layout::default());
        let removed = Component::new("button", Layout::default());
        let added = Component::new("table", Layout::default());
        let mut moved = Component::new("image", Layout::default());

        let before = map_of(vec![kept.clone(), removed.clone(), moved.clone()]);
        moved.layouts.desktop.left = 40.0;
        let after = map_of(vec![kept, added, moved]);

        let entry = diff(&before, &after);
        // added + removed + moved, but not kept
        assert_eq!(entry.redo.ops().len(), 3);

        let mut working = before.clone();
        entry.redo.apply(&mut working);
        assert_eq!(working, after);
        entry.undo.apply(&mut working);
        assert_eq!(working, before);
    }
}
