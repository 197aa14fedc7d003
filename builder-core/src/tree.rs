//! Parent/child index over the flat component map.
//!
//! The tree is rebuilt from scratch whenever the component map changes
//! rather than patched incrementally. Pages hold tens to low hundreds
//! of components, so the O(n) pass is cheap and keeps the invariants
//! trivially correct.

use std::collections::{HashMap, HashSet};

use crate::component::{Component, ComponentId};

/// Derived parent→children adjacency for a component map.
#[derive(Debug, Clone, Default)]
pub struct ComponentTree {
    children: HashMap<ComponentId, Vec<ComponentId>>,
    parents: HashMap<ComponentId, Option<ComponentId>>,
    roots: Vec<ComponentId>,
}

impl ComponentTree {
    /// Build the index from a flat component map.
    #[must_use]
    pub fn build(components: &HashMap<ComponentId, Component>) -> Self {
        let mut children: HashMap<ComponentId, Vec<ComponentId>> = HashMap::new();
        let mut parents = HashMap::new();
        let mut roots = Vec::new();

        for component in components.values() {
            parents.insert(component.id, component.parent);
            match component.parent {
                Some(parent) => children.entry(parent).or_default().push(component.id),
                None => roots.push(component.id),
            }
        }

        // Deterministic child ordering regardless of map iteration.
        for ids in children.values_mut() {
            ids.sort_unstable();
        }
        roots.sort_unstable();

        Self {
            children,
            parents,
            roots,
        }
    }

    /// Direct children of a component.
    #[must_use]
    pub fn children_of(&self, id: ComponentId) -> &[ComponentId] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Top-level components (no parent).
    #[must_use]
    pub fn roots(&self) -> &[ComponentId] {
        &self.roots
    }

    /// Chain of ancestors from the direct parent up to the root.
    #[must_use]
    pub fn ancestors_of(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut out = Vec::new();
        let mut current = id;
        while let Some(&Some(parent)) = self.parents.get(&current) {
            out.push(parent);
            current = parent;
        }
        out
    }

    /// All transitive descendants of a component.
    #[must_use]
    pub fn descendants_of(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for &child in self.children_of(current) {
                out.push(child);
                stack.push(child);
            }
        }
        out
    }

    /// Whether `candidate` is a transitive descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant(&self, candidate: ComponentId, ancestor: ComponentId) -> bool {
        let mut current = candidate;
        while let Some(&Some(parent)) = self.parents.get(&current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Reduce a selection to its highest-level members: any selected
    /// component whose ancestor is also selected is dropped, since it
    /// moves implicitly with its ancestor.
    #[must_use]
    pub fn highest_level_selection(&self, selection: &[ComponentId]) -> Vec<ComponentId> {
        let selected: HashSet<ComponentId> = selection.iter().copied().collect();
        selection
            .iter()
            .copied()
            .filter(|&id| !self.ancestors_of(id).iter().any(|a| selected.contains(a)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Layout;

    fn map_of(components: Vec<Component>) -> HashMap<ComponentId, Component> {
        components.into_iter().map(|c| (c.id, c)).collect()
    }

    fn nested_three() -> (
        HashMap<ComponentId, Component>,
        ComponentId,
        ComponentId,
        ComponentId,
    ) {
        let root = Component::new("container", Layout::default());
        let child = Component::new("container", Layout::default()).with_parent(root.id);
        let grandchild = Component::new("button", Layout::default()).with_parent(child.id);
        let (r, c, g) = (root.id, child.id, grandchild.id);
        (map_of(vec![root, child, grandchild]), r, c, g)
    }

    #[test]
    fn test_children_and_roots() {
        let (map, root, child, grandchild) = nested_three();
        let tree = ComponentTree::build(&map);

        assert_eq!(tree.roots(), &[root]);
        assert_eq!(tree.children_of(root), &[child]);
        assert_eq!(tree.children_of(child), &[grandchild]);
        assert!(tree.children_of(grandchild).is_empty());
    }

    #[test]
    fn test_ancestors_of() {
        let (map, root, child, grandchild) = nested_three();
        let tree = ComponentTree::build(&map);

        assert_eq!(tree.ancestors_of(grandchild), vec![child, root]);
        assert!(tree.ancestors_of(root).is_empty());
    }

    #[test]
    fn test_is_descendant() {
        let (map, root, child, grandchild) = nested_three();
        let tree = ComponentTree::build(&map);

        assert!(tree.is_descendant(grandchild, root));
        assert!(tree.is_descendant(child, root));
        assert!(!tree.is_descendant(root, grandchild));
        assert!(!tree.is_descendant(root, root));
    }

    #[test]
    fn test_descendants_of() {
        let (map, root, child, grandchild) = nested_three();
        let tree = ComponentTree::build(&map);

        let mut descendants = tree.descendants_of(root);
        descendants.sort_unstable();
        let mut expected = vec![child, grandchild];
        expected.sort_unstable();
        assert_eq!(descendants, expected);
    }

    #[test]
    fn test_highest_level_selection_drops_covered_descendants() {
        let (map, root, child, grandchild) = nested_three();
        let tree = ComponentTree::build(&map);

        let reduced = tree.highest_level_selection(&[root, grandchild]);
        assert_eq!(reduced, vec![root]);

        // Unrelated selections pass through untouched
        let reduced = tree.highest_level_selection(&[child]);
        assert_eq!(reduced, vec![child]);
    }
}
