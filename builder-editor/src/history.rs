//! Bounded undo/redo history.
//!
//! Versions are dense integers; entries live in a fixed-capacity ring
//! and the oldest are evicted as new mutations commit. Undo/redo are
//! driven by global hotkeys with no guaranteed precondition, so
//! cursor underflow/overflow is a silent no-op, never a panic.

use std::collections::VecDeque;

use crate::patch::{Patch, VersionEntry};

/// Default history window.
pub const DEFAULT_CAPACITY: usize = 100;

/// Ring buffer of forward/inverse patch pairs with an undo cursor.
#[derive(Debug, Clone)]
pub struct VersioningEngine {
    entries: VecDeque<VersionEntry>,
    /// Version reached by the oldest retained entry's parent state.
    base_version: u64,
    /// Version the store is currently at.
    current_version: u64,
    capacity: usize,
}

impl Default for VersioningEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl VersioningEngine {
    /// Create an engine with the default window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an engine with a custom window.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            base_version: 0,
            current_version: 0,
            capacity: capacity.max(1),
        }
    }

    /// The version the store is currently at.
    #[must_use]
    pub const fn current_version(&self) -> u64 {
        self.current_version
    }

    /// Whether an undo step is available.
    #[must_use]
    pub const fn can_undo(&self) -> bool {
        self.current_version > self.base_version
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.applied_entries() < self.entries.len()
    }

    /// Record a committed mutation.
    ///
    /// No-ops on entries that net to no change. A new edit after an
    /// undo truncates the stale redo tail; exceeding the window evicts
    /// the oldest entry.
    pub fn record(&mut self, entry: VersionEntry) {
        if entry.is_noop() {
            tracing::debug!("skipping no-op version entry");
            return;
        }

        self.entries.truncate(self.applied_entries());
        self.entries.push_back(entry);
        self.current_version += 1;

        if self.entries.len() > self.capacity {
            self.entries.pop_front();
            self.base_version += 1;
        }
    }

    /// Step the cursor back and return the inverse patch to apply.
    /// `None` when nothing can be undone (cursor at the evicted
    /// horizon or no history).
    pub fn undo(&mut self) -> Option<Patch> {
        if !self.can_undo() {
            return None;
        }
        let index = self.applied_entries() - 1;
        let patch = self.entries.get(index)?.undo.clone();
        self.current_version -= 1;
        Some(patch)
    }

    /// Step the cursor forward and return the forward patch to apply.
    /// `None` when nothing can be redone.
    pub fn redo(&mut self) -> Option<Patch> {
        if !self.can_redo() {
            return None;
        }
        let index = self.applied_entries();
        let patch = self.entries.get(index)?.redo.clone();
        self.current_version += 1;
        Some(patch)
    }

    /// Number of retained entries at or below the cursor.
    #[allow(clippy::cast_possible_truncation)] // bounded by capacity
    fn applied_entries(&self) -> usize {
        (self.current_version - self.base_version) as usize
    }
}
