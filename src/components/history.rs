use std::collections::VecDeque;

use crate::canvas::PixelBuffer;

// ============================================================================
// HISTORY ENTRY - immutable full-canvas copy
// ============================================================================

/// A full copy of the pixel buffer (bytes plus dimensions) taken at capture time.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pixels: PixelBuffer,
}

impl HistoryEntry {
    pub fn capture(buffer: &PixelBuffer) -> Self {
        Self {
            pixels: buffer.clone(),
        }
    }

    pub fn memory_size(&self) -> usize {
        self.pixels.as_raw().len()
    }

    fn into_buffer(self) -> PixelBuffer {
        self.pixels
    }
}

// ============================================================================
// HISTORY STACK - linear undo/redo over snapshots
// ============================================================================

/// Snapshot-based undo/redo.
///
/// `snapshot` records the current buffer and discards any redo branch.
/// `undo`/`redo` swap the live buffer with the top of the opposite stack.
/// With a depth limit set, the oldest undo entry is evicted once the undo
/// stack grows past it.
#[derive(Debug, Default)]
pub struct HistoryStack {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: VecDeque<HistoryEntry>,
    max_depth: Option<usize>,
    /// Running byte total across both stacks.
    total_memory: usize,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that keeps at most `max_depth` undo entries.
    pub fn with_limit(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
            ..Self::default()
        }
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn set_max_depth(&mut self, max_depth: Option<usize>) {
        self.max_depth = max_depth;
        self.prune();
    }

    pub fn snapshot(&mut self, buffer: &PixelBuffer) {
        for entry in self.redo_stack.drain(..) {
            self.total_memory = self.total_memory.saturating_sub(entry.memory_size());
        }
        self.push_undo(HistoryEntry::capture(buffer));
        log::debug!(
            "history: snapshot {}x{} ({} undo entries, {} bytes)",
            buffer.width(),
            buffer.height(),
            self.undo_stack.len(),
            self.total_memory
        );
    }

    /// Restore the most recent snapshot into `buffer`. Returns `false` when
    /// there is nothing to undo; `buffer` is then left untouched.
    pub fn undo(&mut self, buffer: &mut PixelBuffer) -> bool {
        let Some(entry) = self.undo_stack.pop_back() else {
            return false;
        };
        self.total_memory = self.total_memory.saturating_sub(entry.memory_size());
        let current = HistoryEntry::capture(buffer);
        self.total_memory += current.memory_size();
        self.redo_stack.push_back(current);
        *buffer = entry.into_buffer();
        true
    }

    /// Re-apply the most recently undone state. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self, buffer: &mut PixelBuffer) -> bool {
        let Some(entry) = self.redo_stack.pop_back() else {
            return false;
        };
        self.total_memory = self.total_memory.saturating_sub(entry.memory_size());
        self.push_undo(HistoryEntry::capture(buffer));
        *buffer = entry.into_buffer();
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Bytes held by both stacks (O(1) via cached total).
    pub fn memory_usage(&self) -> usize {
        self.total_memory
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.total_memory = 0;
    }

    fn push_undo(&mut self, entry: HistoryEntry) {
        self.total_memory += entry.memory_size();
        self.undo_stack.push_back(entry);
        self.prune();
    }

    fn prune(&mut self) {
        let Some(max) = self.max_depth else {
            return;
        };
        while self.undo_stack.len() > max {
            if let Some(removed) = self.undo_stack.pop_front() {
                self.total_memory = self.total_memory.saturating_sub(removed.memory_size());
                log::debug!("history: evicted oldest undo entry");
            }
        }
    }
}
