//! Snapshot based undo/redo history.

/// Undo/redo history of document snapshots.
///
/// Every document state carries a revision number that is never reused, so
/// comparing revisions tells whether the document moved away from a
/// baseline even after undoing and editing again.
#[derive(Debug, Clone)]
pub struct CommandStack<T> {
    /// Previous states with their revision
    undo_stack: Vec<(T, u64)>,
    /// Undone states with their revision
    redo_stack: Vec<(T, u64)>,
    /// Maximum undo history size
    max_undo_size: usize,
    revision: u64,
    next_revision: u64,
}

impl<T> Default for CommandStack<T> {
    fn default() -> Self {
        Self::new(100)
    }
}

impl<T> CommandStack<T> {
    pub fn new(max_undo_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo_size,
            revision: 0,
            next_revision: 1,
        }
    }

    /// Record an edit, pushing the state it replaced.
    ///
    /// New edits invalidate the redo history.
    pub fn record(&mut self, previous: T) {
        self.undo_stack.push((previous, self.revision));
        if self.undo_stack.len() > self.max_undo_size {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
        self.advance();
    }

    /// Step back, returning the state to restore.
    ///
    /// `current` is kept for redo.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let (previous, revision) = self.undo_stack.pop()?;
        self.redo_stack.push((current, self.revision));
        self.revision = revision;
        Some(previous)
    }

    /// Step forward again, returning the state to restore.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let (next, revision) = self.redo_stack.pop()?;
        self.undo_stack.push((current, self.revision));
        self.revision = revision;
        Some(next)
    }

    /// Drop all history; the current state gets a fresh revision.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.advance();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Revision of the current state.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    fn advance(&mut self) {
        self.revision = self.next_revision;
        self.next_revision += 1;
    }
}
