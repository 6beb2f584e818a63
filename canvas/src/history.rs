//! Bounded linear undo/redo history of drawing-layer snapshots.
//!
//! Entries are serialized drawing documents. The cursor marks the entry that
//! matches what is on screen. Pushing discards everything after the cursor,
//! and once the limit is exceeded the oldest entry slides out of the window;
//! the cursor always lands on the newest entry after a push.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    cursor: Option<usize>,
    limit: usize,
}

impl History {
    /// Create an empty history holding at most `limit` entries (minimum 1).
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { entries: VecDeque::new(), cursor: None, limit: limit.max(1) }
    }

    /// Append a snapshot after the cursor, discarding any redo branch.
    pub fn push(&mut self, snapshot: String) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push_back(snapshot);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back one entry, returning the snapshot to restore.
    pub fn undo(&mut self) -> Option<&str> {
        let cursor = self.cursor.filter(|&c| c > 0)?;
        self.cursor = Some(cursor - 1);
        self.current()
    }

    /// Step forward one entry, returning the snapshot to restore.
    pub fn redo(&mut self) -> Option<&str> {
        let next = self.cursor.map(|c| c + 1).filter(|&n| n < self.entries.len())?;
        self.cursor = Some(next);
        self.current()
    }

    /// The snapshot at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.cursor.and_then(|c| self.entries.get(c)).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }
}
