//! Bounded linear undo/redo over immutable document snapshots.
//!
//! Snapshots are shared as `Arc<Document>`, so undo followed by redo hands back
//! the very same snapshot that was current before the undo.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::models::cv::Document;

/// Maximum number of prior states kept for undo.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Arc<Document>>,
    present: Arc<Document>,
    future: Vec<Arc<Document>>,
    limit: usize,
}

impl History {
    pub fn new(initial: Document) -> Self {
        Self::with_limit(initial, HISTORY_LIMIT)
    }

    pub fn with_limit(initial: Document, limit: usize) -> Self {
        Self {
            past: VecDeque::with_capacity(limit.min(HISTORY_LIMIT)),
            present: Arc::new(initial),
            future: Vec::new(),
            limit,
        }
    }

    pub fn present(&self) -> &Arc<Document> {
        &self.present
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Makes `next` the present state. The previous present goes onto the undo
    /// stack (evicting the oldest entry past the limit) and redo is discarded.
    pub fn commit(&mut self, next: Document) -> Arc<Document> {
        let next = Arc::new(next);
        let previous = std::mem::replace(&mut self.present, Arc::clone(&next));
        self.past.push_back(previous);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
        next
    }

    /// Steps back one state. Returns `None` (and changes nothing) when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Option<Arc<Document>> {
        let previous = self.past.pop_back()?;
        let replaced = std::mem::replace(&mut self.present, Arc::clone(&previous));
        self.future.push(replaced);
        Some(previous)
    }

    /// Steps forward one state. Returns `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<Arc<Document>> {
        let next = self.future.pop()?;
        let replaced = std::mem::replace(&mut self.present, Arc::clone(&next));
        self.past.push_back(replaced);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        Some(next)
    }
}
