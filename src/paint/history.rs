use crate::paint::model::BoundingBox;
use crate::paint::surface::PixelRect;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Draw,
    Erase,
    Fill,
}

/// One undoable surface mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintAction {
    pub kind: ActionKind,
    pub before_image: Option<PixelRect>,
    pub after_image: Option<PixelRect>,
    pub bounding_box: BoundingBox,
}

/// Linear undo/redo stacks. Committing clears redo; the undo side drops its
/// oldest entries past `limit`.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintHistory {
    undo_stack: VecDeque<PaintAction>,
    redo_stack: Vec<PaintAction>,
    limit: usize,
}

impl Default for PaintHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl PaintHistory {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn commit(&mut self, action: PaintAction) {
        self.undo_stack.push_back(action);
        self.redo_stack.clear();
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }

    pub fn undo(&mut self) -> Option<&PaintAction> {
        let action = self.undo_stack.pop_back()?;
        self.redo_stack.push(action);
        self.redo_stack.last()
    }

    pub fn redo(&mut self) -> Option<&PaintAction> {
        let action = self.redo_stack.pop()?;
        self.undo_stack.push_back(action);
        self.undo_stack.back()
    }

    /// Action the next `undo` would revert.
    pub fn last_undo(&self) -> Option<&PaintAction> {
        self.undo_stack.back()
    }

    pub fn last_redo(&self) -> Option<&PaintAction> {
        self.redo_stack.last()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
