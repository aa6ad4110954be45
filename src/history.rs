use crate::stroke::StrokeRef;

/// Undo/redo availability after a history mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryState {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Manages the committed strokes for undo/redo functionality
#[derive(Debug, Default, Clone)]
pub struct History {
    /// Committed strokes, oldest first
    undo_stack: Vec<StrokeRef>,
    /// Undone strokes, most recently undone last
    redo_stack: Vec<StrokeRef>,
}

impl History {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Append a completed stroke and truncate the redo branch
    pub fn commit(&mut self, stroke: StrokeRef) -> HistoryState {
        self.undo_stack.push(stroke);
        self.redo_stack.clear();
        self.state()
    }

    /// Move the newest stroke to the redo stack. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<HistoryState> {
        let stroke = self.undo_stack.pop()?;
        self.redo_stack.push(stroke);
        Some(self.state())
    }

    /// Move the most recently undone stroke back. `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<HistoryState> {
        let stroke = self.redo_stack.pop()?;
        self.undo_stack.push(stroke);
        Some(self.state())
    }

    /// Drop every stroke on both stacks
    pub fn reset(&mut self) -> HistoryState {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.state()
    }

    pub fn state(&self) -> HistoryState {
        HistoryState {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Returns true if there are strokes that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are strokes that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Strokes currently drawn, in commit order
    pub fn strokes(&self) -> &[StrokeRef] {
        &self.undo_stack
    }

    /// Undone strokes, most recently undone first
    pub fn undone(&self) -> impl Iterator<Item = &StrokeRef> {
        self.redo_stack.iter().rev()
    }

    pub fn undone_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Total committed strokes across both stacks
    pub fn len(&self) -> usize {
        self.undo_stack.len() + self.redo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
