//! Undo/redo history for editor gestures.
//!
//! Every completed gesture (a dial drag, a double-click reset, a toggle
//! click) becomes one [`Transaction`]: the state before and the state after.
//! Undo re-applies `before`, redo re-applies `after`.

use std::collections::VecDeque;

use nih_plug_egui::egui::{Key, Modifiers};

/// Oldest transactions are discarded past this depth.
pub const MAX_DEPTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transaction<T> {
    pub before: T,
    pub after: T,
}

pub struct UndoHistory<T> {
    undo: VecDeque<Transaction<T>>,
    redo: Vec<Transaction<T>>,
}

impl<T: Copy + PartialEq> UndoHistory<T> {
    pub fn new() -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
        }
    }

    /// Record a finished gesture. No-op gestures are dropped; anything else
    /// invalidates the redo stack.
    pub fn record(&mut self, before: T, after: T) {
        if before == after {
            return;
        }

        self.redo.clear();
        if self.undo.len() == MAX_DEPTH {
            self.undo.pop_front();
        }
        self.undo.push_back(Transaction { before, after });
    }

    /// The state to restore for an undo, if there is anything to undo.
    pub fn undo(&mut self) -> Option<T> {
        let transaction = self.undo.pop_back()?;
        self.redo.push(transaction);
        Some(transaction.before)
    }

    /// The state to restore for a redo, if there is anything to redo.
    pub fn redo(&mut self) -> Option<T> {
        let transaction = self.redo.pop()?;
        self.undo.push_back(transaction);
        Some(transaction.after)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

impl<T: Copy + PartialEq> Default for UndoHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A history command triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryCommand {
    Undo,
    Redo,
}

impl HistoryCommand {
    /// Cmd+Z (Ctrl+Z off macOS) undoes, Cmd+Shift+Z redoes.
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        if key != Key::Z || !modifiers.command || modifiers.alt {
            return None;
        }

        if modifiers.shift {
            Some(Self::Redo)
        } else {
            Some(Self::Undo)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_then_redo() {
        let mut history = UndoHistory::new();
        history.record(1, 2);
        history.record(2, 3);

        assert_eq!(history.undo(), Some(2));
        assert_eq!(history.undo(), Some(1));
        assert_eq!(history.undo(), None);
        assert!(!history.can_undo());

        assert_eq!(history.redo(), Some(2));
        assert_eq!(history.redo(), Some(3));
        assert_eq!(history.redo(), None);
        assert!(history.can_undo());
    }

    #[test]
    fn test_noop_gesture_not_recorded() {
        let mut history = UndoHistory::new();
        history.record(5, 5);

        assert!(!history.can_undo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut history = UndoHistory::new();
        history.record(1, 2);
        history.undo();
        assert!(history.can_redo());

        history.record(1, 4);
        assert!(!history.can_redo());
        assert_eq!(history.undo(), Some(1));
    }

    #[test]
    fn test_depth_is_bounded() {
        let mut history = UndoHistory::new();
        for i in 0..(MAX_DEPTH as i32 + 10) {
            history.record(i, i + 1);
        }

        let mut undone = 0;
        let mut last = None;
        while let Some(state) = history.undo() {
            undone += 1;
            last = Some(state);
        }

        assert_eq!(undone, MAX_DEPTH);
        assert_eq!(last, Some(10), "The oldest transactions should be discarded");
    }

    #[test]
    fn test_key_chords() {
        let command = Modifiers::COMMAND;
        let command_shift = Modifiers::COMMAND | Modifiers::SHIFT;

        assert_eq!(HistoryCommand::from_key(Key::Z, command), Some(HistoryCommand::Undo));
        assert_eq!(HistoryCommand::from_key(Key::Z, command_shift), Some(HistoryCommand::Redo));
        assert_eq!(HistoryCommand::from_key(Key::Z, Modifiers::NONE), None);
        assert_eq!(HistoryCommand::from_key(Key::Y, command), None);
        assert_eq!(HistoryCommand::from_key(Key::Z, Modifiers::SHIFT), None);
    }
}
