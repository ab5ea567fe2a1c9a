//! 取り消し履歴
//!
//! 適用済みコマンドを新しい順に保持する有限長の両端キュー。
//! 既定の深さは1（直前の変更のみ取り消し可能）。

use crate::editor::command::AppliedCommand;
use std::collections::VecDeque;

/// 既定の履歴の深さ
pub const DEFAULT_UNDO_DEPTH: usize = 1;

/// 取り消し履歴
#[derive(Debug, Clone)]
pub struct UndoHistory {
    /// 履歴エントリ（新しいものが先頭）
    entries: VecDeque<AppliedCommand>,
    /// 最大保持数
    depth: usize,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_UNDO_DEPTH)
    }

    /// 最大保持数を指定して作成（0 は 1 として扱う）
    pub fn with_depth(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            entries: VecDeque::with_capacity(depth),
            depth,
        }
    }

    /// コマンドを追加し、押し出された最古のエントリを返す
    pub fn push(&mut self, command: AppliedCommand) -> Option<AppliedCommand> {
        self.entries.push_front(command);
        if self.entries.len() > self.depth {
            self.entries.pop_back()
        } else {
            None
        }
    }

    /// 最新のエントリを取り出す
    pub fn pop(&mut self) -> Option<AppliedCommand> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goto(line: usize) -> AppliedCommand {
        AppliedCommand::Goto { line, previous_line: 1 }
    }

    #[test]
    fn test_single_slot_replaces_previous_entry() {
        let mut history = UndoHistory::new();
        assert_eq!(history.push(goto(1)), None);
        assert_eq!(history.push(goto(2)), Some(goto(1)));
        assert_eq!(history.len(), 1);
        assert_eq!(history.pop(), Some(goto(2)));
        assert!(history.pop().is_none());
    }

    #[test]
    fn test_deeper_history_pops_newest_first() {
        let mut history = UndoHistory::with_depth(3);
        for line in 1..=4 {
            history.push(goto(line));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.pop(), Some(goto(4)));
        assert_eq!(history.pop(), Some(goto(3)));
        assert_eq!(history.pop(), Some(goto(2)));
        assert!(history.is_empty());
    }

    #[test]
    fn test_zero_depth_is_clamped() {
        assert_eq!(UndoHistory::with_depth(0).depth(), 1);
    }
}
