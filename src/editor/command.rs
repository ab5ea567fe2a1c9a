//! 可逆な編集コマンド
//!
//! `EditCommand::apply` はバッファを変更し、取り消しに必要な状態を捕捉した
//! `AppliedCommand` を返す。`AppliedCommand::undo` は自身を消費するため一度しか実行できない。
//! `apply` は検証を変更より先に行うため、失敗時にバッファは変化しない。

use crate::buffer::{DeletedLines, LineBuffer, LineRange, Snapshot};
use crate::error::buffer::Result;

/// 実行前の編集コマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// `after` の直後に行を挿入
    InsertLines { after: usize, lines: Vec<String> },
    /// `[start, end]` を削除
    DeleteLines { start: usize, end: usize },
    /// 現在行を移動
    Goto { line: usize },
    /// 内容を丸ごと置き換え（ファイル読み込み・クリア）
    BulkReplace { lines: Vec<String> },
}

/// 適用済みコマンド（取り消しに必要な状態を保持）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedCommand {
    InsertLines {
        range: LineRange,
        previous_line: usize,
    },
    DeleteLines {
        deleted: DeletedLines,
        previous_line: usize,
    },
    Goto {
        line: usize,
        previous_line: usize,
    },
    BulkReplace {
        previous: Snapshot,
    },
}

impl EditCommand {
    /// コマンド名（ログ用）
    pub fn name(&self) -> &'static str {
        match self {
            EditCommand::InsertLines { .. } => "insert-lines",
            EditCommand::DeleteLines { .. } => "delete-lines",
            EditCommand::Goto { .. } => "goto",
            EditCommand::BulkReplace { .. } => "bulk-replace",
        }
    }

    /// バッファに適用
    pub fn apply(self, buffer: &mut LineBuffer) -> Result<AppliedCommand> {
        let previous_line = buffer.current_line_number();

        match self {
            EditCommand::InsertLines { after, lines } => {
                let range = buffer.insert_at(after, lines)?;
                Ok(AppliedCommand::InsertLines { range, previous_line })
            }
            EditCommand::DeleteLines { start, end } => {
                let deleted = buffer.delete_range(start, end)?;
                Ok(AppliedCommand::DeleteLines { deleted, previous_line })
            }
            EditCommand::Goto { line } => {
                let previous_line = buffer.goto_line(line)?;
                Ok(AppliedCommand::Goto { line, previous_line })
            }
            EditCommand::BulkReplace { lines } => Ok(AppliedCommand::BulkReplace {
                previous: buffer.replace_all(lines),
            }),
        }
    }
}

impl AppliedCommand {
    pub fn name(&self) -> &'static str {
        match self {
            AppliedCommand::InsertLines { .. } => "insert-lines",
            AppliedCommand::DeleteLines { .. } => "delete-lines",
            AppliedCommand::Goto { .. } => "goto",
            AppliedCommand::BulkReplace { .. } => "bulk-replace",
        }
    }

    /// 適用前の内容と現在行を復元
    pub fn undo(self, buffer: &mut LineBuffer) -> Result<()> {
        match self {
            AppliedCommand::InsertLines { range, previous_line } => {
                if !range.is_empty() {
                    buffer.delete_range(range.start, range.end)?;
                }
                buffer.set_current_line(previous_line);
            }
            AppliedCommand::DeleteLines { deleted, previous_line } => {
                buffer.insert_at(deleted.start - 1, deleted.lines)?;
                buffer.set_current_line(previous_line);
            }
            AppliedCommand::Goto { previous_line, .. } => {
                buffer.set_current_line(previous_line);
            }
            AppliedCommand::BulkReplace { previous } => {
                buffer.restore(previous);
            }
        }
        Ok(())
    }
}
