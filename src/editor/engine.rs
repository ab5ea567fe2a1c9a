//! 取り消し可能なバッファエンジン
//!
//! `LineBuffer` を所有し、変更操作をすべて `EditCommand` として実行して履歴に積む。
//! 失敗した操作はバッファ・現在行・履歴のいずれも変更しない。

use crate::buffer::{AddressRange, LineBuffer, LineRange};
use crate::editor::command::EditCommand;
use crate::editor::history::UndoHistory;
use crate::error::{buffer, BufferError, Result};
use crate::file::LineSource;

/// 行エディタ本体
#[derive(Debug, Clone, Default)]
pub struct LineEditor {
    buffer: LineBuffer,
    history: UndoHistory,
}

impl LineEditor {
    /// 空のバッファと深さ1の履歴で作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 履歴の深さを指定して作成
    pub fn with_undo_depth(depth: usize) -> Self {
        Self {
            buffer: LineBuffer::new(),
            history: UndoHistory::with_depth(depth),
        }
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn size(&self) -> usize {
        self.buffer.size()
    }

    pub fn current_line_number(&self) -> usize {
        self.buffer.current_line_number()
    }

    /// 取り消し可能なコマンドがあるか
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.depth()
    }

    fn execute(&mut self, command: EditCommand) -> buffer::Result<()> {
        let name = command.name();
        let applied = command.apply(&mut self.buffer)?;
        log::debug!(
            "applied {} (size={}, current={})",
            name,
            self.buffer.size(),
            self.buffer.current_line_number()
        );

        if let Some(dropped) = self.history.push(applied) {
            log::debug!("undo history full, dropped {}", dropped.name());
        }
        Ok(())
    }

    /// 行ソースの内容でバッファを置き換える
    ///
    /// 読み込みに失敗した場合は何も変更しない
    pub fn read_buffer<S: LineSource + ?Sized>(&mut self, source: &mut S) -> Result<()> {
        let lines = source.read_lines()?;
        log::info!("loading {} lines from {}", lines.len(), source.describe());
        self.execute(EditCommand::BulkReplace { lines })?;
        Ok(())
    }

    /// 行ソースの内容を最終行の後に追加し、追加した行数を返す
    pub fn append_from_source<S: LineSource + ?Sized>(&mut self, source: &mut S) -> Result<usize> {
        let lines = source.read_lines()?;
        let count = lines.len();
        log::info!("appending {} lines from {}", count, source.describe());
        self.execute(EditCommand::InsertLines {
            after: self.buffer.size(),
            lines,
        })?;
        Ok(count)
    }

    /// バッファを空にする
    pub fn clear_buffer(&mut self) -> buffer::Result<()> {
        self.execute(EditCommand::BulkReplace { lines: Vec::new() })
    }

    /// 現在行の後に行を追加
    pub fn add_lines(&mut self, lines: Vec<String>) -> buffer::Result<()> {
        self.add_lines_after(self.buffer.current_line_number(), lines)
    }

    /// 指定行の後に行を追加（0 は先頭）
    pub fn add_lines_after(&mut self, position: usize, lines: Vec<String>) -> buffer::Result<()> {
        self.execute(EditCommand::InsertLines { after: position, lines })
    }

    /// `[start, end]` を削除
    pub fn delete_lines(&mut self, start: usize, end: usize) -> buffer::Result<()> {
        self.execute(EditCommand::DeleteLines { start, end })
    }

    /// `[start, end]` を取得（履歴には残らない）
    pub fn print_lines(&self, start: usize, end: usize) -> buffer::Result<&[String]> {
        self.buffer.lines_in_range(start, end)
    }

    /// 現在行を移動（取り消し可能）
    pub fn go_to_line(&mut self, line: usize) -> buffer::Result<()> {
        self.execute(EditCommand::Goto { line })
    }

    /// アドレストークンを行範囲に解決
    pub fn get_line_range(&self, token: &str) -> buffer::Result<LineRange> {
        AddressRange::parse(token)?.resolve(&self.buffer, token)
    }

    /// アドレストークンを挿入位置に解決（0 = 先頭の前）
    pub fn get_insert_position(&self, token: &str) -> buffer::Result<usize> {
        AddressRange::parse(token)?.resolve_position(&self.buffer, token)
    }

    /// 直前の変更を取り消す
    pub fn undo(&mut self) -> buffer::Result<()> {
        let command = self.history.pop().ok_or(BufferError::NothingToUndo)?;
        let name = command.name();
        command.undo(&mut self.buffer)?;
        log::debug!(
            "undid {} (size={}, current={})",
            name,
            self.buffer.size(),
            self.buffer.current_line_number()
        );
        Ok(())
    }

    /// 最新のコマンドを取り消さずに破棄する（起動時の読み込み用）
    pub fn discard_last_command(&mut self) -> bool {
        match self.history.pop() {
            Some(command) => {
                log::debug!("discarded {} from undo history", command.name());
                true
            }
            None => false,
        }
    }
}
