//! 行バッファ
//!
//! 行の順序付き列と現在行カーソルを管理する。
//! 外部とのやり取りは1始まりの行番号、内部は0始まりの `Vec` で保持する。
//! 現在行は常に `0 <= current_line <= size` を満たし、0 はバッファが空のときのみ。

use crate::error::{buffer::Result, BufferError};

/// 1始まり・両端を含む行範囲
///
/// 挿入が0行だった場合は `start == end + 1` の空範囲になる
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 単一行の範囲
    pub fn single(line: usize) -> Self {
        Self::new(line, line)
    }

    /// 範囲に含まれる行数
    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 削除された行と元の開始位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedLines {
    pub start: usize,
    pub lines: Vec<String>,
}

/// バッファ全体のスナップショット
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub lines: Vec<String>,
    pub current_line: usize,
}

/// 行バッファ本体
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
    current_line: usize,
}

impl LineBuffer {
    /// 空のバッファを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 行の列からバッファを作成（現在行は最終行）
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let current_line = lines.len();
        Self { lines, current_line }
    }

    /// 行数
    pub fn size(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// `$` が指す行番号（空なら0）
    pub fn last_line_number(&self) -> usize {
        self.lines.len()
    }

    /// 現在行番号（空なら0）
    pub fn current_line_number(&self) -> usize {
        self.current_line
    }

    /// 全行
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 1始まりの行番号で行を取得
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    /// 範囲内の行を取得
    ///
    /// 空バッファに対する `(0, 0)` は空スライスを返す
    pub fn lines_in_range(&self, start: usize, end: usize) -> Result<&[String]> {
        if self.lines.is_empty() && start == 0 && end == 0 {
            return Ok(&[]);
        }
        self.check_range(start, end)?;
        Ok(&self.lines[start - 1..end])
    }

    /// `position` の直後に行を挿入し、挿入後に占有している範囲を返す
    ///
    /// `position == 0` は先頭への挿入
    pub fn insert_at(&mut self, position: usize, lines: Vec<String>) -> Result<LineRange> {
        if position > self.size() {
            return Err(self.range_error(position, position));
        }

        let count = lines.len();
        self.lines.splice(position..position, lines);
        if count > 0 {
            self.current_line = position + count;
        }

        Ok(LineRange::new(position + 1, position + count))
    }

    /// `[start, end]` を削除し、削除した内容を返す
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<DeletedLines> {
        self.check_range(start, end)?;

        let removed: Vec<String> = self.lines.drain(start - 1..end).collect();
        self.current_line = if self.lines.is_empty() {
            0
        } else {
            (start - 1).clamp(1, self.size())
        };

        Ok(DeletedLines {
            start,
            lines: removed,
        })
    }

    /// 現在行を移動し、移動前の現在行を返す
    pub fn goto_line(&mut self, number: usize) -> Result<usize> {
        if number < 1 || number > self.size() {
            return Err(self.range_error(number, number));
        }
        Ok(std::mem::replace(&mut self.current_line, number))
    }

    /// 内容を丸ごと置き換え、置き換え前のスナップショットを返す
    pub fn replace_all(&mut self, lines: Vec<String>) -> Snapshot {
        let previous = Snapshot {
            lines: std::mem::replace(&mut self.lines, lines),
            current_line: self.current_line,
        };
        self.current_line = self.lines.len();
        previous
    }

    /// 現在の内容のスナップショット
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            lines: self.lines.clone(),
            current_line: self.current_line,
        }
    }

    /// スナップショットから復元
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.lines = snapshot.lines;
        self.current_line = snapshot.current_line.min(self.lines.len());
    }

    /// 取り消し処理用：現在行を直接設定（範囲外は末尾に丸める）
    pub(crate) fn set_current_line(&mut self, number: usize) {
        self.current_line = number.min(self.lines.len());
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        if start < 1 || start > end || end > self.size() {
            return Err(self.range_error(start, end));
        }
        Ok(())
    }

    fn range_error(&self, start: usize, end: usize) -> BufferError {
        BufferError::Range {
            start,
            end,
            size: self.size(),
        }
    }
}
