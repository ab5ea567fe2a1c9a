//! アドレス解決
//!
//! `3`, `.`, `$`, `.+2`, `-`, `1,$`, `,`, `;` などのアドレストークンを
//! バッファの範囲に照らして検証済みの `LineRange` に変換する

use crate::buffer::line_buffer::{LineBuffer, LineRange};
use crate::error::{buffer::Result, BufferError};

/// アドレスの基準点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    /// `.` または基準省略
    Current,
    /// `$`
    Last,
    /// 明示的な行番号
    Line(usize),
}

/// 単一アドレス（基準点＋オフセット）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub base: Base,
    pub offset: isize,
}

impl Address {
    pub fn current() -> Self {
        Self { base: Base::Current, offset: 0 }
    }

    pub fn last() -> Self {
        Self { base: Base::Last, offset: 0 }
    }

    pub fn line(number: usize) -> Self {
        Self { base: Base::Line(number), offset: 0 }
    }

    /// バッファに照らして行番号を計算（範囲検証はしない。負になる場合は `None`）
    fn evaluate(&self, buffer: &LineBuffer) -> Option<usize> {
        self.evaluate_from(buffer.current_line_number(), buffer)
    }

    /// `current` を現在行とみなして計算
    fn evaluate_from(&self, current: usize, buffer: &LineBuffer) -> Option<usize> {
        let base = match self.base {
            Base::Current => current,
            Base::Last => buffer.last_line_number(),
            Base::Line(number) => number,
        };
        base.checked_add_signed(self.offset)
    }
}

/// アドレス範囲の構文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRange {
    /// アドレス省略（現在行）
    Default,
    /// 単一アドレス
    Single(Address),
    /// `a,b`
    Pair(Address, Address),
    /// `a;b`（`b` は `a` を現在行として評価）
    Anchored(Address, Address),
    /// `,`（バッファ全体）
    Whole,
    /// `;`（現在行から最終行まで）
    FromCurrent,
}

impl AddressRange {
    /// アドレストークンを構文解析
    pub fn parse(token: &str) -> Result<Self> {
        let trimmed = token.trim();
        let invalid = || BufferError::Address { token: token.to_string() };

        match trimmed {
            "" => return Ok(AddressRange::Default),
            "," => return Ok(AddressRange::Whole),
            ";" => return Ok(AddressRange::FromCurrent),
            _ => {}
        }

        match trimmed.find([',', ';']) {
            Some(idx) => {
                let first = parse_address(&trimmed[..idx]).ok_or_else(invalid)?;
                let second = parse_address(&trimmed[idx + 1..]).ok_or_else(invalid)?;
                if trimmed[idx..].starts_with(';') {
                    Ok(AddressRange::Anchored(first, second))
                } else {
                    Ok(AddressRange::Pair(first, second))
                }
            }
            None => parse_address(trimmed)
                .map(AddressRange::Single)
                .ok_or_else(invalid),
        }
    }

    /// 範囲をバッファに照らして解決
    ///
    /// 空バッファへの参照はアドレスエラー、範囲外は範囲エラー
    pub fn resolve(&self, buffer: &LineBuffer, token: &str) -> Result<LineRange> {
        if buffer.is_empty() {
            return Err(BufferError::Address { token: token.to_string() });
        }

        let (start, end) = match self {
            AddressRange::Default => (Some(buffer.current_line_number()), Some(buffer.current_line_number())),
            AddressRange::Single(address) => {
                let line = address.evaluate(buffer);
                (line, line)
            }
            AddressRange::Pair(first, second) => (first.evaluate(buffer), second.evaluate(buffer)),
            AddressRange::Anchored(first, second) => {
                let start = first.evaluate(buffer);
                (start, start.and_then(|line| second.evaluate_from(line, buffer)))
            }
            AddressRange::Whole => (Some(1), Some(buffer.size())),
            AddressRange::FromCurrent => (Some(buffer.current_line_number()), Some(buffer.size())),
        };

        let start = start.unwrap_or(0);
        let end = end.unwrap_or(0);
        if start < 1 || start > end || end > buffer.size() {
            return Err(BufferError::Range { start, end, size: buffer.size() });
        }
        Ok(LineRange::new(start, end))
    }

    /// 挿入位置として解決（0 = 先頭の前、空バッファでも可）
    pub fn resolve_position(&self, buffer: &LineBuffer, token: &str) -> Result<usize> {
        let position = match self {
            AddressRange::Default => Some(buffer.current_line_number()),
            AddressRange::Single(address) => address.evaluate(buffer),
            AddressRange::Pair(_, second) => second.evaluate(buffer),
            AddressRange::Anchored(first, second) => first
                .evaluate(buffer)
                .and_then(|line| second.evaluate_from(line, buffer)),
            AddressRange::Whole | AddressRange::FromCurrent => Some(buffer.size()),
        };

        match position {
            Some(line) if line <= buffer.size() => Ok(line),
            Some(line) => Err(BufferError::Range { start: line, end: line, size: buffer.size() }),
            None => Err(BufferError::Address { token: token.to_string() }),
        }
    }
}

/// `base? (('+'|'-') digits?)*`
fn parse_address(text: &str) -> Option<Address> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut chars = text.char_indices().peekable();
    let base = match chars.peek() {
        Some((_, '.')) => {
            chars.next();
            Base::Current
        }
        Some((_, '$')) => {
            chars.next();
            Base::Last
        }
        Some((_, c)) if c.is_ascii_digit() => {
            let mut end = text.len();
            while let Some(&(idx, c)) = chars.peek() {
                if !c.is_ascii_digit() {
                    end = idx;
                    break;
                }
                chars.next();
            }
            Base::Line(text[..end].parse().ok()?)
        }
        Some((_, '+')) | Some((_, '-')) => Base::Current,
        _ => return None,
    };

    let mut offset: isize = 0;
    while let Some((_, sign)) = chars.next() {
        let direction = match sign {
            '+' => 1,
            '-' => -1,
            _ => return None,
        };

        let mut digits = String::new();
        while let Some(&(_, c)) = chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            chars.next();
        }

        let amount: isize = if digits.is_empty() { 1 } else { digits.parse().ok()? };
        offset = offset.checked_add(direction * amount)?;
    }

    Some(Address { base, offset })
}
