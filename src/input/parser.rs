//! コマンドパーサー
//!
//! 入力行を `Command` に変換する。アドレス部分はトークンのまま保持し、
//! 解決はエンジン（`LineEditor::get_line_range`）に任せる

use regex::Regex;
use std::sync::OnceLock;

/// コマンドの種類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // ファイル操作
    /// `e [file]`
    Edit(Option<String>),
    /// `f`
    FileName,
    /// `r [file]`
    Read(Option<String>),
    /// `w`（常に拒否）
    Write,

    // バッファ操作
    /// `[addr]a`
    Append { address: String },
    /// `[range]d`
    Delete { range: String },
    /// `[range]p`
    Print { range: String },
    /// 数字やアドレスのみの行
    Goto { address: String },
    /// `.`
    PrintCurrent,
    /// `=`
    LineCount,
    /// `u`
    Undo,

    // その他
    /// `h`
    Help,
    /// `H`
    ToggleVerbose,
    /// `q`
    Quit,
    Unknown(String),
}

fn addressed_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<addr>[0-9.$,;+\-]*)(?P<cmd>[adp])$").expect("address pattern is valid")
    })
}

fn file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<cmd>[erw])(?:\s*(?P<file>.*))?$").expect("file pattern is valid")
    })
}

fn goto_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9.$+\-]+$").expect("goto pattern is valid"))
}

impl Command {
    /// 入力行を解析
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);

        match line {
            "." => return Command::PrintCurrent,
            "=" => return Command::LineCount,
            "u" => return Command::Undo,
            "f" => return Command::FileName,
            "h" => return Command::Help,
            "H" => return Command::ToggleVerbose,
            "q" => return Command::Quit,
            _ => {}
        }

        if let Some(caps) = addressed_pattern().captures(line) {
            let token = caps["addr"].to_string();
            return match &caps["cmd"] {
                "a" => Command::Append { address: token },
                "d" => Command::Delete { range: token },
                _ => Command::Print { range: token },
            };
        }

        if goto_pattern().is_match(line) {
            return Command::Goto {
                address: line.to_string(),
            };
        }

        if let Some(caps) = file_pattern().captures(line) {
            let file = caps
                .name("file")
                .map(|m| m.as_str().trim().to_string())
                .filter(|name| !name.is_empty());
            return match &caps["cmd"] {
                "e" => Command::Edit(file),
                "r" => Command::Read(file),
                _ => Command::Write,
            };
        }

        Command::Unknown(line.to_string())
    }

    /// バッファを変更しうるコマンドか
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Edit(_)
                | Command::Read(_)
                | Command::Append { .. }
                | Command::Delete { .. }
                | Command::Goto { .. }
                | Command::Undo
        )
    }
}
