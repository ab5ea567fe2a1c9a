//! エラーハンドリングシステム
//!
//! lineed 全体で使用される統一されたエラー型とユーティリティを定義
//! バッファ操作のエラーはすべて非致命的：状態は呼び出し前のまま残り、セッションが `?` として表示する

use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineedError {
    /// バッファ操作エラー
    #[error(transparent)]
    Buffer(#[from] BufferError),

    /// 行ソース（ファイル読み込み）エラー
    #[error(transparent)]
    Source(#[from] SourceError),

    /// 入力処理エラー
    #[error(transparent)]
    Input(#[from] InputError),

    /// 設定エラー
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// バッファ操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// 行番号が `[1, size]` の外、または start > end
    #[error("line range {start},{end} is invalid for a buffer of {size} lines")]
    Range { start: usize, end: usize, size: usize },

    /// 解決できないアドレス
    #[error("invalid address: {token:?}")]
    Address { token: String },

    #[error("nothing to undo")]
    NothingToUndo,
}

/// 行ソース固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("cannot open {path}: no such file")]
    NotFound { path: String },

    #[error("cannot open {path}: permission denied")]
    PermissionDenied { path: String },

    #[error("invalid path: {path}")]
    InvalidPath { path: String },

    #[error("read error: {message}")]
    Io { message: String },
}

/// 入力処理固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command: {command:?}")]
    UnknownCommand { command: String },

    #[error("no filename")]
    MissingFileName,

    #[error("file is read-only")]
    ReadOnly,
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration file {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("missing value for {flag}")]
    MissingValue { flag: String },

    #[error("unknown flag: {flag}")]
    UnknownFlag { flag: String },
}

/// エラー表示情報
///
/// ed の慣習どおり通常は `?` のみを表示し、詳細は `h` コマンドまたは冗長モードで示す
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDisplay {
    /// 詳細メッセージ
    pub message: String,
    /// `?` の直後に常に付ける短いヒント
    pub hint: Option<&'static str>,
}

impl ErrorDisplay {
    pub fn new(error: &LineedError) -> Self {
        let hint = match error {
            LineedError::Input(InputError::ReadOnly) => Some("file is read-only"),
            LineedError::Input(InputError::MissingFileName) => Some("no filename"),
            _ => None,
        };

        Self {
            message: error.to_string(),
            hint,
        }
    }

    /// 出力する診断行を生成
    pub fn diagnostic_lines(&self, verbose: bool) -> Vec<String> {
        let mut lines = vec![format!("?{}", self.hint.unwrap_or(""))];
        if verbose && self.hint.is_none() {
            lines.push(self.message.clone());
        }
        lines
    }
}

/// パニックハンドラの設定
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        log::error!("panic at {}: {}", location, message);
        eprintln!("PANIC at {}: {}", location, message);
        eprintln!("Stack trace: {}", std::backtrace::Backtrace::capture());

        std::process::exit(1);
    }));
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, LineedError>;

/// 各モジュール固有のResult型
pub mod buffer {
    pub type Result<T> = std::result::Result<T, super::BufferError>;
}

pub mod source {
    pub type Result<T> = std::result::Result<T, super::SourceError>;
}

impl From<std::io::Error> for SourceError {
    fn from(error: std::io::Error) -> Self {
        SourceError::Io {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_errors_render_as_bare_question_mark() {
        let error = LineedError::from(BufferError::Range { start: 4, end: 4, size: 2 });
        let display = ErrorDisplay::new(&error);

        assert_eq!(display.diagnostic_lines(false), vec!["?".to_string()]);
        assert_eq!(
            display.diagnostic_lines(true),
            vec!["?".to_string(), "line range 4,4 is invalid for a buffer of 2 lines".to_string()]
        );
    }

    #[test]
    fn test_read_only_always_carries_hint() {
        let display = ErrorDisplay::new(&InputError::ReadOnly.into());
        assert_eq!(display.diagnostic_lines(false), vec!["?file is read-only".to_string()]);
        assert_eq!(display.diagnostic_lines(true), vec!["?file is read-only".to_string()]);
    }

    #[test]
    fn test_nothing_to_undo_message() {
        let display = ErrorDisplay::new(&BufferError::NothingToUndo.into());
        assert_eq!(display.message, "nothing to undo");
        assert_eq!(display.hint, None);
    }

    #[test]
    fn test_config_errors_are_explained() {
        let error = LineedError::from(ConfigError::UnknownFlag { flag: "--frobnicate".to_string() });
        assert_eq!(
            ErrorDisplay::new(&error).diagnostic_lines(true),
            vec!["?".to_string(), "unknown flag: --frobnicate".to_string()]
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let source_error: SourceError = io_error.into();

        match source_error {
            SourceError::Io { message } => assert!(message.contains("disk on fire")),
            _ => panic!("Expected Io error"),
        }
    }
}
