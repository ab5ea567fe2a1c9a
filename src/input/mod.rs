//! 入力処理モジュール
//!
//! ed 形式のコマンド行の解析を提供

pub mod parser;

// 公開API
pub use parser::Command;
