//! ファイル操作モジュール
//!
//! ファイルからの行読み込みとファイル名展開。書き込みは行わない（バッファは読み取り専用）

pub mod path;
pub mod source;

// 公開API
pub use path::expand_path;
pub use source::{split_lines, FileLineSource, LineSource, VecLineSource};
