//! lineed - ed 形式の最小限の行エディタ
//!
//! すべての変更操作を可逆なコマンドとして記録し、直前の変更を取り消せる

// コアモジュール
pub mod app;
pub mod config;
pub mod error;
pub mod logging;

// データ層
pub mod buffer;
pub mod file;

// 編集層
pub mod editor;

// 入力層
pub mod input;

// 公開API
pub use app::App;
pub use buffer::{LineBuffer, LineRange};
pub use editor::LineEditor;
pub use error::{LineedError, Result};
