//! エディタモジュール
//!
//! 可逆な編集コマンド、取り消し履歴、それらを束ねるバッファエンジン

pub mod command;
pub mod engine;
pub mod history;

// 公開API
pub use command::{AppliedCommand, EditCommand};
pub use engine::LineEditor;
pub use history::{UndoHistory, DEFAULT_UNDO_DEPTH};
pub use crate::error::{BufferError, Result};
