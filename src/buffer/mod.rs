//! バッファ管理モジュール
//!
//! 行単位のテキストデータと現在行の管理、アドレス解決を提供

pub mod address;
pub mod line_buffer;

// 公開API
pub use address::{Address, AddressRange, Base};
pub use line_buffer::{DeletedLines, LineBuffer, LineRange, Snapshot};
pub use crate::error::BufferError;
