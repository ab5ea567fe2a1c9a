//! パス処理ユーティリティ
//!
//! コマンド引数のファイル名を展開する（`~` と `$VAR`）

use crate::error::{source::Result, SourceError};
use std::path::PathBuf;

/// ファイル名を展開してパスに変換
pub fn expand_path(name: &str) -> Result<PathBuf> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SourceError::InvalidPath {
            path: String::new(),
        });
    }

    match shellexpand::full(name) {
        Ok(expanded) => Ok(PathBuf::from(expanded.as_ref())),
        Err(e) => Err(SourceError::InvalidPath {
            path: format!("{}: {}", name, e),
        }),
    }
}
