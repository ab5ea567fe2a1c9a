//! 行ソース
//!
//! バッファへ一括読み込みする行を供給する。コアはファイルハンドルを持たず、行の列だけを受け取る

use crate::error::{source::Result, SourceError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// 行を供給するもの
pub trait LineSource {
    /// すべての行を読み込む（各要素は改行を含まない1論理行）
    fn read_lines(&mut self) -> Result<Vec<String>>;

    /// ログ・診断用の説明
    fn describe(&self) -> String;
}

/// メモリ上の行ソース
#[derive(Debug, Clone, Default)]
pub struct VecLineSource {
    lines: Vec<String>,
}

impl VecLineSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for VecLineSource {
    fn read_lines(&mut self) -> Result<Vec<String>> {
        Ok(self.lines.clone())
    }

    fn describe(&self) -> String {
        format!("<{} in-memory lines>", self.lines.len())
    }
}

/// ファイルからの行ソース
#[derive(Debug, Clone)]
pub struct FileLineSource {
    path: PathBuf,
}

impl FileLineSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn path_string(&self) -> String {
        self.path.display().to_string()
    }
}

impl LineSource for FileLineSource {
    fn read_lines(&mut self) -> Result<Vec<String>> {
        if self.path.is_dir() {
            return Err(SourceError::InvalidPath {
                path: format!("Not a regular file: {}", self.path.display()),
            });
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound {
                path: self.path_string(),
            },
            ErrorKind::PermissionDenied => SourceError::PermissionDenied {
                path: self.path_string(),
            },
            ErrorKind::InvalidData => SourceError::Io {
                message: format!("{} is not valid UTF-8", self.path.display()),
            },
            _ => SourceError::from(e),
        })?;

        let lines = split_lines(&content);
        log::debug!("read {} lines from {}", lines.len(), self.path.display());
        Ok(lines)
    }

    fn describe(&self) -> String {
        self.path_string()
    }
}

/// テキストを論理行に分割
///
/// BOM を除去し、CRLF / CR を LF とみなす。末尾の改行は空行を生まない
pub fn split_lines(content: &str) -> Vec<String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    if content.contains('\r') {
        log::warn!("Non-LF line endings detected, will be normalized");
    }
    for (pos, ch) in content.char_indices() {
        if ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r' {
            log::warn!("Control character found at position {}: {:?}", pos, ch);
        }
    }

    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    normalized.lines().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_handles_line_endings() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\rb\r"), vec!["a", "b"]);
        assert_eq!(split_lines("\u{feff}first\n\nthird"), vec!["first", "", "third"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_reads_file_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "one\ntwo\n").unwrap();

        let mut source = FileLineSource::new(&path);
        assert_eq!(source.read_lines().unwrap(), vec!["one", "two"]);
        assert_eq!(source.describe(), path.display().to_string());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");

        let mut source = FileLineSource::new(&path);
        assert_eq!(
            source.read_lines(),
            Err(SourceError::NotFound {
                path: path.display().to_string()
            })
        );
    }

    #[test]
    fn test_directory_is_invalid_path() {
        let dir = TempDir::new().unwrap();
        let mut source = FileLineSource::new(dir.path());
        assert!(matches!(source.read_lines(), Err(SourceError::InvalidPath { .. })));
    }

    #[test]
    fn test_vec_source_can_be_read_twice() {
        let mut source = VecLineSource::new(["l1", "l2"]);
        assert_eq!(source.read_lines().unwrap(), vec!["l1", "l2"]);
        assert_eq!(source.read_lines().unwrap(), vec!["l1", "l2"]);
    }
}
