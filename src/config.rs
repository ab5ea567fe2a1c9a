//! 設定管理
//!
//! 既定値 → 設定ファイル（JSON）→ コマンドライン引数 の順に解決する

use crate::editor::DEFAULT_UNDO_DEPTH;
use crate::error::ConfigError;
use crate::logging::{LogLevel, Logger};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// デバッグログを有効にする環境変数
pub const DEBUG_ENV: &str = "LINEED_DEBUG";

/// エディタ設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// 取り消し履歴の深さ（1以上）
    pub undo_depth: usize,
    /// コマンド入力前に表示するプロンプト
    pub prompt: Option<String>,
    /// `?` と一緒にエラーの説明を表示するか
    pub verbose_errors: bool,
    pub log_level: LogLevel,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            undo_depth: DEFAULT_UNDO_DEPTH,
            prompt: None,
            verbose_errors: false,
            log_level: LogLevel::default(),
            log_file: None,
        }
    }
}

impl Config {
    /// 既定の設定ファイルの場所（`$XDG_CONFIG_HOME/lineed/config.json`）
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lineed").join("config.json"))
    }

    /// 既定の場所から読み込み（ファイルがなければ既定値）
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// 指定ファイルから読み込み
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let invalid = |message: String| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message,
        };

        let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let config: Config = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        config.validate()
    }

    /// 値の検証
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.undo_depth == 0 {
            return Err(ConfigError::InvalidValue {
                key: "undo_depth".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(self)
    }

    /// コマンドライン引数で上書き
    pub fn merged_with(mut self, options: &CliOptions) -> Result<Self, ConfigError> {
        if let Some(depth) = options.undo_depth {
            self.undo_depth = depth;
        }
        if let Some(prompt) = &options.prompt {
            self.prompt = Some(prompt.clone());
        }
        if options.verbose {
            self.verbose_errors = true;
        }
        if let Some(level) = options.log_level {
            self.log_level = level;
        }
        if options.debug {
            self.log_level = LogLevel::Debug;
        }
        if let Some(path) = &options.log_file {
            self.log_file = Some(path.clone());
        }
        self.validate()
    }

    /// 設定に従ったロガーを作成
    pub fn logger(&self) -> Logger {
        let logger = Logger::new(self.log_level);
        match &self.log_file {
            Some(path) => logger.with_file_output(path),
            None => logger,
        }
    }
}

/// コマンドライン引数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// 起動時に読み込むファイル
    pub file: Option<String>,
    pub prompt: Option<String>,
    pub undo_depth: Option<usize>,
    pub verbose: bool,
    pub debug: bool,
    pub log_level: Option<LogLevel>,
    pub log_file: Option<PathBuf>,
    pub show_help: bool,
}

impl CliOptions {
    /// 引数を解析（プログラム名を除いたもの）
    pub fn parse<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self {
            debug: std::env::var_os(DEBUG_ENV).is_some(),
            ..Self::default()
        };
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-p" | "--prompt" => options.prompt = Some(required_value(&arg, iter.next())?),
                "--undo-depth" => {
                    let value = required_value(&arg, iter.next())?;
                    let depth = value.parse().map_err(|_| ConfigError::InvalidValue {
                        key: "undo_depth".to_string(),
                        value: value.clone(),
                    })?;
                    options.undo_depth = Some(depth);
                }
                "-v" | "--verbose" => options.verbose = true,
                "--debug" => options.debug = true,
                "--log-level" => {
                    options.log_level = Some(required_value(&arg, iter.next())?.parse::<LogLevel>()?);
                }
                "--log-file" => {
                    options.log_file = Some(PathBuf::from(required_value(&arg, iter.next())?));
                }
                "-h" | "--help" => options.show_help = true,
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(ConfigError::UnknownFlag { flag: arg.clone() });
                }
                _ => options.file = Some(arg),
            }
        }

        Ok(options)
    }

    /// 使い方
    pub fn usage() -> &'static str {
        concat!(
            "Usage: lineed [OPTIONS] [FILE]\n",
            "\n",
            "Options:\n",
            "  -p, --prompt PROMPT  Show PROMPT before each command\n",
            "      --undo-depth N   Number of changes that can be undone (default 1)\n",
            "  -v, --verbose        Explain errors after each '?'\n",
            "      --debug          Enable debug logging (also LINEED_DEBUG)\n",
            "      --log-level LVL  debug, info, warning, error or fatal\n",
            "      --log-file PATH  Append log output to PATH\n",
            "  -h, --help           Show this help message\n",
        )
    }
}

fn required_value(flag: &str, value: Option<String>) -> Result<String, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingValue {
        flag: flag.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.undo_depth, 1);
    }

    #[test]
    fn test_reads_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "undo_depth": 5, "prompt": "*", "log_level": "info" }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.undo_depth, 5);
        assert_eq!(config.prompt.as_deref(), Some("*"));
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(!config.verbose_errors);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ undo_depth: ").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::InvalidFile { .. })));

        std::fs::write(&path, r#"{ "undo_depth": 0 }"#).unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_parses_command_line() {
        let options = CliOptions::parse(args(&["-p", "*", "--undo-depth", "3", "-v", "notes.txt"])).unwrap();
        assert_eq!(options.prompt.as_deref(), Some("*"));
        assert_eq!(options.undo_depth, Some(3));
        assert!(options.verbose);
        assert_eq!(options.file.as_deref(), Some("notes.txt"));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(matches!(
            CliOptions::parse(args(&["--undo-depth"])),
            Err(ConfigError::MissingValue { .. })
        ));
        assert!(matches!(
            CliOptions::parse(args(&["--undo-depth", "many"])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            CliOptions::parse(args(&["--log-level", "loud"])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            CliOptions::parse(args(&["--frobnicate"])),
            Err(ConfigError::UnknownFlag { .. })
        ));
    }

    #[test]
    fn test_command_line_overrides_file() {
        let options = CliOptions {
            undo_depth: Some(4),
            prompt: Some(":".to_string()),
            verbose: true,
            debug: true,
            ..CliOptions::default()
        };
        let config = Config::default().merged_with(&options).unwrap();
        assert_eq!(config.undo_depth, 4);
        assert_eq!(config.prompt.as_deref(), Some(":"));
        assert!(config.verbose_errors);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.logger().level(), LogLevel::Debug);

        let quiet = CliOptions {
            log_level: Some(LogLevel::Error),
            ..CliOptions::default()
        };
        assert_eq!(Config::default().merged_with(&quiet).unwrap().log_level, LogLevel::Error);

        let zero = CliOptions {
            undo_depth: Some(0),
            ..CliOptions::default()
        };
        assert!(Config::default().merged_with(&zero).is_err());
    }
}
