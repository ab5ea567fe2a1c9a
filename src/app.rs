//! メインアプリケーション構造体
//!
//! コマンド行を読み、`LineEditor` を操作して結果を書き出す対話ループ。
//! 失敗は `?` として表示してループを継続し、`q` または入力終端でのみ終了する

use crate::config::Config;
use crate::editor::LineEditor;
use crate::error::{ErrorDisplay, InputError, LineedError, Result};
use crate::file::{expand_path, FileLineSource};
use crate::input::Command;
use std::borrow::Cow;
use std::io::{self, BufRead, Write};

/// コマンド実行の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// 出力する行
    pub lines: Vec<String>,
    /// アプリケーションを終了するか
    pub should_quit: bool,
}

impl CommandOutput {
    fn empty() -> Self {
        Self::default()
    }

    fn lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            should_quit: false,
        }
    }

    fn quit() -> Self {
        Self {
            lines: Vec::new(),
            should_quit: true,
        }
    }
}

/// メインアプリケーション構造体
///
/// エディタエンジンとセッション状態（ファイル名、直前のエラー）を所有する
pub struct App {
    editor: LineEditor,
    /// 現在のファイル名
    file_name: Option<String>,
    prompt: Option<String>,
    verbose_errors: bool,
    /// `h` で説明する直前のエラー
    last_error: Option<LineedError>,
    running: bool,
}

impl App {
    /// 既定設定で作成
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// 設定を指定して作成
    pub fn with_config(config: &Config) -> Self {
        Self {
            editor: LineEditor::with_undo_depth(config.undo_depth),
            file_name: None,
            prompt: config.prompt.clone(),
            verbose_errors: config.verbose_errors,
            last_error: None,
            running: true,
        }
    }

    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn last_error(&self) -> Option<&LineedError> {
        self.last_error.as_ref()
    }

    /// アプリケーションが実行中かどうかを確認
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// 起動時のファイル読み込み
    ///
    /// 読み込み自体は取り消し対象にしない
    pub fn open_file(&mut self, name: &str) -> Result<()> {
        self.file_name = Some(name.to_string());
        let path = expand_path(name)?;
        self.editor.read_buffer(&mut FileLineSource::new(path))?;
        self.editor.discard_last_command();
        log::info!("opened {} ({} lines)", name, self.editor.size());
        Ok(())
    }

    /// メインループを実行
    ///
    /// 不正な UTF-8 の入力行は置換文字に変換して処理を続ける
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        while self.running {
            if let Some(prompt) = &self.prompt {
                write!(output, "{}", prompt)?;
                output.flush()?;
            }

            let Some(line) = read_line(&mut input)? else {
                break;
            };

            let command = Command::parse(&line);
            let text = match &command {
                Command::Append { address } if self.accepts_text(address) => {
                    gather_lines(&mut input)?
                }
                _ => Vec::new(),
            };

            let result = self.execute(command, text);
            for printed in &result.lines {
                writeln!(output, "{}", printed)?;
            }
        }

        output.flush()
    }

    /// 追加モードに入れるか（アドレスが挿入位置として有効か）
    fn accepts_text(&self, address: &str) -> bool {
        address.is_empty() || self.editor.get_insert_position(address).is_ok()
    }

    /// 解析済みコマンドを実行（`text` は追加モードで集めた行）
    pub fn execute(&mut self, command: Command, text: Vec<String>) -> CommandOutput {
        let mutating = command.is_mutating();
        log::debug!("executing {:?}", command);

        match self.dispatch(command, text) {
            Ok(output) => {
                if output.should_quit {
                    self.running = false;
                }
                if mutating {
                    log::debug!(
                        "buffer now {} lines, current line {}",
                        self.editor.size(),
                        self.editor.current_line_number()
                    );
                }
                output
            }
            Err(error) => {
                log::debug!("command failed: {}", error);
                let lines = ErrorDisplay::new(&error).diagnostic_lines(self.verbose_errors);
                self.last_error = Some(error);
                CommandOutput::lines(lines)
            }
        }
    }

    fn dispatch(&mut self, command: Command, text: Vec<String>) -> Result<CommandOutput> {
        match command {
            Command::Edit(name) => {
                let name = self.file_argument(name)?;
                self.file_name = Some(name.clone());
                let path = expand_path(&name)?;
                self.editor.read_buffer(&mut FileLineSource::new(path))?;
                Ok(CommandOutput::empty())
            }
            Command::FileName => Ok(CommandOutput::lines(vec![self
                .file_name
                .clone()
                .unwrap_or_else(|| "(no file)".to_string())])),
            Command::Read(name) => {
                let name = self.file_argument(name)?;
                let path = expand_path(&name)?;
                self.editor.append_from_source(&mut FileLineSource::new(path))?;
                Ok(CommandOutput::empty())
            }
            Command::Write => Err(InputError::ReadOnly.into()),
            Command::Append { address } => {
                if address.is_empty() {
                    self.editor.add_lines(text)?;
                } else {
                    let position = self.editor.get_insert_position(&address)?;
                    self.editor.add_lines_after(position, text)?;
                }
                Ok(CommandOutput::empty())
            }
            Command::Delete { range } => {
                let range = self.editor.get_line_range(&range)?;
                self.editor.delete_lines(range.start, range.end)?;
                Ok(CommandOutput::empty())
            }
            Command::Print { range } => self.print_range(&range),
            Command::Goto { address } => {
                let range = self.editor.get_line_range(&address)?;
                self.editor.go_to_line(range.end)?;
                self.print_range(".")
            }
            Command::PrintCurrent => self.print_range("."),
            Command::LineCount => Ok(CommandOutput::lines(vec![format!(
                "{} of {}",
                self.editor.current_line_number(),
                self.editor.size()
            )])),
            Command::Undo => {
                self.editor.undo()?;
                Ok(CommandOutput::empty())
            }
            Command::Help => Ok(CommandOutput::lines(
                self.last_error.iter().map(|e| e.to_string()).collect(),
            )),
            Command::ToggleVerbose => {
                self.verbose_errors = !self.verbose_errors;
                if self.verbose_errors {
                    return self.dispatch(Command::Help, Vec::new());
                }
                Ok(CommandOutput::empty())
            }
            Command::Quit => Ok(CommandOutput::quit()),
            Command::Unknown(command) => Err(InputError::UnknownCommand { command }.into()),
        }
    }

    fn print_range(&self, token: &str) -> Result<CommandOutput> {
        let range = self.editor.get_line_range(token)?;
        let lines = self.editor.print_lines(range.start, range.end)?;
        Ok(CommandOutput::lines(lines.to_vec()))
    }

    /// ファイル名引数（省略時は現在のファイル名）
    fn file_argument(&self, name: Option<String>) -> Result<String> {
        name.or_else(|| self.file_name.clone())
            .ok_or_else(|| InputError::MissingFileName.into())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// 1行読み込む（改行は除く、入力終端なら `None`）
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut raw = Vec::new();
    if input.read_until(b'\n', &mut raw)? == 0 {
        return Ok(None);
    }
    if raw.last() == Some(&b'\n') {
        raw.pop();
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
    }

    let line = match String::from_utf8_lossy(&raw) {
        Cow::Borrowed(line) => line.to_string(),
        Cow::Owned(line) => {
            log::warn!("input line is not valid UTF-8, replaced invalid bytes");
            line
        }
    };
    Ok(Some(line))
}

/// 追加モード：単独の `.` 行または入力終端まで行を集める
fn gather_lines<R: BufRead>(input: &mut R) -> io::Result<Vec<String>> {
    let mut gathered = Vec::new();
    while let Some(line) = read_line(input)? {
        if line == "." {
            break;
        }
        gathered.push(line);
    }
    Ok(gathered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(app: &mut App, script: &str) -> String {
        let mut output = Vec::new();
        app.run(script.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_append_and_print() {
        let mut app = App::new();
        let output = run_script(&mut app, "a\nhello\nworld\n.\n,p\n=\n");
        assert_eq!(output, "hello\nworld\n2 of 2\n");
    }

    #[test]
    fn test_unknown_command_prints_question_mark() {
        let mut app = App::new();
        assert_eq!(run_script(&mut app, "zap\n"), "?\n");
        assert!(matches!(app.last_error(), Some(LineedError::Input(_))));
    }

    #[test]
    fn test_quit_stops_loop() {
        let mut app = App::new();
        let output = run_script(&mut app, "q\n=\n");
        assert_eq!(output, "");
        assert!(!app.is_running());
    }

    #[test]
    fn test_append_without_terminator_takes_rest_of_input() {
        let mut app = App::new();
        run_script(&mut app, "a\none\ntwo");
        assert_eq!(app.editor().buffer().lines(), &["one", "two"]);
    }

    #[test]
    fn test_invalid_utf8_line_does_not_end_session() {
        let mut app = App::new();
        let mut output = Vec::new();
        app.run(&b"a\nhello\n.\n\xff\xfe\n=\n"[..], &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "?\n1 of 1\n");
        assert!(matches!(app.last_error(), Some(LineedError::Input(_))));
    }

    #[test]
    fn test_invalid_utf8_text_is_appended_lossily() {
        let mut app = App::new();
        app.run(&b"a\nab\xffc\r\n.\n"[..], Vec::new()).unwrap();
        assert_eq!(app.editor().buffer().lines(), &["ab\u{FFFD}c"]);
    }

    #[test]
    fn test_file_name_without_file() {
        let mut app = App::new();
        assert_eq!(run_script(&mut app, "f\ne\n"), "(no file)\n?no filename\n");
    }

    #[test]
    fn test_prompt_is_written_before_each_command() {
        let config = Config {
            prompt: Some("*".to_string()),
            ..Config::default()
        };
        let mut app = App::with_config(&config);
        assert_eq!(run_script(&mut app, "=\n"), "*0 of 0\n*");
    }
}
