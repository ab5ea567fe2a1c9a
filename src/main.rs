use anyhow::Context;
use lineed::config::{CliOptions, Config};
use lineed::error::ErrorDisplay;
use lineed::{error, logging, App};
use std::io;

fn main() -> anyhow::Result<()> {
    error::setup_panic_handler();

    let options = CliOptions::parse(std::env::args().skip(1))?;
    if options.show_help {
        print!("{}", CliOptions::usage());
        return Ok(());
    }

    let config = load_config(&options).context("failed to load configuration")?;
    logging::init(config.logger()).context("failed to initialize logging")?;

    let mut app = App::with_config(&config);
    if let Some(file) = &options.file {
        if let Err(err) = app.open_file(file) {
            log::warn!("could not open {}: {}", file, err);
            for line in ErrorDisplay::new(&err).diagnostic_lines(config.verbose_errors) {
                eprintln!("{}", line);
            }
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    app.run(stdin.lock(), stdout.lock())
        .context("I/O error while reading commands")?;

    Ok(())
}

/// 設定ファイルを読み込み、コマンドライン引数で上書きする
fn load_config(options: &CliOptions) -> lineed::Result<Config> {
    Ok(Config::load()?.merged_with(options)?)
}
