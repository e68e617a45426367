mod platform;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use uploader_core::binder::ControlBinder;
use uploader_core::StatusView;
use uploader_logging::uploader_info;

use platform::app::{initialize, read_files};
use platform::cli::Cli;
use platform::config;
use platform::logging;
use platform::page::TerminalPage;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::initialize(cli.log.into());

    let mut config = config::load(cli.config_path())?;
    cli.apply_overrides(&mut config);
    if cli.print_config {
        println!("{}", config::to_ron(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    let files = read_files(&cli.files)?;
    let page = TerminalPage::stdout(&config.page);
    let mut app = initialize(&config, page)?;

    let view = app.run_once(files);
    if ControlBinder::shows_download_link(&view) {
        wait_for_enter()?;
        app.activate_download_link();
    }

    let succeeded = matches!(app.view().status, StatusView::DownloadReady { .. });
    app.shutdown();
    uploader_info!("Done, success={}", succeeded);
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn wait_for_enter() -> Result<()> {
    print!("Press Enter to download... ");
    io::stdout().flush().context("failed to flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(())
}
