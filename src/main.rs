mod app;
mod cli;
mod config;
mod keymap;
mod models;
mod store;
mod ui;

use std::{fs::File, io, path::Path};

use clap::Parser;
use color_eyre::eyre::WrapErr;
use crossterm::style::Stylize;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use crate::{app::App, cli::Cli, store::NoteStore};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path, cli.log_level.into())?;
    }
    log::info!("jotter starting with {} notes", cli.seed);

    let keymap = config::load_keymap(cli.keymap.as_deref()).wrap_err("failed to load keymap")?;
    let mut app = App::new(NoteStore::seeded(cli.seed), keymap);

    if let Err(err) = run_terminal(&mut app) {
        return Err(exit_report(err));
    }

    log::info!("jotter exiting");
    Ok(())
}

/// Sets up the terminal, runs the app and restores the terminal. Setup
/// failures come back as errors instead of panicking.
fn run_terminal(app: &mut App) -> io::Result<()> {
    let mut terminal = match ratatui::try_init() {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = ratatui::try_restore();
            return Err(err);
        }
    };
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}

fn exit_report(err: io::Error) -> color_eyre::Report {
    log::error!("terminal failure: {err}");
    eprintln!(
        "\n{}\n",
        "  Alas, something has gone amuck!  "
            .bold()
            .red()
            .on_dark_grey()
    );
    color_eyre::Report::new(err).wrap_err("terminal failure")
}

fn init_logging(path: &Path, level: LevelFilter) -> color_eyre::Result<()> {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    WriteLogger::init(level, log_config, file).wrap_err("failed to install logger")?;
    Ok(())
}
