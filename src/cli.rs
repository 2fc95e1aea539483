use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use simplelog::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "jotter", version, about = "A tiny list of notes for your terminal")]
pub struct Cli {
    /// Keymap file (defaults to <config dir>/jotter/keymap.toml when present)
    #[arg(long)]
    pub keymap: Option<PathBuf>,

    /// Number of placeholder notes to start with
    #[arg(long, default_value_t = 4)]
    pub seed: usize,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> LevelFilter {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
