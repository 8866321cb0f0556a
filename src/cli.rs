use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

#[derive(Parser)]
#[command(name = "museum-walk")]
#[command(about = "Walk through a virtual museum and inspect its exhibits")]
pub struct Args {
    /// Scene description to load
    #[arg(short, long, default_value = "museum.toml")]
    pub scene: PathBuf,

    /// Logging level, TRACE in debug builds and INFO otherwise when omitted
    #[arg(long)]
    pub log_level: Option<LogLevel>,

    /// Window width in pixels
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Window height in pixels
    #[arg(long, default_value = "720")]
    pub height: u32,

    /// Open a borderless fullscreen window
    #[arg(long)]
    pub fullscreen: bool,
}
