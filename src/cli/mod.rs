//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marketd")]
#[command(author, version, about = "Market data aggregation and quote streaming daemon")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the streaming gateway
    Serve,
    /// Score a symbol's indicator consensus once and print it
    Score(ScoreArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct ScoreArgs {
    /// Symbol to score
    #[arg(short, long)]
    pub symbol: String,

    /// Asset class (stock, etf, crypto, forex)
    #[arg(short, long, default_value = "stock")]
    pub asset_class: String,

    /// Bar interval
    #[arg(short, long, default_value = "1d")]
    pub interval: String,

    /// Number of bars to fetch
    #[arg(long, default_value = "250")]
    pub limit: usize,

    /// Two-letter country code for exchange suffixing
    #[arg(long)]
    pub country: Option<String>,
}
