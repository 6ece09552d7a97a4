use clap::{Parser, Subcommand, ValueEnum};
use snip_generator::DEFAULT_CODE_LENGTH;
use snip_shortener::DEFAULT_MAX_ATTEMPTS;
use snip_storage::DEFAULT_DATABASE_URL;
use std::fmt::{Display, Formatter};

pub const DATABASE_URL_ENV: &str = "SNIP_DATABASE_URL";
pub const BASE_URL_ENV: &str = "SNIP_BASE_URL";
pub const CODE_LENGTH_ENV: &str = "SNIP_CODE_LENGTH";
pub const MAX_ATTEMPTS_ENV: &str = "SNIP_MAX_ATTEMPTS";
pub const LOG_FORMAT_ENV: &str = "SNIP_LOG_FORMAT";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Text => write!(f, "text"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "snip", about = "Shorten URLs and resolve short codes")]
pub struct CLI {
    /// SQLite database URL; `sqlite::memory:` keeps everything in memory.
    #[arg(long, global = true, env = DATABASE_URL_ENV, default_value = DEFAULT_DATABASE_URL)]
    pub database: String,

    /// Prefix for printed short links.
    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        global = true,
        env = CODE_LENGTH_ENV,
        default_value_t = DEFAULT_CODE_LENGTH,
    )]
    pub code_length: usize,

    #[arg(
        long,
        global = true,
        env = MAX_ATTEMPTS_ENV,
        default_value_t = DEFAULT_MAX_ATTEMPTS,
    )]
    pub max_attempts: u32,

    #[arg(
        long,
        global = true,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shorten a URL, reusing the existing code if it was shortened before.
    Shorten { url: String },
    /// Print the original URL behind a short code.
    Resolve { code: String },
    /// List stored mappings, newest first.
    History {
        /// Print one JSON object per line instead of a table.
        #[arg(long)]
        json: bool,
    },
}
