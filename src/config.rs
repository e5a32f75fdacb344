//! Runtime configuration, resolved once at startup.
//!
//! Sources, strongest first:
//! - command line flags ([`CliParser`])
//! - the process environment, after a `.env` file has been loaded into it
//! - built-in defaults

use std::env;
use std::path::PathBuf;

use log::LevelFilter;

use crate::cli::parsers::{CliParser, LogLevel};

/// Environment variable naming the directory that holds the database files.
pub const DATA_DIR_ENV: &str = "PRIMITIVE_DB_DIR";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub assume_yes: bool,
    pub log_level: LevelFilter,
    pub splash: bool,
}

impl Config {
    pub fn load(cli: CliParser) -> Config {
        //! Load `.env` (when present) and resolve the final configuration.

        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("loaded environment from {}", path.display());
        }

        let env_data_dir = env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        Config::resolve(cli, env_data_dir)
    }

    pub fn resolve(cli: CliParser, env_data_dir: Option<PathBuf>) -> Config {
        let data_dir = cli
            .data_dir
            .or(env_data_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Config {
            data_dir,
            assume_yes: cli.yes,
            log_level: cli.log_level.into(),
            splash: !cli.no_splash,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("."),
            assume_yes: false,
            log_level: LevelFilter::Warn,
            splash: true,
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
