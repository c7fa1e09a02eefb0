//! Run configuration, read from the environment (and `.env` when present).
//!
//! | Variable           | Default                                      |
//! |--------------------|----------------------------------------------|
//! | `WORLD_DB_PATH`    | `world.sqlite3`                              |
//! | `WORLD_CACHE_HOST` | `127.0.0.1`                                  |
//! | `WORLD_CACHE_PORT` | `6379`                                       |
//! | `WORLD_PAGE_SIZE`  | `500`                                        |
//! | `WORLD_BENCH_IDS`  | `3,2545,123,4,189,3458,1189,10,102`          |
//! | `WORLD_LOG_LEVEL`  | `info`                                       |
//! | `WORLD_LOG_FILE`   | unset (stderr only)                          |

use crate::error::{Result, WarmError};
use log::LevelFilter;
use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DB_PATH: &str = "world.sqlite3";
pub const DEFAULT_CACHE_HOST: &str = "127.0.0.1";
pub const DEFAULT_CACHE_PORT: u16 = 6379;
pub const DEFAULT_PAGE_SIZE: usize = 500;
pub const DEFAULT_BENCH_IDS: [i32; 9] = [3, 2545, 123, 4, 189, 3458, 1189, 10, 102];

#[derive(Debug, Clone, PartialEq)]
pub struct WarmerConfig {
    pub db_path: PathBuf,
    pub cache_host: String,
    pub cache_port: u16,
    pub page_size: NonZeroUsize,
    pub bench_ids: Vec<i32>,
    pub log_level: LevelFilter,
    pub log_file: Option<String>,
}

impl Default for WarmerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            cache_host: DEFAULT_CACHE_HOST.to_string(),
            cache_port: DEFAULT_CACHE_PORT,
            page_size: NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
            bench_ids: DEFAULT_BENCH_IDS.to_vec(),
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl WarmerConfig {
    /// Loads `.env` if there is one, then reads the `WORLD_*` variables.
    pub fn from_env() -> Result<Self> {
        dotenv_loaded(dotenvy::dotenv())?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("WORLD_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(host) = lookup("WORLD_CACHE_HOST") {
            config.cache_host = host;
        }
        if let Some(port) = lookup("WORLD_CACHE_PORT") {
            config.cache_port = parse_value("WORLD_CACHE_PORT", &port)?;
        }
        if let Some(size) = lookup("WORLD_PAGE_SIZE") {
            config.page_size = parse_value("WORLD_PAGE_SIZE", &size)?;
        }
        if let Some(ids) = lookup("WORLD_BENCH_IDS") {
            config.bench_ids = parse_id_list(&ids)?;
        }
        if let Some(level) = lookup("WORLD_LOG_LEVEL") {
            config.log_level = parse_value("WORLD_LOG_LEVEL", &level)?;
        }
        config.log_file = lookup("WORLD_LOG_FILE").filter(|f| !f.trim().is_empty());

        Ok(config)
    }

    pub fn cache_url(&self) -> String {
        format!("redis://{}:{}/", self.cache_host, self.cache_port)
    }
}

/// A missing `.env` is the normal case; anything else (a malformed line, an
/// unreadable file) is a configuration error.
fn dotenv_loaded<T>(loaded: dotenvy::Result<T>) -> Result<()> {
    match loaded {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(WarmError::Config {
            key: ".env".to_string(),
            reason: err.to_string(),
        }),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|err| WarmError::Config {
        key: key.to_string(),
        reason: format!("'{raw}': {err}"),
    })
}

fn parse_id_list(raw: &str) -> Result<Vec<i32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| parse_value("WORLD_BENCH_IDS", part))
        .collect()
}
