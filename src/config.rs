use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;
use crate::feed::FeedSettings;
use crate::infra::tvdb::TVDB_API_BASE;
use crate::media::filename::DEFAULT_PATTERN;

const DEFAULT_FEED_TITLE: &str = "Episode Feed";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    tvdb_api_key: Option<String>,
    media_path: Option<PathBuf>,
    feed_path: Option<PathBuf>,
    feed_title: Option<String>,
    host: Option<String>,
    media_url: Option<String>,
    recursive: bool,
    workers: Option<usize>,
    request_timeout_secs: Option<u64>,
    filename_pattern: Option<String>,
    tvdb_base_url: Option<String>,
}

/// Settings after merging the config file, environment and command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub tvdb_api_key: String,
    pub tvdb_base_url: String,
    pub media_path: PathBuf,
    pub feed_path: PathBuf,
    pub recursive: bool,
    pub workers: Option<usize>,
    pub request_timeout: Duration,
    pub filename_pattern: String,
    pub feed: FeedSettings,
}

impl Config {
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli.config.clone().unwrap_or_else(get_config_path);
        let file = read_config_file(&config_path, cli.config.is_some())?;
        let env_key = env::var("TVDB_API_KEY").ok();
        Self::resolve(file, env_key, cli, &config_path)
    }

    fn resolve(file: ConfigFile, env_key: Option<String>, cli: &Cli, config_path: &Path) -> Result<Self> {
        let Some(tvdb_api_key) = env_key.or(file.tvdb_api_key).filter(|k| !k.is_empty()) else {
            bail!(
                "TVDB API key not found. Set TVDB_API_KEY environment variable or add tvdb_api_key = \"your-key\" to {}",
                config_path.display()
            );
        };

        let Some(media_path) = cli.media_path.clone().or(file.media_path) else {
            bail!(
                "Media path not set. Pass --media-path or add media_path to {}",
                config_path.display()
            );
        };

        let feed_path = cli
            .feed_path
            .clone()
            .or(file.feed_path)
            .unwrap_or_else(|| PathBuf::from("feed.xml"));

        let host = file.host.unwrap_or_else(|| "http://localhost".to_string());
        let media_url = file.media_url.unwrap_or_else(|| host.clone());

        Ok(Self {
            tvdb_api_key,
            tvdb_base_url: file
                .tvdb_base_url
                .unwrap_or_else(|| TVDB_API_BASE.to_string()),
            media_path,
            feed_path,
            recursive: cli.recursive || file.recursive,
            workers: cli.workers.or(file.workers).filter(|&n| n > 0),
            request_timeout: Duration::from_secs(
                file.request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            filename_pattern: file
                .filename_pattern
                .unwrap_or_else(|| DEFAULT_PATTERN.to_string()),
            feed: FeedSettings {
                title: file
                    .feed_title
                    .unwrap_or_else(|| DEFAULT_FEED_TITLE.to_string()),
                host,
                media_url,
            },
        })
    }
}

fn read_config_file(path: &Path, required: bool) -> Result<ConfigFile> {
    if !path.exists() {
        if required {
            bail!("Config file not found: {}", path.display());
        }
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("episode-feed"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}
