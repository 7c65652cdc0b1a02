use anyhow::{bail, Context, Result};
use regex::Regex;

pub const DEFAULT_PATTERN: &str =
    r"(?i)^(?P<show>.+?)_s(?P<season>\d{1,3})e(?P<episode>\d{1,4})\.(?:mp4|m4v|avi|mkv)$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    pub query: String,
    pub season: u32,
    pub episode: u32,
}

/// Extracts the show query and episode code from media filenames.
///
/// The pattern must define the named groups `show`, `season` and `episode`.
#[derive(Debug, Clone)]
pub struct FilenameParser {
    pattern: Regex,
}

impl FilenameParser {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).context("Invalid filename pattern")?;
        for group in ["show", "season", "episode"] {
            if !pattern.capture_names().flatten().any(|name| name == group) {
                bail!("Filename pattern is missing the named group '{group}'");
            }
        }
        Ok(Self { pattern })
    }

    /// Returns `None` for files that are not recognisable episodes.
    pub fn parse(&self, filename: &str) -> Option<ParsedFilename> {
        let caps = self.pattern.captures(filename)?;
        let query = normalize_show(caps.name("show")?.as_str());
        if query.is_empty() {
            return None;
        }
        let season = caps.name("season")?.as_str().parse().ok()?;
        let episode = caps.name("episode")?.as_str().parse().ok()?;

        Some(ParsedFilename {
            query,
            season,
            episode,
        })
    }
}

impl Default for FilenameParser {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_PATTERN).expect("default filename pattern is valid"),
        }
    }
}

fn normalize_show(raw: &str) -> String {
    raw.to_lowercase()
        .replace('.', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
