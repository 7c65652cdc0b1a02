use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{FilenameParser, MediaItem};

/// Lists the episode files in `dir_path`, sorted by path.
pub fn scan_media_dir(dir_path: &Path, recurse: bool, parser: &FilenameParser) -> Result<Vec<MediaItem>> {
    let mut paths = Vec::new();
    collect_files(dir_path, recurse, &mut paths)
        .with_context(|| format!("Failed to read media directory {}", dir_path.display()))?;
    paths.sort();

    let mut items = Vec::new();
    for path in paths {
        let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(parsed) = parser.parse(filename) else {
            debug!(file = %path.display(), "not an episode file");
            continue;
        };

        let length = fs::metadata(&path)
            .with_context(|| format!("Failed to stat {}", path.display()))?
            .len();

        items.push(MediaItem {
            filename: filename.to_string(),
            path: relative_path(dir_path, &path),
            length,
            mime_type: mime_type_for(&path).to_string(),
            query: parsed.query,
            season: parsed.season,
            episode: parsed.episode,
        });
    }

    Ok(items)
}

/// `path` relative to `root`, joined with `/` whatever the platform.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn collect_files(dir_path: &Path, recurse: bool, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir_path)? {
        let path = entry?.path();

        if path.is_file() {
            files.push(path);
        } else if path.is_dir() && recurse {
            collect_files(&path, recurse, files)?;
        }
    }

    Ok(())
}

pub fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    match extension.as_deref() {
        Some("mp4") => "video/mp4",
        Some("m4v") => "video/x-m4v",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}
