pub mod filename;
pub mod scan;

pub use filename::FilenameParser;
pub use scan::scan_media_dir;

/// A media file that looks like a TV episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub filename: String,
    /// Location under the media root, `/`-separated
    pub path: String,
    pub length: u64,
    pub mime_type: String,
    pub query: String,
    pub season: u32,
    pub episode: u32,
}

impl MediaItem {
    pub fn episode_code(&self) -> String {
        format!("S{:02}E{:02}", self.season, self.episode)
    }
}
