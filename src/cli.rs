use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "episode-feed")]
#[command(about = "Label TV episode files with TVDB metadata and publish them as an RSS feed")]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory containing the media files
    #[arg(long)]
    pub media_path: Option<PathBuf>,

    /// Where to write the feed
    #[arg(long)]
    pub feed_path: Option<PathBuf>,

    /// Recursively scan subdirectories of the media path
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// Number of worker threads used for lookups
    #[arg(long)]
    pub workers: Option<usize>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}
