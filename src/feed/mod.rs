pub mod rss;

use std::cmp::Reverse;
use std::collections::BTreeMap;

use tracing::warn;

use crate::domain::{Episode, Show};
use crate::media::MediaItem;

pub use rss::{write_feed_file, FeedSettings};

/// A media file labelled with the episode it contains.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub media: MediaItem,
    pub show_title: String,
    pub episode: Episode,
}

impl FeedItem {
    pub fn title(&self) -> String {
        format!(
            "{} {} - {}",
            self.show_title,
            self.media.episode_code(),
            self.episode.title
        )
    }

    /// Stable identifier derived from the file and its episode.
    pub fn guid(&self) -> String {
        let key = format!(
            "{} - {} - {} - {}",
            self.media.query,
            self.media.episode_code(),
            self.episode.title,
            self.media.length
        );
        format!("{:X}", md5::compute(key.as_bytes()))
    }
}

/// Joins media files with their hydrated episodes, newest air date first.
/// Files whose show or episode is unknown are left out.
pub fn label_items(items: Vec<MediaItem>, shows: &BTreeMap<String, Show>) -> Vec<FeedItem> {
    let mut labelled: Vec<FeedItem> = items
        .into_iter()
        .filter_map(|media| {
            let Some(show) = shows.get(&media.query) else {
                warn!(file = %media.filename, "show not resolved, leaving file out of feed");
                return None;
            };
            let Some(episode) = show.episode(media.season, media.episode) else {
                warn!(
                    file = %media.filename,
                    show = %show.title,
                    episode = %media.episode_code(),
                    "episode not found, leaving file out of feed"
                );
                return None;
            };
            Some(FeedItem {
                show_title: show.title.clone(),
                episode: episode.clone(),
                media,
            })
        })
        .collect();

    // Unknown air dates sort last; Option orders None before Some
    labelled.sort_by(|a, b| {
        Reverse(a.episode.aired_at)
            .cmp(&Reverse(b.episode.aired_at))
            .then_with(|| a.media.path.cmp(&b.media.path))
    });
    labelled
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn media(query: &str, season: u32, episode: u32) -> MediaItem {
        let filename = format!("{}_S{season:02}E{episode:02}.mkv", query.replace(' ', "."));
        MediaItem {
            path: filename.clone(),
            filename,
            length: 1000,
            mime_type: "video/x-matroska".to_string(),
            query: query.to_string(),
            season,
            episode,
        }
    }

    fn episode(number: u32, aired: Option<(i32, u32, u32)>) -> Episode {
        Episode {
            number,
            aired_at: aired.and_then(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single()),
            title: format!("Title {number}"),
            overview: String::new(),
        }
    }

    fn shows() -> BTreeMap<String, Show> {
        let mut show = Show::new("Breaking Bad", "81189");
        show.episodes_by_season.insert(
            1,
            [
                (1, episode(1, Some((2008, 1, 20)))),
                (2, episode(2, Some((2008, 1, 27)))),
                (3, episode(3, None)),
            ]
            .into_iter()
            .collect(),
        );
        BTreeMap::from([("breaking bad".to_string(), show)])
    }

    #[test]
    fn test_label_items_sorts_newest_first() {
        let items = vec![
            media("breaking bad", 1, 3),
            media("breaking bad", 1, 1),
            media("breaking bad", 1, 2),
        ];

        let labelled = label_items(items, &shows());

        let numbers: Vec<u32> = labelled.iter().map(|item| item.episode.number).collect();
        assert_eq!(numbers, vec![2, 1, 3]);
        assert_eq!(labelled[0].title(), "Breaking Bad S01E02 - Title 2");
    }

    #[test]
    fn test_label_items_drops_unknown_files() {
        let items = vec![
            media("breaking bad", 1, 1),
            media("breaking bad", 1, 9),
            media("breaking bad", 2, 1),
            media("the wire", 1, 1),
        ];

        let labelled = label_items(items, &shows());

        assert_eq!(labelled.len(), 1);
        assert_eq!(labelled[0].media.episode_code(), "S01E01");
    }

    #[test]
    fn test_guid_is_uppercase_md5_of_identity() {
        let labelled = label_items(vec![media("breaking bad", 1, 1)], &shows());
        let expected = format!(
            "{:X}",
            md5::compute("breaking bad - S01E01 - Title 1 - 1000".as_bytes())
        );

        assert_eq!(labelled[0].guid(), expected);
        assert_eq!(expected.len(), 32);
        assert!(expected.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
