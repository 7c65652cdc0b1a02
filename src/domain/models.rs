use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Episodes of one season, keyed by episode number.
pub type SeasonEpisodes = BTreeMap<u32, Episode>;

#[derive(Debug, Clone, PartialEq)]
pub struct Show {
    pub title: String,
    pub external_id: String,
    pub episodes_by_season: BTreeMap<u32, SeasonEpisodes>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub number: u32,
    pub aired_at: Option<DateTime<Utc>>,
    pub title: String,
    pub overview: String,
}

impl Show {
    pub fn new(title: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            external_id: external_id.into(),
            episodes_by_season: BTreeMap::new(),
        }
    }

    pub fn episode(&self, season: u32, number: u32) -> Option<&Episode> {
        self.episodes_by_season
            .get(&season)
            .and_then(|episodes| episodes.get(&number))
    }
}
