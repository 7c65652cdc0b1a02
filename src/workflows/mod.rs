use crate::domain::{Episode, MetadataError, Show};

/// Looks up candidate shows for a free-text title.
pub trait ShowSearch: Sync {
    fn search_shows(&self, query: &str) -> Result<Vec<Show>, MetadataError>;
}

/// Fetches every episode of one season of a show.
pub trait EpisodeFetch: Sync {
    fn fetch_episodes(&self, show_id: &str, season: u32) -> Result<Vec<Episode>, MetadataError>;
}

pub mod hydrator;
pub mod orchestrator;
pub mod resolver;

#[cfg(test)]
pub(crate) mod fakes;
