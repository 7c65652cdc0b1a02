use tracing::debug;

use super::ShowSearch;
use crate::domain::{MetadataError, Show};
use crate::matching::{edit_distance, MinHeap};

/// Picks the search result whose title is closest to the query.
pub struct ShowResolver<'a> {
    search: &'a dyn ShowSearch,
}

impl<'a> ShowResolver<'a> {
    pub fn new(search: &'a dyn ShowSearch) -> Self {
        Self { search }
    }

    /// Both the query and each candidate title are lowercased and trimmed
    /// before measuring, so callers may pass the query in any case. Equal
    /// distances go to the earlier search result.
    pub fn resolve(&self, query: &str) -> Result<Show, MetadataError> {
        let candidates = self.search.search_shows(query)?;
        let normalized_query = normalize(query);

        let mut heap = MinHeap::with_capacity(candidates.len());
        for (rank, show) in candidates.into_iter().enumerate() {
            let distance = edit_distance(&normalized_query, &normalize(&show.title));
            debug!(query, title = %show.title, distance, "ranked candidate");
            heap.push((distance, rank), show);
        }
        debug!(query, candidates = heap.len(), best = ?heap.peek_priority(), "ranked search results");

        heap.pop().ok_or_else(|| MetadataError::EmptyCandidates {
            query: query.to_string(),
        })
    }
}

fn normalize(title: &str) -> String {
    title.trim().to_lowercase()
}
