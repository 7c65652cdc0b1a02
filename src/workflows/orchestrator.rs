use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use tracing::{info, warn};

use super::hydrator::EpisodeHydrator;
use super::resolver::ShowResolver;
use super::{EpisodeFetch, ShowSearch};
use crate::domain::Show;
use crate::media::MediaItem;

/// Resolves and hydrates every distinct show referenced by a set of media files.
pub struct Orchestrator<'a> {
    resolver: ShowResolver<'a>,
    hydrator: EpisodeHydrator<'a>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(search: &'a dyn ShowSearch, episodes: &'a dyn EpisodeFetch) -> Self {
        Self {
            resolver: ShowResolver::new(search),
            hydrator: EpisodeHydrator::new(episodes),
        }
    }

    /// Returns the hydrated shows keyed by query. Queries that fail to resolve
    /// are missing from the result; seasons that fail to load are missing
    /// from their show.
    ///
    /// Shows are spread over the current rayon pool; season fetches inside a
    /// show are not limited by its size.
    pub fn run(&self, items: &[MediaItem]) -> BTreeMap<String, Show> {
        let wanted = seasons_by_query(items);
        info!(shows = wanted.len(), files = items.len(), "resolving shows");

        let resolved: Vec<(String, Option<Show>)> = wanted
            .par_iter()
            .map(|(query, seasons)| (query.clone(), self.resolve_and_hydrate(query, seasons)))
            .collect();

        resolved
            .into_iter()
            .filter_map(|(query, show)| show.map(|show| (query, show)))
            .collect()
    }

    fn resolve_and_hydrate(&self, query: &str, seasons: &BTreeSet<u32>) -> Option<Show> {
        let mut show = match self.resolver.resolve(query) {
            Ok(show) => show,
            Err(e) => {
                warn!(query, error = %e, "could not resolve show, skipping its files");
                return None;
            }
        };
        info!(query, title = %show.title, id = %show.external_id, "resolved show");

        if let Err(e) = self.hydrator.populate(&mut show, seasons) {
            warn!(show = %show.title, seasons = ?e.failed_seasons(), "{e}");
            for failure in &e.failures {
                warn!(
                    show = %show.title,
                    season = failure.season,
                    error = %failure.source,
                    "could not load season, skipping its files"
                );
            }
        }

        Some(show)
    }
}

/// Distinct seasons needed per show query.
pub fn seasons_by_query(items: &[MediaItem]) -> BTreeMap<String, BTreeSet<u32>> {
    let mut wanted: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();
    for item in items {
        wanted
            .entry(item.query.clone())
            .or_default()
            .insert(item.season);
    }
    wanted
}
