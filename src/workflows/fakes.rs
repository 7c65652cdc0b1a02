//! In-memory metadata services for workflow tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use super::{EpisodeFetch, ShowSearch};
use crate::domain::{Episode, MetadataError, Show};

#[derive(Default)]
pub struct FakeMetadata {
    pub results: HashMap<String, Vec<Show>>,
    pub episode_counts: HashMap<(String, u32), u32>,
    pub failing_seasons: HashSet<(String, u32)>,
    pub fetch_delay: Option<Duration>,
    pub search_calls: AtomicUsize,
    pub fetch_calls: Mutex<Vec<(String, u32)>>,
    pub completion_order: Mutex<Vec<u32>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeMetadata {
    pub fn with_results(mut self, query: &str, titles: &[(&str, &str)]) -> Self {
        let shows = titles
            .iter()
            .map(|(title, id)| Show::new(*title, *id))
            .collect();
        self.results.insert(query.to_string(), shows);
        self
    }

    pub fn with_season(mut self, show_id: &str, season: u32, episodes: u32) -> Self {
        self.episode_counts
            .insert((show_id.to_string(), season), episodes);
        self
    }

    pub fn with_failing_season(mut self, show_id: &str, season: u32) -> Self {
        self.failing_seasons.insert((show_id.to_string(), season));
        self
    }

    /// Every fetch sleeps for `delay` instead of the per-season stagger.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    pub fn search_count(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Highest number of fetches that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

pub fn make_episode(season: u32, number: u32) -> Episode {
    Episode {
        number,
        aired_at: Utc
            .with_ymd_and_hms(2008 + season as i32, 1, number, 12, 0, 0)
            .single(),
        title: format!("Episode {number}"),
        overview: format!("Season {season} episode {number}"),
    }
}

impl ShowSearch for FakeMetadata {
    fn search_shows(&self, query: &str) -> Result<Vec<Show>, MetadataError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.get(query).cloned().unwrap_or_default())
    }
}

impl EpisodeFetch for FakeMetadata {
    fn fetch_episodes(&self, show_id: &str, season: u32) -> Result<Vec<Episode>, MetadataError> {
        self.fetch_calls
            .lock()
            .unwrap()
            .push((show_id.to_string(), season));

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        // Later seasons finish first so completion order differs from request order
        let delay = self
            .fetch_delay
            .unwrap_or_else(|| Duration::from_millis(u64::from(120u32.saturating_sub(season * 35))));
        thread::sleep(delay);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completion_order.lock().unwrap().push(season);

        let key = (show_id.to_string(), season);
        if self.failing_seasons.contains(&key) {
            let err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
            return Err(MetadataError::Decode(err));
        }

        let count = self.episode_counts.get(&key).copied().unwrap_or(0);
        Ok((1..=count).map(|number| make_episode(season, number)).collect())
    }
}
