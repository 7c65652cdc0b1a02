use std::collections::BTreeSet;
use std::panic;
use std::thread;

use tracing::{debug, info};

use super::EpisodeFetch;
use crate::domain::{Episode, HydrationError, MetadataError, SeasonEpisodes, SeasonFailure, Show};

/// Fills in a resolved show's episode catalog, one concurrent fetch per season.
///
/// Every season gets its own thread, so the fan-out is not bounded by the
/// worker pool the caller runs on.
pub struct EpisodeHydrator<'a> {
    source: &'a dyn EpisodeFetch,
}

impl<'a> EpisodeHydrator<'a> {
    pub fn new(source: &'a dyn EpisodeFetch) -> Self {
        Self { source }
    }

    /// Blocks until every season fetch has finished. Successful seasons replace
    /// whatever was stored for them before; failed seasons are left untouched
    /// and reported together in the returned error.
    pub fn populate(&self, show: &mut Show, seasons: &BTreeSet<u32>) -> Result<(), HydrationError> {
        let show_id = show.external_id.as_str();

        // Each task owns its shard; nothing is written to the show until all have joined
        let shards: Vec<(u32, Result<Vec<Episode>, MetadataError>)> = thread::scope(|scope| {
            let handles: Vec<_> = seasons
                .iter()
                .map(|&season| {
                    let handle = scope.spawn(move || {
                        debug!(show_id, season, "fetching season");
                        self.source.fetch_episodes(show_id, season)
                    });
                    (season, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(season, handle)| {
                    let shard = handle
                        .join()
                        .unwrap_or_else(|payload| panic::resume_unwind(payload));
                    (season, shard)
                })
                .collect()
        });

        let mut failures = Vec::new();
        for (season, shard) in shards {
            match shard {
                Ok(episodes) => {
                    let by_number: SeasonEpisodes = episodes
                        .into_iter()
                        .map(|episode| (episode.number, episode))
                        .collect();
                    debug!(show = %show.title, season, episodes = by_number.len(), "merged season");
                    show.episodes_by_season.insert(season, by_number);
                }
                Err(source) => failures.push(SeasonFailure { season, source }),
            }
        }

        if failures.is_empty() {
            info!(show = %show.title, seasons = seasons.len(), "hydrated show");
            Ok(())
        } else {
            Err(HydrationError {
                show: show.title.clone(),
                failures,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::fakes::FakeMetadata;
    use std::time::Duration;

    fn seasons(numbers: &[u32]) -> BTreeSet<u32> {
        numbers.iter().copied().collect()
    }

    #[test]
    fn test_populates_every_requested_season() {
        let source = FakeMetadata::default()
            .with_season("81189", 1, 10)
            .with_season("81189", 2, 10)
            .with_season("81189", 3, 10);
        let hydrator = EpisodeHydrator::new(&source);
        let mut show = Show::new("Breaking Bad", "81189");

        hydrator.populate(&mut show, &seasons(&[1, 2, 3])).unwrap();

        assert_eq!(show.episodes_by_season.len(), 3);
        for season in 1..=3u32 {
            let episodes = &show.episodes_by_season[&season];
            assert_eq!(episodes.len(), 10);
            assert_eq!(episodes.keys().copied().collect::<Vec<_>>(), (1..=10u32).collect::<Vec<_>>());
        }
        assert_eq!(source.fetch_calls.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_every_season_fetches_concurrently() {
        let mut source = FakeMetadata::default().with_fetch_delay(Duration::from_millis(150));
        for season in 1..=6 {
            source = source.with_season("81189", season, 3);
        }
        let hydrator = EpisodeHydrator::new(&source);
        let mut show = Show::new("Breaking Bad", "81189");

        // A single worker thread must not serialise the season fetches
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap();
        pool.install(|| hydrator.populate(&mut show, &seasons(&[1, 2, 3, 4, 5, 6])))
            .unwrap();

        assert_eq!(source.peak_in_flight(), 6);
        assert_eq!(show.episodes_by_season.len(), 6);
    }

    #[test]
    fn test_merge_ignores_completion_order() {
        let source = FakeMetadata::default()
            .with_season("81189", 1, 10)
            .with_season("81189", 2, 10)
            .with_season("81189", 3, 10);
        let hydrator = EpisodeHydrator::new(&source);
        let mut show = Show::new("Breaking Bad", "81189");

        hydrator.populate(&mut show, &seasons(&[1, 2, 3])).unwrap();

        // Later seasons sleep less in the fake, so they complete first
        assert_eq!(*source.completion_order.lock().unwrap(), vec![3, 2, 1]);
        assert_eq!(
            show.episodes_by_season.keys().copied().collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(show.episodes_by_season.values().all(|episodes| episodes.len() == 10));
    }

    #[test]
    fn test_repopulating_overwrites_seasons() {
        let source = FakeMetadata::default()
            .with_season("81189", 1, 7)
            .with_season("81189", 2, 13);
        let hydrator = EpisodeHydrator::new(&source);
        let mut show = Show::new("Breaking Bad", "81189");

        hydrator.populate(&mut show, &seasons(&[1, 2])).unwrap();
        let first = show.clone();
        hydrator.populate(&mut show, &seasons(&[1, 2])).unwrap();

        assert_eq!(show, first);
        assert_eq!(show.episodes_by_season[&1].len(), 7);
        assert_eq!(show.episodes_by_season[&2].len(), 13);
    }

    #[test]
    fn test_failed_season_does_not_discard_others() {
        let source = FakeMetadata::default()
            .with_season("81189", 1, 10)
            .with_season("81189", 2, 10)
            .with_season("81189", 3, 10)
            .with_failing_season("81189", 2);
        let hydrator = EpisodeHydrator::new(&source);
        let mut show = Show::new("Breaking Bad", "81189");

        let err = hydrator
            .populate(&mut show, &seasons(&[1, 2, 3]))
            .unwrap_err();

        assert_eq!(err.failed_seasons(), vec![2]);
        assert!(matches!(err.failures[0].source, MetadataError::Decode(_)));
        assert_eq!(show.episodes_by_season.len(), 2);
        assert_eq!(show.episodes_by_season[&1].len(), 10);
        assert_eq!(show.episodes_by_season[&3].len(), 10);
        assert!(!show.episodes_by_season.contains_key(&2));
    }

    #[test]
    fn test_empty_season_set_fetches_nothing() {
        let source = FakeMetadata::default();
        let hydrator = EpisodeHydrator::new(&source);
        let mut show = Show::new("Breaking Bad", "81189");

        hydrator.populate(&mut show, &BTreeSet::new()).unwrap();

        assert!(show.episodes_by_season.is_empty());
        assert!(source.fetch_calls.lock().unwrap().is_empty());
    }
}
