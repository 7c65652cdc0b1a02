//! Errors reported by metadata lookups and episode hydration

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    /// The search call succeeded but returned nothing to rank
    #[error("no shows found matching '{query}'")]
    EmptyCandidates { query: String },

    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("client is not logged in")]
    NotAuthenticated,
}

#[derive(Error, Debug)]
#[error("season {season}: {source}")]
pub struct SeasonFailure {
    pub season: u32,
    #[source]
    pub source: MetadataError,
}

/// Some seasons could not be fetched. Seasons not listed here were merged.
#[derive(Error, Debug)]
#[error("failed to hydrate {failed} season(s) of '{show}'", failed = .failures.len())]
pub struct HydrationError {
    pub show: String,
    pub failures: Vec<SeasonFailure>,
}

impl HydrationError {
    pub fn failed_seasons(&self) -> Vec<u32> {
        self.failures.iter().map(|failure| failure.season).collect()
    }
}
