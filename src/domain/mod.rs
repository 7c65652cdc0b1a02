pub mod error;
pub mod models;

pub use error::{HydrationError, MetadataError, SeasonFailure};
pub use models::{Episode, SeasonEpisodes, Show};
