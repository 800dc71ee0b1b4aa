//! Runability — score how well a song suits running, from the energy and
//! danceability ratings published on its song-information page.

pub mod analyzer;
pub mod extract;
pub mod score;
pub mod types;
pub mod url;

pub use analyzer::{Analyzer, PageFetcher};
pub use extract::extract_labels;
pub use score::{ScoreTables, DANCEABILITY_WEIGHT, ENERGY_WEIGHT};
pub use types::*;
pub use url::{build_lookup_url, slugify, DEFAULT_LOOKUP_BASE};
