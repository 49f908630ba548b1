//! File formats for sift.
//!
//! - **Observations** — whitespace-separated `label score` text files
//!   ([`parse_observations`])

pub mod observations;

pub use observations::{parse_observations, parse_observations_str};
