//! Shared primitives for the sift classifier evaluation tools.
//!
//! - **Error types** — [`SiftError`] and [`Result`] for structured error handling
//! - **Traits** — [`Summarizable`], implemented by the dataset and report
//!   types in the other crates

pub mod error;
pub mod traits;

pub use error::{Result, SiftError};
pub use traits::*;
