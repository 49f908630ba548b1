//! Label/score observation file parser.
//!
//! Each line holds two whitespace-separated real numbers, `label score`.
//! There is no header. Every line, blank ones included, must parse or the
//! whole read fails.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use sift_core::{Result, SiftError};
use sift_stats::{Dataset, Observation};

/// Parse an observation file into a [`Dataset`].
///
/// # Errors
///
/// Fails on the first malformed line with [`SiftError::MalformedLine`], and
/// with [`SiftError::EmptyInput`] if the file holds no observations.
pub fn parse_observations(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        SiftError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    let reader = BufReader::new(file);

    let mut labels = Vec::new();
    let mut scores = Vec::new();
    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| {
            SiftError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: line {}: {}", path.display(), line_num + 1, e),
            ))
        })?;
        let obs = parse_observation_line(&line, line_num + 1)?;
        labels.push(obs.label);
        scores.push(obs.score);
    }

    tracing::debug!(path = %path.display(), observations = scores.len(), "read observations");
    Dataset::new(labels, scores)
}

/// Parse observation text from a string.
///
/// Behaves like [`parse_observations`] but reads from an in-memory string.
pub fn parse_observations_str(text: &str) -> Result<Dataset> {
    let observations = text
        .lines()
        .enumerate()
        .map(|(i, line)| parse_observation_line(line, i + 1))
        .collect::<Result<Vec<_>>>()?;
    Dataset::from_observations(&observations)
}

/// Parse a single `label score` line.
fn parse_observation_line(line: &str, line_num: usize) -> Result<Observation> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 2 {
        return Err(SiftError::MalformedLine {
            line: line_num,
            reason: format!("expected 2 whitespace-separated fields, found {}", fields.len()),
        });
    }

    let label = parse_real(fields[0], "label", line_num)?;
    let score = parse_real(fields[1], "score", line_num)?;
    Ok(Observation { label, score })
}

fn parse_real(field: &str, what: &str, line_num: usize) -> Result<f64> {
    let value: f64 = field.parse().map_err(|_| SiftError::MalformedLine {
        line: line_num,
        reason: format!("invalid {what} '{field}'"),
    })?;
    if value.is_nan() {
        return Err(SiftError::MalformedLine {
            line: line_num,
            reason: format!("{what} is NaN"),
        });
    }
    Ok(value)
}
