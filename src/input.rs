// Array input
// Parses user-typed value lists and generates random starting arrays

use rand::Rng;
use thiserror::Error;

/// Smallest array worth animating
pub const MIN_SIZE: usize = 2;

/// Upper bound on generated arrays; quadratic traces grow fast beyond this
pub const MAX_SIZE: usize = 200;

pub const DEFAULT_SIZE: usize = 30;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("no valid numbers found in input")]
    NoValidNumbers,
}

/// Parse a comma-separated value list
/// Unparseable and non-finite tokens are skipped; an input with nothing
/// valid left is an error
pub fn parse_values(text: &str) -> Result<Vec<f64>, InputError> {
    let values: Vec<f64> = text
        .split(',')
        .filter_map(|token| {
            let token = token.trim();
            if token.is_empty() {
                return None;
            }
            token.parse::<f64>().ok().filter(|v| v.is_finite())
        })
        .collect();

    if values.is_empty() {
        return Err(InputError::NoValidNumbers);
    }
    Ok(values)
}

/// Generate a random array of integers in [1, 100]
/// The requested length is clamped to the supported size range
pub fn generate_values(len: usize) -> Vec<f64> {
    let len = len.clamp(MIN_SIZE, MAX_SIZE);
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen_range(1..=100) as f64).collect()
}
