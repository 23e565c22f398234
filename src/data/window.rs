/*!
Sliding-window training sets
*/
use super::scale::NormalizationRange;
use crate::CpuFloat;
use num::Float;
use serde::{Deserialize, Serialize};

/// The default number of consecutive prices fed into the network
pub const WINDOW_SIZE: usize = 5;

/// A window of normalized prices, and the normalized price which followed it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPair<F = CpuFloat> {
    /// The normalized input window. Always `window` values long
    pub input: Vec<F>,
    /// The normalized value following the window
    pub output: F,
}

/// Build the training pairs for a series of prices, sliding a window of `window` prices one step at a time.
///
/// Yields `prices.len() - window` pairs, or none if there are not more than `window` prices.
pub fn training_pairs<F>(prices: &[F], range: &NormalizationRange<F>, window: usize) -> Vec<TrainingPair<F>>
where
    F: Copy + Float,
{
    if window == 0 {
        return Vec::new();
    }
    let normalized: Vec<F> = prices.iter().map(|&price| range.normalize(price)).collect();
    normalized
        .windows(window + 1)
        .map(|slice| TrainingPair {
            input: slice[..window].to_vec(),
            output: slice[window],
        })
        .collect()
}

/// The last `window` prices of a series, normalized: the seed for autoregressive prediction.
///
/// A series shorter than the window yields all of its prices.
pub fn last_window<F>(prices: &[F], range: &NormalizationRange<F>, window: usize) -> Vec<F>
where
    F: Copy + Float,
{
    let start = prices.len().saturating_sub(window);
    prices[start..].iter().map(|&price| range.normalize(price)).collect()
}
