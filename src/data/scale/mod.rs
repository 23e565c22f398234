/*!
Input data scaling
*/
use crate::CpuFloat;
use itertools::{Itertools, MinMaxResult};
use num::Float;

/// Scale a value into `[0, 1]` relative to `min` and `max`.
///
/// Undefined when `max == min`: callers should go through [`NormalizationRange::of`], which refuses flat data.
#[inline]
pub fn normalize<F: Float>(value: F, min: F, max: F) -> F {
    (value - min) / (max - min)
}

/// Map a value in `[0, 1]` back into the range `[min, max]`
#[inline]
pub fn denormalize<F: Float>(value: F, min: F, max: F) -> F {
    value * (max - min) + min
}

/// The minimum and maximum of a series of prices
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NormalizationRange<F = CpuFloat> {
    /// The smallest value in the series
    pub min: F,
    /// The largest value in the series
    pub max: F,
}

impl<F> NormalizationRange<F>
where
    F: Copy + Float,
{
    /// Compute the range of a series of values.
    ///
    /// Returns `None` if the series is empty or flat (`min == max`), since it cannot then be normalized.
    pub fn of<I>(values: I) -> Option<NormalizationRange<F>>
    where
        I: IntoIterator<Item = F>,
    {
        match values.into_iter().minmax() {
            MinMaxResult::MinMax(min, max) if min < max => Some(NormalizationRange { min, max }),
            _ => None,
        }
    }
    /// Scale a value according to this range
    #[inline]
    pub fn normalize(&self, value: F) -> F {
        normalize(value, self.min, self.max)
    }
    /// Unscale a value according to this range
    #[inline]
    pub fn denormalize(&self, value: F) -> F {
        denormalize(value, self.min, self.max)
    }
}
