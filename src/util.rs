/*!
Miscellaneous utilities for `pricecast`
*/

use chrono::{Duration, NaiveDate};
use num::{Float, NumCast};

/// Round a value to a given number of decimal places
pub fn round_to<F: Float>(value: F, places: i32) -> F {
    let ten: F = NumCast::from(10).expect("F cannot hold 10");
    let scale = ten.powi(places);
    (value * scale).round() / scale
}

/// Round a price to whole cents
#[inline]
pub fn round_cents<F: Float>(value: F) -> F {
    round_to(value, 2)
}

/// Iterate over the `days` calendar days strictly after `date`
pub fn days_after(date: NaiveDate, days: usize) -> impl Iterator<Item = NaiveDate> {
    (1..=days as i64).map(move |offset| date + Duration::days(offset))
}
