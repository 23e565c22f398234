/*!
Price data, its storage, scaling and windowing
*/
use crate::*;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod csv;
pub mod fake;
pub mod scale;
pub mod store;
pub mod window;

/// The date format used when reading and writing price data
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The closing price of a stock on a given day
#[derive(Debug, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PriceRecord<F = CpuFloat> {
    /// The ticker symbol of the stock
    pub symbol: String,
    /// The day this price was recorded
    pub date: NaiveDate,
    /// The price itself. Always positive
    pub price: F,
}

impl<F> PriceRecord<F> {
    /// Create a new price record
    pub fn new(symbol: impl Into<String>, date: NaiveDate, price: F) -> PriceRecord<F> {
        PriceRecord {
            symbol: symbol.into(),
            date,
            price,
        }
    }
}

/// A predicted price for a future day
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PredictionResult<F = CpuFloat> {
    /// The day being predicted
    pub date: NaiveDate,
    /// The predicted price, denormalized back into the range of the input data
    pub price: F,
    /// A confidence percentage for this prediction
    pub confidence: u8,
}
