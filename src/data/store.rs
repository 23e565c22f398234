/*!
An in-memory, date-ordered store of daily prices
*/
use super::fake::{PriceGen, SinusoidalDrift};
use super::{PriceRecord, DATE_FORMAT};
use crate::util::{days_after, round_cents};
use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// The number of days generated by [`Store::generate_sample`]
pub const SAMPLE_DAYS: usize = 60;

/// Why a store operation was rejected. A rejected operation never modifies the store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// A required field was left blank
    #[error("missing {0}")]
    MissingField(&'static str),
    /// The date could not be parsed
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    /// The price is not a finite number
    #[error("invalid price {0:?}")]
    InvalidPrice(String),
    /// The price is zero or negative
    #[error("price must be positive, got {0}")]
    NonPositivePrice(f64),
    /// A record already exists for this date
    #[error("a price for {0} already exists")]
    DuplicateDate(NaiveDate),
    /// There is no record at this position
    #[error("no record at position {position}, store holds {len}")]
    OutOfRange {
        /// The requested position
        position: usize,
        /// The number of records in the store
        len: usize,
    },
}

/// Daily prices, sorted ascending by date, with at most one price per date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    records: Vec<PriceRecord>,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Store {
        Store::default()
    }
    /// Add a record from raw text fields, as typed into a form
    pub fn add(&mut self, symbol: &str, date: &str, price: &str) -> Result<&PriceRecord, StoreError> {
        let record = parse_record(symbol, date, price)?;
        self.insert(record)
    }
    /// Insert a record, keeping the store sorted by date
    pub fn insert(&mut self, record: PriceRecord) -> Result<&PriceRecord, StoreError> {
        if !record.price.is_finite() {
            return Err(StoreError::InvalidPrice(record.price.to_string()));
        }
        if record.price <= 0.0 {
            return Err(StoreError::NonPositivePrice(record.price));
        }
        // Sorted and duplicate-free, so a binary search both finds clashes and the insertion point
        match self.records.binary_search_by_key(&record.date, |r| r.date) {
            Ok(_) => Err(StoreError::DuplicateDate(record.date)),
            Err(position) => {
                self.records.insert(position, record);
                Ok(&self.records[position])
            }
        }
    }
    /// Remove the record at a position in date order
    pub fn remove(&mut self, position: usize) -> Result<PriceRecord, StoreError> {
        if position >= self.records.len() {
            return Err(StoreError::OutOfRange {
                position,
                len: self.records.len(),
            });
        }
        Ok(self.records.remove(position))
    }
    /// Replace the contents of the store with [`SAMPLE_DAYS`] days of synthetic prices ending on `today`
    pub fn generate_sample<R: Rng>(&mut self, symbol: &str, today: NaiveDate, rng: R) {
        let symbol = normalize_symbol(symbol);
        let symbol = symbol.as_str();
        let mut price_gen = SinusoidalDrift::for_symbol(symbol, rng);
        let first = today - Duration::days(SAMPLE_DAYS as i64);
        self.records = days_after(first, SAMPLE_DAYS)
            .map(|date| {
                let price = round_cents(price_gen.next_price()).max(0.01);
                PriceRecord::new(symbol, date, price)
            })
            .collect();
        debug!(symbol, days = SAMPLE_DAYS, %today, "generated sample prices");
    }
    /// Replace the contents of the store with synthetic prices ending on the current UTC date
    pub fn generate_sample_today<R: Rng>(&mut self, symbol: &str, rng: R) {
        let today = Utc::now().naive_utc().date();
        self.generate_sample(symbol, today, rng)
    }
    /// Remove every record
    pub fn clear(&mut self) {
        self.records.clear()
    }
    /// The records, in ascending date order
    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }
    /// The prices, in ascending date order
    pub fn prices(&self) -> Vec<f64> {
        self.records.iter().map(|record| record.price).collect()
    }
    /// The most recent record, if any
    pub fn last(&self) -> Option<&PriceRecord> {
        self.records.last()
    }
    /// The number of records held
    pub fn len(&self) -> usize {
        self.records.len()
    }
    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Symbols are stored trimmed and upper-cased
fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Validate raw text fields into a record
pub fn parse_record(symbol: &str, date: &str, price: &str) -> Result<PriceRecord, StoreError> {
    let symbol = symbol.trim();
    let date = date.trim();
    let price = price.trim();
    if symbol.is_empty() {
        return Err(StoreError::MissingField("symbol"));
    }
    if date.is_empty() {
        return Err(StoreError::MissingField("date"));
    }
    if price.is_empty() {
        return Err(StoreError::MissingField("price"));
    }
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| StoreError::InvalidDate(date.to_string()))?;
    let price = match f64::from_str(price) {
        Ok(value) if value.is_finite() => value,
        _ => return Err(StoreError::InvalidPrice(price.to_string())),
    };
    Ok(PriceRecord::new(normalize_symbol(symbol), date, price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn is_sorted(store: &Store) -> bool {
        store.records().windows(2).all(|pair| pair[0].date < pair[1].date)
    }

    #[test]
    fn add_keeps_dates_sorted() {
        let mut store = Store::new();
        store.add("amzn", "2020-06-24", "3100").unwrap();
        store.add("AMZN", "2020-06-22", "3125.5").unwrap();
        store.add("AMZN", "2020-06-23", " 3150 ").unwrap();
        assert_eq!(store.len(), 3);
        assert!(is_sorted(&store));
        assert_eq!(store.records()[0].price, 3125.5);
        assert_eq!(store.records()[2].symbol, "AMZN");
    }

    #[test]
    fn add_rejects_bad_fields() {
        let mut store = Store::new();
        assert_eq!(store.add("", "2020-06-22", "1"), Err(StoreError::MissingField("symbol")));
        assert_eq!(store.add("A", " ", "1"), Err(StoreError::MissingField("date")));
        assert_eq!(store.add("A", "2020-06-22", ""), Err(StoreError::MissingField("price")));
        assert_eq!(
            store.add("A", "22/06/2020", "1"),
            Err(StoreError::InvalidDate("22/06/2020".into()))
        );
        assert_eq!(
            store.add("A", "2020-06-22", "lots"),
            Err(StoreError::InvalidPrice("lots".into()))
        );
        assert_eq!(
            store.add("A", "2020-06-22", "NaN"),
            Err(StoreError::InvalidPrice("NaN".into()))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn add_rejects_non_positive_price() {
        let mut store = Store::new();
        assert_eq!(store.add("A", "2020-06-22", "0"), Err(StoreError::NonPositivePrice(0.0)));
        assert_eq!(store.add("A", "2020-06-22", "-4.5"), Err(StoreError::NonPositivePrice(-4.5)));
        assert!(store.is_empty());
    }

    #[test]
    fn add_rejects_duplicate_date() {
        let mut store = Store::new();
        store.add("A", "2020-06-22", "10").unwrap();
        store.add("A", "2020-06-23", "11").unwrap();
        let date = NaiveDate::from_ymd_opt(2020, 6, 22).unwrap();
        assert_eq!(store.add("B", "2020-06-22", "12"), Err(StoreError::DuplicateDate(date)));
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].price, 10.0);
    }

    #[test]
    fn remove_by_position() {
        let mut store = Store::new();
        store.add("A", "2020-06-23", "11").unwrap();
        store.add("A", "2020-06-22", "10").unwrap();
        store.add("A", "2020-06-24", "12").unwrap();
        let removed = store.remove(1).unwrap();
        assert_eq!(removed.price, 11.0);
        assert_eq!(store.prices(), vec![10.0, 12.0]);
        assert_eq!(store.remove(2), Err(StoreError::OutOfRange { position: 2, len: 2 }));
        assert_eq!(store.len(), 2);
        assert!(is_sorted(&store));
    }

    #[test]
    fn mixed_mutations_stay_sorted() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut store = Store::new();
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        for step in 0..200 {
            if step % 3 == 2 && !store.is_empty() {
                let position = rng.gen_range(0, store.len());
                store.remove(position).unwrap();
            } else {
                let date = start + Duration::days(rng.gen_range(0, 90));
                let _ = store.insert(PriceRecord::new("A", date, 1.0 + step as f64));
            }
            assert!(is_sorted(&store));
        }
    }

    #[test]
    fn sample_is_sixty_consecutive_days() {
        let today = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let mut store = Store::new();
        store.add("X", "1999-01-01", "1").unwrap();
        store.generate_sample("AAPL", today, StdRng::seed_from_u64(1));
        assert_eq!(store.len(), SAMPLE_DAYS);
        assert_eq!(store.last().unwrap().date, today);
        assert_eq!(
            store.records()[0].date,
            today - Duration::days(SAMPLE_DAYS as i64 - 1)
        );
        for pair in store.records().windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
        for record in store.records() {
            assert_eq!(record.symbol, "AAPL");
            assert!(record.price > 0.0);
            assert_eq!(round_cents(record.price), record.price);
        }
    }

    #[test]
    fn sample_symbol_matches_added_symbol() {
        let mut store = Store::new();
        let today = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        store.generate_sample(" aapl", today, StdRng::seed_from_u64(1));
        assert!(store.records().iter().all(|record| record.symbol == "AAPL"));
        store.add("aapl", "2020-03-02", "181.5").unwrap();
        assert!(store.records().iter().all(|record| record.symbol == "AAPL"));
    }

    #[test]
    fn sample_today_ends_on_current_date() {
        let before = Utc::now().naive_utc().date();
        let mut store = Store::new();
        store.generate_sample_today("MSFT", StdRng::seed_from_u64(2));
        let after = Utc::now().naive_utc().date();
        assert_eq!(store.len(), SAMPLE_DAYS);
        let last = store.last().unwrap().date;
        // Tolerate the clock crossing midnight mid-test
        assert!(last == before || last == after);
    }
}
