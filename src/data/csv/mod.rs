/*!
Reading and writing price data as CSV
*/
use super::store::Store;
use super::{PredictionResult, PriceRecord};
use serde::Deserialize;
use std::io::{Read, Write};
use thiserror::Error;
use tracing::warn;

/// An error reading or writing CSV data
#[derive(Debug, Error)]
pub enum CsvError {
    /// The underlying CSV reader or writer failed
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    /// Flushing the output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A row of price data as found in a file, before validation
#[derive(Debug, Clone, Deserialize)]
struct RawRecord {
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    price: String,
}

/// Read `symbol,date,price` rows into a new store.
///
/// Rows are validated exactly like manually added records: rows which are malformed or rejected by the store are
/// skipped with a warning. Fails only if the CSV itself cannot be read.
pub fn read_records<R: Read>(rdr: R) -> Result<Store, CsvError> {
    let mut store = Store::new();
    let mut rdr = ::csv::ReaderBuilder::new().trim(::csv::Trim::All).from_reader(rdr);
    for (row, result) in rdr.deserialize::<RawRecord>().enumerate() {
        let raw = match result {
            Ok(raw) => raw,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                warn!(row, %err, "skipping unreadable row");
                continue;
            }
        };
        if let Err(err) = store.add(&raw.symbol, &raw.date, &raw.price) {
            warn!(row, %err, "skipping rejected row");
        }
    }
    Ok(store)
}

/// Write price records to a Writer.
/// On success, return how many records were written
pub fn write_records<'a, W, I>(wtr: W, records: I) -> Result<usize, CsvError>
where
    W: Write,
    I: IntoIterator<Item = &'a PriceRecord>,
{
    serialize_all(wtr, records)
}

/// Write predictions to a Writer.
/// On success, return how many predictions were written
pub fn write_predictions<'a, W, I>(wtr: W, predictions: I) -> Result<usize, CsvError>
where
    W: Write,
    I: IntoIterator<Item = &'a PredictionResult>,
{
    serialize_all(wtr, predictions)
}

fn serialize_all<W, I, T>(wtr: W, items: I) -> Result<usize, CsvError>
where
    W: Write,
    I: IntoIterator<Item = T>,
    T: serde::Serialize,
{
    let mut wtr = ::csv::Writer::from_writer(wtr);
    let mut written = 0;
    for item in items {
        wtr.serialize(item)?;
        written += 1;
    }
    wtr.flush()?;
    Ok(written)
}
