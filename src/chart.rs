/*!
Chart-ready series built from historical prices and their forecast
*/
use crate::data::{PredictionResult, PriceRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

/// A named series of values aligned with a chart's labels. `None` marks a gap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// The name shown in the legend
    pub name: String,
    /// One value per label
    pub values: Vec<Option<f64>>,
}

/// Labels along the x axis, and the series plotted against them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// The x axis: one date per point
    pub labels: Vec<NaiveDate>,
    /// The y values of each line
    pub series: Vec<Series>,
}

#[derive(Serialize)]
struct ChartRow {
    date: NaiveDate,
    historical: Option<f64>,
    predicted: Option<f64>,
}

impl ChartData {
    /// Plot historical prices followed by predicted prices.
    ///
    /// The "predicted" line also carries the last historical price so that the two lines join up.
    pub fn from_forecast(records: &[PriceRecord], predictions: &[PredictionResult]) -> ChartData {
        let labels: Vec<NaiveDate> = records
            .iter()
            .map(|record| record.date)
            .chain(predictions.iter().map(|prediction| prediction.date))
            .collect();
        let historical = records
            .iter()
            .map(|record| Some(record.price))
            .chain(predictions.iter().map(|_| None))
            .collect();
        let mut predicted: Vec<Option<f64>> = vec![None; records.len()];
        if !predictions.is_empty() {
            if let Some(last) = predicted.last_mut() {
                *last = records.last().map(|record| record.price);
            }
        }
        predicted.extend(predictions.iter().map(|prediction| Some(prediction.price)));
        ChartData {
            labels,
            series: vec![
                Series {
                    name: "historical".into(),
                    values: historical,
                },
                Series {
                    name: "predicted".into(),
                    values: predicted,
                },
            ],
        }
    }
    /// Write the chart as CSV with a `date,historical,predicted` header, gaps left empty.
    /// On success, return how many rows were written
    pub fn write_csv<W: Write>(&self, wtr: W) -> Result<usize, csv::Error> {
        let mut wtr = csv::Writer::from_writer(wtr);
        let column = |name: &str, i: usize| {
            self.series
                .iter()
                .find(|series| series.name == name)
                .and_then(|series| series.values.get(i).copied().flatten())
        };
        for (i, &date) in self.labels.iter().enumerate() {
            wtr.serialize(ChartRow {
                date,
                historical: column("historical", i),
                predicted: column("predicted", i),
            })?;
        }
        wtr.flush()?;
        Ok(self.labels.len())
    }
}
