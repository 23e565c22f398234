/*!
Train a network on a store of prices and forecast the days which follow, feeding each prediction back in
*/
use crate::data::{
    scale::NormalizationRange,
    store::Store,
    window::{last_window, training_pairs, WINDOW_SIZE},
    PredictionResult,
};
use crate::nn::{Network, TrainingOptions, TrainingStatus};
use crate::util::days_after;
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use thiserror::Error;
use tracing::{debug, info};

/// Why a forecast was refused. A refused forecast never touches the network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    /// Too few records to train on
    #[error("need at least {required} records to forecast, have {available}")]
    InsufficientRecords {
        /// The number of records required
        required: usize,
        /// The number of records in the store
        available: usize,
    },
    /// Every price is the same, so the series cannot be normalized
    #[error("all prices are equal, nothing to learn from")]
    FlatSeries,
    /// The network expects a different window length than the one configured
    #[error("network expects windows of {network} prices, configured for {configured}")]
    WindowMismatch {
        /// The window length the network takes
        network: usize,
        /// The configured window length
        configured: usize,
    },
}

/// Forecasting parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// The number of consecutive prices fed into the network
    pub window: usize,
    /// The number of days to forecast
    pub horizon: usize,
    /// The fewest records a forecast will be attempted on
    pub min_records: usize,
    /// The range reported confidences are drawn from
    pub confidence: Range<u8>,
    /// Options passed on to the network for training
    pub training: TrainingOptions,
}

impl Default for ForecastConfig {
    fn default() -> ForecastConfig {
        ForecastConfig {
            window: WINDOW_SIZE,
            horizon: 5,
            min_records: 10,
            confidence: 70..80,
            training: TrainingOptions::default(),
        }
    }
}

impl ForecastConfig {
    /// The fewest records a forecast will be attempted on: never less than one full training pair
    pub fn required_records(&self) -> usize {
        self.min_records.max(self.window + 1)
    }
}

/// A completed forecast
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    /// One prediction per forecast day, in date order
    pub predictions: Vec<PredictionResult>,
    /// The range prices were normalized with
    pub range: NormalizationRange,
    /// How training went
    pub training: TrainingStatus,
}

/// Drives a network through training and autoregressive forecasting
#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    /// The parameters in use
    pub config: ForecastConfig,
}

impl Forecaster {
    /// Create a forecaster with the given parameters
    pub fn new(config: ForecastConfig) -> Forecaster {
        Forecaster { config }
    }
    /// Check that a forecast can be made from a store with a network, without touching either.
    ///
    /// On success, return the range to normalize prices with and the date of the last record.
    pub fn check<N: Network>(
        &self,
        store: &Store,
        network: &N,
    ) -> Result<(NormalizationRange, NaiveDate), ForecastError> {
        let required = self.config.required_records();
        let last_date = match store.last() {
            Some(last) if store.len() >= required => last.date,
            _ => {
                return Err(ForecastError::InsufficientRecords {
                    required,
                    available: store.len(),
                })
            }
        };
        if network.inputs() != self.config.window {
            return Err(ForecastError::WindowMismatch {
                network: network.inputs(),
                configured: self.config.window,
            });
        }
        let range = NormalizationRange::of(store.prices()).ok_or(ForecastError::FlatSeries)?;
        Ok((range, last_date))
    }
    /// Retrain `network` from scratch on every price in `store`, then forecast the following days
    pub fn train_and_predict<N, R>(
        &self,
        store: &Store,
        network: &mut N,
        rng: &mut R,
    ) -> Result<Forecast, ForecastError>
    where
        N: Network,
        R: Rng,
    {
        self.train_and_predict_with_callback(store, network, rng, |_| ())
    }
    /// Like [`train_and_predict`](Forecaster::train_and_predict), reporting training progress to `callback`
    pub fn train_and_predict_with_callback<N, R, C>(
        &self,
        store: &Store,
        network: &mut N,
        rng: &mut R,
        callback: C,
    ) -> Result<Forecast, ForecastError>
    where
        N: Network,
        R: Rng,
        C: FnMut(TrainingStatus),
    {
        let (range, last_date) = self.check(store, network)?;
        let prices = store.prices();

        let pairs = training_pairs(&prices, &range, self.config.window);
        debug!(pairs = pairs.len(), min = range.min, max = range.max, "built training set");
        let training = network.train_with_callback(&pairs, &self.config.training, rng, callback);

        let mut window = last_window(&prices, &range, self.config.window);
        let mut predictions = Vec::with_capacity(self.config.horizon);
        for date in days_after(last_date, self.config.horizon) {
            let output = network.run(&window);
            predictions.push(PredictionResult {
                date,
                price: range.denormalize(output),
                confidence: self.confidence(rng),
            });
            window.remove(0);
            window.push(output);
        }
        info!(
            records = prices.len(),
            predictions = predictions.len(),
            iterations = training.iterations,
            error = training.error,
            "forecast complete"
        );
        Ok(Forecast {
            predictions,
            range,
            training,
        })
    }
    fn confidence<R: Rng>(&self, rng: &mut R) -> u8 {
        let (start, end) = (self.config.confidence.start, self.config.confidence.end);
        if start >= end {
            return start;
        }
        rng.gen_range(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::window::TrainingPair;
    use crate::data::PriceRecord;
    use chrono::Duration;
    use rand::{rngs::StdRng, SeedableRng};

    /// A network which echoes the newest value of its window, plus a fixed step, and counts training calls
    struct Echo {
        step: f64,
        trained: usize,
        pairs_seen: usize,
    }

    impl Echo {
        fn new(step: f64) -> Echo {
            Echo {
                step,
                trained: 0,
                pairs_seen: 0,
            }
        }
    }

    impl Network for Echo {
        fn inputs(&self) -> usize {
            WINDOW_SIZE
        }
        fn train_with_callback<R: Rng, C: FnMut(TrainingStatus)>(
            &mut self,
            pairs: &[TrainingPair],
            _options: &TrainingOptions,
            _rng: &mut R,
            mut callback: C,
        ) -> TrainingStatus {
            self.trained += 1;
            self.pairs_seen = pairs.len();
            let status = TrainingStatus {
                iterations: 1,
                error: 0.0,
            };
            callback(status);
            status
        }
        fn run(&self, input: &[f64]) -> f64 {
            input[input.len() - 1] + self.step
        }
    }

    fn store_of(prices: &[f64]) -> Store {
        let start = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
        let mut store = Store::new();
        for (i, &price) in prices.iter().enumerate() {
            store
                .insert(PriceRecord::new("AMZN", start + Duration::days(i as i64), price))
                .unwrap();
        }
        store
    }

    #[test]
    fn too_few_records_is_rejected_untouched() {
        let store = store_of(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let mut network = Echo::new(0.0);
        let result = Forecaster::default().train_and_predict(&store, &mut network, &mut StdRng::seed_from_u64(0));
        assert_eq!(
            result,
            Err(ForecastError::InsufficientRecords {
                required: 10,
                available: 9
            })
        );
        assert_eq!(network.trained, 0);
    }

    #[test]
    fn check_yields_range_and_last_date() {
        let prices: Vec<f64> = (0..12).map(|i| 40.0 + i as f64).collect();
        let store = store_of(&prices);
        let (range, last_date) = Forecaster::default().check(&store, &Echo::new(0.0)).unwrap();
        assert_eq!(range, NormalizationRange { min: 40.0, max: 51.0 });
        assert_eq!(last_date, NaiveDate::from_ymd_opt(2020, 6, 12).unwrap());
        assert_eq!(
            Forecaster::default().check(&Store::new(), &Echo::new(0.0)),
            Err(ForecastError::InsufficientRecords {
                required: 10,
                available: 0
            })
        );
    }

    #[test]
    fn flat_series_is_rejected() {
        let store = store_of(&[50.0; 12]);
        let mut network = Echo::new(0.0);
        let result = Forecaster::default().train_and_predict(&store, &mut network, &mut StdRng::seed_from_u64(0));
        assert_eq!(result, Err(ForecastError::FlatSeries));
        assert_eq!(network.trained, 0);
    }

    #[test]
    fn mismatched_window_is_rejected() {
        let store = store_of(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0]);
        let mut network = Echo::new(0.0);
        let forecaster = Forecaster::new(ForecastConfig {
            window: 3,
            ..ForecastConfig::default()
        });
        let result = forecaster.train_and_predict(&store, &mut network, &mut StdRng::seed_from_u64(0));
        assert_eq!(
            result,
            Err(ForecastError::WindowMismatch {
                network: WINDOW_SIZE,
                configured: 3
            })
        );
        assert_eq!(network.trained, 0);
    }

    #[test]
    fn predictions_feed_back_into_the_window() {
        // Prices 100..=110, so one normalized step of 0.1 is one dollar
        let prices: Vec<f64> = (0..=10).map(|i| 100.0 + i as f64).collect();
        let store = store_of(&prices);
        let mut network = Echo::new(0.1);
        let forecast = Forecaster::default()
            .train_and_predict(&store, &mut network, &mut StdRng::seed_from_u64(4))
            .unwrap();
        assert_eq!(network.trained, 1);
        assert_eq!(network.pairs_seen, prices.len() - WINDOW_SIZE);
        let predicted: Vec<f64> = forecast.predictions.iter().map(|p| p.price).collect();
        for (i, price) in predicted.iter().enumerate() {
            assert!((price - (111.0 + i as f64)).abs() < 1e-9, "{:?}", predicted);
        }
    }

    #[test]
    fn predictions_are_dated_and_scored() {
        let prices: Vec<f64> = (0..30).map(|i| 20.0 + (i as f64 * 0.3).sin()).collect();
        let store = store_of(&prices);
        let mut network = Echo::new(0.0);
        let mut reported = 0;
        let forecast = Forecaster::default()
            .train_and_predict_with_callback(&store, &mut network, &mut StdRng::seed_from_u64(8), |_| reported += 1)
            .unwrap();
        assert_eq!(reported, 1);
        assert_eq!(forecast.predictions.len(), 5);
        let mut expected = store.last().unwrap().date;
        for prediction in &forecast.predictions {
            expected = expected + Duration::days(1);
            assert_eq!(prediction.date, expected);
            assert!(prediction.confidence >= 70 && prediction.confidence < 80);
        }
    }
}
