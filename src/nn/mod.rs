/*!
The networks which learn to continue a window of normalized prices
*/
use crate::data::window::TrainingPair;
use rand::Rng;
use serde::{Deserialize, Serialize};

mod feedforward;

pub use feedforward::{FeedForward, FeedForwardDesc};

/// Options controlling a training run
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingOptions {
    /// The maximum number of passes over the training set
    pub iterations: usize,
    /// Training stops once the mean squared error of a pass is at or below this.
    /// At least one pass is always made
    pub error_thresh: f64,
    /// The step size of each weight update
    pub learning_rate: f64,
    /// The fraction of the previous weight update carried into the next one
    pub momentum: f64,
    /// Report progress every this many iterations. Zero disables reporting
    pub callback_period: usize,
}

impl Default for TrainingOptions {
    fn default() -> TrainingOptions {
        TrainingOptions {
            iterations: 2000,
            error_thresh: 0.005,
            learning_rate: 0.3,
            momentum: 0.1,
            callback_period: 10,
        }
    }
}

/// The state of a training run
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStatus {
    /// The number of passes over the training set completed
    pub iterations: usize,
    /// The mean squared error of the last pass
    pub error: f64,
}

/// A model mapping a window of normalized prices to the next normalized price
pub trait Network {
    /// The length of the input window this network expects
    fn inputs(&self) -> usize;
    /// Train from scratch on a set of pairs, discarding anything learned before,
    /// reporting progress to `callback` every `options.callback_period` iterations
    fn train_with_callback<R, C>(
        &mut self,
        pairs: &[TrainingPair],
        options: &TrainingOptions,
        rng: &mut R,
        callback: C,
    ) -> TrainingStatus
    where
        R: Rng,
        C: FnMut(TrainingStatus);
    /// Train from scratch on a set of pairs, discarding anything learned before
    fn train<R: Rng>(
        &mut self,
        pairs: &[TrainingPair],
        options: &TrainingOptions,
        rng: &mut R,
    ) -> TrainingStatus {
        self.train_with_callback(pairs, options, rng, |_| ())
    }
    /// Predict the normalized value following an input window
    fn run(&self, input: &[f64]) -> f64;
}

/// The logistic function
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
