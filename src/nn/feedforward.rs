/*!
A small fully-connected network of sigmoid units, trained online with backpropagation and momentum
*/
use super::{sigmoid, Network, TrainingOptions, TrainingStatus};
use crate::data::window::{TrainingPair, WINDOW_SIZE};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Initial weights and biases are drawn uniformly from `[-INIT_RANGE, INIT_RANGE)`
const INIT_RANGE: f64 = 0.2;

/// A descriptor for an instance of the feed-forward model
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FeedForwardDesc {
    /// The length of the input window
    pub inputs: usize,
    /// The size of each hidden layer
    pub hidden: Vec<usize>,
}

impl Default for FeedForwardDesc {
    fn default() -> FeedForwardDesc {
        FeedForwardDesc {
            inputs: WINDOW_SIZE,
            hidden: vec![4],
        }
    }
}

impl FeedForwardDesc {
    /// Build a randomly initialized `FeedForward` network with a single output
    pub fn build<R: Rng>(&self, rng: &mut R) -> FeedForward {
        let mut network = FeedForward {
            desc: self.clone(),
            layers: Vec::new(),
        };
        network.initialize(rng);
        network
    }
    fn sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden.len() + 2);
        sizes.push(self.inputs);
        sizes.extend_from_slice(&self.hidden);
        sizes.push(1);
        sizes
    }
}

#[derive(Debug, Clone)]
struct Layer {
    /// Weight matrix (outputs x inputs)
    weights: Array2<f64>,
    biases: Array1<f64>,
    /// The previous weight update, for momentum
    changes: Array2<f64>,
}

impl Layer {
    fn random<R: Rng>(inputs: usize, outputs: usize, rng: &mut R) -> Layer {
        Layer {
            weights: Array2::from_shape_fn((outputs, inputs), |_| {
                rng.gen_range(-INIT_RANGE, INIT_RANGE)
            }),
            biases: Array1::from_shape_fn(outputs, |_| rng.gen_range(-INIT_RANGE, INIT_RANGE)),
            changes: Array2::zeros((outputs, inputs)),
        }
    }
}

/// A fully-connected network of sigmoid units with a single output
#[derive(Debug, Clone)]
pub struct FeedForward {
    desc: FeedForwardDesc,
    layers: Vec<Layer>,
}

impl FeedForward {
    /// The descriptor this network was built from
    pub fn desc(&self) -> &FeedForwardDesc {
        &self.desc
    }
    fn initialize<R: Rng>(&mut self, rng: &mut R) {
        let sizes = self.desc.sizes();
        self.layers = sizes
            .windows(2)
            .map(|pair| Layer::random(pair[0], pair[1], &mut *rng))
            .collect();
    }
    /// The activations of every layer, starting with the input itself
    fn forward(&self, input: ArrayView1<f64>) -> Vec<Array1<f64>> {
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        let mut current = input.to_owned();
        for layer in &self.layers {
            let next = (layer.weights.dot(&current) + &layer.biases).mapv(sigmoid);
            activations.push(current);
            current = next;
        }
        activations.push(current);
        activations
    }
    /// Run one pair through the network and adjust the weights,
    /// returning the squared error before the update
    fn learn(&mut self, pair: &TrainingPair, options: &TrainingOptions) -> f64 {
        let activations = self.forward(ArrayView1::from(&pair.input[..]));
        let output = activations[self.layers.len()][0];
        let mut errors = Array1::from_elem(1, pair.output - output);
        let squared_error = errors[0] * errors[0];
        for (index, layer) in self.layers.iter_mut().enumerate().rev() {
            let out = &activations[index + 1];
            let delta = &errors * &out.mapv(|o| o * (1.0 - o));
            // Propagate through the weights as they were before this update
            errors = layer.weights.t().dot(&delta);
            let input = &activations[index];
            let gradient = delta
                .view()
                .insert_axis(Axis(1))
                .dot(&input.view().insert_axis(Axis(0)));
            layer.changes = gradient * options.learning_rate + &layer.changes * options.momentum;
            layer.weights += &layer.changes;
            layer.biases.scaled_add(options.learning_rate, &delta);
        }
        squared_error
    }
}

impl Network for FeedForward {
    fn inputs(&self) -> usize {
        self.desc.inputs
    }

    fn train_with_callback<R, C>(
        &mut self,
        pairs: &[TrainingPair],
        options: &TrainingOptions,
        rng: &mut R,
        mut callback: C,
    ) -> TrainingStatus
    where
        R: Rng,
        C: FnMut(TrainingStatus),
    {
        self.initialize(rng);
        let mut status = TrainingStatus {
            iterations: 0,
            error: 1.0,
        };
        if pairs.is_empty() {
            return status;
        }
        // Always make at least one pass, whatever the threshold
        while status.iterations < options.iterations
            && (status.iterations == 0 || status.error > options.error_thresh)
        {
            let total: f64 = pairs.iter().map(|pair| self.learn(pair, options)).sum();
            status.error = total / pairs.len() as f64;
            status.iterations += 1;
            if options.callback_period != 0 && status.iterations % options.callback_period == 0 {
                callback(status);
            }
        }
        debug!(
            iterations = status.iterations,
            error = status.error,
            pairs = pairs.len(),
            "finished training"
        );
        status
    }

    fn run(&self, input: &[f64]) -> f64 {
        debug_assert_eq!(input.len(), self.desc.inputs, "Wrong input window length!");
        let activations = self.forward(ArrayView1::from(input));
        activations[self.layers.len()][0]
    }
}
