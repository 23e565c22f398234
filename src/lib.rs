/*!
Forecast the next few daily prices of a stock with a small feed-forward neural network, written in Rust.

Prices are kept in an ordered [`Store`](data::store::Store), scaled into `[0, 1]`, cut into sliding windows
to train a [`Network`](nn::Network), and then extrapolated autoregressively by the
[`Forecaster`](forecast::Forecaster). Everything is plain data in, plain data out: rendering the results is
left to whoever consumes [`ChartData`](chart::ChartData).
*/
#![forbid(missing_docs)]

pub mod chart;
pub mod data;
pub mod forecast;
pub mod nn;
pub mod util;

/// The floating point type to be used for price calculations
pub type CpuFloat = f64;
