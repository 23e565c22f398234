/*!
Generate fake price data, for demos and testing purposes
*/
use rand::Rng;
use rand_distr::StandardNormal;

/// A trait implemented by price generators
pub trait PriceGen {
    /// Generate the price for the next day
    fn next_price(&mut self) -> f64;
}

/// The base price used for symbols without a known base price
pub const DEFAULT_BASE_PRICE: f64 = 100.0;

/// A rough starting price for a handful of well-known symbols
pub fn base_price(symbol: &str) -> f64 {
    match symbol.trim().to_uppercase().as_str() {
        "AAPL" => 180.0,
        "MSFT" => 370.0,
        "GOOGL" | "GOOG" => 140.0,
        "AMZN" => 3100.0,
        "TSLA" => 240.0,
        "NVDA" => 480.0,
        "META" => 330.0,
        _ => DEFAULT_BASE_PRICE,
    }
}

/// Generate fake prices as a base price with a slow sinusoidal drift and clipped gaussian noise
#[derive(Debug, Copy, Clone)]
pub struct SinusoidalDrift<R> {
    /// The RNG used for noise
    pub rng: R,
    /// The price the drift oscillates around
    pub base: f64,
    /// The amplitude of the drift, as a fraction of the base price
    pub amplitude: f64,
    /// The angular step of the drift per day, in radians
    pub frequency: f64,
    /// The standard deviation of the noise, as a fraction of the base price
    pub jitter: f64,
    /// The number of days generated so far
    pub day: u32,
}

impl<R> SinusoidalDrift<R> {
    /// Noise is clipped to this many standard deviations
    pub const NOISE_CLIP: f64 = 2.0;

    /// A generator around the base price of a given symbol
    pub fn for_symbol(symbol: &str, rng: R) -> SinusoidalDrift<R> {
        SinusoidalDrift {
            rng,
            base: base_price(symbol),
            amplitude: 0.05,
            frequency: 0.1,
            jitter: 0.01,
            day: 0,
        }
    }
}

impl<R: Rng> PriceGen for SinusoidalDrift<R> {
    fn next_price(&mut self) -> f64 {
        let drift = self.amplitude * (self.day as f64 * self.frequency).sin();
        let z: f64 = self.rng.sample(StandardNormal);
        let noise = self.jitter * z.max(-Self::NOISE_CLIP).min(Self::NOISE_CLIP);
        self.day += 1;
        self.base * (1.0 + drift + noise)
    }
}
