/*!
Forecast the next few days of a stock, from a CSV file or from generated sample data
*/
use anyhow::format_err;
use clap::{App, Arg};
use indicatif::{ProgressBar, ProgressStyle};
use io_enum::*;
use pricecast::chart::ChartData;
use pricecast::data::{
    csv::{read_records, write_predictions},
    store::Store,
};
use pricecast::forecast::{ForecastConfig, Forecaster};
use pricecast::nn::{FeedForwardDesc, TrainingOptions};
use rand::{rngs::StdRng, SeedableRng};
use std::fs::File;
use std::io::{stdin, stdout, Stdin};
use std::path::Path;
use tracing::Level;

#[derive(Debug, Read)]
pub enum IoSources {
    Stdin(Stdin),
    File(File),
}

fn parse_arg<T: std::str::FromStr>(value: Option<&str>, name: &str, default: T) -> anyhow::Result<T> {
    match value {
        Some(value) => value
            .parse()
            .map_err(|_| format_err!("Invalid value for {}: {:?}", name, value)),
        None => Ok(default),
    }
}

pub fn main() -> anyhow::Result<()> {
    let matches = App::new("Pricecast")
        .version("1.0")
        .about("Trains a small neural network on daily prices and forecasts the days which follow")
        .arg(
            Arg::with_name("INPUT")
                .help("CSV file of symbol,date,price rows; '-' reads stdin. Generates sample data if omitted")
                .index(1),
        )
        .arg(
            Arg::with_name("symbol")
                .short("s")
                .long("symbol")
                .help("Symbol to generate sample data for. Defaults to AMZN")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("iterations")
                .short("i")
                .long("iterations")
                .help("Maximum training iterations. Defaults to 2000")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .help("Seed for the random number generator")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("chart")
                .short("c")
                .long("chart")
                .help("Write the historical and predicted series as CSV to this file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Sets the level of verbosity"),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut rng = match matches.value_of("seed") {
        Some(seed) => StdRng::seed_from_u64(parse_arg(Some(seed), "seed", 0)?),
        None => StdRng::from_entropy(),
    };
    let iterations = parse_arg(matches.value_of("iterations"), "iterations", TrainingOptions::default().iterations)?;

    let store = match matches.value_of("INPUT") {
        Some(path) => {
            let reader = if path == "-" {
                IoSources::Stdin(stdin())
            } else {
                IoSources::File(File::open(Path::new(path))?)
            };
            read_records(reader)?
        }
        None => {
            let symbol = matches.value_of("symbol").unwrap_or("AMZN");
            let mut store = Store::new();
            store.generate_sample_today(symbol, &mut rng);
            store
        }
    };
    eprintln!("Loaded {} records", store.len());

    let config = ForecastConfig {
        training: TrainingOptions {
            iterations,
            ..TrainingOptions::default()
        },
        ..ForecastConfig::default()
    };
    let mut network = FeedForwardDesc::default().build(&mut rng);
    let forecaster = Forecaster::new(config);

    let progress = ProgressBar::new(iterations as u64);
    progress.set_style(ProgressStyle::default_bar().template("Training: {wide_bar} {pos:>5}/{len:5} {msg}"));
    let result = forecaster.train_and_predict_with_callback(&store, &mut network, &mut rng, |status| {
        progress.set_position(status.iterations as u64);
        progress.set_message(&format!("error = {:.5}", status.error));
    });
    progress.finish_and_clear();
    let forecast = result?;

    eprintln!(
        "Trained for {} iterations, error = {:.5}",
        forecast.training.iterations, forecast.training.error
    );
    write_predictions(stdout(), &forecast.predictions)?;

    if let Some(path) = matches.value_of("chart") {
        let chart = ChartData::from_forecast(store.records(), &forecast.predictions);
        let rows = chart.write_csv(File::create(Path::new(path))?)?;
        eprintln!("Wrote {} chart rows to {}", rows, path);
    }
    Ok(())
}
