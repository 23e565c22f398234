/*!
Keep a list of daily prices interactively, and forecast from it on demand
*/
use pricecast::data::store::Store;
use pricecast::forecast::Forecaster;
use pricecast::nn::FeedForwardDesc;
use rand::thread_rng;
use rustyline::error::ReadlineError;
use rustyline::Editor;

const HELP: &str = "\
Commands:
  add SYMBOL YYYY-MM-DD PRICE   add a price
  remove N                      remove the Nth price in the list
  list                          show every price
  generate SYMBOL               replace the list with 60 days of sample prices
  train                         train the network and forecast the next 5 days
  clear                         remove every price
  help                          show this message
  quit                          exit";

fn list(store: &Store) {
    if store.is_empty() {
        println!("No prices yet");
    }
    for (i, record) in store.records().iter().enumerate() {
        println!("{:>3}. {:<6} {} {:>10.2}", i + 1, record.symbol, record.date, record.price);
    }
}

fn main() {
    let mut rng = thread_rng();
    let mut store = Store::new();
    let forecaster = Forecaster::default();
    let mut network = FeedForwardDesc::default().build(&mut rng);
    let mut rl = Editor::<()>::new();
    println!("{}", HELP);
    loop {
        let line = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                eprintln!("CTRL-C");
                return;
            }
            Err(ReadlineError::Eof) => {
                eprintln!("CTRL-D");
                return;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                continue;
            }
        };
        rl.add_history_entry(line.as_str());
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["add", symbol, date, price] => match store.add(symbol, date, price) {
                Ok(record) => println!("Added {} {} {:.2}", record.symbol, record.date, record.price),
                Err(err) => eprintln!("Rejected: {}", err),
            },
            ["add", ..] => eprintln!("Usage: add SYMBOL YYYY-MM-DD PRICE"),
            ["remove", position] => match position.parse::<usize>() {
                Ok(position) if position >= 1 => match store.remove(position - 1) {
                    Ok(record) => println!("Removed {} {}", record.symbol, record.date),
                    Err(err) => eprintln!("Rejected: {}", err),
                },
                _ => eprintln!("Invalid position: {:?}", position),
            },
            ["list"] => list(&store),
            ["generate", symbol] => {
                store.generate_sample_today(symbol, &mut rng);
                list(&store);
            }
            ["train"] => match forecaster.train_and_predict(&store, &mut network, &mut rng) {
                Ok(forecast) => {
                    println!(
                        "Trained for {} iterations, error = {:.5}",
                        forecast.training.iterations, forecast.training.error
                    );
                    for prediction in &forecast.predictions {
                        println!(
                            "{} {:>10.2} ({}% confidence)",
                            prediction.date, prediction.price, prediction.confidence
                        );
                    }
                }
                Err(err) => eprintln!("Rejected: {}", err),
            },
            ["clear"] => store.clear(),
            ["help"] => println!("{}", HELP),
            ["quit"] | ["exit"] => return,
            _ => eprintln!("Unknown command: {:?}. Type 'help' for a list of commands", line),
        }
    }
}
