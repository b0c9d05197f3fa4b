use bay_rent::rental::{
    common::Price,
    dataset::Dataset,
    error::RentalError,
    window::{ObservationWindow, YearMonth},
};
use clap::{Parser, Subcommand};
use std::{io::Write, path::PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File of `zip,city` (or `city,zip`) rows.
    #[arg(long, default_value = "cities.csv")]
    cities: PathBuf,

    /// File of monthly prices, one row per zip code.
    #[arg(long, default_value = "rent.csv")]
    rents: PathBuf,

    /// First month of the price rows, as `month/year`.
    #[arg(long, default_value_t = ObservationWindow::default().start())]
    start: YearMonth,

    /// Last month of the price rows, as `month/year`.
    #[arg(long, default_value_t = ObservationWindow::default().end())]
    end: YearMonth,

    #[command(subcommand)]
    view: View,
}

#[derive(Subcommand, Debug)]
enum View {
    /// Average monthly price trend of one city, or of every city.
    Trend {
        #[arg(long)]
        city: Option<String>,
    },
    /// Latest price of every zip code, cheapest first.
    Latest,
    /// Month labels of the observation window.
    Months,
}

fn write_trend(
    dataset: &Dataset,
    city: Option<&str>,
    out: impl Write,
) -> Result<(), anyhow::Error> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(out);
    let mut header = vec!["city".to_string()];
    header.extend(dataset.month_labels());
    csv_writer.write_record(&header)?;

    let mut write_row = |name: &str, means: &[Price]| {
        let row = std::iter::once(name.to_string()).chain(means.iter().map(|p| p.to_string()));
        csv_writer.write_record(row)
    };
    match city {
        Some(name) => write_row(name, dataset.trend_for_city(name)?)?,
        None => {
            for (name, means) in dataset.trend_for_all_cities() {
                write_row(name.as_str(), means)?;
            }
        }
    }
    csv_writer.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let window = ObservationWindow::new(args.start, args.end)?;

    // handle input
    let dataset = Dataset::load(&args.cities, &args.rents, window)?;
    info!(
        zip_codes = dataset.records().len(),
        cities = dataset.trend_for_all_cities().len(),
        "dataset ready"
    );

    // print output
    let stdout = std::io::stdout();
    let handle = stdout.lock();
    match args.view {
        View::Trend { city } => {
            if let Err(err) = write_trend(&dataset, city.as_deref(), handle) {
                if let Some(RentalError::UnknownCity(name)) = err.downcast_ref::<RentalError>() {
                    error!(city = %name, "no such city in the dataset");
                }
                return Err(err);
            }
        }
        View::Latest => {
            let mut csv_writer = csv::WriterBuilder::new()
                .has_headers(true)
                .from_writer(handle);
            for latest in dataset.latest_prices_by_zip() {
                csv_writer.serialize(latest)?
            }
            csv_writer.flush()?;
        }
        View::Months => {
            let mut csv_writer = csv::WriterBuilder::new().from_writer(handle);
            for label in dataset.month_labels() {
                csv_writer.write_record([label])?
            }
            csv_writer.flush()?;
        }
    }

    Ok(())
}
