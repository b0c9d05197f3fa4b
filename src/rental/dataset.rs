use std::{collections::BTreeMap, fs, io, path::Path};

use serde::Serialize;
use tracing::{debug, info};

use super::{
    common::{CityName, Price, ZipCode},
    error::RentalError,
    record::{self, LabelTable, RecordError},
    window::ObservationWindow,
};

/// [CityAverages] maps each city to its mean price per month. Iteration order
/// is ascending by city name.
pub type CityAverages = BTreeMap<CityName, Vec<Price>>;

/// [ZipRecord] is one zip code with its raw monthly prices. Every record of a
/// [Dataset] holds one price per month of the observation window.
#[derive(Debug, Clone, PartialEq)]
pub struct ZipRecord {
    pub zip_code: ZipCode,
    pub city_name: CityName,
    pub monthly_prices: Vec<f64>,
}

impl ZipRecord {
    pub fn latest_price(&self) -> Option<f64> {
        self.monthly_prices.last().copied()
    }
}

/// [LatestPrice] is the most recent price of one zip code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestPrice {
    #[serde(rename = "zip")]
    pub zip_code: ZipCode,

    #[serde(rename = "city")]
    pub city_name: CityName,

    #[serde(rename = "price")]
    pub price: f64,
}

/// [CsvInput] is the content of one input file along with where it came from.
#[derive(Debug, Clone, Copy)]
pub struct CsvInput<'a> {
    pub path: &'a Path,
    pub content: &'a str,
}

impl<'a> CsvInput<'a> {
    pub fn new(path: &'a Path, content: &'a str) -> Self {
        Self { path, content }
    }
}

/// [FileRoles] states whether the two input files held what their position
/// promised or had to be swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileRoles {
    AsGiven,
    Swapped,
}

struct ParsedInputs<'a> {
    labels: LabelTable,
    prices: Vec<Vec<f64>>,
    price_path: &'a Path,
}

/// [AttemptError] records how far one file-role attempt got before failing.
enum AttemptError {
    Labels(RentalError),
    Prices(RentalError),
}

impl AttemptError {
    fn into_inner(self) -> RentalError {
        match self {
            Self::Labels(err) | Self::Prices(err) => err,
        }
    }
}

fn parse_inputs<'a>(
    labels: CsvInput<'a>,
    prices: CsvInput<'a>,
    months: usize,
) -> Result<ParsedInputs<'a>, AttemptError> {
    let label_table = record::parse_labels(labels.content)
        .map_err(|source| AttemptError::Labels(RentalError::data_format(labels.path, source)))?;
    let price_rows = record::parse_prices(prices.content, months)
        .map_err(|source| AttemptError::Prices(RentalError::data_format(prices.path, source)))?;
    Ok(ParsedInputs {
        labels: label_table,
        prices: price_rows,
        price_path: prices.path,
    })
}

fn read_input(path: &Path) -> Result<String, RentalError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => RentalError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => RentalError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Fails on the first record that does not hold exactly `months` prices.
fn check_month_count(records: &[ZipRecord], months: usize) -> Result<(), RentalError> {
    for (index, record) in records.iter().enumerate() {
        if record.monthly_prices.len() != months {
            return Err(RentalError::InvalidRecord {
                zip_code: record.zip_code.clone(),
                source: RecordError::WrongMonthCount {
                    line: index as u64 + 1,
                    expected: months,
                    found: record.monthly_prices.len(),
                },
            });
        }
    }
    Ok(())
}

/// Mean monthly price of every record named `city`.
fn mean_for_city(records: &[ZipRecord], city: &CityName) -> Result<Vec<Price>, RentalError> {
    let selected: Vec<&ZipRecord> = records.iter().filter(|r| &r.city_name == city).collect();
    let empty_group = || RentalError::EmptyGroup(city.to_string());
    let first = selected.first().ok_or_else(empty_group)?;
    let months = first.monthly_prices.len();
    (0..months)
        .map(|month| {
            let values: Option<Vec<f64>> = selected
                .iter()
                .map(|r| r.monthly_prices.get(month).copied())
                .collect();
            values.and_then(Price::mean).ok_or_else(empty_group)
        })
        .collect()
}

/// Computes the mean price per month for every distinct city. All records
/// must hold the same number of prices.
pub fn compute_city_averages(records: &[ZipRecord]) -> Result<CityAverages, RentalError> {
    if let Some(first) = records.first() {
        check_month_count(records, first.monthly_prices.len())?;
    }
    let mut averages = CityAverages::new();
    for record in records {
        if averages.contains_key(&record.city_name) {
            continue;
        }
        let means = mean_for_city(records, &record.city_name)?;
        averages.insert(record.city_name.clone(), means);
    }
    Ok(averages)
}

/// [Dataset] holds every loaded [ZipRecord] and the [CityAverages] derived
/// from them. It is read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    window: ObservationWindow,
    records: Vec<ZipRecord>,
    averages: CityAverages,
}

impl Dataset {
    /// Reads both files and builds the dataset. Which file holds the labels is
    /// detected from the content, so the arguments may come in either order.
    pub fn load(
        city_file: impl AsRef<Path>,
        price_file: impl AsRef<Path>,
        window: ObservationWindow,
    ) -> Result<Self, RentalError> {
        let city_file = city_file.as_ref();
        let price_file = price_file.as_ref();
        let city_content = read_input(city_file)?;
        let price_content = read_input(price_file)?;
        Self::from_csv(
            CsvInput::new(city_file, &city_content),
            CsvInput::new(price_file, &price_content),
            window,
        )
    }

    /// Builds the dataset from in-memory file content.
    ///
    /// Labels are first read from `city` and prices from `price`; if that
    /// fails the two inputs are tried the other way around. When both fail
    /// the error of the attempt that got past its label file is returned,
    /// and the first attempt's error otherwise.
    pub fn from_csv(
        city: CsvInput<'_>,
        price: CsvInput<'_>,
        window: ObservationWindow,
    ) -> Result<Self, RentalError> {
        let months = window.month_count();
        let (roles, parsed) = match parse_inputs(city, price, months) {
            Ok(parsed) => (FileRoles::AsGiven, parsed),
            Err(first) => match (first, parse_inputs(price, city, months)) {
                (_, Ok(parsed)) => (FileRoles::Swapped, parsed),
                (AttemptError::Labels(_), Err(AttemptError::Prices(second))) => return Err(second),
                (first, Err(_)) => return Err(first.into_inner()),
            },
        };

        let ParsedInputs {
            labels,
            prices,
            price_path,
        } = parsed;
        if labels.labels.len() != prices.len() {
            return Err(RentalError::data_format(
                price_path,
                RecordError::RowCountMismatch {
                    labels: labels.labels.len(),
                    prices: prices.len(),
                },
            ));
        }
        info!(
            ?roles,
            order = ?labels.order,
            rows = prices.len(),
            months,
            "loaded rental data"
        );

        let records = labels
            .labels
            .into_iter()
            .zip(prices)
            .map(|(label, monthly_prices)| ZipRecord {
                zip_code: label.zip_code,
                city_name: label.city_name,
                monthly_prices,
            })
            .collect();
        Self::from_records(records, window)
    }

    /// Builds the dataset from records holding one price per month of
    /// `window`. Fails with [RentalError::InvalidRecord] otherwise.
    pub fn from_records(
        records: Vec<ZipRecord>,
        window: ObservationWindow,
    ) -> Result<Self, RentalError> {
        check_month_count(&records, window.month_count())?;
        let averages = compute_city_averages(&records)?;
        for (city, means) in &averages {
            debug!(city = %city, ?means, "city averages");
        }
        Ok(Self {
            window,
            records,
            averages,
        })
    }

    /// Loads both files again with the current window. The current dataset
    /// is only replaced once the new one is complete, and stays as it was on
    /// error.
    pub fn reload(
        &mut self,
        city_file: impl AsRef<Path>,
        price_file: impl AsRef<Path>,
    ) -> Result<(), RentalError> {
        let fresh = Self::load(city_file, price_file, self.window)?;
        *self = fresh;
        Ok(())
    }

    pub fn records(&self) -> &[ZipRecord] {
        &self.records
    }

    pub fn trend_for_city(&self, city_name: &str) -> Result<&[Price], RentalError> {
        self.averages
            .get(city_name)
            .map(Vec::as_slice)
            .ok_or_else(|| RentalError::UnknownCity(city_name.to_string()))
    }

    pub fn trend_for_all_cities(&self) -> &CityAverages {
        &self.averages
    }

    /// Latest price of every zip code, cheapest first. Equal prices keep
    /// their load order.
    pub fn latest_prices_by_zip(&self) -> Vec<LatestPrice> {
        let mut latest: Vec<LatestPrice> = self
            .records
            .iter()
            .filter_map(|record| {
                Some(LatestPrice {
                    zip_code: record.zip_code.clone(),
                    city_name: record.city_name.clone(),
                    price: record.latest_price()?,
                })
            })
            .collect();
        latest.sort_by(|left, right| left.price.total_cmp(&right.price));
        latest
    }

    pub fn month_labels(&self) -> Vec<String> {
        self.window.labels()
    }
}
