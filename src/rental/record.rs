use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use super::common::{CityName, ZipCode};

/// [RecordError] explains why the content of one input file was rejected.
/// Line numbers are 1-based.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("line {line}: {message}")]
    Csv { line: u64, message: String },

    /// Neither `zip,city` nor `city,zip` fits every row. `line` is the first
    /// row that does not fit `zip,city`.
    #[error("line {line}: expected `zip,city` or `city,zip`, found `{found}`")]
    UnknownLabelLayout { line: u64, found: String },

    #[error("line {line}: expected finite monthly prices, found `{found}`")]
    InvalidPrice { line: u64, found: String },

    #[error("line {line}: expected {expected} monthly prices, found {found}")]
    WrongMonthCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{labels} zip code rows but {prices} price rows")]
    RowCountMismatch { labels: usize, prices: usize },
}

/// [ColumnOrder] states which column of the label file holds the zip code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrder {
    ZipThenCity,
    CityThenZip,
}

impl ColumnOrder {
    fn label(&self, row: &StringRecord) -> Option<CityLabel> {
        if row.len() != 2 {
            return None;
        }
        let (zip_code, city_name) = match self {
            Self::ZipThenCity => (row.get(0)?, row.get(1)?),
            Self::CityThenZip => (row.get(1)?, row.get(0)?),
        };
        Some(CityLabel {
            zip_code: ZipCode::parse(zip_code)?,
            city_name: CityName::parse(city_name)?,
        })
    }
}

/// [CityLabel] is one validated row of the label file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityLabel {
    pub zip_code: ZipCode,
    pub city_name: CityName,
}

/// [LabelTable] holds the label rows in file order together with the column
/// order they were found in.
#[derive(Debug, PartialEq)]
pub struct LabelTable {
    pub order: ColumnOrder,
    pub labels: Vec<CityLabel>,
}

fn read_rows(content: &str) -> Result<Vec<StringRecord>, RecordError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());
    rdr.records()
        .map(|row| {
            row.map_err(|err| RecordError::Csv {
                line: err.position().map_or(0, |pos| pos.line()),
                message: err.to_string(),
            })
        })
        .collect()
}

fn line_of(row: &StringRecord) -> u64 {
    row.position().map_or(0, |pos| pos.line())
}

/// Parses the label file. The whole file must use one column order:
/// `zip,city` is attempted first and `city,zip` second.
pub fn parse_labels(content: &str) -> Result<LabelTable, RecordError> {
    let rows = read_rows(content)?;
    for order in [ColumnOrder::ZipThenCity, ColumnOrder::CityThenZip] {
        let labels: Option<Vec<CityLabel>> = rows.iter().map(|row| order.label(row)).collect();
        if let Some(labels) = labels {
            return Ok(LabelTable { order, labels });
        }
    }
    // Both orders failed, so at least one row rejects the canonical one.
    let row = rows
        .iter()
        .find(|row| ColumnOrder::ZipThenCity.label(row).is_none())
        .cloned()
        .unwrap_or_default();
    Err(RecordError::UnknownLabelLayout {
        line: line_of(&row),
        found: row.iter().collect::<Vec<_>>().join(","),
    })
}

/// Parses the price file: every row must hold exactly `months` finite values.
pub fn parse_prices(content: &str, months: usize) -> Result<Vec<Vec<f64>>, RecordError> {
    read_rows(content)?
        .iter()
        .map(|row| {
            let line = line_of(row);
            let invalid = || RecordError::InvalidPrice {
                line,
                found: row.iter().collect::<Vec<_>>().join(","),
            };
            let prices = row.deserialize::<Vec<f64>>(None).map_err(|_| invalid())?;
            if prices.iter().any(|price| !price.is_finite()) {
                return Err(invalid());
            }
            if prices.len() != months {
                return Err(RecordError::WrongMonthCount {
                    line,
                    expected: months,
                    found: prices.len(),
                });
            }
            Ok(prices)
        })
        .collect()
}
