use serde::Serialize;
use std::{borrow::Borrow, fmt};

/// [ZipCode] is the postal code identifying one row of source data.
/// Leading zeros are kept exactly as loaded.
#[derive(Debug, Clone, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize)]
pub struct ZipCode(String);

impl ZipCode {
    /// Returns [Some] only for a non empty run of ascii digits.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// [CityName] is compared case-sensitively and never normalized, so
/// "San Jose" and "san jose" are two different cities.
#[derive(Debug, Clone, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize)]
pub struct CityName(String);

impl CityName {
    /// Returns [Some] for a non empty name that does not read as a number.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value.parse::<f64>().is_ok() {
            return None;
        }
        Some(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CityName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// [Price] represents a monthly rental price with defined
/// precision [`Price::PRICE_PRECISION_EXP`].
/// Rounding is half away from zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    const PRICE_PRECISION_EXP: f64 = 1e1;

    pub fn new(value: f64) -> Self {
        let rounded = (value * Self::PRICE_PRECISION_EXP).round() / Self::PRICE_PRECISION_EXP;
        Self(rounded)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Arithmetic mean of `values`, rounded. [None] when `values` is empty.
    pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let (count, sum) = values
            .into_iter()
            .fold((0usize, 0f64), |(count, sum), value| (count + 1, sum + value));
        if count == 0 {
            return None;
        }
        Some(Self::new(sum / count as f64))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{CityName, Price, ZipCode};

    #[test]
    fn test_zip_code_keeps_leading_zeros() {
        let zip = ZipCode::parse(" 02134 ").expect("digits should parse");
        assert_eq!(zip.as_str(), "02134");
    }

    #[test]
    fn test_zip_code_rejects_non_digits() {
        for value in ["", "94a01", "+9430", "-1", "94301.0", "Campbell"] {
            assert_eq!(ZipCode::parse(value), None, "'{value}' is not a zip code");
        }
    }

    #[test]
    fn test_city_name_rejects_numbers() {
        assert_eq!(CityName::parse("94301"), None);
        assert_eq!(CityName::parse("1000.5"), None);
        assert_eq!(CityName::parse("   "), None);
        assert_eq!(
            CityName::parse(" Palo Alto ").map(|c| c.as_str().to_string()),
            Some("Palo Alto".to_string())
        );
    }

    #[test]
    fn test_city_name_is_case_sensitive() {
        assert_ne!(CityName::parse("Campbell"), CityName::parse("campbell"));
    }

    #[test]
    fn test_price_rounds_to_one_decimal() {
        assert_eq!(Price::new(1000.26).value(), 1000.3);
        assert_eq!(Price::new(1000.24).value(), 1000.2);
        assert_eq!(Price::new(2500.0).to_string(), "2500.0");
    }

    #[test]
    fn test_price_mean() {
        assert_eq!(Price::mean([1000.0, 1001.0]), Some(Price::new(1000.5)));
        assert_eq!(Price::mean([1000.0, 2000.0, 2001.0]), Some(Price::new(1667.0)));
        assert_eq!(Price::mean(std::iter::empty()), None);
    }
}
