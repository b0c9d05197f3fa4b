use std::{fmt, iter, str::FromStr};

use thiserror::Error;
use time::Month;

use super::error::RentalError;

#[derive(Debug, Error, PartialEq)]
pub enum YearMonthError {
    #[error("expected `month/year`, found `{0}`")]
    BadFormat(String),
    #[error("month must be within 1..=12, found {0}")]
    BadMonth(u8),
}

/// [YearMonth] is one month of the observation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: Month,
}

impl YearMonth {
    pub fn new(year: i32, month: u8) -> Result<Self, YearMonthError> {
        let month = Month::try_from(month).map_err(|_| YearMonthError::BadMonth(month))?;
        Ok(Self { year, month })
    }

    /// Months elapsed since January of year zero.
    fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month as u8) - 1
    }

    pub fn next(&self) -> Self {
        match self.month {
            Month::December => Self {
                year: self.year + 1,
                month: Month::January,
            },
            month => Self {
                year: self.year,
                month: month.next(),
            },
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month as u8, self.year)
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad_format = || YearMonthError::BadFormat(s.to_string());
        let (month, year) = s.trim().split_once('/').ok_or_else(bad_format)?;
        let month = month.trim().parse::<u8>().map_err(|_| bad_format())?;
        let year = year.trim().parse::<i32>().map_err(|_| bad_format())?;
        Self::new(year, month)
    }
}

/// [ObservationWindow] is the fixed, inclusive range of months every price
/// row covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationWindow {
    start: YearMonth,
    end: YearMonth,
}

impl Default for ObservationWindow {
    /// May 2018 through August 2019.
    fn default() -> Self {
        Self {
            start: YearMonth {
                year: 2018,
                month: Month::May,
            },
            end: YearMonth {
                year: 2019,
                month: Month::August,
            },
        }
    }
}

impl ObservationWindow {
    pub fn new(start: YearMonth, end: YearMonth) -> Result<Self, RentalError> {
        if end.ordinal() < start.ordinal() {
            return Err(RentalError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> YearMonth {
        self.start
    }

    pub fn end(&self) -> YearMonth {
        self.end
    }

    /// Number of months in the window, both ends included. Never zero.
    pub fn month_count(&self) -> usize {
        (self.end.ordinal() - self.start.ordinal() + 1) as usize
    }

    pub fn months(&self) -> impl Iterator<Item = YearMonth> + '_ {
        iter::successors(Some(self.start), move |month| {
            (*month != self.end).then(|| month.next())
        })
    }

    /// `month/year` labels, e.g. `5/2018`, for axis labeling.
    pub fn labels(&self) -> Vec<String> {
        self.months().map(|month| month.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ObservationWindow, YearMonth, YearMonthError};
    use crate::rental::error::RentalError;

    fn ym(s: &str) -> YearMonth {
        s.parse().expect("valid month/year")
    }

    #[test]
    fn test_default_window_has_sixteen_months() {
        let window = ObservationWindow::default();
        assert_eq!(window.start().to_string(), "5/2018");
        assert_eq!(window.end().to_string(), "8/2019");
        assert_eq!(window.month_count(), 16);
        let labels = window.labels();
        assert_eq!(labels.len(), 16);
        assert_eq!(labels.first().map(String::as_str), Some("5/2018"));
        assert_eq!(labels.get(7).map(String::as_str), Some("12/2018"));
        assert_eq!(labels.get(8).map(String::as_str), Some("1/2019"));
        assert_eq!(labels.last().map(String::as_str), Some("8/2019"));
    }

    #[test]
    fn test_single_month_window() {
        let window = ObservationWindow::new(ym("3/2020"), ym("3/2020")).unwrap();
        assert_eq!(window.month_count(), 1);
        assert_eq!(window.labels(), vec!["3/2020".to_string()]);
    }

    #[test]
    fn test_reversed_window_is_rejected() {
        let res = ObservationWindow::new(ym("8/2019"), ym("5/2018"));
        assert!(matches!(res, Err(RentalError::InvalidWindow { .. })));
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!(ym(" 05/2018 ").to_string(), "5/2018");
        assert_eq!(
            "13/2018".parse::<YearMonth>(),
            Err(YearMonthError::BadMonth(13))
        );
        assert_eq!(
            "May 2018".parse::<YearMonth>(),
            Err(YearMonthError::BadFormat("May 2018".to_string()))
        );
        assert_eq!(
            "0/2018".parse::<YearMonth>(),
            Err(YearMonthError::BadMonth(0))
        );
    }
}
