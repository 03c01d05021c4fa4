use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::utils::round_tenth;

/// One calendar day of station observations, raw and unit-normalized.
///
/// `tmax_f`/`tmin_f` are derived from the raw readings by a single
/// dataset-wide conversion rule (see [`TemperatureScale`]); a missing raw
/// reading stays missing after conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub tmax_raw: Option<f64>,
    pub tmin_raw: Option<f64>,
    pub tmax_f: Option<f64>,
    pub tmin_f: Option<f64>,
}

impl DailyObservation {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

/// Unit encoding inferred for an entire source file.
///
/// The decision is global: the inference looks at the maximum magnitude across
/// every raw reading in the file and applies one rule to all of them. A file
/// that switches units mid-stream is not supported (known limitation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureScale {
    /// Raw values are tenths of a degree Celsius (GHCN-Daily convention).
    TenthsCelsius,
    /// Raw values are already whole degrees Fahrenheit.
    Fahrenheit,
}

impl TemperatureScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureScale::TenthsCelsius => "tenths_celsius",
            TemperatureScale::Fahrenheit => "fahrenheit",
        }
    }
}

impl fmt::Display for TemperatureScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The cleaned, sorted, unit-normalized daily observation sequence.
///
/// Invariants upheld by the loader: dates strictly ascending (duplicates
/// collapsed to the last occurrence in the source) and Fahrenheit fields
/// derived by exactly one conversion rule.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalDataset {
    days: Vec<DailyObservation>,
    scale: TemperatureScale,
}

impl CanonicalDataset {
    pub fn new(days: Vec<DailyObservation>, scale: TemperatureScale) -> Self {
        Self { days, scale }
    }

    pub fn days(&self) -> &[DailyObservation] {
        &self.days
    }

    pub fn scale(&self) -> TemperatureScale {
        self.scale
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Full unaggregated series in the wire shape: ISO dates ascending,
    /// temperatures rounded to 0.1 °F, missing readings as null.
    pub fn daily_series(&self) -> DailySeries {
        DailySeries {
            dates: self
                .days
                .iter()
                .map(|d| d.date.format("%Y-%m-%d").to_string())
                .collect(),
            tmax: self.days.iter().map(|d| d.tmax_f.map(round_tenth)).collect(),
            tmin: self.days.iter().map(|d| d.tmin_f.map(round_tenth)).collect(),
        }
    }
}

/// Column-oriented daily series as served on the weather endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeries {
    pub dates: Vec<String>,
    pub tmax: Vec<Option<f64>>,
    pub tmin: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn obs(date: NaiveDate, tmax_f: Option<f64>, tmin_f: Option<f64>) -> DailyObservation {
        DailyObservation {
            date,
            tmax_raw: tmax_f,
            tmin_raw: tmin_f,
            tmax_f,
            tmin_f,
        }
    }

    #[test]
    fn test_daily_series_shape() {
        let d1 = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2021, 1, 2).unwrap();
        let dataset = CanonicalDataset::new(
            vec![obs(d1, Some(86.04), Some(50.0)), obs(d2, None, Some(51.26))],
            TemperatureScale::Fahrenheit,
        );

        let series = dataset.daily_series();
        assert_eq!(series.dates, vec!["2021-01-01", "2021-01-02"]);
        assert_eq!(series.tmax, vec![Some(86.0), None]);
        assert_eq!(series.tmin, vec![Some(50.0), Some(51.3)]);
    }

    #[test]
    fn test_scale_display() {
        assert_eq!(TemperatureScale::TenthsCelsius.to_string(), "tenths_celsius");
        assert_eq!(TemperatureScale::Fahrenheit.to_string(), "fahrenheit");
    }
}
