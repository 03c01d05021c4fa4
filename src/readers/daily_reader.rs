use crate::error::{Result, StatsError};
use crate::models::{CanonicalDataset, DailyObservation, TemperatureScale};
use crate::utils::constants::{
    DATE_COLUMN, SCALE_BREAK, SENTINEL_THRESHOLD, TMAX_COLUMN, TMIN_COLUMN,
};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::fs;
use std::path::Path;

/// Reads a daily-observation CSV and produces the canonical dataset.
///
/// The reader is a pure function of the file contents: header-addressed
/// columns (`DATE`, `TMAX`, `TMIN`; extras ignored), UTF-8 with optional BOM.
/// Rows whose date fails to parse are dropped whole; unparseable or sentinel
/// temperature values become missing. The temperature scale is inferred once
/// for the whole file and applied uniformly.
pub struct DailyReader;

impl DailyReader {
    pub fn new() -> Self {
        Self
    }

    /// Read and normalize the source file.
    ///
    /// Fails with `DataUnavailable` if the file cannot be read, lacks the
    /// required columns, or contains no row with a parseable date.
    pub fn read_dataset(&self, path: &Path) -> Result<CanonicalDataset> {
        let contents = fs::read_to_string(path).map_err(|e| {
            StatsError::unavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        self.parse_dataset(&contents)
    }

    /// Parse CSV text into the canonical dataset.
    pub fn parse_dataset(&self, contents: &str) -> Result<CanonicalDataset> {
        let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(contents.as_bytes());

        let headers = reader.headers()?.clone();
        let date_idx = column_index(&headers, DATE_COLUMN)?;
        let tmax_idx = column_index(&headers, TMAX_COLUMN)?;
        let tmin_idx = column_index(&headers, TMIN_COLUMN)?;

        let mut rows: Vec<(NaiveDate, Option<f64>, Option<f64>)> = Vec::new();
        for record in reader.records() {
            let record = record?;
            // A bad date drops the whole row, not just the temperature fields
            let Some(date) = record.get(date_idx).and_then(parse_date) else {
                continue;
            };
            let tmax_raw = record.get(tmax_idx).and_then(parse_reading);
            let tmin_raw = record.get(tmin_idx).and_then(parse_reading);
            rows.push((date, tmax_raw, tmin_raw));
        }

        if rows.is_empty() {
            return Err(StatsError::unavailable(
                "source file contains no rows with a parseable date",
            ));
        }

        // Stable sort, then collapse duplicate dates to the last occurrence
        // in source order. Explicit policy; the upstream feed should not
        // contain duplicates but occasionally does.
        rows.sort_by_key(|(date, _, _)| *date);
        let mut collapsed: Vec<(NaiveDate, Option<f64>, Option<f64>)> =
            Vec::with_capacity(rows.len());
        for row in rows {
            match collapsed.last_mut() {
                Some(last) if last.0 == row.0 => *last = row,
                _ => collapsed.push(row),
            }
        }

        let scale = infer_scale(&collapsed);
        tracing::debug!(days = collapsed.len(), %scale, "normalized daily records");

        let days = collapsed
            .into_iter()
            .map(|(date, tmax_raw, tmin_raw)| {
                let convert = |v: f64| match scale {
                    TemperatureScale::TenthsCelsius => tenths_to_fahrenheit(v),
                    TemperatureScale::Fahrenheit => v,
                };
                DailyObservation {
                    date,
                    tmax_f: tmax_raw.map(convert),
                    tmin_f: tmin_raw.map(convert),
                    tmax_raw,
                    tmin_raw,
                }
            })
            .collect();

        Ok(CanonicalDataset::new(days, scale))
    }
}

impl Default for DailyReader {
    fn default() -> Self {
        Self::new()
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| StatsError::unavailable(format!("source file lacks a {} column", name)))
}

fn parse_date(field: &str) -> Option<NaiveDate> {
    let field = field.trim();
    NaiveDate::parse_from_str(field, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(field, "%Y%m%d"))
        .ok()
}

/// Numeric coercion with sentinel masking: non-numeric or ≤ -9990 is missing.
fn parse_reading(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > SENTINEL_THRESHOLD)
}

/// Decide the unit encoding for the whole file from the maximum magnitude of
/// any non-missing reading. Whole-degree Fahrenheit never plausibly exceeds
/// 200; tenths-of-Celsius readings routinely do. A file mixing both scales
/// gets half its data silently mis-scaled; preserved as a known limitation.
fn infer_scale(rows: &[(NaiveDate, Option<f64>, Option<f64>)]) -> TemperatureScale {
    let max_abs = rows
        .iter()
        .flat_map(|(_, tmax, tmin)| tmax.iter().chain(tmin.iter()))
        .fold(None::<f64>, |acc, v| {
            Some(acc.map_or(v.abs(), |m| m.max(v.abs())))
        });

    match max_abs {
        Some(magnitude) if magnitude > SCALE_BREAK => TemperatureScale::TenthsCelsius,
        _ => TemperatureScale::Fahrenheit,
    }
}

/// GHCN-Daily tenths-of-Celsius to Fahrenheit.
fn tenths_to_fahrenheit(v: f64) -> f64 {
    (v / 10.0) * 9.0 / 5.0 + 32.0
}
