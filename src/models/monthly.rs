use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Abbreviated month labels, calendar order, as used in query responses.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Identifier of one of the four monthly aggregate tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    /// Monthly mean of daily maximum temperature.
    AvgTmax,
    /// Monthly mean of daily minimum temperature.
    AvgTmin,
    /// Record high within the year-month.
    RecTmax,
    /// Record low within the year-month.
    RecTmin,
}

impl MetricId {
    pub const ALL: [MetricId; 4] = [
        MetricId::AvgTmax,
        MetricId::AvgTmin,
        MetricId::RecTmax,
        MetricId::RecTmin,
    ];

    /// Lenient parse: case-insensitive, anything unrecognized (including
    /// absent) falls back to `avg_tmax`. Deliberate contract, not an error.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("avg_tmin") => MetricId::AvgTmin,
            Some("rec_tmax") => MetricId::RecTmax,
            Some("rec_tmin") => MetricId::RecTmin,
            _ => MetricId::AvgTmax,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricId::AvgTmax => "avg_tmax",
            MetricId::AvgTmin => "avg_tmin",
            MetricId::RecTmax => "rec_tmax",
            MetricId::RecTmin => "rec_tmin",
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One metric's year-by-month pivot: rows keyed by year, 12 cells per row,
/// absent cells for (year, month) combinations with no usable observations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyTable {
    rows: BTreeMap<i32, [Option<f64>; 12]>,
}

impl MonthlyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a row exists for `year`, all cells absent until filled.
    pub fn ensure_year(&mut self, year: i32) {
        self.rows.entry(year).or_insert([None; 12]);
    }

    /// Set the cell for `year` and calendar `month` (1..=12).
    pub fn set(&mut self, year: i32, month: u32, value: f64) {
        let row = self.rows.entry(year).or_insert([None; 12]);
        row[(month - 1) as usize] = Some(value);
    }

    pub fn row(&self, year: i32) -> Option<&[Option<f64>; 12]> {
        self.rows.get(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The four precomputed monthly tables plus the observed year bounds.
/// Built once per process from the canonical dataset; immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateStore {
    pub avg_tmax: MonthlyTable,
    pub avg_tmin: MonthlyTable,
    pub rec_tmax: MonthlyTable,
    pub rec_tmin: MonthlyTable,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
}

impl AggregateStore {
    pub fn table(&self, metric: MetricId) -> &MonthlyTable {
        match metric {
            MetricId::AvgTmax => &self.avg_tmax,
            MetricId::AvgTmin => &self.avg_tmin,
            MetricId::RecTmax => &self.rec_tmax,
            MetricId::RecTmin => &self.rec_tmin,
        }
    }
}

/// One output row: a year and its 12 month cells in calendar order.
#[derive(Debug, Clone, PartialEq)]
pub struct YearRow {
    pub year: i32,
    pub values: [Option<f64>; 12],
}

// Wire shape is {"year": 2021, "Jan": 86.9, ..., "Dec": null}, so the month
// cells serialize as named fields rather than an array.
impl Serialize for YearRow {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("YearRow", 13)?;
        state.serialize_field("year", &self.year)?;
        for (label, value) in MONTH_LABELS.iter().zip(self.values.iter()) {
            state.serialize_field(*label, value)?;
        }
        state.end()
    }
}

/// Result of a range query against one metric table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSlice {
    pub metric: MetricId,
    pub years: Vec<i32>,
    pub months: [&'static str; 12],
    pub rows: Vec<YearRow>,
}

impl TableSlice {
    pub fn empty(metric: MetricId) -> Self {
        Self {
            metric,
            years: Vec::new(),
            months: MONTH_LABELS,
            rows: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_metric_parse_lenient() {
        assert_eq!(MetricId::parse_lenient(Some("rec_tmin")), MetricId::RecTmin);
        assert_eq!(MetricId::parse_lenient(Some("REC_TMAX")), MetricId::RecTmax);
        assert_eq!(MetricId::parse_lenient(Some(" avg_tmin ")), MetricId::AvgTmin);
        // Unknown and absent both normalize to the default metric
        assert_eq!(MetricId::parse_lenient(Some("median")), MetricId::AvgTmax);
        assert_eq!(MetricId::parse_lenient(None), MetricId::AvgTmax);
    }

    #[test]
    fn test_monthly_table_cells() {
        let mut table = MonthlyTable::new();
        table.set(2021, 1, 86.9);
        table.ensure_year(2022);

        assert_eq!(table.row(2021).unwrap()[0], Some(86.9));
        assert_eq!(table.row(2021).unwrap()[1], None);
        assert_eq!(table.row(2022), Some(&[None; 12]));
        assert_eq!(table.row(2020), None);
        assert_eq!(table.years().collect::<Vec<_>>(), vec![2021, 2022]);
    }

    #[test]
    fn test_year_row_serializes_month_names() {
        let mut values = [None; 12];
        values[0] = Some(86.9);
        let row = YearRow { year: 2021, values };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["year"], 2021);
        assert_eq!(json["Jan"], 86.9);
        assert!(json["Feb"].is_null());
        assert!(json["Dec"].is_null());
    }

    #[test]
    fn test_metric_serializes_snake_case() {
        let json = serde_json::to_value(MetricId::RecTmin).unwrap();
        assert_eq!(json, "rec_tmin");
    }
}
