use crate::models::{AggregateStore, MetricId, TableSlice, YearRow};
use crate::utils::constants::{DEFAULT_END_YEAR, DEFAULT_START_YEAR};

/// Normalized query parameters for one summary request.
///
/// Construction is deliberately lenient: unknown metrics fall back to the
/// default metric, unparseable years fall back to the default window, and a
/// reversed window is swapped. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRequest {
    pub metric: MetricId,
    pub start_year: i32,
    pub end_year: i32,
}

impl Default for SummaryRequest {
    fn default() -> Self {
        Self {
            metric: MetricId::AvgTmax,
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
        }
    }
}

impl SummaryRequest {
    pub fn new(metric: MetricId, start_year: i32, end_year: i32) -> Self {
        Self {
            metric,
            start_year,
            end_year,
        }
    }

    /// Build from raw query strings. If either year is present but not an
    /// integer, both fall back to the default window together.
    pub fn from_params(metric: Option<&str>, start: Option<&str>, end: Option<&str>) -> Self {
        let metric = MetricId::parse_lenient(metric);

        let parse_year = |value: Option<&str>, default: i32| match value {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<i32>().map_err(|_| ()),
        };

        let (start_year, end_year) = match (
            parse_year(start, DEFAULT_START_YEAR),
            parse_year(end, DEFAULT_END_YEAR),
        ) {
            (Ok(start), Ok(end)) => (start, end),
            _ => (DEFAULT_START_YEAR, DEFAULT_END_YEAR),
        };

        Self {
            metric,
            start_year,
            end_year,
        }
    }

    /// Window with start/end swapped into ascending order.
    fn window(&self) -> (i32, i32) {
        if self.start_year > self.end_year {
            (self.end_year, self.start_year)
        } else {
            (self.start_year, self.end_year)
        }
    }
}

/// Slice one metric table over the requested year window.
///
/// The window is clamped to the observed year bounds; years inside the
/// clamped window with no observations still get a row of absent cells. An
/// empty dataset, or a window entirely outside the data, yields empty
/// years/rows rather than an error. Read-only.
pub fn run_summary(store: &AggregateStore, request: &SummaryRequest) -> TableSlice {
    let (start, end) = request.window();

    let (year_min, year_max) = match (store.year_min, store.year_max) {
        (Some(min), Some(max)) => (min, max),
        _ => return TableSlice::empty(request.metric),
    };

    let start = start.max(year_min);
    let end = end.min(year_max);

    let table = store.table(request.metric);
    let years: Vec<i32> = (start..=end).collect();
    let rows = years
        .iter()
        .map(|&year| YearRow {
            year,
            values: table.row(year).copied().unwrap_or([None; 12]),
        })
        .collect();

    TableSlice {
        metric: request.metric,
        years,
        months: crate::models::MONTH_LABELS,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::MonthlyAggregator;
    use crate::readers::DailyReader;
    use pretty_assertions::assert_eq;

    /// One observation per year for 2015..=2023, skipping 2019
    fn sample_store() -> AggregateStore {
        let mut csv = String::from("DATE,TMAX,TMIN\n");
        for year in 2015..=2023 {
            if year == 2019 {
                continue;
            }
            csv.push_str(&format!("{}-07-15,95,75\n", year));
        }
        let dataset = DailyReader::new().parse_dataset(&csv).unwrap();
        MonthlyAggregator::new().aggregate(&dataset)
    }

    #[test]
    fn test_range_clamped_to_observed_years() {
        let store = sample_store();
        let slice = run_summary(&store, &SummaryRequest::new(MetricId::AvgTmax, 1900, 2100));

        assert_eq!(slice.years, (2015..=2023).collect::<Vec<_>>());
        assert_eq!(slice.rows.len(), 9);
    }

    #[test]
    fn test_reversed_window_is_swapped() {
        let store = sample_store();
        let forward = run_summary(&store, &SummaryRequest::new(MetricId::AvgTmax, 2020, 2023));
        let reversed = run_summary(&store, &SummaryRequest::new(MetricId::AvgTmax, 2023, 2020));

        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_unobserved_year_padded_with_absent_cells() {
        let store = sample_store();
        let slice = run_summary(&store, &SummaryRequest::new(MetricId::AvgTmax, 2018, 2020));

        assert_eq!(slice.years, vec![2018, 2019, 2020]);
        let padded = &slice.rows[1];
        assert_eq!(padded.year, 2019);
        assert_eq!(padded.values, [None; 12]);
        // Observed years carry their July value
        assert_eq!(slice.rows[0].values[6], Some(95.0));
    }

    #[test]
    fn test_window_outside_data_yields_empty_rows() {
        let store = sample_store();
        let slice = run_summary(&store, &SummaryRequest::new(MetricId::RecTmax, 1800, 1810));

        assert_eq!(slice.years, Vec::<i32>::new());
        assert!(slice.rows.is_empty());
        assert_eq!(slice.months[0], "Jan");
    }

    #[test]
    fn test_empty_store_yields_empty_slice() {
        let store = AggregateStore::default();
        let slice = run_summary(&store, &SummaryRequest::default());

        assert!(slice.years.is_empty());
        assert!(slice.rows.is_empty());
        assert_eq!(slice.metric, MetricId::AvgTmax);
    }

    #[test]
    fn test_from_params_defaults() {
        assert_eq!(
            SummaryRequest::from_params(None, None, None),
            SummaryRequest::default()
        );
        assert_eq!(
            SummaryRequest::from_params(Some("rec_tmin"), Some("2016"), Some("2018")),
            SummaryRequest::new(MetricId::RecTmin, 2016, 2018)
        );
    }

    #[test]
    fn test_from_params_bad_year_resets_whole_window() {
        // One unparseable year falls back to the full default window
        assert_eq!(
            SummaryRequest::from_params(None, Some("twenty"), Some("2018")),
            SummaryRequest::default()
        );
        assert_eq!(
            SummaryRequest::from_params(Some("nope"), Some("2016"), Some("?")),
            SummaryRequest::default()
        );
    }
}
