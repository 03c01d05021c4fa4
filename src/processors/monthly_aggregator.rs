use crate::models::{AggregateStore, CanonicalDataset};
use crate::utils::round_tenth;
use std::collections::BTreeMap;

/// Per-group accumulator over one (year, month)
#[derive(Debug, Default)]
struct MonthBucket {
    tmax_sum: f64,
    tmax_count: u32,
    tmin_sum: f64,
    tmin_count: u32,
    tmax_record: Option<f64>,
    tmin_record: Option<f64>,
}

impl MonthBucket {
    fn push_tmax(&mut self, value: f64) {
        self.tmax_sum += value;
        self.tmax_count += 1;
        self.tmax_record = Some(self.tmax_record.map_or(value, |r| r.max(value)));
    }

    fn push_tmin(&mut self, value: f64) {
        self.tmin_sum += value;
        self.tmin_count += 1;
        self.tmin_record = Some(self.tmin_record.map_or(value, |r| r.min(value)));
    }

    fn avg_tmax(&self) -> Option<f64> {
        (self.tmax_count > 0).then(|| self.tmax_sum / self.tmax_count as f64)
    }

    fn avg_tmin(&self) -> Option<f64> {
        (self.tmin_count > 0).then(|| self.tmin_sum / self.tmin_count as f64)
    }
}

/// Groups the canonical daily records by (year, month) and computes the four
/// metric tables: monthly mean and record of daily max and min temperature.
///
/// Missing readings are ignored; a month whose readings are all missing gets
/// an absent cell, never zero. Every value is rounded to one decimal place.
/// Pure and deterministic; runs once per process behind the station store.
pub struct MonthlyAggregator;

impl MonthlyAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, dataset: &CanonicalDataset) -> AggregateStore {
        let mut groups: BTreeMap<(i32, u32), MonthBucket> = BTreeMap::new();

        for day in dataset.days() {
            let bucket = groups.entry((day.year(), day.month())).or_default();
            if let Some(tmax) = day.tmax_f {
                bucket.push_tmax(tmax);
            }
            if let Some(tmin) = day.tmin_f {
                bucket.push_tmin(tmin);
            }
        }

        let mut store = AggregateStore {
            year_min: groups.keys().map(|(year, _)| *year).min(),
            year_max: groups.keys().map(|(year, _)| *year).max(),
            ..AggregateStore::default()
        };

        // Dense rows: every observed year appears in every table, even if a
        // given metric has no value anywhere in it.
        for (year, _) in groups.keys() {
            store.avg_tmax.ensure_year(*year);
            store.avg_tmin.ensure_year(*year);
            store.rec_tmax.ensure_year(*year);
            store.rec_tmin.ensure_year(*year);
        }

        for ((year, month), bucket) in &groups {
            if let Some(value) = bucket.avg_tmax() {
                store.avg_tmax.set(*year, *month, round_tenth(value));
            }
            if let Some(value) = bucket.avg_tmin() {
                store.avg_tmin.set(*year, *month, round_tenth(value));
            }
            if let Some(value) = bucket.tmax_record {
                store.rec_tmax.set(*year, *month, round_tenth(value));
            }
            if let Some(value) = bucket.tmin_record {
                store.rec_tmin.set(*year, *month, round_tenth(value));
            }
        }

        store
    }
}

impl Default for MonthlyAggregator {
    fn default() -> Self {
        Self::new()
    }
}
