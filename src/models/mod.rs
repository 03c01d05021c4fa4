pub mod daily;
pub mod monthly;

pub use daily::{CanonicalDataset, DailyObservation, DailySeries, TemperatureScale};
pub use monthly::{AggregateStore, MetricId, MonthlyTable, TableSlice, YearRow, MONTH_LABELS};
