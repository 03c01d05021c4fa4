pub mod summary;

pub use summary::{run_summary, SummaryRequest};
