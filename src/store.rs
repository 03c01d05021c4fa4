use crate::error::Result;
use crate::models::{AggregateStore, CanonicalDataset};
use crate::processors::MonthlyAggregator;
use crate::readers::DailyReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Process-lifetime cache over the loader and aggregator.
///
/// The dataset and the aggregate store each compute at most once, even under
/// concurrent first access; every caller observes the same `Arc`. There is no
/// eviction or invalidation: the source file is treated as immutable for the
/// process lifetime, and a restart is the only way to pick up changes. A
/// failed load leaves the slot empty so a later call can retry.
pub struct StationStore {
    csv_path: PathBuf,
    dataset: OnceCell<Arc<CanonicalDataset>>,
    aggregates: OnceCell<Arc<AggregateStore>>,
    load_count: AtomicUsize,
    aggregate_count: AtomicUsize,
}

impl StationStore {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            dataset: OnceCell::new(),
            aggregates: OnceCell::new(),
            load_count: AtomicUsize::new(0),
            aggregate_count: AtomicUsize::new(0),
        }
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// The canonical dataset, loading the source file on first call.
    pub async fn dataset(&self) -> Result<Arc<CanonicalDataset>> {
        self.dataset
            .get_or_try_init(|| async {
                self.load_count.fetch_add(1, Ordering::SeqCst);
                let dataset = DailyReader::new().read_dataset(&self.csv_path)?;
                tracing::info!(
                    days = dataset.len(),
                    scale = %dataset.scale(),
                    path = %self.csv_path.display(),
                    "loaded canonical dataset"
                );
                Ok(Arc::new(dataset))
            })
            .await
            .cloned()
    }

    /// The monthly aggregate tables, derived from the dataset on first call.
    pub async fn aggregates(&self) -> Result<Arc<AggregateStore>> {
        self.aggregates
            .get_or_try_init(|| async {
                let dataset = self.dataset().await?;
                self.aggregate_count.fetch_add(1, Ordering::SeqCst);
                let store = MonthlyAggregator::new().aggregate(&dataset);
                tracing::info!(
                    year_min = ?store.year_min,
                    year_max = ?store.year_max,
                    "built monthly aggregate tables"
                );
                Ok(Arc::new(store))
            })
            .await
            .cloned()
    }

    /// Number of times the loader actually ran (at most 1 per process).
    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }

    /// Number of times the aggregator actually ran (at most 1 per process).
    pub fn aggregate_count(&self) -> usize {
        self.aggregate_count.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "DATE,TMAX,TMIN").unwrap();
        writeln!(file, "2021-01-01,300,100").unwrap();
        writeln!(file, "2021-01-02,310,110").unwrap();
        file
    }

    #[tokio::test]
    async fn test_loader_runs_once() {
        let file = sample_file();
        let store = StationStore::new(file.path());

        let first = store.dataset().await.unwrap();
        let second = store.dataset().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.load_count(), 1);
    }

    #[tokio::test]
    async fn test_aggregator_runs_once() {
        let file = sample_file();
        let store = StationStore::new(file.path());

        let first = store.aggregates().await.unwrap();
        let second = store.aggregates().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.load_count(), 1);
        assert_eq!(store.aggregate_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_access_computes_once() {
        let file = sample_file();
        let store = Arc::new(StationStore::new(file.path()));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.aggregates().await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.load_count(), 1);
        assert_eq!(store.aggregate_count(), 1);
    }

    #[tokio::test]
    async fn test_load_failure_propagates_and_allows_retry() {
        let store = StationStore::new("/nonexistent/observations.csv");

        let err = store.dataset().await.unwrap_err();
        assert!(matches!(err, StatsError::DataUnavailable { .. }));
        // The slot stays empty, so a later call attempts the load again
        assert!(store.dataset().await.is_err());
        assert_eq!(store.load_count(), 2);
    }
}
