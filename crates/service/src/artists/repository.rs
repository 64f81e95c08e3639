use async_trait::async_trait;

use super::domain::Dataset;
use crate::errors::ServiceError;

/// Whole-dataset persistence: every call sees a fresh copy of storage.
#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Load the current dataset. Absent storage yields an empty dataset.
    async fn load(&self) -> Result<Dataset, ServiceError>;

    /// Load, run `f` on the dataset and rewrite storage in full when `f` returns `Ok`.
    /// An `Err` from `f` leaves storage untouched. Calls are serialised against
    /// each other so concurrent writers cannot interleave their rewrites.
    async fn modify<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Dataset) -> Result<T, ServiceError> + Send + 'static;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::artists::domain::Record;

    #[derive(Default)]
    pub struct MockDatasetRepository {
        data: Mutex<Dataset>,
        writes: AtomicUsize,
    }

    impl MockDatasetRepository {
        pub fn with_records(records: Vec<Record>) -> Self {
            Self { data: Mutex::new(Dataset::from_records(records)), writes: AtomicUsize::new(0) }
        }

        /// Number of successful rewrites so far.
        pub fn writes(&self) -> usize { self.writes.load(Ordering::SeqCst) }

        fn snapshot(&self) -> Result<Dataset, ServiceError> {
            self.data
                .lock()
                .map(|d| d.clone())
                .map_err(|_| ServiceError::Storage("mock dataset lock poisoned".into()))
        }
    }

    #[async_trait]
    impl DatasetRepository for MockDatasetRepository {
        async fn load(&self) -> Result<Dataset, ServiceError> {
            self.snapshot()
        }

        async fn modify<T, F>(&self, f: F) -> Result<T, ServiceError>
        where
            T: Send + 'static,
            F: FnOnce(&mut Dataset) -> Result<T, ServiceError> + Send + 'static,
        {
            let mut guard = self
                .data
                .lock()
                .map_err(|_| ServiceError::Storage("mock dataset lock poisoned".into()))?;
            let mut working = guard.clone();
            let out = f(&mut working)?;
            *guard = working;
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(out)
        }
    }
}
