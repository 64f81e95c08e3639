use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};
use tracing::debug;

use super::csv_codec::{decode, encode};
use crate::artists::domain::Dataset;
use crate::artists::repository::DatasetRepository;
use crate::errors::ServiceError;

/// CSV file-backed dataset store.
///
/// Nothing is cached: each `load` reads the file, each `modify` reads, mutates
/// and rewrites it. The lock makes one process the single writer of the file;
/// rewrites go through a sibling temp file and a rename so a reader never sees
/// a truncated file.
pub struct CsvTableStore {
    file_path: PathBuf,
    declared: Option<Vec<String>>,
    lock: RwLock<()>,
}

impl CsvTableStore {
    /// Open the store at `path`. The file itself is not created until the first write.
    pub async fn new<P: Into<PathBuf>>(path: P, declared: Option<Vec<String>>) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        Ok(Arc::new(Self { file_path, declared, lock: RwLock::new(()) }))
    }

    pub async fn from_config(cfg: &configs::StoreConfig) -> Result<Arc<Self>, ServiceError> {
        Self::new(cfg.path.clone(), cfg.declared_columns().map(<[String]>::to_vec)).await
    }

    pub fn path(&self) -> &Path { &self.file_path }

    /// Replace the file with `dataset` as-is.
    pub async fn rewrite(&self, dataset: &Dataset) -> Result<(), ServiceError> {
        let _guard = self.lock.write().await;
        self.write_dataset(dataset).await
    }

    fn empty(&self) -> Dataset {
        match &self.declared {
            Some(columns) => Dataset::declared(columns.clone()),
            None => Dataset::default(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".into());
        self.file_path.with_file_name(format!(".{name}.tmp"))
    }

    async fn read_dataset(&self) -> Result<Dataset, ServiceError> {
        match fs::read(&self.file_path).await {
            Ok(bytes) => {
                let dataset = decode(&bytes, self.declared.as_deref())?;
                debug!(path = %self.file_path.display(), bytes = bytes.len(), records = dataset.len(), "dataset_loaded");
                Ok(dataset)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "dataset_missing");
                Ok(self.empty())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_dataset(&self, dataset: &Dataset) -> Result<(), ServiceError> {
        let bytes = encode(dataset)?;
        let tmp = self.temp_path();
        fs::write(&tmp, &bytes).await?;
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(path = %self.file_path.display(), bytes = bytes.len(), records = dataset.len(), "dataset_rewritten");
        Ok(())
    }
}

#[async_trait]
impl DatasetRepository for CsvTableStore {
    async fn load(&self) -> Result<Dataset, ServiceError> {
        let _guard = self.lock.read().await;
        self.read_dataset().await
    }

    async fn modify<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Dataset) -> Result<T, ServiceError> + Send + 'static,
    {
        let _guard = self.lock.write().await;
        let mut dataset = self.read_dataset().await?;
        let out = f(&mut dataset)?;
        self.write_dataset(&dataset).await?;
        Ok(out)
    }
}
