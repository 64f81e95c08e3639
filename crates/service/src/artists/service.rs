use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::domain::{Payload, Record, INDEX_COLUMN, NAME_COLUMN};
use super::repository::DatasetRepository;
use crate::errors::ServiceError;

/// Artist CRUD over a whole-file dataset, independent of web framework.
///
/// Updates follow first-match semantics; deletes remove every match.
pub struct ArtistService<R: DatasetRepository> {
    repo: Arc<R>,
}

impl<R: DatasetRepository> Clone for ArtistService<R> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: DatasetRepository> ArtistService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// All records in storage order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Record>, ServiceError> {
        let dataset = self.repo.load().await?;
        debug!(count = dataset.len(), "artists_listed");
        Ok(dataset.into_records())
    }

    /// First record whose `Artist Name` matches case-insensitively.
    ///
    /// # Examples
    /// ```
    /// use service::artists::{ArtistService, domain::Record, repository::mock::MockDatasetRepository};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockDatasetRepository::with_records(vec![
    ///     Record::from_iter([("Index", "1"), ("Artist Name", "Adele")]),
    /// ]));
    /// let svc = ArtistService::new(repo);
    /// let found = tokio_test::block_on(svc.get_by_name("ADELE")).unwrap();
    /// assert_eq!(found.get("Index"), Some("1"));
    /// ```
    #[instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> Result<Record, ServiceError> {
        let dataset = self.repo.load().await?;
        dataset.find_by_name(name).cloned().ok_or_else(ServiceError::artist_not_found)
    }

    /// First record whose parsed `Index` equals `index`.
    #[instrument(skip(self))]
    pub async fn get_by_index(&self, index: i64) -> Result<Record, ServiceError> {
        let dataset = self.repo.load().await?;
        let found = dataset.find_by_index(index).inspect_err(|e| warn!(error = %e, "index_scan_failed"))?;
        found.cloned().ok_or_else(ServiceError::artist_not_found)
    }

    /// Overwrite existing fields of the first record named `name`; returns the updated record.
    #[instrument(skip(self, payload), fields(keys = payload.len()))]
    pub async fn update_by_name(&self, name: &str, payload: Payload) -> Result<Record, ServiceError> {
        let target = name.to_string();
        let updated = self
            .repo
            .modify(move |ds| ds.update_first_by_name(&target, &payload).cloned().ok_or_else(ServiceError::artist_not_found))
            .await?;
        info!(artist = %name, "artist_updated");
        Ok(updated)
    }

    /// Overwrite existing fields of the first record with `Index == index`.
    #[instrument(skip(self, payload), fields(keys = payload.len()))]
    pub async fn update_by_index(&self, index: i64, payload: Payload) -> Result<Record, ServiceError> {
        let updated = self
            .repo
            .modify(move |ds| {
                ds.update_first_by_index(index, &payload)?
                    .cloned()
                    .ok_or_else(ServiceError::artist_not_found)
            })
            .await
            .inspect_err(|e| if matches!(e, ServiceError::Malformed(_)) { warn!(error = %e, "index_scan_failed") })?;
        info!(index, "artist_updated");
        Ok(updated)
    }

    /// Remove every record named `name`; returns how many went away.
    ///
    /// # Examples
    /// ```
    /// use service::artists::{ArtistService, domain::Record, repository::mock::MockDatasetRepository};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockDatasetRepository::with_records(vec![
    ///     Record::from_iter([("Index", "1"), ("Artist Name", "Adele")]),
    ///     Record::from_iter([("Index", "2"), ("Artist Name", "adele")]),
    /// ]));
    /// let svc = ArtistService::new(repo.clone());
    /// assert_eq!(tokio_test::block_on(svc.delete_by_name("Adele")).unwrap(), 2);
    /// assert!(tokio_test::block_on(svc.delete_by_name("Adele")).is_err());
    /// assert_eq!(repo.writes(), 1);
    /// ```
    #[instrument(skip(self))]
    pub async fn delete_by_name(&self, name: &str) -> Result<usize, ServiceError> {
        let target = name.to_string();
        let removed = self
            .repo
            .modify(move |ds| match ds.delete_all_by_name(&target) {
                0 => Err(ServiceError::artist_not_found()),
                n => Ok(n),
            })
            .await?;
        info!(artist = %name, removed, "artist_deleted");
        Ok(removed)
    }

    /// Remove every record with `Index == index`.
    #[instrument(skip(self))]
    pub async fn delete_by_index(&self, index: i64) -> Result<usize, ServiceError> {
        let removed = self
            .repo
            .modify(move |ds| match ds.delete_all_by_index(index)? {
                0 => Err(ServiceError::artist_not_found()),
                n => Ok(n),
            })
            .await
            .inspect_err(|e| if matches!(e, ServiceError::Malformed(_)) { warn!(error = %e, "index_scan_failed") })?;
        info!(index, removed, "artist_deleted");
        Ok(removed)
    }

    /// Append a new artist with the next free `Index`.
    ///
    /// # Examples
    /// ```
    /// use service::artists::{ArtistService, repository::mock::MockDatasetRepository};
    /// use std::sync::Arc;
    /// let svc = ArtistService::new(Arc::new(MockDatasetRepository::default()));
    /// let payload = serde_json::json!({"Artist Name": "Drake"}).as_object().cloned().unwrap();
    /// let created = tokio_test::block_on(svc.add(payload)).unwrap();
    /// assert_eq!(created.get("Index"), Some("1"));
    /// ```
    #[instrument(skip(self, payload), fields(keys = payload.len()))]
    pub async fn add(&self, payload: Payload) -> Result<Record, ServiceError> {
        if !payload.contains_key(NAME_COLUMN) {
            return Err(ServiceError::Validation(format!("campo '{NAME_COLUMN}' é obrigatório")));
        }
        let mut record = Record::from_payload(&payload);
        let created = self
            .repo
            .modify(move |ds| {
                let name = record.artist_name().unwrap_or_default();
                if ds.contains_name(name) {
                    return Err(ServiceError::artist_exists());
                }
                let next = ds.next_index()?;
                record.set(INDEX_COLUMN, next.to_string());
                Ok(ds.push(record).clone())
            })
            .await?;
        info!(artist = created.artist_name().unwrap_or_default(), index = created.get(INDEX_COLUMN).unwrap_or_default(), "artist_added");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artists::repository::mock::MockDatasetRepository;
    use serde_json::json;

    fn payload(v: serde_json::Value) -> Payload {
        v.as_object().cloned().expect("object payload")
    }

    fn adele_store() -> (Arc<MockDatasetRepository>, ArtistService<MockDatasetRepository>) {
        let repo = Arc::new(MockDatasetRepository::with_records(vec![Record::from_iter([
            ("Index", "1"),
            ("Artist Name", "Adele"),
            ("Genre", "Pop"),
        ])]));
        (repo.clone(), ArtistService::new(repo))
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() {
        let svc = ArtistService::new(Arc::new(MockDatasetRepository::default()));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_then_get_returns_input_plus_index() {
        let svc = ArtistService::new(Arc::new(MockDatasetRepository::default()));
        let created = svc.add(payload(json!({"Artist Name": "Drake", "Genre": "Rap", "Followers": 1000}))).await.unwrap();
        let fetched = svc.get_by_name("drake").await.unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched.get("Index"), Some("1"));
        assert_eq!(fetched.get("Genre"), Some("Rap"));
        assert_eq!(fetched.get("Followers"), Some("1000"));
        assert_eq!(fetched.len(), 4);
    }

    #[tokio::test]
    async fn add_assigns_increasing_indices() {
        let svc = ArtistService::new(Arc::new(MockDatasetRepository::default()));
        for (i, name) in ["A", "B", "C", "D"].iter().enumerate() {
            let created = svc.add(payload(json!({"Artist Name": name, "Index": "99"}))).await.unwrap();
            assert_eq!(created.get("Index"), Some((i + 1).to_string().as_str()));
        }
        let indices: Vec<_> = svc.list().await.unwrap().iter().map(|r| r.parsed_index().unwrap()).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn add_duplicate_name_conflicts_without_writing() {
        let (repo, svc) = adele_store();
        let err = svc.add(payload(json!({"Artist Name": "aDeLe"}))).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "Artista já existe!"));
        assert_eq!(repo.writes(), 0);
        assert_eq!(svc.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn add_requires_artist_name_key() {
        let svc = ArtistService::new(Arc::new(MockDatasetRepository::default()));
        let err = svc.add(payload(json!({"Genre": "Rap"}))).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn update_by_name_changes_only_shared_keys() {
        let (repo, svc) = adele_store();
        svc.add(payload(json!({"Artist Name": "Drake", "Genre": "Rap"}))).await.unwrap();
        let updated = svc.update_by_name("Adele", payload(json!({"Genre": "Soul", "Label": "XL"}))).await.unwrap();
        assert_eq!(updated.get("Genre"), Some("Soul"));
        assert!(!updated.contains("Label"));

        let adele = svc.get_by_name("adele").await.unwrap();
        assert_eq!(adele, Record::from_iter([("Index", "1"), ("Artist Name", "Adele"), ("Genre", "Soul")]));
        let drake = svc.get_by_name("Drake").await.unwrap();
        assert_eq!(drake.get("Genre"), Some("Rap"));
        assert_eq!(repo.writes(), 2);
    }

    #[tokio::test]
    async fn update_payload_cannot_rewrite_index() {
        let (_, svc) = adele_store();
        svc.add(payload(json!({"Artist Name": "Drake"}))).await.unwrap();
        let updated = svc.update_by_name("Adele", payload(json!({"Index": "abc", "Genre": "Soul"}))).await.unwrap();
        assert_eq!(updated.get("Index"), Some("1"));
        assert_eq!(svc.get_by_index(2).await.unwrap().artist_name(), Some("Drake"));

        svc.update_by_index(1, payload(json!({"Index": "2"}))).await.unwrap();
        let indices: Vec<_> = svc.list().await.unwrap().iter().map(|r| r.parsed_index().unwrap()).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let (repo, svc) = adele_store();
        assert!(matches!(svc.update_by_name("Nobody", Payload::new()).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.update_by_index(7, Payload::new()).await, Err(ServiceError::NotFound(_))));
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn index_operations_find_by_parsed_index() {
        let (_, svc) = adele_store();
        assert_eq!(svc.get_by_index(1).await.unwrap().artist_name(), Some("Adele"));
        svc.update_by_index(1, payload(json!({"Genre": "Soul"}))).await.unwrap();
        assert_eq!(svc.get_by_index(1).await.unwrap().get("Genre"), Some("Soul"));
        assert_eq!(svc.delete_by_index(1).await.unwrap(), 1);
        assert!(matches!(svc.get_by_index(1).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn malformed_stored_index_surfaces_as_malformed() {
        let repo = Arc::new(MockDatasetRepository::with_records(vec![
            Record::from_iter([("Index", "abc"), ("Artist Name", "Broken")]),
            Record::from_iter([("Index", "2"), ("Artist Name", "Fine")]),
        ]));
        let svc = ArtistService::new(repo.clone());
        assert!(matches!(svc.get_by_index(2).await, Err(ServiceError::Malformed(_))));
        assert!(matches!(svc.delete_by_index(2).await, Err(ServiceError::Malformed(_))));
        assert_eq!(repo.writes(), 0);
        // name-based operations are unaffected, and add skips the bad index
        let created = svc.add(payload(json!({"Artist Name": "New"}))).await.unwrap();
        assert_eq!(created.get("Index"), Some("3"));
    }

    #[tokio::test]
    async fn delete_by_name_removes_all_case_variants() {
        let repo = Arc::new(MockDatasetRepository::with_records(vec![
            Record::from_iter([("Index", "1"), ("Artist Name", "Adele")]),
            Record::from_iter([("Index", "2"), ("Artist Name", "Drake")]),
            Record::from_iter([("Index", "3"), ("Artist Name", "ADELE")]),
        ]));
        let svc = ArtistService::new(repo.clone());
        assert_eq!(svc.delete_by_name("adele").await.unwrap(), 2);
        let left = svc.list().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].artist_name(), Some("Drake"));
        assert!(matches!(svc.delete_by_name("adele").await, Err(ServiceError::NotFound(_))));
        assert_eq!(repo.writes(), 1);
    }
}
