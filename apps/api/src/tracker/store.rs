//! Persistence for tracked applications.
//!
//! `JsonFileStore` keeps the whole list in one pretty-printed JSON file and
//! does a read-modify-write per mutation under a process-local lock.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use super::ApplicationEntry;
use crate::storage::StoreError;

const ID_LEN: usize = 8;

/// Carried in `AppState` as `Arc<dyn ApplicationStore>`.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// All entries, newest first.
    async fn list(&self) -> Result<Vec<ApplicationEntry>, StoreError>;

    /// Assigns a fresh id, stores the entry at the front and returns it.
    async fn insert(&self, entry: ApplicationEntry) -> Result<ApplicationEntry, StoreError>;

    async fn update_status(&self, id: &str, status: &str) -> Result<ApplicationEntry, StoreError>;

    /// Removing an unknown id is not an error.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Missing or unreadable files read as an empty list.
    async fn load(&self) -> Vec<ApplicationEntry> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Could not read {}: {e}", self.path.display());
                return Vec::new();
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!("Ignoring unreadable application store {}: {e}", self.path.display());
            Vec::new()
        })
    }

    async fn save(&self, entries: &[ApplicationEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&self.path, json).await?;
        debug!("Saved {} applications to {}", entries.len(), self.path.display());
        Ok(())
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()[..ID_LEN].to_string()
}

#[async_trait]
impl ApplicationStore for JsonFileStore {
    async fn list(&self) -> Result<Vec<ApplicationEntry>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await)
    }

    async fn insert(&self, mut entry: ApplicationEntry) -> Result<ApplicationEntry, StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await;
        entry.id = Some(new_id());
        entries.insert(0, entry.clone());
        self.save(&entries).await?;
        Ok(entry)
    }

    async fn update_status(&self, id: &str, status: &str) -> Result<ApplicationEntry, StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await;
        let entry = entries
            .iter_mut()
            .find(|e| e.id.as_deref() == Some(id))
            .ok_or_else(|| StoreError::NotFound("Application not found".to_string()))?;
        entry.status = status.to_string();
        let updated = entry.clone();
        self.save(&entries).await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await;
        entries.retain(|e| e.id.as_deref() != Some(id));
        self.save(&entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(company: &str) -> ApplicationEntry {
        ApplicationEntry {
            id: Some("client-id".to_string()),
            company_name: company.to_string(),
            job_title: "Backend Engineer".to_string(),
            status: "Applied".to_string(),
            date_applied: "2026-01-05".to_string(),
            job_description: String::new(),
        }
    }

    fn store() -> (tempfile::TempDir, JsonFileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("applications_db.json"));
        (dir, store)
    }

    #[tokio::test]
    async fn test_missing_file_lists_empty() {
        let (_dir, store) = store();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_lists_empty() {
        let (_dir, store) = store();
        std::fs::write(&store.path, "{not json").unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_prepends() {
        let (_dir, store) = store();
        let first = store.insert(entry("Acme")).await.unwrap();
        let second = store.insert(entry("Globex")).await.unwrap();

        let first_id = first.id.clone().unwrap();
        assert_eq!(first_id.len(), 8);
        assert_ne!(first_id, "client-id");
        assert_ne!(first.id, second.id);

        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![second, first]);
    }

    #[tokio::test]
    async fn test_file_is_pretty_json() {
        let (_dir, store) = store();
        store.insert(entry("Acme")).await.unwrap();
        let text = std::fs::read_to_string(&store.path).unwrap();
        assert!(text.starts_with("[\n  {"));
    }

    #[tokio::test]
    async fn test_update_status() {
        let (_dir, store) = store();
        let created = store.insert(entry("Acme")).await.unwrap();
        let id = created.id.unwrap();

        let updated = store.update_status(&id, "Interviewing").await.unwrap();
        assert_eq!(updated.status, "Interviewing");
        assert_eq!(store.list().await.unwrap()[0].status, "Interviewing");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let (_dir, store) = store();
        let result = store.update_status("nope", "Offer").await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_dir, store) = store();
        let created = store.insert(entry("Acme")).await.unwrap();
        let id = created.id.unwrap();

        store.delete(&id).await.unwrap();
        store.delete(&id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
