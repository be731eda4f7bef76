use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::storage::StoreError;

const EXTENSION: &str = "yaml";

/// Keeps alphanumerics, spaces, `-` and `_`, then trims.
///
/// Everything used as a file name passes through here, so a name can never
/// point outside the versions directory.
pub fn sanitize_name(name: &str) -> Result<String, StoreError> {
    let safe: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let safe = safe.trim();
    if safe.is_empty() {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(safe.to_string())
}

pub struct VersionStore {
    dir: PathBuf,
}

impl VersionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, safe_name: &str) -> PathBuf {
        self.dir.join(format!("{safe_name}.{EXTENSION}"))
    }

    /// Names of all saved versions, sorted. A missing directory lists empty.
    pub async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut reader = match tokio::fs::read_dir(&self.dir).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub async fn get(&self, name: &str) -> Result<(String, String), StoreError> {
        let safe = sanitize_name(name)
            .map_err(|_| StoreError::NotFound("Version not found".to_string()))?;
        match tokio::fs::read_to_string(self.path_for(&safe)).await {
            Ok(content) => Ok((safe, content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound("Version not found".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Writes (or overwrites) a version and returns the sanitized name.
    pub async fn save(&self, name: &str, yaml_content: &str) -> Result<String, StoreError> {
        let safe = sanitize_name(name)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(&safe), yaml_content).await?;
        info!("Saved resume version '{safe}'");
        Ok(safe)
    }

    /// Deleting a missing version is not an error.
    pub async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let Ok(safe) = sanitize_name(name) else {
            return Ok(());
        };
        match tokio::fs::remove_file(self.path_for(&safe)).await {
            Ok(()) => {
                debug!("Deleted resume version '{safe}'");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> (tempfile::TempDir, VersionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = VersionStore::new(dir.path().join("versions"));
        (dir, store)
    }

    #[test]
    fn test_sanitize_strips_path_characters() {
        assert_eq!(sanitize_name("../../etc/passwd").unwrap(), "etcpasswd");
        assert_eq!(sanitize_name("  Google SRE v2_final ").unwrap(), "Google SRE v2_final");
        assert_eq!(sanitize_name("Müller-CV").unwrap(), "Müller-CV");
    }

    #[test]
    fn test_sanitize_rejects_empty_result() {
        assert!(matches!(sanitize_name("../"), Err(StoreError::InvalidName(_))));
        assert!(matches!(sanitize_name("   "), Err(StoreError::InvalidName(_))));
    }

    #[tokio::test]
    async fn test_missing_dir_lists_empty() {
        let (_dir, store) = store();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_get_list_delete() {
        let (_dir, store) = store();
        let name = store.save("Stripe / backend", "cv:\n  name: Ada\n").await.unwrap();
        assert_eq!(name, "Stripe  backend");
        store.save("Acme", "cv: {}\n").await.unwrap();
        std::fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list().await.unwrap(), vec!["Acme", "Stripe  backend"]);

        let (found, content) = store.get("Stripe  backend").await.unwrap();
        assert_eq!(found, "Stripe  backend");
        assert_eq!(content, "cv:\n  name: Ada\n");

        store.delete("Acme").await.unwrap();
        store.delete("Acme").await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec!["Stripe  backend"]);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let (_dir, store) = store();
        store.save("Acme", "v1").await.unwrap();
        store.save("Acme", "v2").await.unwrap();
        assert_eq!(store.get("Acme").await.unwrap().1, "v2");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(store.get("ghost").await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.get("///").await, Err(StoreError::NotFound(_))));
    }
}
