use crate::{
    domain::record::Record,
    error::Result,
    repository::memory::MemoryRepository,
};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Directory of JSON seed files, one `<collection>.json` array per record type
pub struct FixtureStore {
    root_path: PathBuf,
}

impl FixtureStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    fn collection_file<R: Record>(&self) -> PathBuf {
        self.root_path.join(format!("{}.json", R::COLLECTION))
    }

    /// Creates the fixture directory if needed
    pub async fn initialize(&self) -> Result<()> {
        if !self.root_path.exists() {
            fs::create_dir_all(&self.root_path).await?;
        }
        Ok(())
    }

    pub fn has_collection<R: Record>(&self) -> bool {
        self.collection_file::<R>().exists()
    }

    /// Loads a collection; a missing file is an empty collection
    pub async fn load<R>(&self) -> Result<Vec<R>>
    where
        R: Record + DeserializeOwned,
    {
        let path = self.collection_file::<R>();
        if !path.exists() {
            debug!(collection = R::COLLECTION, "No fixture file, starting empty");
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path).await?;
        let records: Vec<R> = serde_json::from_str(&contents)?;
        info!(
            collection = R::COLLECTION,
            count = records.len(),
            "Loaded fixtures from {}",
            path.display()
        );
        Ok(records)
    }

    /// Writes a collection as pretty-printed JSON
    pub async fn save<R>(&self, records: &[R]) -> Result<()>
    where
        R: Record + Serialize,
    {
        self.initialize().await?;
        let json = serde_json::to_string_pretty(records)?;
        fs::write(self.collection_file::<R>(), json).await?;
        Ok(())
    }

    /// Builds a fresh session repository seeded from the collection's file
    pub async fn seed<R>(&self) -> Result<MemoryRepository<R>>
    where
        R: Record + DeserializeOwned,
    {
        Ok(MemoryRepository::with_records(self.load::<R>().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Asset, Lead, Task},
        error::ConsoleError,
        repository::Repository,
    };
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_initialize_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = FixtureStore::new(temp_dir.path().join("fixtures"));

        assert!(!store.root().exists());
        store.initialize().await.unwrap();
        assert!(store.root().exists());
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FixtureStore::new(temp_dir.path());

        let leads: Vec<Lead> = store.load().await.unwrap();
        assert!(leads.is_empty());
        assert!(!store.has_collection::<Lead>());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = FixtureStore::new(temp_dir.path());

        let tasks = vec![Task::new("Draft brief"), Task::with_status("Ship", "Completed")];
        store.save(&tasks).await.unwrap();

        assert!(temp_dir.path().join("tasks.json").exists());
        let loaded: Vec<Task> = store.load().await.unwrap();
        assert_eq!(loaded, tasks);
    }

    #[tokio::test]
    async fn test_seed_repository_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        let store = FixtureStore::new(temp_dir.path());
        let assets = vec![
            Asset::new("AST-2", "Desk", "Furniture", 300.0),
            Asset::new("AST-1", "Laptop", "IT Equipment", 1200.0),
        ];
        store.save(&assets).await.unwrap();

        let repo = store.seed::<Asset>().await.unwrap();
        let listed = repo.list().await.unwrap();

        assert_eq!(listed[0].tag, "AST-2");
        assert_eq!(listed[1].tag, "AST-1");
    }

    #[tokio::test]
    async fn test_malformed_fixture_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("leads.json"), "{not json").unwrap();
        let store = FixtureStore::new(temp_dir.path());

        let result = store.load::<Lead>().await;
        assert!(matches!(result, Err(ConsoleError::SerializationError(_))));
    }
}
