use crate::{
    domain::record::{Record, RecordId},
    error::{ConsoleError, Result},
    repository::Repository,
};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory repository living as long as the console session
pub struct MemoryRepository<R> {
    records: RwLock<Vec<R>>,
}

impl<R: Record> MemoryRepository<R> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Creates a repository seeded with records, keeping their order
    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Replaces the whole collection, e.g. after loading fixtures
    pub async fn replace_all(&self, records: Vec<R>) {
        *self.records.write().await = records;
    }
}

impl<R: Record> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> Repository<R> for MemoryRepository<R> {
    async fn list(&self) -> Result<Vec<R>> {
        Ok(self.records.read().await.clone())
    }

    async fn get(&self, id: &RecordId) -> Result<R> {
        self.records
            .read()
            .await
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or_else(|| ConsoleError::RecordNotFound(id.to_string()))
    }

    async fn insert(&self, record: R) -> Result<()> {
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.id() == record.id()) {
            return Err(ConsoleError::DuplicateRecord(record.id().to_string()));
        }
        debug!(collection = R::COLLECTION, id = %record.id(), "Inserted record");
        records.push(record);
        Ok(())
    }

    async fn update(&self, record: R) -> Result<()> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|existing| existing.id() == record.id())
            .ok_or_else(|| ConsoleError::RecordNotFound(record.id().to_string()))?;
        debug!(collection = R::COLLECTION, id = %record.id(), "Updated record");
        *slot = record;
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<R> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| ConsoleError::RecordNotFound(id.to_string()))?;
        debug!(collection = R::COLLECTION, id = %id, "Deleted record");
        Ok(records.remove(index))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}
