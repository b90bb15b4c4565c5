use crate::{
    domain::record::{Record, RecordId},
    error::Result,
    table::{self, TableQuery},
};
use async_trait::async_trait;

pub mod fixture;
pub mod latency;
pub mod memory;

pub use fixture::FixtureStore;
pub use latency::Delayed;
pub use memory::MemoryRepository;

/// Session-scoped store for one record collection
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Lists all records in insertion order
    async fn list(&self) -> Result<Vec<R>>;

    /// Loads a record by ID
    async fn get(&self, id: &RecordId) -> Result<R>;

    /// Adds a new record; fails if the ID is already taken
    async fn insert(&self, record: R) -> Result<()>;

    /// Replaces an existing record in place
    async fn update(&self, record: R) -> Result<()>;

    /// Removes a record, returning it
    async fn delete(&self, id: &RecordId) -> Result<R>;

    async fn len(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }

    /// Records whose given fields contain `query`, case-insensitively
    async fn search(&self, query: &str, fields: &[&str]) -> Result<Vec<R>> {
        let records = self.list().await?;
        let query = TableQuery::new().search(query, fields.iter().copied());
        Ok(table::filter_records(&records, &query))
    }
}
