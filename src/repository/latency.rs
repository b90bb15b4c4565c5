use crate::{
    domain::record::{Record, RecordId},
    error::Result,
    repository::Repository,
};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

/// Wraps a repository and delays every call, standing in for a network hop.
///
/// The delay lives inside the returned future: dropping the future before
/// it completes cancels both the wait and the wrapped operation, so a
/// caller that has gone away never sees a late result.
pub struct Delayed<P> {
    inner: P,
    delay: Duration,
}

impl<P> Delayed<P> {
    pub fn new(inner: P, delay: Duration) -> Self {
        Self { inner, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn into_inner(self) -> P {
        self.inner
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl<R, P> Repository<R> for Delayed<P>
where
    R: Record,
    P: Repository<R>,
{
    async fn list(&self) -> Result<Vec<R>> {
        self.pause().await;
        self.inner.list().await
    }

    async fn get(&self, id: &RecordId) -> Result<R> {
        self.pause().await;
        self.inner.get(id).await
    }

    async fn insert(&self, record: R) -> Result<()> {
        self.pause().await;
        self.inner.insert(record).await
    }

    async fn update(&self, record: R) -> Result<()> {
        self.pause().await;
        self.inner.update(record).await
    }

    async fn delete(&self, id: &RecordId) -> Result<R> {
        self.pause().await;
        self.inner.delete(id).await
    }
}
