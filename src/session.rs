//! Per-session wiring: repositories, services and the board, built from
//! the console configuration.

use crate::{
    config::ConsoleConfig,
    domain::{
        record::{FormRecord, Record},
        Task,
    },
    error::Result,
    kanban::KanbanBoard,
    repository::{Delayed, FixtureStore, MemoryRepository, Repository},
    service::{self, RecordService},
};
use serde::de::DeserializeOwned;
use tracing::info;

/// Repository handed out by a session: in memory, behind the configured latency
pub type SessionRepository<R> = Delayed<MemoryRepository<R>>;

/// One user's working set of collections.
///
/// Every call to [`Session::repository`] starts from the fixture files, so
/// two sessions never share records.
pub struct Session {
    config: ConsoleConfig,
    fixtures: Option<FixtureStore>,
}

impl Session {
    pub fn new(config: ConsoleConfig) -> Self {
        let fixtures = config.session.fixtures_dir.as_ref().map(FixtureStore::new);
        Self { config, fixtures }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn fixtures(&self) -> Option<&FixtureStore> {
        self.fixtures.as_ref()
    }

    /// A fresh repository, seeded when a fixture directory is configured
    pub async fn repository<R>(&self) -> Result<SessionRepository<R>>
    where
        R: Record + DeserializeOwned,
    {
        let inner = match &self.fixtures {
            Some(store) => store.seed::<R>().await?,
            None => MemoryRepository::new(),
        };
        info!(
            collection = R::COLLECTION,
            latency_ms = self.config.session.simulated_latency_ms,
            "Opened session repository"
        );
        Ok(Delayed::new(inner, self.config.session.simulated_latency()))
    }

    pub async fn service<R>(&self) -> Result<RecordService<R, SessionRepository<R>>>
    where
        R: FormRecord + DeserializeOwned,
    {
        Ok(RecordService::from_config(self.repository().await?, &self.config))
    }

    /// Task service whose status options are the configured columns
    pub async fn task_service(&self) -> Result<RecordService<Task, SessionRepository<Task>>> {
        Ok(RecordService::for_board(self.repository().await?, &self.config))
    }

    /// Lays the tasks in `repo` out on the configured board
    pub async fn load_board<P>(&self, repo: &P) -> Result<KanbanBoard<Task>>
    where
        P: Repository<Task>,
    {
        service::load_board(repo, self.config.board.clone()).await
    }
}
