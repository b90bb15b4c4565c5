//! Page-level glue: forms in, records stored, tables out.

use crate::{
    config::ConsoleConfig,
    domain::{
        record::{FormRecord, RecordId},
        Task,
    },
    error::{ConsoleError, Result},
    form::{FieldDescriptor, FormModal, SubmitOutcome},
    kanban::{BoardConfig, CardMove, KanbanBoard, KanbanCard, MoveOutcome},
    repository::Repository,
    table::{self, Paging, TablePage, TableQuery},
};
use std::{marker::PhantomData, sync::Arc};
use tracing::{debug, info};

/// Result of a confirmation-gated delete
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome<R> {
    Deleted(R),
    Cancelled,
}

/// CRUD operations for one record type over a session repository
pub struct RecordService<R, P> {
    repo: P,
    fields: Vec<FieldDescriptor>,
    page_size: usize,
    _record: PhantomData<fn() -> R>,
}

impl<R, P> RecordService<R, P>
where
    R: FormRecord,
    P: Repository<R>,
{
    const DEFAULT_PAGE_SIZE: usize = 10;

    pub fn new(repo: P) -> Self {
        Self {
            repo,
            fields: R::form_fields(),
            page_size: Self::DEFAULT_PAGE_SIZE,
            _record: PhantomData,
        }
    }

    /// A service using the configured table page size
    pub fn from_config(repo: P, config: &ConsoleConfig) -> Self {
        Self::new(repo).with_page_size(config.table.page_size)
    }

    /// Replaces the record type's default form fields
    pub fn with_fields(mut self, fields: Vec<FieldDescriptor>) -> Self {
        self.fields = fields;
        self
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn repository(&self) -> &P {
        &self.repo
    }

    /// First page of the collection with no filters applied
    pub fn default_query(&self) -> Result<TableQuery> {
        Ok(TableQuery::new().paging(Paging::first(self.page_size)?))
    }

    /// An open, empty form for a new record
    pub fn create_form(&self, title: impl Into<String>) -> FormModal {
        let mut modal = FormModal::new(title, self.fields.clone());
        modal.open(None);
        modal
    }

    /// An open form seeded with an existing record's values
    pub async fn edit_form(&self, title: impl Into<String>, id: &RecordId) -> Result<FormModal> {
        let record = self.repo.get(id).await?;
        let mut modal = FormModal::new(title, self.fields.clone());
        modal.open(Some(Arc::new(record.to_form())));
        Ok(modal)
    }

    /// Submits a form, creating a record or updating `editing`.
    ///
    /// Validation failures and values the record type refuses are reported
    /// on the form, which stays open. On success the form is closed.
    pub async fn submit(
        &self,
        modal: &mut FormModal,
        editing: Option<RecordId>,
    ) -> Result<SubmitOutcome> {
        let Some(values) = modal.prepare_submit()? else {
            return Ok(SubmitOutcome::Rejected(modal.state().errors.clone()));
        };

        let id = editing.unwrap_or_default();
        let record = match R::from_form(id, &values) {
            Ok(record) => record,
            Err(ConsoleError::InvalidFieldValue { field, reason }) => {
                let label = modal
                    .field(&field)
                    .map(|f| f.label.clone())
                    .unwrap_or_else(|| field.clone());
                modal.set_error(&field, format!("{} {}.", label, reason));
                return Ok(SubmitOutcome::Rejected(modal.state().errors.clone()));
            }
            Err(err) => return Err(err),
        };

        match editing {
            Some(_) => self.repo.update(record).await?,
            None => self.repo.insert(record).await?,
        }
        info!(
            collection = R::COLLECTION,
            id = %id,
            created = editing.is_none(),
            "Saved record from form"
        );
        modal.close();
        Ok(SubmitOutcome::Submitted)
    }

    /// Runs a table query over the current collection
    pub async fn query(&self, query: &TableQuery) -> Result<TablePage<R>> {
        let records = self.repo.list().await?;
        table::apply(&records, query)
    }

    /// Deletes a record once `confirm` approves it; there is no undo
    pub async fn delete(
        &self,
        id: &RecordId,
        confirm: impl FnOnce(&R) -> bool,
    ) -> Result<DeleteOutcome<R>> {
        let record = self.repo.get(id).await?;
        if !confirm(&record) {
            debug!(collection = R::COLLECTION, id = %id, "Delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }
        let removed = self.repo.delete(id).await?;
        info!(collection = R::COLLECTION, id = %id, "Deleted record");
        Ok(DeleteOutcome::Deleted(removed))
    }
}

/// Builds a kanban board from every card in a repository
pub async fn load_board<C, P>(repo: &P, config: BoardConfig) -> Result<KanbanBoard<C>>
where
    C: KanbanCard,
    P: Repository<C>,
{
    KanbanBoard::from_cards(config, repo.list().await?)
}

impl<P: Repository<Task>> RecordService<Task, P> {
    /// A task service whose status options are the configured board columns
    pub fn for_board(repo: P, config: &ConsoleConfig) -> Self {
        Self::from_config(repo, config).with_fields(Task::form_fields_for(&config.board))
    }
}

/// Stores the restamped card, then applies the move on the board.
///
/// The board only changes once the repository has accepted the card, so a
/// failed or dropped update leaves board and repository in agreement.
pub async fn move_card<C, P>(
    board: &mut KanbanBoard<C>,
    repo: &P,
    mv: &CardMove,
) -> Result<MoveOutcome>
where
    C: KanbanCard,
    P: Repository<C>,
{
    let Some(restamped) = board.preview_move(mv)? else {
        return Ok(MoveOutcome::Unchanged);
    };
    repo.update(restamped).await?;
    board.apply_move(mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Lead, Quote},
        kanban::CardPosition,
        repository::MemoryRepository,
        table::SortKey,
    };

    fn lead_service() -> RecordService<Lead, MemoryRepository<Lead>> {
        RecordService::new(MemoryRepository::new()).with_page_size(2)
    }

    #[tokio::test]
    async fn test_create_through_form() {
        let service = lead_service();
        let mut modal = service.create_form("New Lead");
        modal.set_value("name", "Ada Lovelace").unwrap();
        modal.set_value("email", "ada@example.com").unwrap();
        modal.set_value("source", "Referral").unwrap();

        let outcome = service.submit(&mut modal, None).await.unwrap();

        assert!(outcome.is_submitted());
        assert!(!modal.is_open());
        let leads = service.repository().list().await.unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].source, "Referral");
        assert_eq!(leads[0].status, "New");
    }

    #[tokio::test]
    async fn test_invalid_form_stores_nothing() {
        let service = lead_service();
        let mut modal = service.create_form("New Lead");
        modal.set_value("email", "not-an-email").unwrap();

        let outcome = service.submit(&mut modal, None).await.unwrap();

        assert!(!outcome.is_submitted());
        assert!(modal.is_open());
        assert_eq!(modal.error("name"), Some("Full Name is required."));
        assert_eq!(
            modal.error("email"),
            Some("Email must be a valid email address.")
        );
        assert_eq!(service.repository().len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_record_level_error_lands_on_field() {
        let service = RecordService::new(MemoryRepository::<Quote>::new());
        let mut modal = service.create_form("New Quote");
        modal.set_value("customer", "Initech").unwrap();
        modal.set_value("subject", "Printers").unwrap();
        modal.set_value("subtotal", "1000").unwrap();
        modal.set_value("issued_on", "2024-03-01").unwrap();
        modal.set_value("valid_until", "2024-02-01").unwrap();

        let outcome = service.submit(&mut modal, None).await.unwrap();

        assert!(!outcome.is_submitted());
        assert_eq!(
            modal.error("valid_until"),
            Some("Valid Until must not be before the issue date.")
        );
        assert_eq!(service.repository().len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_edit_form_updates_in_place() {
        let service = lead_service();
        let lead = Lead::new("Ada", "ada@example.com");
        service.repository().insert(lead.clone()).await.unwrap();

        let mut modal = service.edit_form("Edit Lead", &lead.id).await.unwrap();
        modal.set_value("status", "Qualified").unwrap();
        service.submit(&mut modal, Some(lead.id)).await.unwrap();

        let stored = service.repository().get(&lead.id).await.unwrap();
        assert_eq!(stored.status, "Qualified");
        assert_eq!(stored.created_on, lead.created_on);
        assert_eq!(service.repository().len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_query_pages() {
        let service = lead_service();
        for name in ["Cleo", "Ada", "Bea"] {
            service
                .repository()
                .insert(Lead::new(name, format!("{}@example.com", name.to_lowercase())))
                .await
                .unwrap();
        }

        let query = service.default_query().unwrap().sort(SortKey::ascending("name"));
        let page = service.query(&query).await.unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0].name, "Ada");
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let service = lead_service();
        let lead = Lead::new("Ada", "ada@example.com");
        service.repository().insert(lead.clone()).await.unwrap();

        let outcome = service.delete(&lead.id, |_| false).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(service.repository().len().await.unwrap(), 1);

        let outcome = service
            .delete(&lead.id, |record| record.name == "Ada")
            .await
            .unwrap();
        assert!(matches!(outcome, DeleteOutcome::Deleted(ref r) if r.id == lead.id));
        assert_eq!(service.repository().len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_move_card_persists_status() {
        let tasks = vec![
            Task::with_status("A", "Not Started"),
            Task::with_status("B", "Not Started"),
            Task::with_status("C", "Not Started"),
        ];
        let moved_id = tasks[1].id;
        let repo = MemoryRepository::with_records(tasks);
        let mut board = load_board::<Task, _>(&repo, BoardConfig::default()).await.unwrap();

        let outcome = move_card(
            &mut board,
            &repo,
            &CardMove::new(
                CardPosition::new("Not Started", 1),
                CardPosition::new("In Progress", 0),
            ),
        )
        .await
        .unwrap();

        assert_eq!(outcome, MoveOutcome::Moved { card: moved_id });
        let stored = repo.get(&moved_id).await.unwrap();
        assert_eq!(stored.status, "In Progress");
        assert!(board.is_consistent());
    }

    #[tokio::test]
    async fn test_failed_store_leaves_board_unmoved() {
        let tasks = vec![
            Task::with_status("A", "Not Started"),
            Task::with_status("B", "Not Started"),
        ];
        let first = tasks[0].id;
        let repo = MemoryRepository::with_records(tasks);
        let mut board = load_board::<Task, _>(&repo, BoardConfig::default()).await.unwrap();
        let before = board.clone();
        repo.delete(&first).await.unwrap();

        let result = move_card(
            &mut board,
            &repo,
            &CardMove::new(
                CardPosition::new("Not Started", 0),
                CardPosition::new("In Progress", 0),
            ),
        )
        .await;

        assert!(matches!(result, Err(ConsoleError::RecordNotFound(_))));
        assert_eq!(board, before);
        assert_eq!(
            board.find(&first),
            Some(CardPosition::new("Not Started", 0))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_move_leaves_board_unmoved() {
        let task = Task::with_status("A", "Not Started");
        let id = task.id;
        let repo = crate::repository::Delayed::new(
            MemoryRepository::with_records(vec![task]),
            std::time::Duration::from_millis(400),
        );
        let cards = repo.inner().list().await.unwrap();
        let mut board = KanbanBoard::from_cards(BoardConfig::default(), cards).unwrap();
        let mv = CardMove::new(
            CardPosition::new("Not Started", 0),
            CardPosition::new("In Progress", 0),
        );

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            move_card(&mut board, &repo, &mv),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(board.find(&id), Some(CardPosition::new("Not Started", 0)));
        let stored: Task = repo.inner().get(&id).await.unwrap();
        assert_eq!(stored.status, "Not Started");
    }

    #[tokio::test]
    async fn test_task_status_must_name_a_column() {
        let service = RecordService::new(MemoryRepository::<Task>::new());
        let mut modal = service.create_form("New Task");
        modal.set_value("title", "Archive old files").unwrap();
        modal.set_value("status", "Archived").unwrap();

        let outcome = service.submit(&mut modal, None).await.unwrap();

        assert!(!outcome.is_submitted());
        assert_eq!(
            modal.error("status"),
            Some("Status must be one of the listed options.")
        );
        assert_eq!(service.repository().len().await.unwrap(), 0);
        assert!(load_board::<Task, _>(service.repository(), BoardConfig::default())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_services_follow_configuration() {
        let config = crate::config::parse_config(
            r#"
            [table]
            page_size = 3
            [board]
            name = "Ops"
            columns = ["Todo", "Doing", "Done"]
            "#,
        )
        .unwrap();

        let leads = RecordService::from_config(MemoryRepository::<Lead>::new(), &config);
        assert_eq!(leads.page_size(), 3);
        let paging = leads.default_query().unwrap().paging.unwrap();
        assert_eq!(paging.page_size(), 3);

        let tasks = RecordService::for_board(MemoryRepository::<Task>::new(), &config);
        let mut modal = tasks.create_form("New Task");
        assert_eq!(modal.value("status").and_then(|v| v.as_text()), Some("Todo"));
        modal.set_value("title", "Restock").unwrap();
        modal.set_value("status", "Doing").unwrap();
        assert!(tasks.submit(&mut modal, None).await.unwrap().is_submitted());

        let board = load_board::<Task, _>(tasks.repository(), config.board.clone())
            .await
            .unwrap();
        assert_eq!(board.column("Doing").unwrap().len(), 1);
    }
}
