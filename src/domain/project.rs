use crate::{
    domain::record::{FieldValue, FormRecord, Record, RecordId},
    error::{ConsoleError, Result},
    form::{FieldDescriptor, FormValues, SelectOption},
    kanban::{BoardConfig, KanbanCard},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Urgency of a project task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Urgent => write!(f, "Urgent"),
        }
    }
}

impl FromStr for Priority {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ConsoleError::InvalidFieldValue {
                field: "priority".to_string(),
                reason: format!("unknown priority '{}'", s),
            }),
        }
    }
}

/// One checklist entry on a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub description: String,
    pub done: bool,
}

impl ChecklistItem {
    pub fn new(description: String) -> Self {
        Self {
            description,
            done: false,
        }
    }

    pub fn toggle(&mut self) {
        self.done = !self.done;
    }
}

/// A project task shown on the kanban board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Name of the board column holding the task
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
}

impl Task {
    /// Creates a task in the first column of the default board
    pub fn new(title: impl Into<String>) -> Self {
        Self::in_first_column(title, &BoardConfig::default())
    }

    /// Creates a task in the first column of `board`
    pub fn in_first_column(title: impl Into<String>, board: &BoardConfig) -> Self {
        let status = board.columns.first().cloned().unwrap_or_default();
        Self::with_status(title, status)
    }

    /// Form fields whose status options are the columns of `board`
    pub fn form_fields_for(board: &BoardConfig) -> Vec<FieldDescriptor> {
        let columns = &board.columns;
        vec![
            FieldDescriptor::text("title", "Task Title").required(),
            FieldDescriptor::textarea("description", "Description"),
            FieldDescriptor::text("assignee", "Assignee").with_icon("user"),
            FieldDescriptor::select(
                "priority",
                "Priority",
                Priority::ALL.iter().map(|p| SelectOption::same(p.to_string())),
            )
            .with_default(Priority::default().to_string()),
            FieldDescriptor::select(
                "status",
                "Status",
                columns.iter().map(|c| SelectOption::same(c.as_str())),
            )
            .required()
            .with_default(columns.first().cloned().unwrap_or_default()),
            FieldDescriptor::date("start_date", "Start Date"),
            FieldDescriptor::date("due_date", "Due Date"),
            FieldDescriptor::custom("tags", "Tags", "TagInput"),
        ]
    }

    pub fn with_status(title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            title: title.into(),
            description: None,
            assignee: None,
            priority: Priority::default(),
            status: status.into(),
            start_date: None,
            due_date: None,
            tags: Vec::new(),
            checklist: Vec::new(),
        }
    }

    /// Sets both dates with validation
    pub fn set_schedule(&mut self, start: Option<NaiveDate>, due: Option<NaiveDate>) -> Result<()> {
        if let (Some(start), Some(due)) = (start, due) {
            if start > due {
                return Err(ConsoleError::InvalidDateRange {
                    start: start.to_string(),
                    end: due.to_string(),
                });
            }
        }
        self.start_date = start;
        self.due_date = due;
        Ok(())
    }

    pub fn add_checklist_item(&mut self, description: String) {
        self.checklist.push(ChecklistItem::new(description));
    }

    /// Share of checklist items done, 0.0 when the checklist is empty
    pub fn progress(&self) -> f64 {
        if self.checklist.is_empty() {
            return 0.0;
        }
        let done = self.checklist.iter().filter(|item| item.done).count();
        done as f64 / self.checklist.len() as f64
    }

    pub fn is_overdue(&self, today: NaiveDate, done_column: &str) -> bool {
        self.status != done_column && self.due_date.map(|due| due < today).unwrap_or(false)
    }
}

/// Table fields: `title`, `description`, `assignee`, `status`,
/// `start_date`, `due_date`, `tags` and `progress`.
///
/// `priority` reads as its rank (Low = 0 .. Urgent = 3) so that sorting
/// follows urgency. Filter, search and count on `priority_label`, which
/// reads as the name shown in the form ("High").
impl Record for Task {
    const COLLECTION: &'static str = "tasks";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "title" => FieldValue::text(&self.title),
            "description" => self.description.clone().into(),
            "assignee" => self.assignee.clone().into(),
            "priority" => FieldValue::Number(self.priority as u8 as f64),
            "priority_label" => FieldValue::text(self.priority.to_string()),
            "status" => FieldValue::text(&self.status),
            "start_date" => self.start_date.into(),
            "due_date" => self.due_date.into(),
            "tags" => FieldValue::List(self.tags.clone()),
            "progress" => FieldValue::Number(self.progress()),
            _ => FieldValue::Empty,
        }
    }
}

impl KanbanCard for Task {
    fn status(&self) -> &str {
        &self.status
    }

    fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

impl FormRecord for Task {
    fn form_fields() -> Vec<FieldDescriptor> {
        Self::form_fields_for(&BoardConfig::default())
    }

    fn to_form(&self) -> FormValues {
        let mut values = FormValues::new()
            .with("title", self.title.as_str())
            .with("description", self.description.clone().unwrap_or_default())
            .with("assignee", self.assignee.clone().unwrap_or_default())
            .with("priority", self.priority.to_string())
            .with("status", self.status.as_str())
            .with("tags", self.tags.clone());
        if let Some(start) = self.start_date {
            values.insert("start_date", start);
        }
        if let Some(due) = self.due_date {
            values.insert("due_date", due);
        }
        values
    }

    fn from_form(id: RecordId, values: &FormValues) -> Result<Self> {
        let mut task = Task::with_status(values.require_text("title")?, values.require_text("status")?);
        task.id = id;
        task.description = values.text("description");
        task.assignee = values.text("assignee");
        task.priority = match values.text("priority") {
            Some(p) => p.parse()?,
            None => Priority::default(),
        };
        task.tags = values.list("tags");
        task.set_schedule(values.date("start_date")?, values.date("due_date")?)
            .map_err(|_| ConsoleError::InvalidFieldValue {
                field: "due_date".to_string(),
                reason: "must not be before the start date".to_string(),
            })?;
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        form::FormValue,
        table::{self, SortKey, TableQuery},
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_task_starts_in_first_column() {
        let task = Task::new("Write brief");
        assert_eq!(task.status, "Not Started");
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_task_follows_configured_board() {
        let board = BoardConfig {
            name: "Ops".to_string(),
            columns: vec!["Todo".to_string(), "Doing".to_string(), "Done".to_string()],
        };

        assert_eq!(Task::in_first_column("Restock", &board).status, "Todo");

        let fields = Task::form_fields_for(&board);
        let status = fields.iter().find(|f| f.name == "status").unwrap();
        let options: Vec<&str> = status.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(options, vec!["Todo", "Doing", "Done"]);
        assert_eq!(status.initial_value(), FormValue::from("Todo"));
    }

    #[test]
    fn test_priority_label_filters_and_counts() {
        let mut urgent = Task::new("Fix till");
        urgent.priority = Priority::Urgent;
        let mut high = Task::new("Restock");
        high.priority = Priority::High;
        let mut also_high = Task::new("Rota");
        also_high.priority = Priority::High;
        let tasks = vec![urgent, high, also_high];

        let query = TableQuery::new().filter("priority_label", "High");
        let page = table::apply(&tasks, &query).unwrap();
        assert_eq!(page.total, 2);

        let counts = table::count_by(&tasks, "priority_label");
        assert_eq!(
            counts,
            vec![("Urgent".to_string(), 1), ("High".to_string(), 2)]
        );

        let sorted = table::apply(&tasks, &TableQuery::new().sort(SortKey::descending("priority")))
            .unwrap();
        assert_eq!(sorted.rows[0].title, "Fix till");
    }

    #[test]
    fn test_priority_parsing() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" urgent ".parse::<Priority>().unwrap(), Priority::Urgent);
        assert!("someday".parse::<Priority>().is_err());
        assert!(Priority::Urgent > Priority::Low);
    }

    #[test]
    fn test_set_schedule_validates_order() {
        let mut task = Task::new("Write brief");
        assert!(task
            .set_schedule(Some(date(2024, 5, 2)), Some(date(2024, 5, 1)))
            .is_err());
        assert!(task.start_date.is_none());

        task.set_schedule(Some(date(2024, 5, 1)), Some(date(2024, 5, 1)))
            .unwrap();
        assert_eq!(task.due_date, Some(date(2024, 5, 1)));
    }

    #[test]
    fn test_progress() {
        let mut task = Task::new("Launch");
        assert_eq!(task.progress(), 0.0);

        task.add_checklist_item("Copy".to_string());
        task.add_checklist_item("Design".to_string());
        task.checklist[0].toggle();

        assert_eq!(task.progress(), 0.5);
        assert_eq!(task.field("progress"), FieldValue::Number(0.5));
    }

    #[test]
    fn test_is_overdue() {
        let mut task = Task::new("Launch");
        task.due_date = Some(date(2024, 5, 1));

        assert!(task.is_overdue(date(2024, 5, 2), "Completed"));
        assert!(!task.is_overdue(date(2024, 5, 1), "Completed"));

        task.status = "Completed".to_string();
        assert!(!task.is_overdue(date(2024, 5, 2), "Completed"));
    }

    #[test]
    fn test_task_form_round_trip() {
        let mut task = Task::with_status("Launch", "In Progress");
        task.assignee = Some("Lerato".to_string());
        task.priority = Priority::High;
        task.tags = vec!["q2".to_string()];
        task.set_schedule(Some(date(2024, 5, 1)), Some(date(2024, 5, 31)))
            .unwrap();

        let rebuilt = Task::from_form(task.id, &task.to_form()).unwrap();
        assert_eq!(rebuilt, task);
    }

    #[test]
    fn test_task_serialization_omits_empty_dates() {
        let task = Task::new("Launch");
        let json = serde_json::to_string(&task).unwrap();
        assert!(!json.contains("due_date"));

        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }
}
