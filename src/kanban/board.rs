use crate::{
    domain::record::{Record, RecordId},
    error::{ConsoleError, Result},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A record that lives in a kanban column and carries that column's name
pub trait KanbanCard: Record {
    fn status(&self) -> &str;

    fn set_status(&mut self, status: &str);
}

/// Board configuration: a name and the ordered column labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub name: String,
    pub columns: Vec<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: "Project Board".to_string(),
            columns: vec![
                "Not Started".to_string(),
                "In Progress".to_string(),
                "On Hold".to_string(),
                "Completed".to_string(),
            ],
        }
    }
}

/// Slot on the board: a column name and an index within that column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPosition {
    pub column: String,
    pub index: usize,
}

impl CardPosition {
    pub fn new(column: impl Into<String>, index: usize) -> Self {
        Self {
            column: column.into(),
            index,
        }
    }
}

/// A drop of the card at `source` into the slot `destination`.
///
/// This is the only input the board needs from a drag-and-drop layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMove {
    pub source: CardPosition,
    pub destination: CardPosition,
}

impl CardMove {
    pub fn new(source: CardPosition, destination: CardPosition) -> Self {
        Self {
            source,
            destination,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.source == self.destination
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Unchanged,
    Moved { card: RecordId },
}

/// One named status column holding its cards in display order
#[derive(Debug, Clone, PartialEq)]
pub struct Column<C> {
    pub name: String,
    pub cards: Vec<C>,
}

impl<C> Column<C> {
    fn new(name: String) -> Self {
        Self {
            name,
            cards: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Kanban board state
#[derive(Debug, Clone, PartialEq)]
pub struct KanbanBoard<C> {
    name: String,
    columns: Vec<Column<C>>,
}

impl<C: KanbanCard> KanbanBoard<C> {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            name: config.name,
            columns: config.columns.into_iter().map(Column::new).collect(),
        }
    }

    /// Builds a board by bucketing cards on their status, keeping input order
    pub fn from_cards(config: BoardConfig, cards: impl IntoIterator<Item = C>) -> Result<Self> {
        let mut board = Self::new(config);
        for card in cards {
            board.add_card(card)?;
        }
        Ok(board)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column<C>] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column<C>> {
        self.columns.iter().find(|col| col.name == name)
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|col| col.name == name)
            .ok_or_else(|| ConsoleError::UnknownColumn(name.to_string()))
    }

    /// Appends a card to the column named by its status
    pub fn add_card(&mut self, card: C) -> Result<()> {
        if self.find(card.id()).is_some() {
            return Err(ConsoleError::DuplicateRecord(card.id().to_string()));
        }
        let col = self.column_index(card.status())?;
        self.columns[col].cards.push(card);
        Ok(())
    }

    /// Locates a card by id
    pub fn find(&self, id: &RecordId) -> Option<CardPosition> {
        self.columns.iter().find_map(|col| {
            col.cards
                .iter()
                .position(|card| card.id() == id)
                .map(|index| CardPosition::new(col.name.clone(), index))
        })
    }

    pub fn get(&self, id: &RecordId) -> Option<&C> {
        self.columns
            .iter()
            .flat_map(|col| col.cards.iter())
            .find(|card| card.id() == id)
    }

    pub fn remove_card(&mut self, id: &RecordId) -> Result<C> {
        let position = self
            .find(id)
            .ok_or_else(|| ConsoleError::CardNotFound(id.to_string()))?;
        let col = self.column_index(&position.column)?;
        Ok(self.columns[col].cards.remove(position.index))
    }

    /// Checks a move against the board, returning the source and
    /// destination column indices, or `None` for a no-op
    fn check_move(&self, mv: &CardMove) -> Result<Option<(usize, usize)>> {
        if mv.is_noop() {
            return Ok(None);
        }

        let from = self.column_index(&mv.source.column)?;
        let to = self.column_index(&mv.destination.column)?;

        let source_len = self.columns[from].len();
        if mv.source.index >= source_len {
            return Err(ConsoleError::PositionOutOfRange {
                column: mv.source.column.clone(),
                index: mv.source.index,
                len: source_len,
            });
        }

        // Slots available once the card has left its source column
        let dest_len = if from == to {
            source_len - 1
        } else {
            self.columns[to].len()
        };
        if mv.destination.index > dest_len {
            return Err(ConsoleError::PositionOutOfRange {
                column: mv.destination.column.clone(),
                index: mv.destination.index,
                len: dest_len,
            });
        }
        Ok(Some((from, to)))
    }

    /// The card a move would carry, already restamped with its destination
    /// column. The board is not changed; `None` means the move is a no-op.
    pub fn preview_move(&self, mv: &CardMove) -> Result<Option<C>> {
        let Some((from, to)) = self.check_move(mv)? else {
            return Ok(None);
        };
        let mut card = self.columns[from].cards[mv.source.index].clone();
        card.set_status(&self.columns[to].name);
        Ok(Some(card))
    }

    /// Applies a drag-drop move.
    ///
    /// Identical source and destination is a no-op. Otherwise the card is
    /// taken out of the source column, restamped with the destination
    /// column's name and inserted at the destination index. Invalid moves
    /// leave the board untouched.
    pub fn apply_move(&mut self, mv: &CardMove) -> Result<MoveOutcome> {
        let Some((from, to)) = self.check_move(mv)? else {
            return Ok(MoveOutcome::Unchanged);
        };

        let mut card = self.columns[from].cards.remove(mv.source.index);
        card.set_status(&self.columns[to].name);
        let id = *card.id();
        self.columns[to].cards.insert(mv.destination.index, card);

        debug!(
            board = %self.name,
            card = %id,
            from = %mv.source.column,
            to = %mv.destination.column,
            "Moved card"
        );
        Ok(MoveOutcome::Moved { card: id })
    }

    /// Moves a card by id to the end of another column
    pub fn move_to_column(&mut self, id: &RecordId, column: &str) -> Result<MoveOutcome> {
        let source = self
            .find(id)
            .ok_or_else(|| ConsoleError::CardNotFound(id.to_string()))?;
        let to = self.column_index(column)?;
        let index = if source.column == column {
            self.columns[to].len() - 1
        } else {
            self.columns[to].len()
        };
        self.apply_move(&CardMove::new(source, CardPosition::new(column, index)))
    }

    /// Every card's status names the column holding it
    pub fn is_consistent(&self) -> bool {
        self.columns
            .iter()
            .all(|col| col.cards.iter().all(|card| card.status() == col.name))
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cards(&self) -> impl Iterator<Item = &C> {
        self.columns.iter().flat_map(|col| col.cards.iter())
    }

    /// Flattens the board back into a list, column by column
    pub fn into_cards(self) -> Vec<C> {
        self.columns
            .into_iter()
            .flat_map(|col| col.cards.into_iter())
            .collect()
    }
}

impl<C: KanbanCard> Default for KanbanBoard<C> {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}
