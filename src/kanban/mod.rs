pub mod board;

pub use board::{BoardConfig, CardMove, CardPosition, Column, KanbanBoard, KanbanCard, MoveOutcome};
