//! Task models flowing through one monitoring cycle

use monday::{ColumnValue, Item};
use serde::{Deserialize, Serialize};

/// Urgency tier. The monitor recognizes exactly two; anything lower is
/// filtered out during classification and never represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    Critical,
    High,
}

impl PriorityLevel {
    /// Display label used by the task list view
    pub fn label(&self) -> &'static str {
        match self {
            PriorityLevel::Critical => "緊急",
            PriorityLevel::High => "高",
        }
    }
}

/// A task as fetched, tagged with its origin board. Lives for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTask {
    pub id: String,
    pub name: String,
    pub board_name: Option<String>,
    pub column_values: Vec<ColumnValue>,
}

impl RawTask {
    pub fn from_item(item: Item, board_name: Option<String>) -> Self {
        Self {
            id: item.id,
            name: item.name,
            board_name,
            column_values: item.column_values,
        }
    }
}

/// A task that passed all four urgency predicates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgentTask {
    pub id: String,
    pub name: String,
    pub board_name: Option<String>,
    pub priority: PriorityLevel,
    pub overdue: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_labels() {
        assert_eq!(PriorityLevel::Critical.label(), "緊急");
        assert_eq!(PriorityLevel::High.label(), "高");
    }

    #[test]
    fn test_priority_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PriorityLevel::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(serde_json::to_string(&PriorityLevel::High).unwrap(), "\"high\"");
    }

    #[test]
    fn test_from_item_tags_board() {
        let item = Item {
            id: "1".to_string(),
            name: "Ship deck".to_string(),
            column_values: vec![],
        };

        let task = RawTask::from_item(item, Some("Launch".to_string()));
        assert_eq!(task.board_name.as_deref(), Some("Launch"));
        assert_eq!(task.name, "Ship deck");
    }
}
