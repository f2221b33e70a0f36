//! Wire types for the monday.com GraphQL API

use serde::{Deserialize, Serialize};

/// A board: a remote collection of items sharing one column schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
}

/// One column value on a board item
///
/// `text` is the rendered display text. `value` is the structured JSON
/// payload, present only for structured columns (e.g. people columns carry
/// `{"personsAndTeams": [...]}` there).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnValue {
    pub id: String,
    pub text: Option<String>,
    pub value: Option<String>,
}

/// A board item ("task") as returned by `items_page`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub column_values: Vec<ColumnValue>,
}

impl Item {
    /// Returns the column with the given id, if present on this item
    pub fn column(&self, column_id: &str) -> Option<&ColumnValue> {
        self.column_values.iter().find(|c| c.id == column_id)
    }
}
