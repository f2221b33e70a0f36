//! Column resolution across heterogeneous boards
//!
//! Boards created at different times encode the same semantic field under
//! different column ids. Each field therefore carries an ordered candidate
//! list; the first id present on an item wins. Unresolved fields behave as
//! absent, which downstream classifies as "not urgent" rather than erroring.

use monday::ColumnValue;
use serde::{Deserialize, Serialize};

/// Ordered candidate column ids per semantic field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMap {
    pub person: Vec<String>,
    pub status: Vec<String>,
    pub date: Vec<String>,
    pub priority: Vec<String>,
}

impl Default for ColumnMap {
    /// Candidate ids observed across the production account's boards
    fn default() -> Self {
        Self {
            person: vec!["person".to_string()],
            status: vec!["status".to_string()],
            date: vec![
                "date4".to_string(),
                "date0".to_string(),
                "date_mkybm0xa".to_string(),
            ],
            priority: vec![
                "priority".to_string(),
                "priority2".to_string(),
                "color_mkybqdk7".to_string(),
                "color_mkybqv1q".to_string(),
                "color_mkybb6cr".to_string(),
                "color_mkybag09".to_string(),
                "color_mkyb17nw".to_string(),
            ],
        }
    }
}

/// Probes `candidates` in order and returns the first column present
pub fn resolve<'a>(candidates: &[String], columns: &'a [ColumnValue]) -> Option<&'a ColumnValue> {
    candidates
        .iter()
        .find_map(|candidate| columns.iter().find(|column| &column.id == candidate))
}
