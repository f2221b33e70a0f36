//! Multi-board task aggregation
//!
//! Enumerates eligible boards, fans out one fetch per board concurrently
//! and merges the results, tagging every task with its origin board.

use async_trait::async_trait;
use futures_util::future::join_all;
use monday::{BoardDirectory, MondayError};

use crate::models::RawTask;

/// Boards whose name contains one of these substrings are structural
/// sub-item boards duplicating parent data; they are skipped.
pub const EXCLUDED_BOARD_PATTERNS: &[&str] = &["サブアイテム"];

/// Seam between the monitor and the board service, so monitors can be
/// driven under test without a live endpoint
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RawTask>, MondayError>;
}

#[derive(Clone)]
pub struct TaskAggregator {
    directory: BoardDirectory,
    excluded_patterns: Vec<String>,
}

impl TaskAggregator {
    pub fn new(directory: BoardDirectory) -> Self {
        Self::with_excluded_patterns(
            directory,
            EXCLUDED_BOARD_PATTERNS.iter().map(|p| p.to_string()).collect(),
        )
    }

    pub fn with_excluded_patterns(directory: BoardDirectory, excluded_patterns: Vec<String>) -> Self {
        Self {
            directory,
            excluded_patterns,
        }
    }

    /// Fetches tasks from every eligible board concurrently
    ///
    /// One misconfigured or retired board must not blind the monitor to
    /// the others: individual fetch failures are logged and contribute
    /// zero tasks. A board-listing failure still propagates.
    pub async fn fetch_all(&self) -> Result<Vec<RawTask>, MondayError> {
        let boards = self.directory.list_boards().await?;
        let eligible: Vec<_> = boards
            .into_iter()
            .filter(|board| !self.is_excluded(&board.name))
            .collect();

        tracing::debug!("fetching {} eligible board(s)", eligible.len());

        let fetches = eligible.iter().map(|board| {
            let directory = self.directory.clone();
            async move { (board, directory.fetch_board_tasks(&board.id).await) }
        });

        let mut merged = Vec::new();
        for (board, result) in join_all(fetches).await {
            match result {
                Ok((board_name, items)) => {
                    let name = board_name.or_else(|| Some(board.name.clone()));
                    merged.extend(
                        items
                            .into_iter()
                            .map(|item| RawTask::from_item(item, name.clone())),
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "⚠️ board '{}' ({}) fetch failed, skipping: {}",
                        board.name,
                        board.id,
                        e
                    );
                }
            }
        }

        Ok(merged)
    }

    /// Single-board mode: failures propagate directly to the caller
    pub async fn fetch_single(&self, board_id: &str) -> Result<Vec<RawTask>, MondayError> {
        let (board_name, items) = self.directory.fetch_board_tasks(board_id).await?;
        Ok(items
            .into_iter()
            .map(|item| RawTask::from_item(item, board_name.clone()))
            .collect())
    }

    fn is_excluded(&self, board_name: &str) -> bool {
        self.excluded_patterns
            .iter()
            .any(|pattern| board_name.contains(pattern))
    }
}

#[async_trait]
impl TaskSource for TaskAggregator {
    async fn fetch(&self) -> Result<Vec<RawTask>, MondayError> {
        self.fetch_all().await
    }
}

/// Aggregator bound to one board; fetch failures are fatal to the cycle
pub struct SingleBoardSource {
    aggregator: TaskAggregator,
    board_id: String,
}

impl SingleBoardSource {
    pub fn new(aggregator: TaskAggregator, board_id: impl Into<String>) -> Self {
        Self {
            aggregator,
            board_id: board_id.into(),
        }
    }
}

#[async_trait]
impl TaskSource for SingleBoardSource {
    async fn fetch(&self) -> Result<Vec<RawTask>, MondayError> {
        self.aggregator.fetch_single(&self.board_id).await
    }
}
