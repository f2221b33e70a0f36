//! Board directory: board listing, per-board item pages, token validation

use crate::client::MondayClient;
use crate::error::Result;
use crate::types::{Board, Item};
use serde::Deserialize;
use serde_json::json;

/// Bounded board count per listing call
pub const BOARD_LIST_LIMIT: u32 = 50;

/// Bounded page size per board fetch. Production boards stay well under
/// this; pagination beyond the first page is out of scope.
pub const ITEMS_PAGE_LIMIT: u32 = 500;

/// Read-side access to boards and their items
///
/// # Example
///
/// ```rust,ignore
/// use monday::{BoardDirectory, MondayClient};
///
/// let client = MondayClient::new(std::env::var("MONDAY_API_TOKEN")?)?;
/// let directory = BoardDirectory::new(client);
///
/// for board in directory.list_boards().await? {
///     let (_, items) = directory.fetch_board_tasks(&board.id).await?;
///     println!("{}: {} items", board.name, items.len());
/// }
/// ```
#[derive(Clone)]
pub struct BoardDirectory {
    client: MondayClient,
}

#[derive(Debug, Deserialize)]
struct BoardsData {
    #[serde(default)]
    boards: Vec<Board>,
}

#[derive(Debug, Deserialize)]
struct BoardItemsData {
    #[serde(default)]
    boards: Vec<BoardItems>,
}

#[derive(Debug, Deserialize)]
struct BoardItems {
    name: Option<String>,
    items_page: Option<ItemsPage>,
}

#[derive(Debug, Deserialize)]
struct ItemsPage {
    #[serde(default)]
    items: Vec<Item>,
}

impl BoardDirectory {
    pub fn new(client: MondayClient) -> Self {
        Self { client }
    }

    /// Creates a directory from a token (convenience)
    pub fn from_token(api_token: impl Into<String>) -> Result<Self> {
        Ok(Self::new(MondayClient::new(api_token)?))
    }

    /// Lists boards visible to the token, bounded count
    pub async fn list_boards(&self) -> Result<Vec<Board>> {
        let query = format!("query {{ boards(limit: {}) {{ id name }} }}", BOARD_LIST_LIMIT);
        let data: BoardsData = self.client.query(&query, json!({})).await?;

        tracing::debug!("listed {} board(s)", data.boards.len());

        Ok(data.boards)
    }

    /// Fetches one page of items for a board, together with the board name
    ///
    /// An unknown board id yields an empty result rather than an error;
    /// the API returns an empty `boards` list for ids the token cannot see.
    pub async fn fetch_board_tasks(&self, board_id: &str) -> Result<(Option<String>, Vec<Item>)> {
        let query = format!(
            "query ($boardId: [ID!]!) {{ boards(ids: $boardId) {{ name items_page(limit: {}) {{ items {{ id name column_values {{ id text value }} }} }} }} }}",
            ITEMS_PAGE_LIMIT
        );
        let data: BoardItemsData = self
            .client
            .query(&query, json!({ "boardId": [board_id] }))
            .await?;

        match data.boards.into_iter().next() {
            Some(board) => {
                let items = board.items_page.map(|page| page.items).unwrap_or_default();
                Ok((board.name, items))
            }
            None => Ok((None, Vec::new())),
        }
    }

    /// Checks whether the configured token is accepted by the API
    pub async fn validate_token(&self) -> bool {
        self.client
            .query::<serde_json::Value>("query { me { id } }", json!({}))
            .await
            .is_ok()
    }

    /// Returns the underlying client
    pub fn client(&self) -> &MondayClient {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn directory_for(server: &MockServer) -> BoardDirectory {
        let client = MondayClient::with_base_url("test-token", server.url("/")).unwrap();
        BoardDirectory::new(client)
    }

    #[tokio::test]
    async fn test_list_boards() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/").body_contains("boards(limit:");
                then.status(200).json_body(serde_json::json!({
                    "data": {
                        "boards": [
                            { "id": "101", "name": "Launch" },
                            { "id": "102", "name": "Backlog" }
                        ]
                    }
                }));
            })
            .await;

        let boards = directory_for(&server).list_boards().await.unwrap();

        assert_eq!(boards.len(), 2);
        assert_eq!(boards[0].name, "Launch");
    }

    #[tokio::test]
    async fn test_fetch_board_tasks() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/")
                    .body_contains("items_page")
                    .body_contains("101");
                then.status(200).json_body(serde_json::json!({
                    "data": {
                        "boards": [{
                            "name": "Launch",
                            "items_page": {
                                "items": [{
                                    "id": "1",
                                    "name": "Ship deck",
                                    "column_values": [
                                        { "id": "status", "text": "進行中", "value": null }
                                    ]
                                }]
                            }
                        }]
                    }
                }));
            })
            .await;

        let (board_name, items) = directory_for(&server)
            .fetch_board_tasks("101")
            .await
            .unwrap();

        assert_eq!(board_name.as_deref(), Some("Launch"));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Ship deck");
        assert_eq!(
            items[0].column("status").and_then(|c| c.text.as_deref()),
            Some("進行中")
        );
    }

    #[tokio::test]
    async fn test_fetch_unknown_board_is_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(200)
                    .json_body(serde_json::json!({ "data": { "boards": [] } }));
            })
            .await;

        let (board_name, items) = directory_for(&server)
            .fetch_board_tasks("999")
            .await
            .unwrap();

        assert!(board_name.is_none());
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_validate_token() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/").body_contains("me");
                then.status(200)
                    .json_body(serde_json::json!({ "data": { "me": { "id": "u1" } } }));
            })
            .await;

        assert!(directory_for(&server).validate_token().await);
    }

    #[tokio::test]
    async fn test_validate_token_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(401);
            })
            .await;

        assert!(!directory_for(&server).validate_token().await);
    }
}
