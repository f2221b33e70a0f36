//! Typed client for the monday.com GraphQL API
//!
//! Covers the read-side surface a polling monitor needs:
//!
//! - Board listing (bounded count)
//! - Per-board item pages with column id/text/value triples
//! - Token validation (`me { id }`)
//!
//! # Error taxonomy
//!
//! All failures map onto [`MondayError`]: credential rejection (401) and
//! rate limiting (429) get their own variants because the caller reacts to
//! them differently; GraphQL-level errors carry the first reported message;
//! everything else is a transport problem. Retry policy lives with the
//! caller, never here.
//!
//! # Exemplo básico
//!
//! ```rust,ignore
//! use monday::{BoardDirectory, MondayClient};
//!
//! #[tokio::main]
//! async fn main() -> monday::Result<()> {
//!     let api_token = std::env::var("MONDAY_API_TOKEN")
//!         .expect("MONDAY_API_TOKEN não configurado");
//!
//!     let directory = BoardDirectory::new(MondayClient::new(api_token)?);
//!     for board in directory.list_boards().await? {
//!         println!("{} ({})", board.name, board.id);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Módulos públicos
pub mod boards;
pub mod client;
pub mod error;
pub mod types;

// Re-exports principais
pub use boards::BoardDirectory;
pub use client::MondayClient;
pub use error::{MondayError, Result};
pub use types::{Board, ColumnValue, Item};
