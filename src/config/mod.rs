pub mod columns;
pub mod settings;

pub use columns::ColumnMap;
pub use settings::{ClaudeSettings, MondaySettings, MonitorSettings, Settings, WatchSettings};
