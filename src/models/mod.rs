pub mod task;

pub use task::{PriorityLevel, RawTask, UrgentTask};
