pub mod aggregator;
pub mod classifier;
pub mod generator;
pub mod monitor;
pub mod notifier;
pub mod speech;

pub use aggregator::{SingleBoardSource, TaskAggregator, TaskSource};
pub use classifier::{classify, ClassifierContext, DueDatePolicy};
pub use generator::ReminderGenerator;
pub use monitor::{CountdownView, MonitorEvent, MonitorState, Phase, TaskMonitor};
pub use notifier::Notifier;
pub use speech::{ConsoleAnnouncer, SpeechError, UtterancePlayer};
