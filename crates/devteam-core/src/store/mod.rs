pub mod event_log;
pub mod history;

pub use event_log::EventLogStore;
pub use history::{HistoryReconciler, HistoryResponse, HistoryMessage};
