pub mod api;
pub mod composer;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod projection;
pub mod session;
pub mod store;
pub mod streaming;

// Re-export the session-facing types at crate root for convenience
pub use config::{HistoryScope, SessionConfig};
pub use error::ConsoleError;
pub use models::{EventKind, RawEvent};
pub use session::RunSession;
