pub mod event;
pub mod roster;

pub use event::{EventKind, RawEvent};
pub use roster::{RosterAgent, RunSummary};
