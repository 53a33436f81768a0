//! Event layer
//!
//! - Events returned by every state-changing operation
//! - Hash-chained, append-only journal for off-core consumers

pub mod event;
pub mod journal;

pub use event::Event;
pub use journal::{EventJournal, JournalEntry, JournalVerification};
