//! Audit logging for the household ledger
//!
//! Every create, update and delete of a transaction, recurring template or
//! budget goal is appended to `audit.log` as one JSON line.
//!
//! - `AuditEntry`: a single operation with optional before/after values
//! - `AuditLogger`: appends and reads entries (JSONL)
//! - `generate_diff`: one-line summary of changed fields for updates

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
