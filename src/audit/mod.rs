//! Audit logging
//!
//! Every create, update and delete of a member, group, expense or settlement
//! is appended to `audit.log` with the entity's state before and after.
//!
//! - `AuditEntry`: one operation with optional before/after values
//! - `AuditLogger`: appends entries as JSON lines and reads them back
//! - `generate_diff`: human-readable summary of an update

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
