//! Storage layer for Splitbook
//!
//! JSON file storage with atomic writes. Each entity kind lives in its own
//! file under `data/`; every change is also recorded in the audit log.

pub mod expenses;
pub mod file_io;
pub mod groups;
pub mod init;
pub mod members;
pub mod settlements;
pub mod table;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use groups::GroupRepository;
pub use init::initialize_storage;
pub use members::MemberRepository;
pub use settlements::SettlementRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::SplitbookPaths;
use crate::error::SplitbookResult;

/// Access to every repository plus the audit log
pub struct Storage {
    paths: SplitbookPaths,
    audit: AuditLogger,
    pub members: MemberRepository,
    pub groups: GroupRepository,
    pub expenses: ExpenseRepository,
    pub settlements: SettlementRepository,
}

impl Storage {
    pub fn new(paths: SplitbookPaths) -> SplitbookResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            members: MemberRepository::new(paths.members_file()),
            groups: GroupRepository::new(paths.groups_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            settlements: SettlementRepository::new(paths.settlements_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &SplitbookPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn load_all(&self) -> SplitbookResult<()> {
        self.members.load()?;
        self.groups.load()?;
        self.expenses.load()?;
        self.settlements.load()?;
        Ok(())
    }

    pub fn save_all(&self) -> SplitbookResult<()> {
        self.members.save()?;
        self.groups.save()?;
        self.expenses.save()?;
        self.settlements.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> SplitbookResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> SplitbookResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> SplitbookResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Append several prepared entries with one flush
    pub fn log_batch(&self, entries: &[AuditEntry]) -> SplitbookResult<()> {
        self.audit.log_batch(entries)
    }
}
