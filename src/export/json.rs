//! JSON export
//!
//! Dumps every member, group, expense and settlement into one versioned
//! document.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{Expense, Group, Member, Settlement};
use crate::storage::Storage;

/// Bumped whenever the export layout changes
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub members: Vec<Member>,
    pub groups: Vec<Group>,
    pub expenses: Vec<Expense>,
    pub settlements: Vec<Settlement>,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub member_count: usize,
    pub group_count: usize,
    pub expense_count: usize,
    pub settlement_count: usize,
    pub earliest_expense: Option<NaiveDate>,
    pub latest_expense: Option<NaiveDate>,
}

impl FullExport {
    pub fn from_storage(storage: &Storage) -> SplitbookResult<Self> {
        let members = storage.members.get_all()?;
        let groups = storage.groups.get_all()?;
        let expenses = storage.expenses.get_all()?;
        let settlements = storage.settlements.get_all()?;

        let metadata = ExportMetadata {
            member_count: members.len(),
            group_count: groups.len(),
            expense_count: expenses.len(),
            settlement_count: settlements.len(),
            earliest_expense: expenses.iter().map(|e| e.date).min(),
            latest_expense: expenses.iter().map(|e| e.date).max(),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            members,
            groups,
            expenses,
            settlements,
            metadata,
        })
    }

    /// Check that every reference points at an exported record
    pub fn validate(&self) -> Result<(), String> {
        let member_ids: HashSet<_> = self.members.iter().map(|m| m.id).collect();
        let group_ids: HashSet<_> = self.groups.iter().map(|g| g.id).collect();
        let expense_ids: HashSet<_> = self.expenses.iter().map(|e| e.id).collect();

        for group in &self.groups {
            if let Some(missing) = group.members.iter().find(|m| !member_ids.contains(m)) {
                return Err(format!(
                    "Group {} references unknown member {}",
                    group.id, missing
                ));
            }
        }

        for expense in &self.expenses {
            if let Some(group_id) = expense.group_id {
                if !group_ids.contains(&group_id) {
                    return Err(format!(
                        "Expense {} references unknown group {}",
                        expense.id, group_id
                    ));
                }
            }
            if let Some(missing) = expense.participants().find(|m| !member_ids.contains(m)) {
                return Err(format!(
                    "Expense {} references unknown member {}",
                    expense.id, missing
                ));
            }
        }

        for settlement in &self.settlements {
            for member in [settlement.from, settlement.to] {
                if !member_ids.contains(&member) {
                    return Err(format!(
                        "Settlement {} references unknown member {}",
                        settlement.id, member
                    ));
                }
            }
            if let Some(split) = settlement
                .consumed
                .iter()
                .find(|r| !expense_ids.contains(&r.expense_id))
            {
                return Err(format!(
                    "Settlement {} consumed a split of unknown expense {}",
                    settlement.id, split.expense_id
                ));
            }
        }

        Ok(())
    }
}

/// Write the full export as JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> SplitbookResult<FullExport> {
    let export = FullExport::from_storage(storage)?;
    export.validate().map_err(SplitbookError::Export)?;

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    }
    .map_err(|e| SplitbookError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| SplitbookError::Export(e.to_string()))?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SplitbookPaths;
    use crate::models::{Money, Split, SplitMethod};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn seed(storage: &Storage) -> (Member, Member) {
        let alice = Member::new("Alice");
        let bob = Member::new("Bob");
        storage.members.upsert(alice.clone()).unwrap();
        storage.members.upsert(bob.clone()).unwrap();

        let mut group = Group::new("Flat", "USD");
        group.add_member(alice.id);
        group.add_member(bob.id);

        let mut expense = Expense::new(
            Some(group.id),
            "Internet",
            "utilities",
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            Money::from_cents(6000),
            alice.id,
        );
        expense.replace_splits(
            SplitMethod::Equal,
            vec![
                Split::paid_by_payer(alice.id, Money::from_cents(3000), None),
                Split::owed(bob.id, Money::from_cents(3000), None),
            ],
            Vec::new(),
        );

        storage.groups.upsert(group).unwrap();
        storage.expenses.upsert(expense).unwrap();
        (alice, bob)
    }

    #[test]
    fn test_full_export() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);

        let export = FullExport::from_storage(&storage).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.members.len(), 2);
        assert_eq!(export.groups.len(), 1);
        assert_eq!(export.metadata.expense_count, 1);
        assert_eq!(
            export.metadata.earliest_expense,
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_output_parses() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);

        let mut output = Vec::new();
        export_full_json(&storage, &mut output, true).unwrap();

        let parsed: FullExport = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed.expenses[0].description, "Internet");
        assert_eq!(parsed.expenses[0].splits.len(), 2);
    }

    #[test]
    fn test_validate_catches_dangling_member() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);

        let mut export = FullExport::from_storage(&storage).unwrap();
        export.members.retain(|m| m.name != "Bob");

        let err = export.validate().unwrap_err();
        assert!(err.contains("unknown member"));
    }
}
