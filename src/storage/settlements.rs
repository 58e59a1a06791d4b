//! Settlement repository (`settlements.json`)

use std::path::PathBuf;

use crate::error::SplitbookResult;
use crate::models::{LedgerContext, Settlement, SettlementId};

use super::table::{Record, Table};

impl Record for Settlement {
    type Id = SettlementId;

    fn record_id(&self) -> SettlementId {
        self.id
    }
}

pub struct SettlementRepository {
    table: Table<Settlement>,
}

impl SettlementRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            table: Table::new(path),
        }
    }

    pub fn load(&self) -> SplitbookResult<()> {
        self.table.load()
    }

    pub fn save(&self) -> SplitbookResult<()> {
        self.table.save_sorted(newest_first)
    }

    pub fn get(&self, id: SettlementId) -> SplitbookResult<Option<Settlement>> {
        self.table.get(id)
    }

    /// All settlements, newest first
    pub fn get_all(&self) -> SplitbookResult<Vec<Settlement>> {
        self.table.sorted(newest_first)
    }

    pub fn get_for_context(&self, context: &LedgerContext) -> SplitbookResult<Vec<Settlement>> {
        let mut settlements = self.get_all()?;
        settlements.retain(|s| context.contains_settlement(s));
        Ok(settlements)
    }

    pub fn upsert(&self, settlement: Settlement) -> SplitbookResult<()> {
        self.table.upsert(settlement)
    }

    pub fn count(&self) -> SplitbookResult<usize> {
        self.table.count()
    }
}

fn newest_first(a: &Settlement, b: &Settlement) -> std::cmp::Ordering {
    b.settled_at.cmp(&a.settled_at)
}
