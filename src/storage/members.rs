//! Member repository (`members.json`)

use std::path::PathBuf;

use crate::error::SplitbookResult;
use crate::models::{Member, MemberId};

use super::table::{Record, Table};

impl Record for Member {
    type Id = MemberId;

    fn record_id(&self) -> MemberId {
        self.id
    }
}

pub struct MemberRepository {
    table: Table<Member>,
}

impl MemberRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            table: Table::new(path),
        }
    }

    pub fn load(&self) -> SplitbookResult<()> {
        self.table.load()
    }

    pub fn save(&self) -> SplitbookResult<()> {
        self.table.save_sorted(by_name)
    }

    pub fn get(&self, id: MemberId) -> SplitbookResult<Option<Member>> {
        self.table.get(id)
    }

    /// All members sorted by name
    pub fn get_all(&self) -> SplitbookResult<Vec<Member>> {
        self.table.sorted(by_name)
    }

    /// Case-insensitive lookup by name
    pub fn get_by_name(&self, name: &str) -> SplitbookResult<Option<Member>> {
        self.table.find(|m| m.has_name(name))
    }

    /// Look up by name, then by short or full ID
    pub fn find(&self, reference: &str) -> SplitbookResult<Option<Member>> {
        if let Some(member) = self.get_by_name(reference)? {
            return Ok(Some(member));
        }
        self.table.find(|m| m.id.matches_short(reference))
    }

    pub fn name_exists(&self, name: &str, exclude: Option<MemberId>) -> SplitbookResult<bool> {
        Ok(self
            .table
            .find(|m| m.has_name(name) && Some(m.id) != exclude)?
            .is_some())
    }

    pub fn upsert(&self, member: Member) -> SplitbookResult<()> {
        self.table.upsert(member)
    }

    pub fn count(&self) -> SplitbookResult<usize> {
        self.table.count()
    }
}

fn by_name(a: &Member, b: &Member) -> std::cmp::Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}
