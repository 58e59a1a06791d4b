//! Group repository (`groups.json`)

use std::path::PathBuf;

use crate::error::SplitbookResult;
use crate::models::{Group, GroupId, MemberId};

use super::table::{Record, Table};

impl Record for Group {
    type Id = GroupId;

    fn record_id(&self) -> GroupId {
        self.id
    }
}

pub struct GroupRepository {
    table: Table<Group>,
}

impl GroupRepository {
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

    pub fn get(&self, id: GroupId) -> SplitbookResult<Option<Group>> {
        self.table.get(id)
    }

    pub fn get_all(&self) -> SplitbookResult<Vec<Group>> {
        self.table.sorted(by_name)
    }

    /// Groups the member belongs to
    pub fn get_for_member(&self, member_id: MemberId) -> SplitbookResult<Vec<Group>> {
        let mut groups = self.get_all()?;
        groups.retain(|g| g.has_member(member_id));
        Ok(groups)
    }

    /// Look up by name (case-insensitive), then by short or full ID
    pub fn find(&self, reference: &str) -> SplitbookResult<Option<Group>> {
        if let Some(group) = self.table.find(|g| g.has_name(reference))? {
            return Ok(Some(group));
        }
        self.table.find(|g| g.id.matches_short(reference))
    }

    pub fn name_exists(&self, name: &str) -> SplitbookResult<bool> {
        Ok(self.table.find(|g| g.has_name(name))?.is_some())
    }

    pub fn upsert(&self, group: Group) -> SplitbookResult<()> {
        self.table.upsert(group)
    }

    pub fn count(&self) -> SplitbookResult<usize> {
        self.table.count()
    }
}

fn by_name(a: &Group, b: &Group) -> std::cmp::Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_membership_query() {
        let temp_dir = TempDir::new().unwrap();
        let repo = GroupRepository::new(temp_dir.path().join("groups.json"));
        let alice = MemberId::new();

        let mut trip = Group::new("Trip", "EUR");
        trip.add_member(alice);
        repo.upsert(trip).unwrap();
        repo.upsert(Group::new("Flat", "USD")).unwrap();

        let groups = repo.get_for_member(alice).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Trip");
        assert!(repo.find("trip").unwrap().is_some());
        assert!(repo.name_exists("FLAT").unwrap());
    }

    #[test]
    fn test_save_and_reload_keeps_member_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("groups.json");
        let repo = GroupRepository::new(path.clone());
        let members: Vec<_> = (0..3).map(|_| MemberId::new()).collect();

        let mut group = Group::new("House", "USD");
        for m in &members {
            group.add_member(*m);
        }
        let id = group.id;
        repo.upsert(group).unwrap();
        repo.save().unwrap();

        let reloaded = GroupRepository::new(path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(id).unwrap().unwrap().members, members);
    }
}
