//! Group service
//!
//! Groups hold an ordered member list. The creator becomes the first
//! member, and only existing members may add others.

use crate::audit::EntityType;
use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{Group, GroupId, Member, MemberId};
use crate::storage::Storage;

pub struct GroupService<'a> {
    storage: &'a Storage,
}

impl<'a> GroupService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, name: &str, currency: &str, creator: MemberId) -> SplitbookResult<Group> {
        let name = name.trim();
        if self.storage.groups.name_exists(name)? {
            return Err(SplitbookError::Duplicate {
                entity_type: "Group",
                identifier: name.to_string(),
            });
        }
        if self.storage.members.get(creator)?.is_none() {
            return Err(SplitbookError::member_not_found(creator.to_string()));
        }

        let mut group = Group::new(name, currency.trim().to_uppercase());
        group.add_member(creator);
        group.validate().map_err(SplitbookError::Validation)?;

        self.storage.groups.upsert(group.clone())?;
        self.storage.groups.save()?;

        self.storage.log_create(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &group,
        )?;

        Ok(group)
    }

    /// Add `member` to the group on behalf of `actor`
    pub fn add_member(
        &self,
        group_id: GroupId,
        actor: MemberId,
        member: MemberId,
    ) -> SplitbookResult<Group> {
        let mut group = self.get(group_id)?;
        if !group.has_member(actor) {
            return Err(SplitbookError::Forbidden(format!(
                "not a member of group {}",
                group.name
            )));
        }

        let added = self
            .storage
            .members
            .get(member)?
            .ok_or_else(|| SplitbookError::member_not_found(member.to_string()))?;

        let before = group.clone();
        if !group.add_member(member) {
            return Err(SplitbookError::Validation(format!(
                "{} is already a member of {}",
                added.name, group.name
            )));
        }

        self.storage.groups.upsert(group.clone())?;
        self.storage.groups.save()?;

        self.storage.log_update(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &before,
            &group,
            Some(format!("added member {}", added.name)),
        )?;

        Ok(group)
    }

    pub fn get(&self, id: GroupId) -> SplitbookResult<Group> {
        self.storage
            .groups
            .get(id)?
            .ok_or_else(|| SplitbookError::group_not_found(id.to_string()))
    }

    /// Find a group by name or ID, failing if there is none
    pub fn resolve(&self, reference: &str) -> SplitbookResult<Group> {
        self.storage
            .groups
            .find(reference.trim())?
            .ok_or_else(|| SplitbookError::group_not_found(reference))
    }

    /// Groups the member belongs to
    pub fn list_for(&self, member: MemberId) -> SplitbookResult<Vec<Group>> {
        self.storage.groups.get_for_member(member)
    }

    pub fn list(&self) -> SplitbookResult<Vec<Group>> {
        self.storage.groups.get_all()
    }

    /// Member records of a group in membership order
    pub fn members(&self, group: &Group) -> SplitbookResult<Vec<Member>> {
        group
            .members
            .iter()
            .map(|&id| {
                self.storage
                    .members
                    .get(id)?
                    .ok_or_else(|| SplitbookError::member_not_found(id.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SplitbookPaths;
    use crate::services::MemberService;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_creator_is_first_member() {
        let (_temp_dir, storage) = create_test_storage();
        let alice = MemberService::new(&storage).create("Alice", None).unwrap();

        let group = GroupService::new(&storage)
            .create("Ski Trip", "eur", alice.id)
            .unwrap();

        assert_eq!(group.currency, "EUR");
        assert_eq!(group.members, vec![alice.id]);
    }

    #[test]
    fn test_add_member_rules() {
        let (_temp_dir, storage) = create_test_storage();
        let members = MemberService::new(&storage);
        let alice = members.create("Alice", None).unwrap();
        let bob = members.create("Bob", None).unwrap();
        let carol = members.create("Carol", None).unwrap();

        let service = GroupService::new(&storage);
        let group = service.create("Flat", "USD", alice.id).unwrap();

        let err = service.add_member(group.id, bob.id, carol.id).unwrap_err();
        assert!(matches!(err, SplitbookError::Forbidden(_)));

        let group = service.add_member(group.id, alice.id, bob.id).unwrap();
        assert_eq!(group.members, vec![alice.id, bob.id]);

        let err = service.add_member(group.id, bob.id, alice.id).unwrap_err();
        assert!(err.to_string().contains("already a member"));

        let names: Vec<_> = service
            .members(&group)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_duplicate_group_and_bad_currency() {
        let (_temp_dir, storage) = create_test_storage();
        let alice = MemberService::new(&storage).create("Alice", None).unwrap();
        let service = GroupService::new(&storage);

        service.create("Flat", "USD", alice.id).unwrap();
        assert!(matches!(
            service.create("flat", "USD", alice.id).unwrap_err(),
            SplitbookError::Duplicate { .. }
        ));
        assert!(service.create("Trip", "DOLLARS", alice.id).unwrap_err().is_validation());
    }

    #[test]
    fn test_list_for_member() {
        let (_temp_dir, storage) = create_test_storage();
        let members = MemberService::new(&storage);
        let alice = members.create("Alice", None).unwrap();
        let bob = members.create("Bob", None).unwrap();
        let service = GroupService::new(&storage);

        service.create("Flat", "USD", alice.id).unwrap();
        service.create("Trip", "USD", bob.id).unwrap();

        assert_eq!(service.list_for(alice.id).unwrap().len(), 1);
        assert_eq!(service.list().unwrap().len(), 2);
    }
}
