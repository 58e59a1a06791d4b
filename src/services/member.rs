//! Member service
//!
//! Registration and lookup of the people who share expenses.

use crate::audit::EntityType;
use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{Member, MemberId};
use crate::storage::Storage;

pub struct MemberService<'a> {
    storage: &'a Storage,
}

impl<'a> MemberService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new member; names are unique ignoring case
    pub fn create(&self, name: &str, email: Option<&str>) -> SplitbookResult<Member> {
        let name = name.trim();
        if self.storage.members.name_exists(name, None)? {
            return Err(SplitbookError::Duplicate {
                entity_type: "Member",
                identifier: name.to_string(),
            });
        }

        let member = match email {
            Some(email) => Member::with_email(name, email.trim().to_lowercase()),
            None => Member::new(name),
        };
        member.validate().map_err(SplitbookError::Validation)?;

        self.storage.members.upsert(member.clone())?;
        self.storage.members.save()?;

        self.storage.log_create(
            EntityType::Member,
            member.id.to_string(),
            Some(member.name.clone()),
            &member,
        )?;

        Ok(member)
    }

    pub fn get(&self, id: MemberId) -> SplitbookResult<Option<Member>> {
        self.storage.members.get(id)
    }

    /// Find a member by name or ID, failing if there is none
    pub fn resolve(&self, reference: &str) -> SplitbookResult<Member> {
        self.storage
            .members
            .find(reference.trim())?
            .ok_or_else(|| SplitbookError::member_not_found(reference))
    }

    /// Name of a member, or its short ID if it no longer exists
    pub fn display_name(&self, id: MemberId) -> SplitbookResult<String> {
        Ok(self
            .storage
            .members
            .get(id)?
            .map(|m| m.name)
            .unwrap_or_else(|| id.to_string()))
    }

    pub fn list(&self) -> SplitbookResult<Vec<Member>> {
        self.storage.members.get_all()
    }
}
