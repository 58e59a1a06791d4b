//! Group model
//!
//! A group is a named set of members sharing expenses in one currency.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, MemberId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,

    /// Group name, unique across the ledger (case-insensitive)
    pub name: String,

    /// ISO currency code for amounts recorded in this group
    pub currency: String,

    /// Members in the order they joined
    pub members: Vec<MemberId>,

    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(name: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(),
            name: name.into(),
            currency: currency.into(),
            members: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn has_member(&self, member_id: MemberId) -> bool {
        self.members.contains(&member_id)
    }

    /// Add a member, returning false if they already belong to the group
    pub fn add_member(&mut self, member_id: MemberId) -> bool {
        if self.has_member(member_id) {
            return false;
        }
        self.members.push(member_id);
        true
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Group name cannot be empty".into());
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(format!(
                "Currency must be a three-letter ISO code, got '{}'",
                self.currency
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} members)", self.name, self.members.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_member_is_idempotent() {
        let mut group = Group::new("Trip", "USD");
        let alice = MemberId::new();

        assert!(group.add_member(alice));
        assert!(!group.add_member(alice));
        assert_eq!(group.members, vec![alice]);
        assert!(group.has_member(alice));
    }

    #[test]
    fn test_validation() {
        assert!(Group::new("Trip", "USD").validate().is_ok());
        assert!(Group::new("", "USD").validate().is_err());
        assert!(Group::new("Trip", "usd").validate().is_err());
        assert!(Group::new("Trip", "DOLLARS").validate().is_err());
    }

    #[test]
    fn test_display() {
        let mut group = Group::new("Flat", "EUR");
        group.add_member(MemberId::new());
        assert_eq!(group.to_string(), "Flat (1 members)");
    }
}
