//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        })
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Member,
    Group,
    Expense,
    Settlement,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Member => "Member",
            Self::Group => "Group",
            Self::Expense => "Expense",
            Self::Settlement => "Settlement",
        })
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" | "members" => Ok(Self::Member),
            "group" | "groups" => Ok(Self::Group),
            "expense" | "expenses" => Ok(Self::Expense),
            "settlement" | "settlements" => Ok(Self::Settlement),
            other => Err(format!("unknown entity type: {}", other)),
        }
    }
}

/// A single audit log entry
///
/// Records one operation on an entity. Creates carry only `after`, deletes
/// only `before`, and updates carry both plus a diff summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Human-readable label, e.g. a member name or expense description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn record(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::record(Operation::Create, entity_type, entity_id.into(), entity_name)
        }
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
            ..Self::record(Operation::Update, entity_type, entity_id.into(), entity_name)
        }
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            before: serde_json::to_value(entity).ok(),
            ..Self::record(Operation::Delete, entity_type, entity_id.into(), entity_name)
        }
    }

    /// One line per entry, plus a second line with the changes for updates
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Operation::Update.to_string(), "UPDATE");
        assert_eq!(EntityType::Settlement.to_string(), "Settlement");
    }

    #[test]
    fn test_entity_type_from_str() {
        assert_eq!("expenses".parse::<EntityType>().unwrap(), EntityType::Expense);
        assert_eq!("Member".parse::<EntityType>().unwrap(), EntityType::Member);
        assert!("account".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_create_and_delete_carry_one_side() {
        let data = json!({"name": "Alice"});

        let created = AuditEntry::create(EntityType::Member, "mem-1", None, &data);
        assert_eq!(created.operation, Operation::Create);
        assert!(created.before.is_none());
        assert_eq!(created.after, Some(data.clone()));

        let deleted = AuditEntry::delete(EntityType::Member, "mem-1", None, &data);
        assert_eq!(deleted.operation, Operation::Delete);
        assert!(deleted.after.is_none());
        assert_eq!(deleted.before, Some(data));
    }

    #[test]
    fn test_update_entry() {
        let before = json!({"amount": 1000});
        let after = json!({"amount": 1500});

        let entry = AuditEntry::update(
            EntityType::Expense,
            "exp-12345678",
            Some("Dinner".to_string()),
            &before,
            &after,
            Some("amount: 1000 -> 1500".to_string()),
        );

        assert!(entry.before.is_some());
        assert!(entry.after.is_some());

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("UPDATE Expense exp-12345678 (Dinner)"));
        assert!(formatted.contains("Changes: amount: 1000 -> 1500"));
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let entry = AuditEntry::create(EntityType::Group, "grp-1", None, &json!({}));
        let line = serde_json::to_string(&entry).unwrap();

        assert!(line.contains("\"entity_type\":\"group\""));
        assert!(!line.contains("before"));

        let parsed: AuditEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.entity_type, EntityType::Group);
    }
}
