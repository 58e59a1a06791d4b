//! Settlement model
//!
//! A settlement records a real-world payment between two members and the
//! splits that payment consumed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExpenseId, GroupId, MemberId, SettlementId};
use super::money::Money;

/// Reference to one split row: the (expense, member) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SplitRef {
    pub expense_id: ExpenseId,
    pub member_id: MemberId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub id: SettlementId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,

    /// Member who paid
    pub from: MemberId,

    /// Member who received the payment
    pub to: MemberId,

    pub amount: Money,

    pub currency: String,

    pub settled_at: DateTime<Utc>,

    /// Splits flipped to settled when this payment was recorded
    #[serde(default)]
    pub consumed: Vec<SplitRef>,
}

impl Settlement {
    pub fn new(
        group_id: Option<GroupId>,
        from: MemberId,
        to: MemberId,
        amount: Money,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: SettlementId::new(),
            group_id,
            from,
            to,
            amount,
            currency: currency.into(),
            settled_at: Utc::now(),
            consumed: Vec::new(),
        }
    }

    pub fn involves(&self, member_id: MemberId) -> bool {
        self.from == member_id || self.to == member_id
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} {}",
            self.settled_at.format("%Y-%m-%d"),
            self.from,
            self.to,
            self.amount
        )
    }
}
