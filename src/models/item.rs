//! Line items for itemized expenses

use serde::{Deserialize, Serialize};

use super::ids::MemberId;
use super::money::Money;

/// A line of an itemized expense shared by a set of members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub amount: Money,
    pub shared_by: Vec<MemberId>,
}

impl Item {
    pub fn new(name: impl Into<String>, amount: Money, shared_by: Vec<MemberId>) -> Self {
        Self {
            name: name.into(),
            amount,
            shared_by,
        }
    }
}

/// Sum of item amounts, or `None` if it overflows
pub fn items_total(items: &[Item]) -> Option<Money> {
    Money::checked_sum(items.iter().map(|item| item.amount))
}
