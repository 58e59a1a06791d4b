//! Display formatting for terminal output
//!
//! List views are rendered as tables with `tabled`; detail views are plain
//! aligned text.

pub mod balance;
pub mod expense;
pub mod group;
pub mod member;

pub use balance::{
    format_balances, format_friend_balances, format_settlement_list, format_transfers,
};
pub use expense::{format_expense_details, format_expense_list};
pub use group::{format_group_details, format_group_list};
pub use member::format_member_list;

use std::collections::HashMap;

use crate::models::{Member, MemberId, Money};

/// Member names and the currency symbol used when rendering
pub struct Labels {
    names: HashMap<MemberId, String>,
    symbol: String,
}

impl Labels {
    pub fn new(members: &[Member], symbol: impl Into<String>) -> Self {
        Self {
            names: members.iter().map(|m| (m.id, m.name.clone())).collect(),
            symbol: symbol.into(),
        }
    }

    /// Member name, or the short ID for members that no longer exist
    pub fn member(&self, id: MemberId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    pub fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.symbol)
    }
}

/// Shorten to `max` characters, marking the cut with "..."
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
