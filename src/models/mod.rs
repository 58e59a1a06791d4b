//! Core data models for Splitbook
//!
//! This module contains the data structures of the shared-expense domain:
//! members, groups, expenses with their splits and items, and settlements.

pub mod context;
pub mod expense;
pub mod group;
pub mod ids;
pub mod item;
pub mod member;
pub mod money;
pub mod settlement;
pub mod split;

pub use context::LedgerContext;
pub use expense::{Expense, ExpenseValidationError};
pub use group::Group;
pub use ids::{ExpenseId, GroupId, MemberId, SettlementId};
pub use item::{items_total, Item};
pub use member::Member;
pub use money::{Money, MoneyParseError, CENT_TOLERANCE, MAX_AMOUNT};
pub use settlement::{Settlement, SplitRef};
pub use split::{Split, SplitMethod};
