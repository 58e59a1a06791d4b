//! Ledger contexts
//!
//! Balances are always computed within a context: either a group, or a pair
//! of members sharing expenses outside any group.

use super::expense::Expense;
use super::ids::{GroupId, MemberId};
use super::settlement::Settlement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerContext {
    Group(GroupId),
    Friends(MemberId, MemberId),
}

impl LedgerContext {
    pub fn group_id(&self) -> Option<GroupId> {
        match self {
            Self::Group(id) => Some(*id),
            Self::Friends(..) => None,
        }
    }

    /// Whether an expense belongs to this context
    ///
    /// A friend-pair expense is a non-group expense paid by one of the pair
    /// in which the other one holds a split.
    pub fn contains(&self, expense: &Expense) -> bool {
        match *self {
            Self::Group(group_id) => expense.group_id == Some(group_id),
            Self::Friends(a, b) => {
                if expense.group_id.is_some() {
                    return false;
                }
                let other = if expense.created_by == a {
                    b
                } else if expense.created_by == b {
                    a
                } else {
                    return false;
                };
                expense.split_for(other).is_some()
            }
        }
    }

    pub fn contains_settlement(&self, settlement: &Settlement) -> bool {
        match *self {
            Self::Group(group_id) => settlement.group_id == Some(group_id),
            Self::Friends(a, b) => {
                settlement.group_id.is_none()
                    && ((settlement.from == a && settlement.to == b)
                        || (settlement.from == b && settlement.to == a))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Split, SplitMethod};
    use chrono::NaiveDate;

    fn friend_expense(payer: MemberId, friend: MemberId) -> Expense {
        let mut expense = Expense::new(
            None,
            "Taxi",
            "transport",
            NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
            Money::from_cents(2000),
            payer,
        );
        expense.replace_splits(
            SplitMethod::Equal,
            vec![
                Split::paid_by_payer(payer, Money::from_cents(1000), None),
                Split::owed(friend, Money::from_cents(1000), None),
            ],
            Vec::new(),
        );
        expense
    }

    #[test]
    fn test_friend_context_is_symmetric() {
        let a = MemberId::new();
        let b = MemberId::new();
        let expense = friend_expense(a, b);

        assert!(LedgerContext::Friends(a, b).contains(&expense));
        assert!(LedgerContext::Friends(b, a).contains(&expense));
        assert!(!LedgerContext::Friends(a, MemberId::new()).contains(&expense));
    }

    #[test]
    fn test_group_expense_not_in_friend_context() {
        let a = MemberId::new();
        let b = MemberId::new();
        let group_id = GroupId::new();
        let mut expense = friend_expense(a, b);
        expense.group_id = Some(group_id);

        assert!(!LedgerContext::Friends(a, b).contains(&expense));
        assert!(LedgerContext::Group(group_id).contains(&expense));
        assert!(!LedgerContext::Group(GroupId::new()).contains(&expense));
    }
}
