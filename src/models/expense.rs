//! Expense model
//!
//! An expense is paid by its creator and divided among members as splits.
//! Once any member other than the creator has settled their split, the
//! expense is locked: it can no longer be edited or deleted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExpenseId, GroupId, MemberId};
use super::item::{items_total, Item};
use super::money::Money;
use super::split::{Split, SplitMethod};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    /// Group this expense belongs to; `None` for friend expenses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,

    pub description: String,

    pub category: String,

    pub date: NaiveDate,

    /// Total paid (always positive)
    pub amount: Money,

    pub split_method: SplitMethod,

    /// Member who paid and owns the expense
    pub created_by: MemberId,

    #[serde(default)]
    pub splits: Vec<Split>,

    /// Line items, only for itemized expenses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        group_id: Option<GroupId>,
        description: impl Into<String>,
        category: impl Into<String>,
        date: NaiveDate,
        amount: Money,
        created_by: MemberId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            group_id,
            description: description.into(),
            category: category.into(),
            date,
            amount,
            split_method: SplitMethod::Equal,
            created_by,
            splits: Vec::new(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_friend_expense(&self) -> bool {
        self.group_id.is_none()
    }

    /// True once someone other than the creator has settled their split
    pub fn is_locked(&self) -> bool {
        self.splits
            .iter()
            .any(|s| s.settled && s.member_id != self.created_by)
    }

    /// Replace all splits and items in one step
    pub fn replace_splits(&mut self, method: SplitMethod, splits: Vec<Split>, items: Vec<Item>) {
        self.split_method = method;
        self.splits = splits;
        self.items = items;
        self.updated_at = Utc::now();
    }

    pub fn splits_total(&self) -> Money {
        self.splits.iter().map(|s| s.amount).sum()
    }

    pub fn split_for(&self, member_id: MemberId) -> Option<&Split> {
        self.splits.iter().find(|s| s.member_id == member_id)
    }

    pub fn participants(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.splits.iter().map(|s| s.member_id)
    }

    /// Unsettled rows owed by members other than the creator
    pub fn outstanding_splits(&self) -> impl Iterator<Item = &Split> + '_ {
        self.splits
            .iter()
            .filter(move |s| !s.settled && s.member_id != self.created_by)
    }

    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }

        if self.description.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyDescription);
        }

        if self.splits.is_empty() {
            return Err(ExpenseValidationError::NoSplits);
        }

        let splits_total = Money::checked_sum(self.splits.iter().map(|s| s.amount))
            .ok_or(ExpenseValidationError::AmountTooLarge)?;
        if !splits_total.approx_eq(self.amount) {
            return Err(ExpenseValidationError::SplitsMismatch {
                expense_amount: self.amount,
                splits_total,
            });
        }

        if self.split_method == SplitMethod::Itemized {
            let items_total =
                items_total(&self.items).ok_or(ExpenseValidationError::AmountTooLarge)?;
            if !items_total.approx_eq(self.amount) {
                return Err(ExpenseValidationError::ItemsMismatch {
                    expense_amount: self.amount,
                    items_total,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NonPositiveAmount(Money),
    EmptyDescription,
    NoSplits,
    AmountTooLarge,
    SplitsMismatch {
        expense_amount: Money,
        splits_total: Money,
    },
    ItemsMismatch {
        expense_amount: Money,
        items_total: Money,
    },
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "amount must be greater than 0 (got {})", amount)
            }
            Self::EmptyDescription => write!(f, "description cannot be empty"),
            Self::NoSplits => write!(f, "expense has no splits"),
            Self::AmountTooLarge => write!(f, "amount too large"),
            Self::SplitsMismatch {
                expense_amount,
                splits_total,
            } => write!(
                f,
                "split totals ({}) do not match expense amount ({})",
                splits_total, expense_amount
            ),
            Self::ItemsMismatch {
                expense_amount,
                items_total,
            } => write!(
                f,
                "items total ({}) must equal expense amount ({})",
                items_total, expense_amount
            ),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn dinner(payer: MemberId, friend: MemberId) -> Expense {
        let mut expense = Expense::new(
            None,
            "Dinner",
            "food",
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            Money::from_cents(6000),
            payer,
        );
        expense.replace_splits(
            SplitMethod::Equal,
            vec![
                Split::paid_by_payer(payer, Money::from_cents(3000), None),
                Split::owed(friend, Money::from_cents(3000), None),
            ],
            Vec::new(),
        );
        expense
    }

    #[test]
    fn test_new_expense_is_valid_with_splits() {
        let payer = MemberId::new();
        let expense = dinner(payer, MemberId::new());

        assert!(expense.is_friend_expense());
        assert_eq!(expense.splits_total(), expense.amount);
        assert!(expense.validate().is_ok());
        assert!(!expense.is_locked());
    }

    #[test]
    fn test_outstanding_splits_skip_payer() {
        let payer = MemberId::new();
        let friend = MemberId::new();
        let expense = dinner(payer, friend);

        let outstanding: Vec<_> = expense.outstanding_splits().collect();
        assert_eq!(outstanding.len(), 1);
        assert_eq!(outstanding[0].member_id, friend);
    }

    #[test]
    fn test_locked_after_non_payer_settles() {
        let payer = MemberId::new();
        let friend = MemberId::new();
        let mut expense = dinner(payer, friend);

        expense
            .splits
            .iter_mut()
            .filter(|s| s.member_id == friend)
            .for_each(Split::mark_settled);

        assert!(expense.is_locked());
    }

    #[test]
    fn test_splits_mismatch() {
        let payer = MemberId::new();
        let mut expense = dinner(payer, MemberId::new());
        expense.amount = Money::from_cents(7000);

        assert!(matches!(
            expense.validate(),
            Err(ExpenseValidationError::SplitsMismatch { .. })
        ));
    }

    #[test]
    fn test_items_mismatch() {
        let payer = MemberId::new();
        let mut expense = dinner(payer, MemberId::new());
        expense.split_method = SplitMethod::Itemized;
        expense.items = vec![Item::new("Pizza", Money::from_cents(5000), vec![payer])];

        assert!(matches!(
            expense.validate(),
            Err(ExpenseValidationError::ItemsMismatch { .. })
        ));
    }

    #[test]
    fn test_overflowing_splits_rejected() {
        let payer = MemberId::new();
        let mut expense = dinner(payer, MemberId::new());
        for split in expense.splits.iter_mut() {
            split.amount = Money::from_cents(i64::MAX - 1);
        }

        assert_eq!(
            expense.validate(),
            Err(ExpenseValidationError::AmountTooLarge)
        );
    }

    #[test]
    fn test_display() {
        let expense = dinner(MemberId::new(), MemberId::new());
        assert_eq!(expense.to_string(), "2025-03-01 Dinner $60.00");
    }
}
