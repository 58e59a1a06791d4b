//! Expense repository (`expenses.json`)
//!
//! Splits and items are stored inline with their expense, so replacing an
//! expense's splits is a single upsert.

use std::path::PathBuf;

use crate::error::SplitbookResult;
use crate::models::{Expense, ExpenseId, LedgerContext, MemberId};

use super::table::{Record, Table};

impl Record for Expense {
    type Id = ExpenseId;

    fn record_id(&self) -> ExpenseId {
        self.id
    }
}

pub struct ExpenseRepository {
    table: Table<Expense>,
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            table: Table::new(path),
        }
    }

    pub fn load(&self) -> SplitbookResult<()> {
        self.table.load()
    }

    pub fn save(&self) -> SplitbookResult<()> {
        self.table.save_sorted(chronological)
    }

    pub fn get(&self, id: ExpenseId) -> SplitbookResult<Option<Expense>> {
        self.table.get(id)
    }

    /// Look up by short or full ID
    pub fn find(&self, reference: &str) -> SplitbookResult<Option<Expense>> {
        if let Ok(id) = reference.parse::<ExpenseId>() {
            if let Some(expense) = self.get(id)? {
                return Ok(Some(expense));
            }
        }
        self.table.find(|e| e.id.matches_short(reference))
    }

    /// All expenses, oldest first
    pub fn get_all(&self) -> SplitbookResult<Vec<Expense>> {
        self.table.sorted(chronological)
    }

    /// Expenses of a group or friend pair, oldest first
    pub fn get_for_context(&self, context: &LedgerContext) -> SplitbookResult<Vec<Expense>> {
        let mut expenses = self.get_all()?;
        expenses.retain(|e| context.contains(e));
        Ok(expenses)
    }

    /// Expenses the member paid for or holds a split in
    pub fn get_for_member(&self, member_id: MemberId) -> SplitbookResult<Vec<Expense>> {
        let mut expenses = self.get_all()?;
        expenses.retain(|e| e.created_by == member_id || e.split_for(member_id).is_some());
        Ok(expenses)
    }

    pub fn upsert(&self, expense: Expense) -> SplitbookResult<()> {
        self.table.upsert(expense)
    }

    pub fn delete(&self, id: ExpenseId) -> SplitbookResult<Option<Expense>> {
        self.table.delete(id)
    }

    pub fn count(&self) -> SplitbookResult<usize> {
        self.table.count()
    }
}

fn chronological(a: &Expense, b: &Expense) -> std::cmp::Ordering {
    a.date
        .cmp(&b.date)
        .then(a.created_at.cmp(&b.created_at))
        .then(a.id.as_uuid().cmp(b.id.as_uuid()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupId, Money, Split, SplitMethod};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        (temp_dir, repo)
    }

    fn expense_on(day: u32, group_id: Option<GroupId>, payer: MemberId, friend: MemberId) -> Expense {
        let mut expense = Expense::new(
            group_id,
            format!("Day {}", day),
            "general",
            NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            Money::from_cents(1000),
            payer,
        );
        expense.replace_splits(
            SplitMethod::Equal,
            vec![
                Split::paid_by_payer(payer, Money::from_cents(500), None),
                Split::owed(friend, Money::from_cents(500), None),
            ],
            Vec::new(),
        );
        expense
    }

    #[test]
    fn test_get_all_is_chronological() {
        let (_temp_dir, repo) = create_test_repo();
        let (a, b) = (MemberId::new(), MemberId::new());

        repo.upsert(expense_on(20, None, a, b)).unwrap();
        repo.upsert(expense_on(3, None, a, b)).unwrap();
        repo.upsert(expense_on(11, None, b, a)).unwrap();

        let days: Vec<_> = repo
            .get_all()
            .unwrap()
            .into_iter()
            .map(|e| e.description)
            .collect();
        assert_eq!(days, vec!["Day 3", "Day 11", "Day 20"]);
    }

    #[test]
    fn test_get_for_context() {
        let (_temp_dir, repo) = create_test_repo();
        let (a, b, c) = (MemberId::new(), MemberId::new(), MemberId::new());
        let group_id = GroupId::new();

        repo.upsert(expense_on(1, Some(group_id), a, b)).unwrap();
        repo.upsert(expense_on(2, None, a, b)).unwrap();
        repo.upsert(expense_on(3, None, c, a)).unwrap();

        assert_eq!(repo.get_for_context(&LedgerContext::Group(group_id)).unwrap().len(), 1);
        assert_eq!(repo.get_for_context(&LedgerContext::Friends(b, a)).unwrap().len(), 1);
        assert_eq!(repo.get_for_member(a).unwrap().len(), 3);
    }

    #[test]
    fn test_find_and_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let expense = expense_on(5, None, MemberId::new(), MemberId::new());
        let id = expense.id;
        repo.upsert(expense).unwrap();

        assert_eq!(repo.find(&id.to_string()).unwrap().unwrap().id, id);
        assert!(repo.delete(id).unwrap().is_some());
        assert!(repo.find(&id.to_string()).unwrap().is_none());
    }

    #[test]
    fn test_splits_survive_reload() {
        let (temp_dir, repo) = create_test_repo();
        let expense = expense_on(9, None, MemberId::new(), MemberId::new());
        let id = expense.id;
        repo.upsert(expense).unwrap();
        repo.save().unwrap();

        let reloaded = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        reloaded.load().unwrap();
        let loaded = reloaded.get(id).unwrap().unwrap();
        assert_eq!(loaded.splits.len(), 2);
        assert!(loaded.splits[0].settled);
        assert!(!loaded.splits[1].settled);
    }
}
