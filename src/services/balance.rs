//! Netting of outstanding splits into balances
//!
//! Every unsettled split owed by someone other than the expense creator is a
//! debt from that member to the creator. These functions fold those debts
//! into per-member positions; the simplifier then turns the positions into
//! transfers.

use std::collections::HashMap;

use crate::models::{Expense, MemberId, Money, SplitRef};

/// Signed balance per member, in first-seen order
///
/// Positive means the member is owed money, negative means they owe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetBalances {
    entries: Vec<(MemberId, Money)>,
    index: HashMap<MemberId, usize>,
}

impl NetBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with every listed member at zero
    pub fn with_members(members: impl IntoIterator<Item = MemberId>) -> Self {
        let mut balances = Self::new();
        for member in members {
            balances.slot(member);
        }
        balances
    }

    fn slot(&mut self, member: MemberId) -> usize {
        if let Some(&i) = self.index.get(&member) {
            return i;
        }
        self.entries.push((member, Money::zero()));
        self.index.insert(member, self.entries.len() - 1);
        self.entries.len() - 1
    }

    pub fn add(&mut self, member: MemberId, delta: Money) {
        let i = self.slot(member);
        self.entries[i].1 += delta;
    }

    pub fn get(&self, member: MemberId) -> Money {
        self.index
            .get(&member)
            .map(|&i| self.entries[i].1)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MemberId, Money)> + '_ {
        self.entries.iter().copied()
    }

    /// Sum of all positions; zero for any balance set built from splits
    pub fn total(&self) -> Money {
        self.entries.iter().map(|(_, amount)| *amount).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when nobody owes or is owed anything
    pub fn is_settled(&self) -> bool {
        self.entries.iter().all(|(_, amount)| amount.is_zero())
    }
}

impl FromIterator<(MemberId, Money)> for NetBalances {
    fn from_iter<T: IntoIterator<Item = (MemberId, Money)>>(iter: T) -> Self {
        let mut balances = Self::new();
        for (member, amount) in iter {
            balances.add(member, amount);
        }
        balances
    }
}

/// Net balance of a member pair over their outstanding splits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairBalance {
    /// Positive when the second member owes the first
    pub net: Money,

    /// Split rows that make up `net`
    pub splits: Vec<SplitRef>,
}

/// Fold every outstanding split into per-member positions
pub fn net_balances<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> NetBalances {
    let mut balances = NetBalances::new();
    accumulate(&mut balances, expenses);
    balances
}

/// Add the outstanding splits of `expenses` to existing positions
pub fn accumulate<'a>(balances: &mut NetBalances, expenses: impl IntoIterator<Item = &'a Expense>) {
    for expense in expenses {
        let mut outstanding = expense.outstanding_splits().peekable();
        if outstanding.peek().is_none() {
            continue;
        }
        balances.slot(expense.created_by);
        for split in outstanding {
            let owed = split.outstanding();
            balances.add(expense.created_by, owed);
            balances.add(split.member_id, -owed);
        }
    }
}

/// Direct debt between `a` and `b`, ignoring everyone else
pub fn pairwise_balance<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
    a: MemberId,
    b: MemberId,
) -> PairBalance {
    let mut pair = PairBalance::default();

    for expense in expenses {
        let (debtor, sign) = if expense.created_by == a {
            (b, 1)
        } else if expense.created_by == b {
            (a, -1)
        } else {
            continue;
        };

        for split in expense.outstanding_splits().filter(|s| s.member_id == debtor) {
            let owed = split.outstanding();
            pair.net += if sign > 0 { owed } else { -owed };
            pair.splits.push(SplitRef {
                expense_id: expense.id,
                member_id: split.member_id,
            });
        }
    }

    pair
}

/// Balance with each counterparty from `member`'s point of view
///
/// Positive means the counterparty owes `member`. Counterparties whose
/// debts cancel out are left out.
pub fn counterparty_balances<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
    member: MemberId,
) -> Vec<(MemberId, Money)> {
    let mut balances = NetBalances::new();

    for expense in expenses {
        if expense.created_by == member {
            for split in expense.outstanding_splits() {
                balances.add(split.member_id, split.outstanding());
            }
        } else if let Some(split) = expense
            .outstanding_splits()
            .find(|s| s.member_id == member)
        {
            balances.add(expense.created_by, -split.outstanding());
        }
    }

    balances.iter().filter(|(_, amount)| !amount.is_zero()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Split, SplitMethod};
    use chrono::NaiveDate;

    fn expense(payer: MemberId, shares: &[(MemberId, i64)]) -> Expense {
        let total: i64 = shares.iter().map(|(_, c)| c).sum();
        let mut expense = Expense::new(
            None,
            "Groceries",
            "food",
            NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
            Money::from_cents(total),
            payer,
        );
        let splits = shares
            .iter()
            .map(|&(member, cents)| {
                if member == payer {
                    Split::paid_by_payer(member, Money::from_cents(cents), None)
                } else {
                    Split::owed(member, Money::from_cents(cents), None)
                }
            })
            .collect();
        expense.replace_splits(SplitMethod::Exact, splits, Vec::new());
        expense
    }

    #[test]
    fn test_net_balances_sum_to_zero() {
        let (a, b, c) = (MemberId::new(), MemberId::new(), MemberId::new());
        let expenses = vec![
            expense(a, &[(a, 3000), (b, 3000), (c, 3000)]),
            expense(b, &[(a, 1000), (b, 1000)]),
        ];

        let balances = net_balances(&expenses);

        assert_eq!(balances.get(a).cents(), 5000);
        assert_eq!(balances.get(b).cents(), -2000);
        assert_eq!(balances.get(c).cents(), -3000);
        assert!(balances.total().is_zero());

        let order: Vec<_> = balances.iter().map(|(m, _)| m).collect();
        assert_eq!(order, vec![a, b, c]);
    }

    #[test]
    fn test_settled_splits_are_ignored() {
        let (a, b) = (MemberId::new(), MemberId::new());
        let mut paid = expense(a, &[(a, 500), (b, 500)]);
        paid.splits.iter_mut().for_each(Split::mark_settled);

        let balances = net_balances(std::iter::once(&paid));
        assert!(balances.is_empty());
        assert!(balances.is_settled());
    }

    #[test]
    fn test_with_members_keeps_zero_rows() {
        let (a, b) = (MemberId::new(), MemberId::new());
        let mut balances = NetBalances::with_members([a, b]);
        accumulate(&mut balances, std::iter::empty());

        assert_eq!(balances.len(), 2);
        assert!(balances.is_settled());
    }

    #[test]
    fn test_pairwise_balance_nets_both_directions() {
        let (a, b, c) = (MemberId::new(), MemberId::new(), MemberId::new());
        let first = expense(a, &[(a, 2000), (b, 2000)]);
        let second = expense(b, &[(a, 500), (b, 500)]);
        let unrelated = expense(c, &[(c, 100), (b, 100)]);
        let expenses = vec![first.clone(), second.clone(), unrelated];

        let pair = pairwise_balance(&expenses, a, b);
        assert_eq!(pair.net.cents(), 1500);
        assert_eq!(pair.splits.len(), 2);
        assert!(pair.splits.contains(&SplitRef { expense_id: first.id, member_id: b }));
        assert!(pair.splits.contains(&SplitRef { expense_id: second.id, member_id: a }));

        let reversed = pairwise_balance(&expenses, b, a);
        assert_eq!(reversed.net.cents(), -1500);
    }

    #[test]
    fn test_counterparty_balances() {
        let (me, b, c) = (MemberId::new(), MemberId::new(), MemberId::new());
        let expenses = vec![
            expense(me, &[(me, 1000), (b, 1000), (c, 1000)]),
            expense(c, &[(me, 2500), (c, 2500)]),
            expense(b, &[(me, 1000), (b, 1000)]),
        ];

        let balances = counterparty_balances(&expenses, me);

        assert_eq!(balances, vec![(c, Money::from_cents(-1500))]);
    }
}
