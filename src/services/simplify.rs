//! Debt simplification
//!
//! Reduces a set of net balances to a short list of transfers using greedy
//! debtor/creditor matching. Both sides are walked in the input order, so
//! the same balances always produce the same transfers. The result has at
//! most `creditors + debtors - 1` entries; it is not guaranteed to be the
//! global minimum.

use serde::Serialize;
use std::fmt;

use super::balance::NetBalances;
use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{MemberId, Money, CENT_TOLERANCE};

/// A single payment that moves money from a debtor to a creditor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}

/// Compute transfers that settle every balance
///
/// Fails with an invariant error if credits and debts differ by more than
/// one cent.
pub fn simplify_debts(balances: &NetBalances) -> SplitbookResult<Vec<Transfer>> {
    let total = balances.total();
    if total.abs() > CENT_TOLERANCE {
        return Err(SplitbookError::Invariant(format!(
            "balances do not net to zero: off by {}",
            total
        )));
    }

    let mut creditors: Vec<(MemberId, Money)> = Vec::new();
    let mut debtors: Vec<(MemberId, Money)> = Vec::new();
    for (member, amount) in balances.iter() {
        if amount.is_positive() {
            creditors.push((member, amount));
        } else if amount.is_negative() {
            debtors.push((member, amount.abs()));
        }
    }

    let mut transfers = Vec::with_capacity(creditors.len() + debtors.len());
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let (debtor, debt) = debtors[i];
        let (creditor, credit) = creditors[j];
        let amount = debt.min(credit);

        transfers.push(Transfer {
            from: debtor,
            to: creditor,
            amount,
        });

        debtors[i].1 -= amount;
        creditors[j].1 -= amount;

        if debtors[i].1.is_zero() {
            i += 1;
        }
        if creditors[j].1.is_zero() {
            j += 1;
        }
    }

    tracing::debug!(
        members = balances.len(),
        transfers = transfers.len(),
        "simplified debts"
    );

    Ok(transfers)
}

/// Balances after every transfer has been paid
pub fn apply_transfers(balances: &NetBalances, transfers: &[Transfer]) -> NetBalances {
    let mut result = balances.clone();
    for transfer in transfers {
        result.add(transfer.from, transfer.amount);
        result.add(transfer.to, -transfer.amount);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(entries: &[(MemberId, i64)]) -> NetBalances {
        entries
            .iter()
            .map(|&(m, cents)| (m, Money::from_cents(cents)))
            .collect()
    }

    fn transfer(from: MemberId, to: MemberId, cents: i64) -> Transfer {
        Transfer {
            from,
            to,
            amount: Money::from_cents(cents),
        }
    }

    #[test]
    fn test_one_creditor_two_debtors() {
        let (a, b, c) = (MemberId::new(), MemberId::new(), MemberId::new());
        let input = balances(&[(a, 3000), (b, -1000), (c, -2000)]);

        let transfers = simplify_debts(&input).unwrap();

        assert_eq!(transfers, vec![transfer(b, a, 1000), transfer(c, a, 2000)]);
    }

    #[test]
    fn test_one_debtor_two_creditors() {
        let (a, b, c) = (MemberId::new(), MemberId::new(), MemberId::new());
        let input = balances(&[(a, 1500), (b, 500), (c, -2000)]);

        let transfers = simplify_debts(&input).unwrap();

        assert_eq!(transfers, vec![transfer(c, a, 1500), transfer(c, b, 500)]);
    }

    #[test]
    fn test_settled_balances_produce_nothing() {
        let (a, b) = (MemberId::new(), MemberId::new());
        assert!(simplify_debts(&balances(&[(a, 0), (b, 0)])).unwrap().is_empty());
        assert!(simplify_debts(&NetBalances::new()).unwrap().is_empty());
    }

    #[test]
    fn test_transfers_zero_everyone_and_are_idempotent() {
        let members: Vec<_> = (0..6).map(|_| MemberId::new()).collect();
        let cents = [4200, -1337, -863, 2500, -3000, -1500];
        let input = balances(&members.iter().copied().zip(cents).collect::<Vec<_>>());

        let transfers = simplify_debts(&input).unwrap();
        assert!(transfers.iter().all(|t| t.amount.is_positive()));
        assert!(transfers.len() <= 5);

        let after = apply_transfers(&input, &transfers);
        assert!(after.is_settled());
        assert!(simplify_debts(&after).unwrap().is_empty());
    }

    #[test]
    fn test_per_member_totals_are_preserved() {
        let members: Vec<_> = (0..4).map(|_| MemberId::new()).collect();
        let cents = [700, -300, 100, -500];
        let input = balances(&members.iter().copied().zip(cents).collect::<Vec<_>>());

        let transfers = simplify_debts(&input).unwrap();

        for (member, amount) in input.iter() {
            let paid: Money = transfers.iter().filter(|t| t.from == member).map(|t| t.amount).sum();
            let received: Money =
                transfers.iter().filter(|t| t.to == member).map(|t| t.amount).sum();
            assert_eq!(received - paid, amount);
        }
    }

    #[test]
    fn test_non_zero_sum_is_an_invariant_error() {
        let (a, b) = (MemberId::new(), MemberId::new());
        let err = simplify_debts(&balances(&[(a, 1000), (b, -900)])).unwrap_err();

        assert!(err.is_invariant());
        assert!(err.to_string().contains("do not net to zero"));
    }
}
