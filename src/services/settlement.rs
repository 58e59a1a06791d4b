//! Settlement service
//!
//! Computes who owes whom within a group or between two friends, proposes
//! simplified transfers, and records payments by flipping the splits they
//! pay off.
//!
//! A payment touches two files. `settlements.json` is written before
//! `expenses.json`, so a failed second write leaves a settlement whose
//! splits are still outstanding rather than settled splits with no record
//! of who paid.

use std::collections::HashSet;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{Expense, LedgerContext, MemberId, Money, Settlement, SplitRef};
use crate::storage::Storage;

use super::balance::{accumulate, counterparty_balances, pairwise_balance, NetBalances};
use super::simplify::{simplify_debts, Transfer};

pub struct SettlementService<'a> {
    storage: &'a Storage,
    default_currency: String,
}

impl<'a> SettlementService<'a> {
    /// `default_currency` is recorded on settlements between friends
    pub fn new(storage: &'a Storage, default_currency: impl Into<String>) -> Self {
        Self {
            storage,
            default_currency: default_currency.into(),
        }
    }

    /// Net position of every member of the context
    ///
    /// A group lists all of its members, including settled ones. A friend
    /// pair only counts debts directly between the two.
    pub fn balances(&self, context: &LedgerContext) -> SplitbookResult<NetBalances> {
        let expenses = self.storage.expenses.get_for_context(context)?;

        match *context {
            LedgerContext::Group(group_id) => {
                let group = self
                    .storage
                    .groups
                    .get(group_id)?
                    .ok_or_else(|| SplitbookError::group_not_found(group_id.to_string()))?;
                let mut balances = NetBalances::with_members(group.members.iter().copied());
                accumulate(&mut balances, &expenses);
                Ok(balances)
            }
            LedgerContext::Friends(a, b) => {
                let pair = pairwise_balance(&expenses, a, b);
                Ok([(a, pair.net), (b, -pair.net)].into_iter().collect())
            }
        }
    }

    /// Transfers that would settle the context
    pub fn suggest(&self, context: &LedgerContext) -> SplitbookResult<Vec<Transfer>> {
        simplify_debts(&self.balances(context)?)
    }

    /// Balances with every counterparty across friend expenses
    ///
    /// Positive means the counterparty owes `member`.
    pub fn friend_balances(&self, member: MemberId) -> SplitbookResult<Vec<(MemberId, Money)>> {
        let expenses: Vec<Expense> = self
            .storage
            .expenses
            .get_for_member(member)?
            .into_iter()
            .filter(Expense::is_friend_expense)
            .collect();
        Ok(counterparty_balances(&expenses, member))
    }

    /// Record that `from` paid `to` the amount of their direct debt
    ///
    /// The amount must match what `from` owes `to` net of what `to` owes
    /// `from`, to within a cent. Every split between the two is settled.
    pub fn record(
        &self,
        context: &LedgerContext,
        actor: MemberId,
        from: MemberId,
        to: MemberId,
        amount: Money,
    ) -> SplitbookResult<Settlement> {
        if !amount.is_positive() {
            return Err(SplitbookError::Validation(
                "settlement amount must be greater than 0".into(),
            ));
        }
        if from == to {
            return Err(SplitbookError::Validation(
                "cannot settle with yourself".into(),
            ));
        }
        self.check_access(context, actor, &[from, to])?;

        let mut expenses = self.storage.expenses.get_for_context(context)?;
        let pair = pairwise_balance(&expenses, to, from);

        if !pair.net.approx_eq(amount) {
            tracing::warn!(
                from = %from,
                to = %to,
                expected = pair.net.cents(),
                got = amount.cents(),
                "settlement amount mismatch"
            );
            return Err(SplitbookError::Validation(format!(
                "settlement amount mismatch: expected {}, got {}",
                pair.net, amount
            )));
        }

        let mut settlement = Settlement::new(
            context.group_id(),
            from,
            to,
            amount,
            self.currency_for(context)?,
        );
        settlement.consumed = pair.splits;

        let consumed: HashSet<SplitRef> = settlement.consumed.iter().copied().collect();
        let audit = self.commit(&mut expenses, &consumed, std::slice::from_ref(&settlement))?;
        self.storage.log_batch(&audit)?;

        Ok(settlement)
    }

    /// Record every suggested transfer and settle the whole context
    ///
    /// Simplified transfers do not always follow direct debts, so each
    /// settlement lists the direct splits between its two members and every
    /// remaining outstanding split of the context is settled as well.
    pub fn settle_all(
        &self,
        context: &LedgerContext,
        actor: MemberId,
    ) -> SplitbookResult<Vec<Settlement>> {
        self.check_access(context, actor, &[])?;

        let transfers = self.suggest(context)?;
        if transfers.is_empty() {
            return Ok(Vec::new());
        }

        let mut expenses = self.storage.expenses.get_for_context(context)?;
        let currency = self.currency_for(context)?;

        let settlements: Vec<Settlement> = transfers
            .iter()
            .map(|t| {
                let mut settlement =
                    Settlement::new(context.group_id(), t.from, t.to, t.amount, currency.clone());
                settlement.consumed = pairwise_balance(&expenses, t.to, t.from).splits;
                settlement
            })
            .collect();

        let outstanding: HashSet<SplitRef> = match *context {
            LedgerContext::Group(_) => expenses
                .iter()
                .flat_map(|e| {
                    e.outstanding_splits().map(move |s| SplitRef {
                        expense_id: e.id,
                        member_id: s.member_id,
                    })
                })
                .collect(),
            LedgerContext::Friends(a, b) => pairwise_balance(&expenses, a, b)
                .splits
                .into_iter()
                .collect(),
        };

        let audit = self.commit(&mut expenses, &outstanding, &settlements)?;
        self.storage.log_batch(&audit)?;

        Ok(settlements)
    }

    /// Recorded settlements of the context, newest first
    pub fn list(&self, context: &LedgerContext) -> SplitbookResult<Vec<Settlement>> {
        self.storage.settlements.get_for_context(context)
    }

    /// The actor must belong to the context, as must every named member
    fn check_access(
        &self,
        context: &LedgerContext,
        actor: MemberId,
        members: &[MemberId],
    ) -> SplitbookResult<()> {
        match *context {
            LedgerContext::Group(group_id) => {
                let group = self
                    .storage
                    .groups
                    .get(group_id)?
                    .ok_or_else(|| SplitbookError::group_not_found(group_id.to_string()))?;
                if !group.has_member(actor) {
                    return Err(SplitbookError::Forbidden(format!(
                        "not a member of group {}",
                        group.name
                    )));
                }
                if let Some(outsider) = members.iter().find(|m| !group.has_member(**m)) {
                    return Err(SplitbookError::Validation(format!(
                        "{} is not in group {}",
                        outsider, group.name
                    )));
                }
            }
            LedgerContext::Friends(a, b) => {
                if actor != a && actor != b {
                    return Err(SplitbookError::Forbidden(
                        "only the two friends can settle between themselves".into(),
                    ));
                }
                if let Some(outsider) = members.iter().find(|m| **m != a && **m != b) {
                    return Err(SplitbookError::Validation(format!(
                        "{} is not part of this friendship",
                        outsider
                    )));
                }
            }
        }
        Ok(())
    }

    fn currency_for(&self, context: &LedgerContext) -> SplitbookResult<String> {
        match context.group_id() {
            Some(group_id) => Ok(self
                .storage
                .groups
                .get(group_id)?
                .ok_or_else(|| SplitbookError::group_not_found(group_id.to_string()))?
                .currency),
            None => Ok(self.default_currency.clone()),
        }
    }

    /// Flip `splits`, store `settlements`, then persist settlements before expenses
    ///
    /// Returns the audit entries describing the change.
    fn commit(
        &self,
        expenses: &mut [Expense],
        splits: &HashSet<SplitRef>,
        settlements: &[Settlement],
    ) -> SplitbookResult<Vec<AuditEntry>> {
        let mut audit = Vec::new();

        for expense in expenses.iter_mut() {
            let before = expense.clone();
            let mut flipped = 0;
            for split in expense.splits.iter_mut() {
                let key = SplitRef {
                    expense_id: before.id,
                    member_id: split.member_id,
                };
                if !split.settled && splits.contains(&key) {
                    split.mark_settled();
                    flipped += 1;
                }
            }
            if flipped == 0 {
                continue;
            }

            self.storage.expenses.upsert(expense.clone())?;
            audit.push(AuditEntry::update(
                EntityType::Expense,
                expense.id.to_string(),
                Some(expense.description.clone()),
                &before,
                &*expense,
                Some(format!("settled {} split(s)", flipped)),
            ));
        }

        for settlement in settlements {
            self.storage.settlements.upsert(settlement.clone())?;
            audit.push(AuditEntry::create(
                EntityType::Settlement,
                settlement.id.to_string(),
                None,
                settlement,
            ));
        }

        self.storage.settlements.save()?;
        self.storage.expenses.save()?;

        tracing::debug!(
            settlements = settlements.len(),
            splits = splits.len(),
            "recorded settlement"
        );

        Ok(audit)
    }
}
