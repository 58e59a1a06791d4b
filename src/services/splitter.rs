//! Split calculator
//!
//! Turns an expense total and a split method into per-member obligations.
//! Everything here is pure: callers pass fully materialized inputs and get
//! either the complete share list or a validation error, never a partial
//! result.
//!
//! Rounding: amounts are whole cents, so equal, percentage and itemized
//! divisions can leave a few cents over. Those cents are given to the payer
//! (whose own row never contributes to a balance) so the shares always add
//! up to the expense total exactly. When the payer holds no share of a
//! percentage split the residue goes to the largest share instead, and for
//! an item the payer does not share it goes to the item's first sharer.

use std::collections::{HashMap, HashSet};

use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{items_total, Item, MemberId, Money, Split, SplitMethod, MAX_AMOUNT};

/// Allowed deviation of a percentage total from 100
pub const PERCENT_TOLERANCE: f64 = 0.01;

/// A member's percentage of the total
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentageShare {
    pub member_id: MemberId,
    pub percentage: f64,
}

/// A member's exact amount of the total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactShare {
    pub member_id: MemberId,
    pub amount: Money,
}

/// Method-specific split parameters
#[derive(Debug, Clone, PartialEq)]
pub enum SplitParams {
    Equal,
    Percentage(Vec<PercentageShare>),
    Exact(Vec<ExactShare>),
    Itemized(Vec<Item>),
}

impl SplitParams {
    pub fn method(&self) -> SplitMethod {
        match self {
            Self::Equal => SplitMethod::Equal,
            Self::Percentage(_) => SplitMethod::Percentage,
            Self::Exact(_) => SplitMethod::Exact,
            Self::Itemized(_) => SplitMethod::Itemized,
        }
    }

    /// Itemized parameters whose items must add up to `total`
    pub fn itemized(items: Vec<Item>, total: Money) -> SplitbookResult<Self> {
        check_items_total(&items, total)?;
        Ok(Self::Itemized(items))
    }

    /// Items carried by itemized parameters
    pub fn items(&self) -> &[Item] {
        match self {
            Self::Itemized(items) => items,
            _ => &[],
        }
    }
}

/// One member's computed obligation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedShare {
    pub member_id: MemberId,
    pub amount: Money,
    pub percentage: Option<f64>,
}

/// Compute every member's share of `total`
///
/// `members` must be non-empty and distinct and must contain `payer`.
/// Shares are returned in member order for equal splits, in the caller's
/// order for percentage and exact splits, and in order of first appearance
/// across items for itemized splits.
pub fn calculate_shares(
    total: Money,
    members: &[MemberId],
    payer: MemberId,
    params: &SplitParams,
) -> SplitbookResult<Vec<ComputedShare>> {
    if !total.is_positive() {
        return Err(SplitbookError::Validation(
            "amount must be greater than 0".into(),
        ));
    }
    if total > MAX_AMOUNT {
        return Err(too_large());
    }
    if members.is_empty() {
        return Err(SplitbookError::Validation(
            "no members to split among".into(),
        ));
    }

    let mut seen = HashSet::with_capacity(members.len());
    for member in members {
        if !seen.insert(*member) {
            return Err(SplitbookError::Validation(format!(
                "duplicate member in split: {}",
                member
            )));
        }
    }
    if !seen.contains(&payer) {
        return Err(SplitbookError::Validation(
            "payer must be one of the members".into(),
        ));
    }

    let shares = match params {
        SplitParams::Equal => split_equal(total, members, payer),
        SplitParams::Percentage(shares) => split_percentage(total, &seen, payer, shares)?,
        SplitParams::Exact(shares) => split_exact(total, &seen, shares)?,
        SplitParams::Itemized(items) => split_itemized(&seen, payer, items)?,
    };

    tracing::debug!(
        method = %params.method(),
        members = members.len(),
        total = total.cents(),
        "computed split shares"
    );

    Ok(shares)
}

/// Fail unless the items add up to the expense total within one cent
pub fn check_items_total(items: &[Item], total: Money) -> SplitbookResult<()> {
    let sum = items_total(items).ok_or_else(too_large)?;
    if !sum.approx_eq(total) {
        return Err(SplitbookError::Validation(format!(
            "items total must equal expense amount (items {}, expense {})",
            sum, total
        )));
    }
    Ok(())
}

/// Turn computed shares into split rows
///
/// The payer's row is recorded as already paid and settled, so it never
/// contributes to an outstanding balance.
pub fn build_splits(shares: &[ComputedShare], payer: MemberId) -> Vec<Split> {
    shares
        .iter()
        .map(|share| {
            if share.member_id == payer {
                Split::paid_by_payer(share.member_id, share.amount, share.percentage)
            } else {
                Split::owed(share.member_id, share.amount, share.percentage)
            }
        })
        .collect()
}

fn split_equal(total: Money, members: &[MemberId], payer: MemberId) -> Vec<ComputedShare> {
    let (base, remainder) = total.split_evenly(members.len());

    members
        .iter()
        .map(|&member_id| ComputedShare {
            member_id,
            amount: if member_id == payer {
                base + remainder
            } else {
                base
            },
            percentage: None,
        })
        .collect()
}

fn split_percentage(
    total: Money,
    members: &HashSet<MemberId>,
    payer: MemberId,
    shares: &[PercentageShare],
) -> SplitbookResult<Vec<ComputedShare>> {
    if shares.is_empty() {
        return Err(SplitbookError::Validation(
            "custom splits required for percentage method".into(),
        ));
    }

    check_share_members(shares.iter().map(|s| s.member_id), members)?;

    for share in shares {
        if !share.percentage.is_finite() || share.percentage < 0.0 {
            return Err(SplitbookError::Validation(format!(
                "invalid percentage for {}: {}",
                share.member_id, share.percentage
            )));
        }
    }

    let sum: f64 = shares.iter().map(|s| s.percentage).sum();
    if (sum - 100.0).abs() > PERCENT_TOLERANCE {
        return Err(SplitbookError::Validation(format!(
            "percentages must sum to 100 (got {})",
            sum
        )));
    }

    let mut computed: Vec<ComputedShare> = shares
        .iter()
        .map(|share| ComputedShare {
            member_id: share.member_id,
            amount: total.percent(share.percentage),
            percentage: Some(share.percentage),
        })
        .collect();

    let residue = total - computed.iter().map(|s| s.amount).sum::<Money>();
    if !residue.is_zero() {
        let target = computed
            .iter()
            .position(|s| s.member_id == payer)
            .unwrap_or_else(|| largest_share(&computed));
        computed[target].amount += residue;
    }

    Ok(computed)
}

fn split_exact(
    total: Money,
    members: &HashSet<MemberId>,
    shares: &[ExactShare],
) -> SplitbookResult<Vec<ComputedShare>> {
    if shares.is_empty() {
        return Err(SplitbookError::Validation(
            "custom splits required for exact method".into(),
        ));
    }

    check_share_members(shares.iter().map(|s| s.member_id), members)?;

    if let Some(share) = shares.iter().find(|s| s.amount.is_negative()) {
        return Err(SplitbookError::Validation(format!(
            "amount for {} cannot be negative",
            share.member_id
        )));
    }

    let sum = Money::checked_sum(shares.iter().map(|s| s.amount)).ok_or_else(too_large)?;
    if !sum.approx_eq(total) {
        return Err(SplitbookError::Validation(format!(
            "amounts must equal total (got {}, expected {})",
            sum, total
        )));
    }

    Ok(shares
        .iter()
        .map(|share| ComputedShare {
            member_id: share.member_id,
            amount: share.amount,
            percentage: None,
        })
        .collect())
}

fn split_itemized(
    members: &HashSet<MemberId>,
    payer: MemberId,
    items: &[Item],
) -> SplitbookResult<Vec<ComputedShare>> {
    if items.is_empty() {
        return Err(SplitbookError::Validation(
            "items required for itemized method".into(),
        ));
    }

    let mut order: Vec<ComputedShare> = Vec::new();
    let mut index: HashMap<MemberId, usize> = HashMap::new();

    for item in items {
        if !item.amount.is_positive() {
            return Err(SplitbookError::Validation(format!(
                "item '{}' amount must be greater than 0",
                item.name
            )));
        }
        if item.shared_by.is_empty() {
            return Err(SplitbookError::Validation(format!(
                "item '{}' has no members sharing it",
                item.name
            )));
        }
        check_share_members(item.shared_by.iter().copied(), members).map_err(|e| match e {
            SplitbookError::Validation(msg) => {
                SplitbookError::Validation(format!("item '{}': {}", item.name, msg))
            }
            other => other,
        })?;

        let (base, remainder) = item.amount.split_evenly(item.shared_by.len());
        let remainder_to = if item.shared_by.contains(&payer) {
            payer
        } else {
            item.shared_by[0]
        };

        for &member_id in &item.shared_by {
            let slot = *index.entry(member_id).or_insert_with(|| {
                order.push(ComputedShare {
                    member_id,
                    amount: Money::zero(),
                    percentage: None,
                });
                order.len() - 1
            });
            let owed = if member_id == remainder_to {
                base.checked_add(remainder)
            } else {
                Some(base)
            };
            let running = order[slot].amount;
            order[slot].amount = owed
                .and_then(|owed| running.checked_add(owed))
                .ok_or_else(too_large)?;
        }
    }

    Ok(order)
}

fn too_large() -> SplitbookError {
    SplitbookError::Validation("amount too large".into())
}

/// Shares must name distinct members of the expense
fn check_share_members(
    ids: impl Iterator<Item = MemberId>,
    members: &HashSet<MemberId>,
) -> SplitbookResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !members.contains(&id) {
            return Err(SplitbookError::Validation(format!(
                "{} is not a member of this expense",
                id
            )));
        }
        if !seen.insert(id) {
            return Err(SplitbookError::Validation(format!(
                "{} appears more than once",
                id
            )));
        }
    }
    Ok(())
}

/// Index of the largest share, first one on ties
fn largest_share(shares: &[ComputedShare]) -> usize {
    let mut best = 0;
    for (i, share) in shares.iter().enumerate() {
        if share.amount > shares[best].amount {
            best = i;
        }
    }
    best
}
