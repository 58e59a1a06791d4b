//! Split model
//!
//! One member's share of one expense, plus the method used to compute shares.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SplitbookError;

use super::ids::MemberId;
use super::money::Money;

/// How an expense total is divided among members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    #[default]
    Equal,
    Percentage,
    Exact,
    Itemized,
}

impl SplitMethod {
    pub fn all() -> &'static [SplitMethod] {
        &[Self::Equal, Self::Percentage, Self::Exact, Self::Itemized]
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Equal => "Split equally",
            Self::Percentage => "Split by %",
            Self::Exact => "Split by amount",
            Self::Itemized => "Itemized",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Percentage => "percentage",
            Self::Exact => "exact",
            Self::Itemized => "itemized",
        }
    }
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SplitMethod {
    type Err = SplitbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equal" => Ok(Self::Equal),
            "percentage" | "percent" => Ok(Self::Percentage),
            "exact" => Ok(Self::Exact),
            "itemized" => Ok(Self::Itemized),
            other => Err(SplitbookError::Validation(format!(
                "unsupported split method: {}",
                other
            ))),
        }
    }
}

/// One member's share of an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub member_id: MemberId,

    /// Amount this member owes toward the expense
    pub amount: Money,

    /// Percentage of the total, recorded for percentage splits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,

    /// Amount already paid; equals `amount` for the payer's own row
    #[serde(default)]
    pub paid_amount: Money,

    /// Settled rows no longer contribute to balances
    #[serde(default)]
    pub settled: bool,
}

impl Split {
    /// A share owed by someone other than the payer
    pub fn owed(member_id: MemberId, amount: Money, percentage: Option<f64>) -> Self {
        Self {
            member_id,
            amount,
            percentage,
            paid_amount: Money::zero(),
            settled: false,
        }
    }

    /// The payer's own share, recorded as already paid
    pub fn paid_by_payer(member_id: MemberId, amount: Money, percentage: Option<f64>) -> Self {
        Self {
            member_id,
            amount,
            percentage,
            paid_amount: amount,
            settled: true,
        }
    }

    /// Amount still outstanding on this row
    pub fn outstanding(&self) -> Money {
        if self.settled {
            Money::zero()
        } else {
            self.amount - self.paid_amount
        }
    }

    pub fn mark_settled(&mut self) {
        self.settled = true;
        self.paid_amount = self.amount;
    }
}
