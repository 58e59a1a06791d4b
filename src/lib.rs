//! Splitbook - shared expense ledger with debt simplification
//!
//! Records expenses shared within groups or between friends, splits each
//! one among its members, and reduces the resulting debts to the fewest
//! payments that settle everyone up.
//!
//! # Architecture
//!
//! - `config`: path resolution and user settings
//! - `error`: the crate-wide error type
//! - `models`: members, groups, expenses, splits and settlements
//! - `storage`: JSON file repositories with atomic writes
//! - `services`: split calculation, balance netting, debt simplification
//!   and the operations built on them
//! - `audit`: append-only change log
//! - `export`: JSON, YAML and CSV exports
//! - `display`, `cli`: terminal formatting and command handlers
//!
//! # Example
//!
//! ```rust
//! use splitbook::models::{MemberId, Money};
//! use splitbook::services::{calculate_shares, simplify_debts, NetBalances, SplitParams};
//!
//! let (alice, bob, carol) = (MemberId::new(), MemberId::new(), MemberId::new());
//! let shares = calculate_shares(
//!     Money::from_cents(9000),
//!     &[alice, bob, carol],
//!     alice,
//!     &SplitParams::Equal,
//! )?;
//! assert!(shares.iter().all(|s| s.amount == Money::from_cents(3000)));
//!
//! let balances: NetBalances = [
//!     (alice, Money::from_cents(3000)),
//!     (bob, Money::from_cents(-1000)),
//!     (carol, Money::from_cents(-2000)),
//! ]
//! .into_iter()
//! .collect();
//! let transfers = simplify_debts(&balances)?;
//! assert_eq!(transfers.len(), 2);
//! # Ok::<(), splitbook::SplitbookError>(())
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::SplitbookError;
