//! Service layer for Splitbook
//!
//! `splitter`, `balance` and `simplify` are pure computations over models.
//! The remaining services sit on top of storage and handle validation,
//! permissions and audit logging.

pub mod balance;
pub mod expense;
pub mod group;
pub mod member;
pub mod settlement;
pub mod simplify;
pub mod splitter;

pub use balance::{counterparty_balances, net_balances, pairwise_balance, NetBalances, PairBalance};
pub use expense::{CreateExpenseInput, ExpenseScope, ExpenseService, UpdateExpenseInput};
pub use group::GroupService;
pub use member::MemberService;
pub use settlement::SettlementService;
pub use simplify::{apply_transfers, simplify_debts, Transfer};
pub use splitter::{
    build_splits, calculate_shares, check_items_total, ComputedShare, ExactShare,
    PercentageShare, SplitParams,
};
