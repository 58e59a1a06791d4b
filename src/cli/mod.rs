//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Every handler
//! receives the loaded storage, the settings and the `--as` value; the
//! acting member is resolved lazily since some commands don't need one.

pub mod audit;
pub mod expense;
pub mod export;
pub mod group;
pub mod member;
pub mod settle;

pub use audit::{handle_audit_command, AuditArgs};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use group::{handle_group_command, GroupCommands};
pub use member::{handle_member_command, MemberCommands};
pub use settle::{handle_balance_command, handle_settle_command, BalanceArgs, SettleCommands};

use clap::Args;

use crate::config::Settings;
use crate::display::Labels;
use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{LedgerContext, Member};
use crate::services::{GroupService, MemberService};
use crate::storage::Storage;

/// State shared by every command
pub struct Session<'a> {
    pub storage: &'a Storage,
    pub settings: &'a Settings,
    acting_as: Option<String>,
}

impl<'a> Session<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings, acting_as: Option<String>) -> Self {
        Self {
            storage,
            settings,
            acting_as,
        }
    }

    /// The member commands run on behalf of: `--as`, else the configured default
    pub fn actor(&self) -> SplitbookResult<Member> {
        let reference = self
            .acting_as
            .as_deref()
            .or(self.settings.default_member.as_deref())
            .ok_or_else(|| {
                SplitbookError::Validation(
                    "no acting member: pass --as NAME or run `splitbook member use NAME`".into(),
                )
            })?;

        MemberService::new(self.storage).resolve(reference)
    }

    /// Names and currency symbol for rendering
    pub fn labels(&self) -> SplitbookResult<Labels> {
        let members = self.storage.members.get_all()?;
        Ok(Labels::new(&members, self.settings.currency_symbol.as_str()))
    }
}

/// Selects a group or a friend to work within
#[derive(Args, Debug, Default, Clone)]
pub struct ContextArgs {
    /// Group name or ID
    #[arg(short, long, conflicts_with = "with")]
    pub group: Option<String>,

    /// Friend to share with outside any group (repeatable for expenses)
    #[arg(short, long)]
    pub with: Vec<String>,
}

impl ContextArgs {
    pub fn is_empty(&self) -> bool {
        self.group.is_none() && self.with.is_empty()
    }

    /// Resolve to a ledger context seen from `actor`
    ///
    /// Returns `None` when neither `--group` nor `--with` was given.
    pub fn resolve(
        &self,
        session: &Session<'_>,
        actor: &Member,
    ) -> SplitbookResult<Option<LedgerContext>> {
        if let Some(group) = &self.group {
            let group = GroupService::new(session.storage).resolve(group)?;
            return Ok(Some(LedgerContext::Group(group.id)));
        }

        match self.with.as_slice() {
            [] => Ok(None),
            [friend] => {
                let friend = MemberService::new(session.storage).resolve(friend)?;
                if friend.id == actor.id {
                    return Err(SplitbookError::Validation(
                        "cannot use yourself as a friend context".into(),
                    ));
                }
                Ok(Some(LedgerContext::Friends(actor.id, friend.id)))
            }
            _ => Err(SplitbookError::Validation(
                "a friend ledger is between two members: pass a single --with".into(),
            )),
        }
    }

    /// Like [`ContextArgs::resolve`] but a context is mandatory
    pub fn require(
        &self,
        session: &Session<'_>,
        actor: &Member,
    ) -> SplitbookResult<LedgerContext> {
        self.resolve(session, actor)?.ok_or_else(|| {
            SplitbookError::Validation("pass --group NAME or --with NAME".into())
        })
    }
}
