//! Balance and settlement CLI commands

use clap::{Args, Subcommand};

use crate::display::{
    format_balances, format_friend_balances, format_settlement_list, format_transfers, Labels,
};
use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{LedgerContext, Money};
use crate::services::{GroupService, MemberService, SettlementService};

use super::{ContextArgs, Session};

#[derive(Args, Debug)]
pub struct BalanceArgs {
    #[command(flatten)]
    pub context: ContextArgs,
}

#[derive(Subcommand)]
pub enum SettleCommands {
    /// Show the fewest payments that clear every debt
    Suggest {
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Record a payment that clears the direct debt between two members
    Record {
        /// Member who paid
        from: String,
        /// Member who received the payment
        to: String,
        /// Amount paid; must match what `from` owes `to`
        amount: String,
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Record every suggested payment at once
    All {
        #[command(flatten)]
        context: ContextArgs,
    },
    /// List recorded settlements
    List {
        #[command(flatten)]
        context: ContextArgs,
    },
}

/// Balances of a group or friend, or an overview across everything
pub fn handle_balance_command(session: &Session<'_>, args: BalanceArgs) -> SplitbookResult<()> {
    let actor = session.actor()?;
    let service = SettlementService::new(session.storage, session.settings.currency.as_str());
    let labels = session.labels()?;

    if let Some(context) = args.context.resolve(session, &actor)? {
        let balances = service.balances(&context)?;
        print!("{}", format_balances(&balances, &labels));
        return Ok(());
    }

    println!("Friends:");
    for line in format_friend_balances(&service.friend_balances(actor.id)?, &labels).lines() {
        println!("  {}", line);
    }

    let groups = GroupService::new(session.storage).list_for(actor.id)?;
    if !groups.is_empty() {
        println!();
        println!("Groups:");
        for group in groups {
            let position = service
                .balances(&LedgerContext::Group(group.id))?
                .get(actor.id);
            println!("  {:<20} {}", group.name, describe_position(position, &labels));
        }
    }

    Ok(())
}

fn describe_position(amount: Money, labels: &Labels) -> String {
    if amount.is_positive() {
        format!("you are owed {}", labels.money(amount))
    } else if amount.is_negative() {
        format!("you owe {}", labels.money(amount.abs()))
    } else {
        "settled up".to_string()
    }
}

pub fn handle_settle_command(session: &Session<'_>, cmd: SettleCommands) -> SplitbookResult<()> {
    let actor = session.actor()?;
    let service = SettlementService::new(session.storage, session.settings.currency.as_str());
    let labels = session.labels()?;

    match cmd {
        SettleCommands::Suggest { context } => {
            let context = context.require(session, &actor)?;
            print!("{}", format_transfers(&service.suggest(&context)?, &labels));
        }

        SettleCommands::Record {
            from,
            to,
            amount,
            context,
        } => {
            let context = context.require(session, &actor)?;
            let members = MemberService::new(session.storage);
            let from = members.resolve(&from)?;
            let to = members.resolve(&to)?;
            let amount = Money::parse(&amount)
                .map_err(|e| SplitbookError::Validation(e.to_string()))?;

            let settlement = service.record(&context, actor.id, from.id, to.id, amount)?;
            println!(
                "Recorded: {} paid {} {} ({} splits settled)",
                from.name,
                to.name,
                labels.money(settlement.amount),
                settlement.consumed.len()
            );
        }

        SettleCommands::All { context } => {
            let context = context.require(session, &actor)?;
            let settlements = service.settle_all(&context, actor.id)?;
            if settlements.is_empty() {
                println!("Nothing to settle.");
            } else {
                for s in &settlements {
                    println!(
                        "Recorded: {} paid {} {}",
                        labels.member(s.from),
                        labels.member(s.to),
                        labels.money(s.amount)
                    );
                }
            }
        }

        SettleCommands::List { context } => {
            let context = context.require(session, &actor)?;
            println!(
                "{}",
                format_settlement_list(&service.list(&context)?, &labels)
            );
        }
    }

    Ok(())
}
