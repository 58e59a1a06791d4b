//! Expense CLI commands
//!
//! Shares are given as `--share NAME=VALUE` (a percentage or an amount,
//! depending on the method) and items as `--item "NAME:AMOUNT:A,B"`.

use chrono::NaiveDate;
use clap::Subcommand;

use crate::display::{format_expense_details, format_expense_list};
use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{Expense, Item, MemberId, Money, SplitMethod};
use crate::services::{
    CreateExpenseInput, ExactShare, ExpenseScope, ExpenseService, GroupService, MemberService,
    PercentageShare, SplitParams, UpdateExpenseInput,
};

use super::{ContextArgs, Session};

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense you paid
    Add {
        /// What it was for
        description: String,
        /// Total amount (e.g. "42.50")
        amount: String,
        #[command(flatten)]
        context: ContextArgs,
        /// Split method: equal, percentage, exact or itemized
        #[arg(short, long)]
        method: Option<String>,
        /// Share for one member as NAME=VALUE
        #[arg(short, long = "share")]
        shares: Vec<String>,
        /// Line item as NAME:AMOUNT:MEMBER,MEMBER
        #[arg(short, long = "item")]
        items: Vec<String>,
        /// Category
        #[arg(short, long)]
        category: Option<String>,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List expenses
    List {
        #[command(flatten)]
        context: ContextArgs,
        /// Number of expenses to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },
    /// Show an expense with its splits
    Show {
        /// Expense ID
        expense: String,
    },
    /// Edit an expense you paid
    Edit {
        /// Expense ID
        expense: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        method: Option<String>,
        #[arg(short, long = "share")]
        shares: Vec<String>,
        #[arg(short, long = "item")]
        items: Vec<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Delete an expense you paid
    Delete {
        /// Expense ID
        expense: String,
    },
}

pub fn handle_expense_command(session: &Session<'_>, cmd: ExpenseCommands) -> SplitbookResult<()> {
    let service = ExpenseService::new(session.storage);
    let date_format = session.settings.date_format.as_str();

    match cmd {
        ExpenseCommands::Add {
            description,
            amount,
            context,
            method,
            shares,
            items,
            category,
            date,
        } => {
            let actor = session.actor()?;
            let amount = parse_amount(&amount)?;
            let scope = scope_for(session, &context)?;
            let params =
                split_params(session, method, &shares, &items)?.unwrap_or(SplitParams::Equal);
            let category =
                category.unwrap_or_else(|| session.settings.default_category.clone());

            let expense = service.create(
                actor.id,
                CreateExpenseInput {
                    scope,
                    description,
                    amount,
                    category,
                    date: date.as_deref().map(parse_date).transpose()?,
                    params,
                },
            )?;

            let labels = session.labels()?;
            println!(
                "Added expense: {} ({}, {})",
                expense.description,
                labels.money(expense.amount),
                expense.split_method.label()
            );
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::List { context, limit } => {
            let actor = session.actor()?;
            let context = context.resolve(session, &actor)?;
            let mut expenses = service.list(context.as_ref(), actor.id)?;

            // Newest first, capped
            expenses.reverse();
            expenses.truncate(limit);

            let labels = session.labels()?;
            println!("{}", format_expense_list(&expenses, &labels, date_format));
        }

        ExpenseCommands::Show { expense } => {
            let expense = service.resolve(&expense)?;
            let labels = session.labels()?;
            let scope = describe_scope(session, &expense)?;
            print!(
                "{}",
                format_expense_details(&expense, &labels, &scope, date_format)
            );
        }

        ExpenseCommands::Edit {
            expense,
            description,
            amount,
            method,
            shares,
            items,
            category,
            date,
        } => {
            let actor = session.actor()?;
            let expense = service.resolve(&expense)?;

            let input = UpdateExpenseInput {
                description,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                category,
                date: date.as_deref().map(parse_date).transpose()?,
                params: split_params(session, method, &shares, &items)?,
            };

            let updated = service.update(expense.id, actor.id, input)?;
            println!("Updated expense: {}", updated.description);
        }

        ExpenseCommands::Delete { expense } => {
            let actor = session.actor()?;
            let expense = service.resolve(&expense)?;
            let deleted = service.delete(expense.id, actor.id)?;
            println!("Deleted expense: {}", deleted.description);
        }
    }

    Ok(())
}

fn scope_for(session: &Session<'_>, context: &ContextArgs) -> SplitbookResult<ExpenseScope> {
    if let Some(group) = &context.group {
        let group = GroupService::new(session.storage).resolve(group)?;
        return Ok(ExpenseScope::Group(group.id));
    }
    if context.with.is_empty() {
        return Err(SplitbookError::Validation(
            "pass --group NAME or at least one --with NAME".into(),
        ));
    }

    let members = MemberService::new(session.storage);
    let friends = context
        .with
        .iter()
        .map(|name| members.resolve(name).map(|m| m.id))
        .collect::<SplitbookResult<Vec<_>>>()?;
    Ok(ExpenseScope::Friends(friends))
}

fn describe_scope(session: &Session<'_>, expense: &Expense) -> SplitbookResult<String> {
    match expense.group_id {
        Some(group_id) => Ok(GroupService::new(session.storage).get(group_id)?.name),
        None => {
            let labels = session.labels()?;
            let names: Vec<String> = expense.participants().map(|m| labels.member(m)).collect();
            Ok(format!("friends ({})", names.join(", ")))
        }
    }
}

/// Turn `--method`/`--share`/`--item` into calculator parameters
///
/// Returns `None` when nothing split-related was given. Items imply the
/// itemized method.
fn split_params(
    session: &Session<'_>,
    method: Option<String>,
    shares: &[String],
    items: &[String],
) -> SplitbookResult<Option<SplitParams>> {
    let method = match (method, items.is_empty()) {
        (Some(method), _) => method.parse::<SplitMethod>()?,
        (None, false) => SplitMethod::Itemized,
        (None, true) if shares.is_empty() => return Ok(None),
        (None, true) => {
            return Err(SplitbookError::Validation(
                "--share needs --method percentage or --method exact".into(),
            ))
        }
    };

    if method != SplitMethod::Itemized && !items.is_empty() {
        return Err(SplitbookError::Validation(
            "--item is only used with the itemized method".into(),
        ));
    }
    if matches!(method, SplitMethod::Equal | SplitMethod::Itemized) && !shares.is_empty() {
        return Err(SplitbookError::Validation(format!(
            "--share is not used with the {} method",
            method
        )));
    }

    let members = MemberService::new(session.storage);
    let resolve = |name: &str| -> SplitbookResult<MemberId> { Ok(members.resolve(name)?.id) };

    let params = match method {
        SplitMethod::Equal => SplitParams::Equal,
        SplitMethod::Percentage => {
            let mut parsed = Vec::with_capacity(shares.len());
            for share in shares {
                let (name, value) = parse_share(share)?;
                let percentage = value.trim_end_matches('%').parse::<f64>().map_err(|_| {
                    SplitbookError::Validation(format!("invalid percentage '{}'", value))
                })?;
                parsed.push(PercentageShare {
                    member_id: resolve(name)?,
                    percentage,
                });
            }
            SplitParams::Percentage(parsed)
        }
        SplitMethod::Exact => {
            let mut parsed = Vec::with_capacity(shares.len());
            for share in shares {
                let (name, value) = parse_share(share)?;
                parsed.push(ExactShare {
                    member_id: resolve(name)?,
                    amount: parse_amount(value)?,
                });
            }
            SplitParams::Exact(parsed)
        }
        SplitMethod::Itemized => {
            let mut parsed = Vec::with_capacity(items.len());
            for item in items {
                let (name, amount, sharers) = parse_item(item)?;
                let shared_by = sharers
                    .into_iter()
                    .map(&resolve)
                    .collect::<SplitbookResult<Vec<_>>>()?;
                parsed.push(Item::new(name, amount, shared_by));
            }
            SplitParams::Itemized(parsed)
        }
    };

    Ok(Some(params))
}

/// Split `NAME=VALUE` at the last `=`
fn parse_share(raw: &str) -> SplitbookResult<(&str, &str)> {
    match raw.rsplit_once('=') {
        Some((name, value)) if !name.trim().is_empty() && !value.trim().is_empty() => {
            Ok((name.trim(), value.trim()))
        }
        _ => Err(SplitbookError::Validation(format!(
            "invalid share '{}': expected NAME=VALUE",
            raw
        ))),
    }
}

/// Split `NAME:AMOUNT:A,B`; the item name may itself contain colons
fn parse_item(raw: &str) -> SplitbookResult<(&str, Money, Vec<&str>)> {
    let invalid = || {
        SplitbookError::Validation(format!(
            "invalid item '{}': expected NAME:AMOUNT:MEMBER,MEMBER",
            raw
        ))
    };

    let mut parts = raw.rsplitn(3, ':');
    let sharers = parts.next().ok_or_else(invalid)?;
    let amount = parts.next().ok_or_else(invalid)?;
    let name = parts.next().map(str::trim).ok_or_else(invalid)?;
    if name.is_empty() {
        return Err(invalid());
    }

    let sharers: Vec<&str> = sharers
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    Ok((name, parse_amount(amount)?, sharers))
}

fn parse_amount(raw: &str) -> SplitbookResult<Money> {
    Money::parse(raw).map_err(|e| SplitbookError::Validation(e.to_string()))
}

fn parse_date(raw: &str) -> SplitbookResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        SplitbookError::Validation(format!("invalid date '{}': expected YYYY-MM-DD", raw))
    })
}
