//! Balance, transfer and settlement formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{MemberId, Money, Settlement};
use crate::services::{NetBalances, Transfer};

use super::Labels;

fn describe(amount: Money, labels: &Labels) -> String {
    if amount.is_positive() {
        format!("is owed {}", labels.money(amount))
    } else if amount.is_negative() {
        format!("owes {}", labels.money(amount.abs()))
    } else {
        "settled up".to_string()
    }
}

/// One line per member of the context
pub fn format_balances(balances: &NetBalances, labels: &Labels) -> String {
    if balances.is_empty() {
        return "No balances.\n".to_string();
    }

    let width = balances
        .iter()
        .map(|(m, _)| labels.member(m).len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    for (member, amount) in balances.iter() {
        output.push_str(&format!(
            "{:<width$}  {}\n",
            labels.member(member),
            describe(amount, labels),
            width = width
        ));
    }
    output
}

/// Balances with each friend from one member's point of view
pub fn format_friend_balances(balances: &[(MemberId, Money)], labels: &Labels) -> String {
    if balances.is_empty() {
        return "All settled up with friends.\n".to_string();
    }

    let mut output = String::new();
    for &(friend, amount) in balances {
        let line = if amount.is_positive() {
            format!("{} owes you {}", labels.member(friend), labels.money(amount))
        } else {
            format!("You owe {} {}", labels.member(friend), labels.money(amount.abs()))
        };
        output.push_str(&line);
        output.push('\n');
    }
    output
}

pub fn format_transfers(transfers: &[Transfer], labels: &Labels) -> String {
    if transfers.is_empty() {
        return "Nothing to settle.\n".to_string();
    }

    let mut output = String::new();
    for t in transfers {
        output.push_str(&format!(
            "{} pays {} {}\n",
            labels.member(t.from),
            labels.member(t.to),
            labels.money(t.amount)
        ));
    }
    output
}

#[derive(Tabled)]
struct SettlementRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Splits")]
    splits: usize,
}

pub fn format_settlement_list(settlements: &[Settlement], labels: &Labels) -> String {
    if settlements.is_empty() {
        return "No settlements recorded.".to_string();
    }

    let rows = settlements.iter().map(|s| SettlementRow {
        date: s.settled_at.format("%Y-%m-%d %H:%M").to_string(),
        from: labels.member(s.from),
        to: labels.member(s.to),
        amount: format!("{} {}", s.amount.format_with_symbol(""), s.currency),
        splits: s.consumed.len(),
    });

    Table::new(rows).with(Style::psql()).to_string()
}
