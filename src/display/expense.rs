//! Expense formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::Expense;

use super::{truncate, Labels};

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Paid by")]
    payer: String,
    #[tabled(rename = "Split")]
    method: &'static str,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "")]
    status: &'static str,
}

pub fn format_expense_list(expenses: &[Expense], labels: &Labels, date_format: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.".to_string();
    }

    let rows = expenses.iter().map(|e| ExpenseRow {
        id: e.id.to_string(),
        date: e.date.format(date_format).to_string(),
        description: truncate(&e.description, 28),
        payer: labels.member(e.created_by),
        method: e.split_method.label(),
        amount: labels.money(e.amount),
        status: if e.is_locked() { "locked" } else { "" },
    });

    Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::single(5)).with(Alignment::right()))
        .to_string()
}

/// Full expense view with one line per split and item
pub fn format_expense_details(
    expense: &Expense,
    labels: &Labels,
    scope: &str,
    date_format: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense: {}\n", expense.description));
    output.push_str(&format!("  ID:        {}\n", expense.id));
    output.push_str(&format!("  Date:      {}\n", expense.date.format(date_format)));
    output.push_str(&format!("  Amount:    {}\n", labels.money(expense.amount)));
    output.push_str(&format!("  Paid by:   {}\n", labels.member(expense.created_by)));
    output.push_str(&format!("  Shared in: {}\n", scope));
    output.push_str(&format!("  Category:  {}\n", expense.category));
    output.push_str(&format!("  Split:     {}\n", expense.split_method.label()));

    output.push_str("\n  Shares:\n");
    for split in &expense.splits {
        let percentage = split
            .percentage
            .map(|p| format!(" ({}%)", p))
            .unwrap_or_default();
        let status = if split.member_id == expense.created_by {
            "paid"
        } else if split.settled {
            "settled"
        } else {
            "owes"
        };
        output.push_str(&format!(
            "    {:<20} {:>12}{}  {}\n",
            labels.member(split.member_id),
            labels.money(split.amount),
            percentage,
            status
        ));
    }

    if !expense.items.is_empty() {
        output.push_str("\n  Items:\n");
        for item in &expense.items {
            let sharers: Vec<String> = item.shared_by.iter().map(|&m| labels.member(m)).collect();
            output.push_str(&format!(
                "    {:<20} {:>12}  {}\n",
                truncate(&item.name, 20),
                labels.money(item.amount),
                sharers.join(", ")
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, Member, Money, Split, SplitMethod};
    use chrono::NaiveDate;

    fn sample() -> (Expense, Labels) {
        let alice = Member::new("Alice");
        let bob = Member::new("Bob");
        let mut expense = Expense::new(
            None,
            "Brunch",
            "food",
            NaiveDate::from_ymd_opt(2025, 8, 3).unwrap(),
            Money::from_cents(5000),
            alice.id,
        );
        expense.replace_splits(
            SplitMethod::Itemized,
            vec![
                Split::paid_by_payer(alice.id, Money::from_cents(2000), None),
                Split::owed(bob.id, Money::from_cents(3000), None),
            ],
            vec![
                Item::new("Pancakes", Money::from_cents(2000), vec![alice.id]),
                Item::new("Omelette", Money::from_cents(3000), vec![bob.id]),
            ],
        );
        (expense, Labels::new(&[alice, bob], "$"))
    }

    #[test]
    fn test_expense_details() {
        let (expense, labels) = sample();
        let output = format_expense_details(&expense, &labels, "Bob", "%Y-%m-%d");

        assert!(output.contains("Expense: Brunch"));
        assert!(output.contains("Date:      2025-08-03"));
        assert!(output.contains("Paid by:   Alice"));
        assert!(output.contains("Split:     Itemized"));
        assert!(output.contains("$30.00  owes"));
        assert!(output.contains("Omelette"));
    }

    #[test]
    fn test_expense_list() {
        let (expense, labels) = sample();
        let output = format_expense_list(&[expense], &labels, "%d/%m/%Y");

        assert!(output.contains("03/08/2025"));
        assert!(output.contains("Brunch"));
        assert!(output.contains("$50.00"));
        assert_eq!(format_expense_list(&[], &labels, "%Y"), "No expenses found.");
    }
}
