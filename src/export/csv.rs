//! CSV export
//!
//! One row per split, so a spreadsheet can pivot on member or expense.

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use crate::error::{SplitbookError, SplitbookResult};
use crate::models::MemberId;
use crate::storage::Storage;

#[derive(Serialize)]
struct SplitRow<'a> {
    expense_id: String,
    date: String,
    group: &'a str,
    description: &'a str,
    category: &'a str,
    method: &'static str,
    payer: &'a str,
    member: &'a str,
    amount: String,
    percentage: Option<f64>,
    settled: bool,
}

/// Write every split of every expense; returns the number of rows written
pub fn export_splits_csv<W: Write>(storage: &Storage, writer: W) -> SplitbookResult<usize> {
    let members: HashMap<_, _> = storage
        .members
        .get_all()?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();
    let groups: HashMap<_, _> = storage
        .groups
        .get_all()?
        .into_iter()
        .map(|g| (g.id, g.name))
        .collect();
    let expenses = storage.expenses.get_all()?;

    let name_of = |id: MemberId| members.get(&id).map(String::as_str).unwrap_or("Unknown");

    let mut csv = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for expense in &expenses {
        let group = expense
            .group_id
            .and_then(|id| groups.get(&id))
            .map(String::as_str)
            .unwrap_or("");

        for split in &expense.splits {
            csv.serialize(SplitRow {
                expense_id: expense.id.as_uuid().to_string(),
                date: expense.date.to_string(),
                group,
                description: &expense.description,
                category: &expense.category,
                method: expense.split_method.as_str(),
                payer: name_of(expense.created_by),
                member: name_of(split.member_id),
                amount: format!("{:.2}", split.amount.to_decimal()),
                percentage: split.percentage,
                settled: split.settled,
            })
            .map_err(|e| SplitbookError::Export(e.to_string()))?;
            rows += 1;
        }
    }

    csv.flush()
        .map_err(|e| SplitbookError::Export(e.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SplitbookPaths;
    use crate::models::{Expense, Member, Money, Split, SplitMethod};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_one_row_per_split() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(SplitbookPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage.load_all().unwrap();

        let alice = Member::new("Alice");
        let bob = Member::new("Bob");
        let mut expense = Expense::new(
            None,
            "Taxi, airport",
            "travel",
            NaiveDate::from_ymd_opt(2025, 6, 9).unwrap(),
            Money::from_cents(4000),
            alice.id,
        );
        expense.replace_splits(
            SplitMethod::Percentage,
            vec![
                Split::paid_by_payer(alice.id, Money::from_cents(1000), Some(25.0)),
                Split::owed(bob.id, Money::from_cents(3000), Some(75.0)),
            ],
            Vec::new(),
        );
        storage.members.upsert(alice).unwrap();
        storage.members.upsert(bob).unwrap();
        storage.expenses.upsert(expense).unwrap();

        let mut output = Vec::new();
        let rows = export_splits_csv(&storage, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(rows, 2);
        assert_eq!(
            lines[0],
            "expense_id,date,group,description,category,method,payer,member,amount,percentage,settled"
        );
        assert!(lines[1].contains("\"Taxi, airport\""));
        assert!(lines[1].ends_with("percentage,Alice,Alice,10.00,25.0,true"));
        assert!(lines[2].ends_with("percentage,Alice,Bob,30.00,75.0,false"));
    }
}
