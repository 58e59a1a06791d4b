//! Group formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Group, Member};

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Members")]
    members: usize,
}

pub fn format_group_list(groups: &[Group]) -> String {
    if groups.is_empty() {
        return "No groups found.".to_string();
    }

    let rows = groups.iter().map(|g| GroupRow {
        name: g.name.clone(),
        id: g.id.to_string(),
        currency: g.currency.clone(),
        members: g.members.len(),
    });

    Table::new(rows).with(Style::psql()).to_string()
}

/// Group header followed by its members in joining order
pub fn format_group_details(group: &Group, members: &[Member]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Group: {}\n", group.name));
    output.push_str(&format!("  ID:        {}\n", group.id));
    output.push_str(&format!("  Currency:  {}\n", group.currency));
    output.push_str(&format!(
        "  Created:   {}\n",
        group.created_at.format("%Y-%m-%d")
    ));
    output.push_str(&format!("  Members:   {}\n", members.len()));

    for member in members {
        output.push_str(&format!("    - {}\n", member.name));
    }

    output
}
