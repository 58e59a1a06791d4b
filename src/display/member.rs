//! Member list formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Member, MemberId};

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Email")]
    email: String,
}

/// Table of members, marking the acting member with `*`
pub fn format_member_list(members: &[Member], acting: Option<MemberId>) -> String {
    if members.is_empty() {
        return "No members found.".to_string();
    }

    let rows = members.iter().map(|m| MemberRow {
        name: if Some(m.id) == acting {
            format!("{} *", m.name)
        } else {
            m.name.clone()
        },
        id: m.id.to_string(),
        email: m.email.clone().unwrap_or_default(),
    });

    Table::new(rows).with(Style::psql()).to_string()
}
