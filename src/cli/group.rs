//! Group CLI commands

use clap::Subcommand;

use crate::display::{format_group_details, format_group_list};
use crate::error::SplitbookResult;
use crate::services::{GroupService, MemberService};

use super::Session;

#[derive(Subcommand)]
pub enum GroupCommands {
    /// Create a group with yourself as the first member
    Create {
        /// Group name
        name: String,
        /// ISO currency code (defaults to the configured currency)
        #[arg(short, long)]
        currency: Option<String>,
    },
    /// Add a member to a group you belong to
    AddMember {
        /// Group name or ID
        group: String,
        /// Member name or ID
        member: String,
    },
    /// List groups
    List {
        /// Include groups you are not a member of
        #[arg(short, long)]
        all: bool,
    },
    /// Show a group and its members
    Show {
        /// Group name or ID
        group: String,
    },
}

pub fn handle_group_command(session: &Session<'_>, cmd: GroupCommands) -> SplitbookResult<()> {
    let service = GroupService::new(session.storage);

    match cmd {
        GroupCommands::Create { name, currency } => {
            let actor = session.actor()?;
            let currency = currency.unwrap_or_else(|| session.settings.currency.clone());
            let group = service.create(&name, &currency, actor.id)?;

            println!("Created group: {}", group.name);
            println!("  Currency: {}", group.currency);
            println!("  ID: {}", group.id);
        }

        GroupCommands::AddMember { group, member } => {
            let actor = session.actor()?;
            let group = service.resolve(&group)?;
            let member = MemberService::new(session.storage).resolve(&member)?;

            let group = service.add_member(group.id, actor.id, member.id)?;
            println!(
                "Added {} to {} ({} members)",
                member.name,
                group.name,
                group.members.len()
            );
        }

        GroupCommands::List { all } => {
            let groups = if all {
                service.list()?
            } else {
                service.list_for(session.actor()?.id)?
            };
            println!("{}", format_group_list(&groups));
        }

        GroupCommands::Show { group } => {
            let group = service.resolve(&group)?;
            let members = service.members(&group)?;
            print!("{}", format_group_details(&group, &members));
        }
    }

    Ok(())
}
