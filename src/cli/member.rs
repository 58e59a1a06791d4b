//! Member CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_member_list;
use crate::error::SplitbookResult;
use crate::services::MemberService;

use super::Session;

#[derive(Subcommand)]
pub enum MemberCommands {
    /// Register a new member
    Add {
        /// Display name (must be unique)
        name: String,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
    },
    /// List all members
    List,
    /// Act as this member by default
    Use {
        /// Member name or ID
        member: String,
    },
}

/// Handle a member command; `use` rewrites the settings file
pub fn handle_member_command(session: &Session<'_>, cmd: MemberCommands) -> SplitbookResult<()> {
    let service = MemberService::new(session.storage);

    match cmd {
        MemberCommands::Add { name, email } => {
            let member = service.create(&name, email.as_deref())?;
            println!("Added member: {}", member.name);
            if let Some(email) = &member.email {
                println!("  Email: {}", email);
            }
            println!("  ID: {}", member.id);
        }

        MemberCommands::List => {
            let members = service.list()?;
            let acting = session.actor().ok().map(|m| m.id);
            println!("{}", format_member_list(&members, acting));
        }

        MemberCommands::Use { member } => {
            let member = service.resolve(&member)?;
            let paths = session.storage.paths();
            let mut settings = Settings::load_or_create(paths)?;
            settings.default_member = Some(member.id.as_uuid().to_string());
            settings.save(paths)?;
            println!("Now acting as {}", member.name);
        }
    }

    Ok(())
}
