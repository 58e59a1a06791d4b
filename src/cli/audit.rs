//! Audit log CLI command

use clap::Args;

use crate::audit::EntityType;
use crate::error::SplitbookResult;
use crate::storage::Storage;

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Number of entries to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Only show one kind of record (member, group, expense, settlement)
    #[arg(short, long)]
    pub entity: Option<EntityType>,

    /// Include before/after values
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn handle_audit_command(storage: &Storage, args: AuditArgs) -> SplitbookResult<()> {
    let entries = storage.audit().read_recent(args.limit, args.entity)?;

    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    // Newest first
    for entry in entries.iter().rev() {
        println!("{}", entry.format_human_readable());
        if args.verbose {
            if let Some(before) = &entry.before {
                println!("  before: {}", before);
            }
            if let Some(after) = &entry.after {
                println!("  after:  {}", after);
            }
        }
    }

    Ok(())
}
