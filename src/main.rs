use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use splitbook::cli::{
    handle_audit_command, handle_balance_command, handle_expense_command, handle_export_command,
    handle_group_command, handle_member_command, handle_settle_command, AuditArgs, BalanceArgs,
    ExpenseCommands, ExportCommands, GroupCommands, MemberCommands, Session, SettleCommands,
};
use splitbook::config::{Settings, SplitbookPaths};
use splitbook::error::SplitbookResult;
use splitbook::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "splitbook",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based shared expense ledger",
    long_about = "Splitbook tracks expenses shared within groups and between friends, \
                  splits them equally, by percentage, by exact amounts or by item, and \
                  works out the fewest payments that settle everyone up."
)]
struct Cli {
    /// Member to act as (defaults to `member use`)
    #[arg(long = "as", global = true, env = "SPLITBOOK_MEMBER")]
    acting_as: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// Member management commands
    #[command(subcommand)]
    Member(MemberCommands),

    /// Group management commands
    #[command(subcommand)]
    Group(GroupCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Show who owes whom
    Balance(BalanceArgs),

    /// Suggest and record settlements
    #[command(subcommand)]
    Settle(SettleCommands),

    /// Export the ledger
    #[command(subcommand)]
    Export(ExportCommands),

    /// Show recent changes
    Audit(AuditArgs),
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let paths = SplitbookPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let Some(command) = cli.command else {
        println!("Splitbook - shared expenses, settled simply");
        println!();
        println!("Run 'splitbook --help' for usage information.");
        return Ok(());
    };

    let acting_as = cli.acting_as;
    match command {
        Commands::Init => run_init(&paths),
        Commands::Config => {
            print_config(&paths, &settings);
            Ok(())
        }
        Commands::Member(cmd) => {
            with_session(paths, &settings, acting_as, |s| handle_member_command(s, cmd))
        }
        Commands::Group(cmd) => {
            with_session(paths, &settings, acting_as, |s| handle_group_command(s, cmd))
        }
        Commands::Expense(cmd) => {
            with_session(paths, &settings, acting_as, |s| handle_expense_command(s, cmd))
        }
        Commands::Balance(args) => {
            with_session(paths, &settings, acting_as, |s| handle_balance_command(s, args))
        }
        Commands::Settle(cmd) => {
            with_session(paths, &settings, acting_as, |s| handle_settle_command(s, cmd))
        }
        Commands::Export(cmd) => with_session(paths, &settings, acting_as, |s| {
            handle_export_command(s.storage, cmd)
        }),
        Commands::Audit(args) => with_session(paths, &settings, acting_as, |s| {
            handle_audit_command(s.storage, args)
        }),
    }
}

/// Load storage and run one command against it
fn with_session<F>(
    paths: SplitbookPaths,
    settings: &Settings,
    acting_as: Option<String>,
    run: F,
) -> Result<()>
where
    F: FnOnce(&Session<'_>) -> SplitbookResult<()>,
{
    let storage = Storage::new(paths)?;
    storage.load_all()?;
    run(&Session::new(&storage, settings, acting_as))?;
    Ok(())
}

fn run_init(paths: &SplitbookPaths) -> Result<()> {
    println!("Initializing Splitbook at: {}", paths.base_dir().display());
    if initialize_storage(paths)? {
        println!("Initialization complete!");
        println!();
        println!("Next steps:");
        println!("  splitbook member add NAME");
        println!("  splitbook member use NAME");
        println!("  splitbook group create NAME");
    } else {
        println!("Already initialized.");
    }
    Ok(())
}

fn print_config(paths: &SplitbookPaths, settings: &Settings) {
    println!("Splitbook Configuration");
    println!("=======================");
    println!("Base directory:  {}", paths.base_dir().display());
    println!("Data directory:  {}", paths.data_dir().display());
    println!("Audit log:       {}", paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  Currency:         {}", settings.currency);
    println!("  Currency symbol:  {}", settings.currency_symbol);
    println!("  Date format:      {}", settings.date_format);
    println!("  Default category: {}", settings.default_category);
    println!(
        "  Acting member:    {}",
        settings.default_member.as_deref().unwrap_or("(none)")
    );
}
