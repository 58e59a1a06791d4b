//! Export CLI commands

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::error::{SplitbookError, SplitbookResult};
use crate::export::{export_full_json, export_full_yaml, export_splits_csv};
use crate::storage::Storage;

#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Full ledger as JSON
    Json {
        /// Output file (stdout when omitted)
        output: Option<PathBuf>,
        /// Single-line output instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Full ledger as YAML
    Yaml {
        /// Output file (stdout when omitted)
        output: Option<PathBuf>,
    },
    /// One CSV row per split
    Csv {
        /// Output file (stdout when omitted)
        output: Option<PathBuf>,
    },
}

pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> SplitbookResult<()> {
    match cmd {
        ExportCommands::Json { output, compact } => {
            let mut writer = open_output(output.as_deref())?;
            let export = export_full_json(storage, &mut writer, !compact)?;
            finish(writer, output.as_deref(), || {
                format!(
                    "Exported {} expenses and {} settlements",
                    export.metadata.expense_count, export.metadata.settlement_count
                )
            })
        }
        ExportCommands::Yaml { output } => {
            let mut writer = open_output(output.as_deref())?;
            let export = export_full_yaml(storage, &mut writer)?;
            finish(writer, output.as_deref(), || {
                format!(
                    "Exported {} expenses and {} settlements",
                    export.metadata.expense_count, export.metadata.settlement_count
                )
            })
        }
        ExportCommands::Csv { output } => {
            let mut writer = open_output(output.as_deref())?;
            let rows = export_splits_csv(storage, &mut writer)?;
            finish(writer, output.as_deref(), || format!("Exported {} splits", rows))
        }
    }
}

fn open_output(path: Option<&Path>) -> SplitbookResult<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                SplitbookError::Export(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

/// Flush, and confirm on stdout only when the data went to a file
fn finish(
    mut writer: Box<dyn Write>,
    path: Option<&Path>,
    summary: impl FnOnce() -> String,
) -> SplitbookResult<()> {
    writer
        .flush()
        .map_err(|e| SplitbookError::Export(e.to_string()))?;
    drop(writer);

    if let Some(path) = path {
        println!("{} to: {}", summary(), path.display());
    }
    Ok(())
}
