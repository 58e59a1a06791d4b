//! YAML export
//!
//! Same document as the JSON export, prefixed with a comment header so the
//! file explains itself when opened in an editor.

use std::io::Write;

use crate::error::{SplitbookError, SplitbookResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

fn export_error(e: impl std::fmt::Display) -> SplitbookError {
    SplitbookError::Export(e.to_string())
}

pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> SplitbookResult<FullExport> {
    let export = FullExport::from_storage(storage)?;
    export.validate().map_err(SplitbookError::Export)?;

    writeln!(writer, "# Splitbook ledger export").map_err(export_error)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_error)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_error)?;
    writeln!(
        writer,
        "# Amounts are stored in cents; 1250 means 12.50 in the group currency."
    )
    .map_err(export_error)?;
    writeln!(writer).map_err(export_error)?;

    serde_yaml::to_writer(&mut *writer, &export).map_err(export_error)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SplitbookPaths;
    use crate::models::{Group, Member};
    use tempfile::TempDir;

    #[test]
    fn test_yaml_export() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(SplitbookPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage.load_all().unwrap();

        let alice = Member::new("Alice");
        let mut group = Group::new("Road Trip", "EUR");
        group.add_member(alice.id);
        storage.members.upsert(alice).unwrap();
        storage.groups.upsert(group).unwrap();

        let mut output = Vec::new();
        export_full_yaml(&storage, &mut output).unwrap();
        let yaml = String::from_utf8(output).unwrap();

        assert!(yaml.starts_with("# Splitbook ledger export"));
        assert!(yaml.contains("Road Trip"));
        assert!(yaml.contains("EUR"));

        // Comment lines are ignored by the parser
        let parsed: FullExport = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.members[0].name, "Alice");
        assert_eq!(parsed.metadata.group_count, 1);
    }
}
