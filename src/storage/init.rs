//! First-run setup

use crate::config::{Settings, SplitbookPaths};
use crate::error::SplitbookResult;

use super::Storage;

/// Create the directory layout, the settings file and empty data files
///
/// Existing files are left untouched, so running this twice is harmless.
/// Returns `true` when settings were created by this call.
pub fn initialize_storage(paths: &SplitbookPaths) -> SplitbookResult<bool> {
    paths.ensure_directories()?;

    let fresh = !paths.is_initialized();
    if fresh {
        Settings::default().save(paths)?;
    }

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;
    storage.save_all()?;

    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(initialize_storage(&paths).unwrap());
        assert!(paths.is_initialized());
        assert!(paths.members_file().exists());
        assert!(paths.settlements_file().exists());

        assert!(!initialize_storage(&paths).unwrap());
    }
}
