//! Workspace folders: scratch and output directories used by a session.

use std::fs;
use std::path::Path;

use crate::config::Settings;
use crate::AnalyzerError;

/// Prepare the folders named in `settings` before the session starts.
///
/// The scratch folder is created, or emptied if it already exists. The output
/// folder is created if absent and otherwise left untouched.
///
/// # Errors
/// Returns error if a folder cannot be created or the scratch folder cannot be
/// listed.
pub fn prepare(settings: &Settings) -> Result<(), AnalyzerError> {
    if settings.tmp_folder.exists() {
        clear_folder(&settings.tmp_folder)?;
    } else {
        fs::create_dir_all(&settings.tmp_folder)?;
    }

    fs::create_dir_all(&settings.out_folder)?;

    tracing::info!(
        "Workspace ready: scratch={}, output={}",
        settings.tmp_folder.display(),
        settings.out_folder.display()
    );
    Ok(())
}

/// Remove every entry inside `folder`, keeping the folder itself.
///
/// Entries that cannot be removed are logged and skipped.
///
/// # Errors
/// Returns error if the folder cannot be read.
pub fn clear_folder(folder: &Path) -> Result<(), AnalyzerError> {
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        let result = if path.is_dir() && !path.is_symlink() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        if let Err(e) = result {
            tracing::warn!("Failed to delete {}: {}", path.display(), e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_in(root: &Path) -> Settings {
        Settings {
            csv_file: root.join("data.csv"),
            tmp_folder: root.join("tmp"),
            out_folder: root.join("output"),
        }
    }

    #[test]
    fn test_prepare_creates_missing_folders() {
        let root = tempfile::tempdir().expect("Should create dir");
        let settings = settings_in(root.path());

        prepare(&settings).expect("Should prepare");
        assert!(settings.tmp_folder.is_dir());
        assert!(settings.out_folder.is_dir());
    }

    #[test]
    fn test_prepare_clears_scratch_but_keeps_output() {
        let root = tempfile::tempdir().expect("Should create dir");
        let settings = settings_in(root.path());

        fs::create_dir_all(settings.tmp_folder.join("nested")).expect("Should create");
        fs::write(settings.tmp_folder.join("stale.txt"), "x").expect("Should write");
        fs::write(settings.tmp_folder.join("nested/inner.txt"), "y").expect("Should write");
        fs::create_dir_all(&settings.out_folder).expect("Should create");
        fs::write(settings.out_folder.join("report.json"), "{}").expect("Should write");

        prepare(&settings).expect("Should prepare");

        assert!(settings.tmp_folder.is_dir());
        assert_eq!(fs::read_dir(&settings.tmp_folder).unwrap().count(), 0);
        assert!(settings.out_folder.join("report.json").exists());
    }
}
