//! Settings resolution.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. INI file (`pancreas-analyzer.cfg`, or the path in `PANCREAS_CONFIG`),
//!    section `[path]`
//! 3. Environment: `PANCREAS_PATH__CSV_FILE`, `PANCREAS_PATH__TMP_FOLDER`,
//!    `PANCREAS_PATH__OUT_FOLDER`

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::AnalyzerError;

pub const DEFAULT_CONFIG_FILE: &str = "./pancreas-analyzer.cfg";
pub const DEFAULT_CSV_FILE: &str = "./pancreas_data.csv";
pub const DEFAULT_TMP_FOLDER: &str = "tmp";
pub const DEFAULT_OUT_FOLDER: &str = "output";

#[derive(Debug, Deserialize)]
struct RawSettings {
    path: RawPathSettings,
}

#[derive(Debug, Deserialize)]
struct RawPathSettings {
    csv_file: String,
    tmp_folder: String,
    out_folder: String,
}

/// Immutable settings for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Historical patient CSV
    pub csv_file: PathBuf,
    /// Scratch folder, emptied at startup
    pub tmp_folder: PathBuf,
    /// Folder receiving exported reports
    pub out_folder: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            csv_file: PathBuf::from(DEFAULT_CSV_FILE),
            tmp_folder: PathBuf::from(DEFAULT_TMP_FOLDER),
            out_folder: PathBuf::from(DEFAULT_OUT_FOLDER),
        }
    }
}

impl Settings {
    /// Resolve settings from the config file named by `PANCREAS_CONFIG`
    /// (default `./pancreas-analyzer.cfg`) and the environment.
    ///
    /// # Errors
    /// Returns error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, AnalyzerError> {
        let config_path = std::env::var("PANCREAS_CONFIG")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(Path::new(config_path.trim()))
    }

    /// Resolve settings from a specific config file (optional) and the
    /// environment.
    ///
    /// Blank values fall back to the defaults. The CSV path is only taken if
    /// the file it names exists.
    ///
    /// # Errors
    /// Returns error if the config file exists but cannot be parsed.
    pub fn load_from(config_path: &Path) -> Result<Self, AnalyzerError> {
        let raw: RawSettings = Config::builder()
            .set_default("path.csv_file", "")?
            .set_default("path.tmp_folder", "")?
            .set_default("path.out_folder", "")?
            .add_source(File::new(&config_path.to_string_lossy(), FileFormat::Ini).required(false))
            .add_source(
                Environment::with_prefix("PANCREAS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        let settings = Self::from_raw(raw.path);
        tracing::debug!(?settings, "Resolved settings");
        Ok(settings)
    }

    fn from_raw(raw: RawPathSettings) -> Self {
        let defaults = Self::default();

        let csv_file = non_blank(&raw.csv_file)
            .map(PathBuf::from)
            .filter(|p| p.exists());
        if csv_file.is_none() && !raw.csv_file.trim().is_empty() {
            tracing::warn!(
                "Configured CSV file {:?} does not exist, using {}",
                raw.csv_file.trim(),
                DEFAULT_CSV_FILE
            );
        }

        Self {
            csv_file: csv_file.unwrap_or(defaults.csv_file),
            tmp_folder: non_blank(&raw.tmp_folder).map_or(defaults.tmp_folder, PathBuf::from),
            out_folder: non_blank(&raw.out_folder).map_or(defaults.out_folder, PathBuf::from),
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Mutex, MutexGuard};

    // Every loader call reads the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    const ENV_KEYS: [&str; 3] = [
        "PANCREAS_PATH__CSV_FILE",
        "PANCREAS_PATH__TMP_FOLDER",
        "PANCREAS_PATH__OUT_FOLDER",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let _guard = env_guard();
        let dir = tempfile::tempdir().expect("Should create dir");
        let settings = Settings::load_from(&dir.path().join("absent.cfg")).expect("Should load");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_ini_overrides() {
        let _guard = env_guard();
        let dir = tempfile::tempdir().expect("Should create dir");
        let csv = dir.path().join("patients.csv");
        fs::write(&csv, "id,GTV,PTV,EIV_5mm_t\n").expect("Should write");

        let cfg = dir.path().join("analyzer.cfg");
        fs::write(
            &cfg,
            format!(
                "[path]\ncsv_file = {}\ntmp_folder = scratch\nout_folder =   \n",
                csv.display()
            ),
        )
        .expect("Should write");

        let settings = Settings::load_from(&cfg).expect("Should load");
        assert_eq!(settings.csv_file, csv);
        assert_eq!(settings.tmp_folder, PathBuf::from("scratch"));
        assert_eq!(settings.out_folder, PathBuf::from(DEFAULT_OUT_FOLDER));
    }

    #[test]
    fn test_nonexistent_csv_keeps_default() {
        let _guard = env_guard();
        let dir = tempfile::tempdir().expect("Should create dir");
        let cfg = dir.path().join("analyzer.cfg");
        fs::write(&cfg, "[path]\ncsv_file = /definitely/not/here.csv\n").expect("Should write");

        let settings = Settings::load_from(&cfg).expect("Should load");
        assert_eq!(settings.csv_file, PathBuf::from(DEFAULT_CSV_FILE));
    }

    #[test]
    fn test_env_overrides() {
        let _guard = env_guard();
        let dir = tempfile::tempdir().expect("Should create dir");
        let ini_csv = dir.path().join("ini.csv");
        let env_csv = dir.path().join("env.csv");
        fs::write(&ini_csv, "id,GTV,PTV,EIV_5mm_t\n").expect("Should write");
        fs::write(&env_csv, "id,GTV,PTV,EIV_5mm_t\n").expect("Should write");

        let cfg = dir.path().join("analyzer.cfg");
        fs::write(
            &cfg,
            format!(
                "[path]\ncsv_file = {}\ntmp_folder = scratch\nout_folder = reports\n",
                ini_csv.display()
            ),
        )
        .expect("Should write");

        std::env::set_var("PANCREAS_PATH__CSV_FILE", &env_csv);
        std::env::set_var("PANCREAS_PATH__TMP_FOLDER", "envscratch");
        std::env::set_var("PANCREAS_PATH__OUT_FOLDER", "envout");
        let settings = Settings::load_from(&cfg);

        std::env::set_var("PANCREAS_PATH__CSV_FILE", dir.path().join("missing.csv"));
        let missing_csv = Settings::load_from(&cfg);
        clear_env();

        let settings = settings.expect("Should load");
        assert_eq!(settings.csv_file, env_csv);
        assert_eq!(settings.tmp_folder, PathBuf::from("envscratch"));
        assert_eq!(settings.out_folder, PathBuf::from("envout"));

        let missing_csv = missing_csv.expect("Should load");
        assert_eq!(missing_csv.csv_file, PathBuf::from(DEFAULT_CSV_FILE));
        assert_eq!(missing_csv.tmp_folder, PathBuf::from("envscratch"));
    }
}
