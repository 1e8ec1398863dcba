use crate::error::{Result, SheetcolsError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the remembered settings, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "sheetcols.toml";

/// Last-used form values, stored as a single `[Paths]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(rename = "Paths", default)]
    pub paths: PathsSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsSection {
    #[serde(rename = "ExcelFile")]
    pub excel_file: String,
    #[serde(rename = "SheetNames")]
    pub sheet_names: String,
    #[serde(rename = "OutputFile")]
    pub output_file: String,
    #[serde(rename = "SelectedHeaders")]
    pub selected_headers: String,
    #[serde(rename = "WriteFirstNonEmptyOnly")]
    pub write_first_non_empty_only: bool,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            excel_file: String::new(),
            sheet_names: String::new(),
            output_file: String::new(),
            selected_headers: String::new(),
            write_first_non_empty_only: true,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the settings file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| SheetcolsError::Settings {
            message: format!("Failed to read settings file {}: {}", path.display(), e),
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| SheetcolsError::Settings {
            message: format!("Failed to parse settings file {}: {}", path.display(), e),
        })?;

        Ok(settings)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;

        std::fs::write(path, content).map_err(|e| SheetcolsError::Settings {
            message: format!("Failed to write settings file {}: {}", path.display(), e),
        })?;

        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.paths.excel_file.is_empty());
        assert!(settings.paths.sheet_names.is_empty());
        assert!(settings.paths.write_first_non_empty_only);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load(temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");

        let mut settings = Settings::new();
        settings.paths.excel_file = "C:\\data\\book.xlsm".to_string();
        settings.paths.sheet_names = "Sheet1, Sheet2".to_string();
        settings.paths.output_file = "out.txt".to_string();
        settings.paths.selected_headers = "ID,Amount".to_string();
        settings.paths.write_first_non_empty_only = false;

        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[Paths]"));
        assert!(content.contains("WriteFirstNonEmptyOnly = false"));
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[Paths]\nExcelFile = \"book.xlsx\"").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.paths.excel_file, "book.xlsx");
        assert!(settings.paths.output_file.is_empty());
        assert!(settings.paths.write_first_non_empty_only);
    }

    #[test]
    fn test_missing_section_takes_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# nothing remembered yet").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[Paths\nExcelFile = ").unwrap();

        let result = Settings::load(file.path());
        assert!(matches!(result, Err(SheetcolsError::Settings { .. })));
    }
}
