use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetcolsError {
    #[error("Workbook not found: {}", path.display())]
    WorkbookNotFound { path: PathBuf },

    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Header row {row} is missing in sheet {sheet}")]
    HeaderRowMissing { sheet: String, row: u32 },

    #[error("Failed to read workbook: {message}")]
    Workbook {
        message: String,
        #[source]
        source: calamine::Error,
    },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {message}")]
    Settings { message: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },
}

/// The three failure categories an export attempt can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    WorkbookNotFound,
    SheetNotFound,
    Unexpected,
}

impl SheetcolsError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SheetcolsError::WorkbookNotFound { .. } => FailureKind::WorkbookNotFound,
            SheetcolsError::SheetNotFound { .. } => FailureKind::SheetNotFound,
            _ => FailureKind::Unexpected,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for SheetcolsError {
    fn user_message(&self) -> String {
        match self {
            SheetcolsError::WorkbookNotFound { path } if path.as_os_str().is_empty() => {
                "No workbook given".to_string()
            }
            SheetcolsError::WorkbookNotFound { path } => {
                format!("Cannot find workbook: {}", path.display())
            }
            SheetcolsError::SheetNotFound { name } if name.is_empty() => {
                "No worksheet given".to_string()
            }
            SheetcolsError::SheetNotFound { name } => {
                format!("Cannot find worksheet: {}", name)
            }
            SheetcolsError::HeaderRowMissing { sheet, row } => {
                format!("Sheet '{}' has no header row {}", sheet, row)
            }
            SheetcolsError::Workbook { message, .. } => {
                format!("An error occurred while reading the workbook: {}", message)
            }
            SheetcolsError::Io(e) => format!("An error occurred: {}", e),
            SheetcolsError::Settings { message } => {
                format!("Settings error: {}", message)
            }
            SheetcolsError::InvalidPath { path } => format!("Invalid file path: {}", path),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            SheetcolsError::WorkbookNotFound { .. } => Some(
                "Pass the spreadsheet with --workbook (or use --interactive); relative paths are resolved from the current directory.".to_string()
            ),
            SheetcolsError::SheetNotFound { .. } => Some(
                "Sheet names are case-sensitive. Separate several sheets with commas, e.g. --sheets \"Sheet1, Sheet2\".".to_string()
            ),
            SheetcolsError::HeaderRowMissing { .. } => Some(
                "Point --header-row at the row holding the column titles (row numbers start at 1).".to_string()
            ),
            SheetcolsError::Workbook { .. } => Some(
                "Make sure the file is an xlsx, xlsm, xlsb, xls or ods workbook and is not damaged.".to_string()
            ),
            SheetcolsError::Settings { .. } => Some(
                "Fix or delete the settings file; it is rewritten after the next export.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<calamine::Error> for SheetcolsError {
    fn from(error: calamine::Error) -> Self {
        SheetcolsError::Workbook {
            message: error.to_string(),
            source: error,
        }
    }
}

impl From<toml::de::Error> for SheetcolsError {
    fn from(error: toml::de::Error) -> Self {
        SheetcolsError::Settings {
            message: error.to_string(),
        }
    }
}

impl From<toml::ser::Error> for SheetcolsError {
    fn from(error: toml::ser::Error) -> Self {
        SheetcolsError::Settings {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SheetcolsError>;
