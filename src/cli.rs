use crate::exporter::DEFAULT_HEADER_ROW;
use crate::session::FormOverrides;
use crate::settings::DEFAULT_SETTINGS_FILE;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sheetcols")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Export selected spreadsheet columns to a tab-separated text file")]
#[command(
    long_about = "Sheetcols reads the header row of each requested worksheet, keeps the columns \
                  whose titles you list, and writes them to a tab-separated text file. The values \
                  you enter are remembered for the next run."
)]
#[command(after_help = "EXAMPLES:\n  \
    sheetcols --workbook book.xlsm --sheets \"Sheet1, Sheet2\" --headers ID,Amount --output out.txt\n  \
    sheetcols --all-rows\n  \
    sheetcols --interactive\n  \
    sheetcols --dry-run")]
pub struct Cli {
    /// Spreadsheet to read (xlsx, xlsm, xlsb, xls, ods)
    #[arg(short, long)]
    pub workbook: Option<String>,

    /// Worksheet names (comma-separated)
    #[arg(short, long)]
    pub sheets: Option<String>,

    /// Text file to write
    #[arg(short, long)]
    pub output: Option<String>,

    /// Column headers to export (comma-separated)
    #[arg(short = 'H', long)]
    pub headers: Option<String>,

    /// Only write the first non-empty value of each column
    #[arg(long, conflicts_with = "all_rows")]
    pub first_non_empty: bool,

    /// Write every row of the selected columns
    #[arg(long)]
    pub all_rows: bool,

    /// Row holding the column titles (1-based)
    #[arg(
        long,
        default_value_t = DEFAULT_HEADER_ROW,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub header_row: u32,

    /// Settings file remembering the last-used values
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Prompt for each value, showing the remembered one
    #[arg(short, long)]
    pub interactive: bool,

    /// Do not remember the values used in this run
    #[arg(long)]
    pub no_save: bool,

    /// Show the resolved export without running it
    #[arg(long)]
    pub dry_run: bool,

    /// Output format for messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn form_overrides(&self) -> FormOverrides {
        let mode = if self.first_non_empty {
            Some(true)
        } else if self.all_rows {
            Some(false)
        } else {
            None
        };

        FormOverrides::new()
            .with_workbook(self.workbook.clone())
            .with_sheets(self.sheets.clone())
            .with_output(self.output.clone())
            .with_headers(self.headers.clone())
            .with_first_non_empty_only(mode)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
