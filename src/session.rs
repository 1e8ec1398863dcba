use crate::error::Result;
use crate::exporter::ExportRequest;
use crate::settings::Settings;
use std::io::{BufRead, Write};

/// Prompt answer that empties a remembered field.
const CLEAR_ANSWER: &str = "-";

/// The five values the user fills in, kept exactly as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionForm {
    pub workbook: String,
    pub sheets: String,
    pub output: String,
    pub headers: String,
    pub first_non_empty_only: bool,
}

impl Default for SessionForm {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl SessionForm {
    pub fn from_settings(settings: &Settings) -> Self {
        let paths = &settings.paths;
        Self {
            workbook: paths.excel_file.clone(),
            sheets: paths.sheet_names.clone(),
            output: paths.output_file.clone(),
            headers: paths.selected_headers.clone(),
            first_non_empty_only: paths.write_first_non_empty_only,
        }
    }

    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::new();
        settings.paths.excel_file = self.workbook.clone();
        settings.paths.sheet_names = self.sheets.clone();
        settings.paths.output_file = self.output.clone();
        settings.paths.selected_headers = self.headers.clone();
        settings.paths.write_first_non_empty_only = self.first_non_empty_only;
        settings
    }

    /// Given values replace the remembered ones outright.
    pub fn apply_overrides(&mut self, overrides: &FormOverrides) {
        if let Some(ref workbook) = overrides.workbook {
            self.workbook = workbook.clone();
        }
        if let Some(ref sheets) = overrides.sheets {
            self.sheets = sheets.clone();
        }
        if let Some(ref output) = overrides.output {
            self.output = output.clone();
        }
        if let Some(ref headers) = overrides.headers {
            self.headers = headers.clone();
        }
        if let Some(first_non_empty_only) = overrides.first_non_empty_only {
            self.first_non_empty_only = first_non_empty_only;
        }
    }

    pub fn to_request(&self, header_row: u32) -> ExportRequest {
        ExportRequest::new(
            self.workbook.trim(),
            split_list(&self.sheets),
            self.output.trim(),
            split_list(&self.headers),
        )
        .with_header_row(header_row)
        .with_first_non_empty_only(self.first_non_empty_only)
    }

    /// Asks for each field in turn. An empty answer keeps the current value
    /// and `-` clears it.
    pub fn prompt<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "Press Enter to keep the value in brackets, or type {} to clear it.",
            CLEAR_ANSWER
        )?;

        self.workbook = ask(input, out, "Workbook path", &self.workbook)?;
        self.sheets = ask(input, out, "Sheet names (comma-separated)", &self.sheets)?;
        self.output = ask(input, out, "Output file path", &self.output)?;
        self.headers = ask(input, out, "Column headers (comma-separated)", &self.headers)?;

        loop {
            let current = if self.first_non_empty_only { "y" } else { "n" };
            let label = "Only write the first non-empty value per column (y/n)";
            let answer = ask(input, out, label, current)?;
            match parse_yes_no(&answer) {
                Some(value) => {
                    self.first_non_empty_only = value;
                    break;
                }
                None => writeln!(out, "Please answer y or n.")?,
            }
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FormOverrides {
    pub workbook: Option<String>,
    pub sheets: Option<String>,
    pub output: Option<String>,
    pub headers: Option<String>,
    pub first_non_empty_only: Option<bool>,
}

impl FormOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workbook(mut self, workbook: Option<String>) -> Self {
        self.workbook = workbook;
        self
    }

    pub fn with_sheets(mut self, sheets: Option<String>) -> Self {
        self.sheets = sheets;
        self
    }

    pub fn with_output(mut self, output: Option<String>) -> Self {
        self.output = output;
        self
    }

    pub fn with_headers(mut self, headers: Option<String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_first_non_empty_only(mut self, first_non_empty_only: Option<bool>) -> Self {
        self.first_non_empty_only = first_non_empty_only;
        self
    }
}

/// Splits a comma-separated field, trimming each piece and dropping empty ones.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    current: &str,
) -> Result<String> {
    if current.is_empty() {
        write!(out, "{}: ", label)?;
    } else {
        write!(out, "{} [{}]: ", label, current)?;
    }
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let answer = line.trim_end_matches(['\r', '\n']);
    if answer.trim().is_empty() {
        Ok(current.to_string())
    } else if answer.trim() == CLEAR_ANSWER {
        Ok(String::new())
    } else {
        Ok(answer.to_string())
    }
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}
