use crate::error::{Result, SheetcolsError};
use crate::exporter::output_manager::{ExportReport, OutputManager, SheetSummary};
use crate::exporter::sheet_reader::{cell_text, SelectedColumns, SheetHeaders};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

pub const DEFAULT_HEADER_ROW: u32 = 2;

/// Everything one export needs. Built fresh for every run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub workbook_path: PathBuf,
    pub sheet_names: Vec<String>,
    pub output_path: PathBuf,
    pub selected_headers: HashSet<String>,
    /// 1-based row holding the column titles.
    pub header_row: u32,
    pub first_non_empty_only: bool,
}

impl ExportRequest {
    pub fn new<W, O, H>(
        workbook_path: W,
        sheet_names: Vec<String>,
        output_path: O,
        headers: H,
    ) -> Self
    where
        W: Into<PathBuf>,
        O: Into<PathBuf>,
        H: IntoIterator<Item = String>,
    {
        Self {
            workbook_path: workbook_path.into(),
            sheet_names,
            output_path: output_path.into(),
            selected_headers: headers.into_iter().collect(),
            header_row: DEFAULT_HEADER_ROW,
            first_non_empty_only: true,
        }
    }

    pub fn with_header_row(mut self, header_row: u32) -> Self {
        self.header_row = header_row;
        self
    }

    pub fn with_first_non_empty_only(mut self, first_non_empty_only: bool) -> Self {
        self.first_non_empty_only = first_non_empty_only;
        self
    }
}

pub struct ColumnExporter<'a> {
    request: &'a ExportRequest,
}

impl<'a> ColumnExporter<'a> {
    pub fn new(request: &'a ExportRequest) -> Self {
        Self { request }
    }

    /// Runs the export. Nothing is written to the output path unless every
    /// sheet was exported successfully.
    pub fn export(&self, progress_callback: Option<&dyn Fn(usize, &str)>) -> Result<ExportReport> {
        let start_time = Instant::now();
        let request = self.request;

        if !request.workbook_path.is_file() {
            return Err(SheetcolsError::WorkbookNotFound {
                path: request.workbook_path.clone(),
            });
        }

        let mut workbook = open_workbook_auto(&request.workbook_path)?;

        if request.sheet_names.is_empty() {
            return Err(SheetcolsError::SheetNotFound {
                name: String::new(),
            });
        }

        let available = workbook.sheet_names();
        if let Some(name) = request
            .sheet_names
            .iter()
            .find(|name| !available.contains(*name))
        {
            return Err(SheetcolsError::SheetNotFound { name: name.clone() });
        }

        let mut output = OutputManager::create(&request.output_path)?;
        let mut sheets = Vec::with_capacity(request.sheet_names.len());

        for (index, sheet_name) in request.sheet_names.iter().enumerate() {
            if let Some(callback) = progress_callback {
                callback(index, sheet_name);
            }

            let range = workbook.worksheet_range(sheet_name)?;
            let summary = write_sheet_section(output.writer(), sheet_name, &range, request)?;

            tracing::debug!(
                sheet = %sheet_name,
                columns = summary.headers.len(),
                lines = summary.lines_written,
                "sheet exported"
            );
            sheets.push(summary);
        }

        output.commit()?;

        Ok(ExportReport {
            workbook: request.workbook_path.clone(),
            output: request.output_path.clone(),
            first_non_empty_only: request.first_non_empty_only,
            sheets,
            duration: start_time.elapsed(),
        })
    }
}

/// Convenience wrapper around [`ColumnExporter`] without progress reporting.
pub fn export(request: &ExportRequest) -> Result<ExportReport> {
    ColumnExporter::new(request).export(None)
}

/// Writes one sheet block: the sheet name, the selected headers, then either
/// a single line of first non-empty values or one line per body row.
pub fn write_sheet_section<W: Write>(
    out: &mut W,
    sheet_name: &str,
    range: &Range<Data>,
    request: &ExportRequest,
) -> Result<SheetSummary> {
    let headers = SheetHeaders::read(sheet_name, range, request.header_row)?;
    let selected = headers.select(&request.selected_headers);

    writeln!(out, "{}", sheet_name)?;
    writeln!(out, "{}", selected.headers().join("\t"))?;

    // `header_row` is 1-based, so it is also the 0-based index of the first body row.
    let first_body_row = request.header_row;
    let last_row = range.end().map(|(row, _)| row).unwrap_or(0);
    let body_rows = first_body_row..=last_row;
    let rows_scanned = body_rows.clone().count();

    let lines_written = if request.first_non_empty_only {
        let values = first_non_empty_values(range, &selected, body_rows);
        writeln!(out, "{}", values.join("\t"))?;
        1
    } else {
        let mut lines = 0;
        for row in body_rows {
            let values: Vec<String> = selected
                .indices()
                .map(|col| read_cell(range, row, col).unwrap_or_default())
                .collect();
            writeln!(out, "{}", values.join("\t"))?;
            lines += 1;
        }
        lines
    };

    let present: HashSet<&str> = headers.texts().collect();
    let mut missing_headers: Vec<String> = request
        .selected_headers
        .iter()
        .filter(|h| !present.contains(h.as_str()))
        .cloned()
        .collect();
    missing_headers.sort();

    Ok(SheetSummary {
        name: sheet_name.to_string(),
        headers: selected.headers(),
        missing_headers,
        rows_scanned,
        lines_written,
    })
}

fn first_non_empty_values(
    range: &Range<Data>,
    selected: &SelectedColumns,
    body_rows: std::ops::RangeInclusive<u32>,
) -> Vec<String> {
    let mut found: Vec<Option<String>> = vec![None; selected.len()];

    for row in body_rows {
        if found.iter().all(Option::is_some) {
            break;
        }

        for (slot, col) in found.iter_mut().zip(selected.indices()) {
            if slot.is_none() {
                *slot = read_cell(range, row, col);
            }
        }
    }

    found.into_iter().map(Option::unwrap_or_default).collect()
}

fn read_cell(range: &Range<Data>, row: u32, col: u32) -> Option<String> {
    range.get_value((row, col)).and_then(cell_text)
}
