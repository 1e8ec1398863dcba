pub mod cli;
pub mod error;
pub mod exporter;
pub mod session;
pub mod settings;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use error::{FailureKind, Result, SheetcolsError, UserFriendlyError};
pub use exporter::{
    export, ColumnExporter, ExportReport, ExportRequest, SheetHeaders, SheetSummary,
    DEFAULT_HEADER_ROW,
};
pub use session::{split_list, FormOverrides, SessionForm};
pub use settings::{Settings, DEFAULT_SETTINGS_FILE};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// Main library interface: one export session with its settings file and console.
pub struct Sheetcols {
    settings_path: PathBuf,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl Sheetcols {
    pub fn new<P: Into<PathBuf>>(
        settings_path: P,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
    ) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(output_formatter.shows_progress());

        Self {
            settings_path: settings_path.into(),
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli: &Cli) -> Self {
        let output_mode = match cli.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(cli.settings.clone(), output_mode, cli.verbosity_level(), cli.quiet)
    }

    /// Remembered form values. An unreadable settings file is reported and
    /// replaced by the defaults.
    pub fn load_form(&self) -> SessionForm {
        match Settings::load(&self.settings_path) {
            Ok(settings) => SessionForm::from_settings(&settings),
            Err(e) => {
                self.output_formatter.warning(&e.user_message());
                SessionForm::default()
            }
        }
    }

    pub fn save_form(&self, form: &SessionForm) -> Result<()> {
        form.to_settings().save(&self.settings_path)
    }

    /// Exports with a progress bar when the console allows it.
    pub fn export(&self, request: &ExportRequest) -> Result<ExportReport> {
        self.output_formatter.start_operation(&format!(
            "Exporting {} sheet(s) from {}",
            request.sheet_names.len(),
            request.workbook_path.display()
        ));

        let sheet_progress = self
            .progress_manager
            .create_sheet_progress(request.sheet_names.len() as u64);
        let progress_callback = {
            let pb = sheet_progress.clone();
            move |index: usize, sheet_name: &str| {
                ui::progress::update_sheet_progress(&pb, index, sheet_name);
            }
        };

        let result = ColumnExporter::new(request).export(Some(&progress_callback));

        match &result {
            Ok(report) => ui::progress::finish_progress_with_summary(
                &sheet_progress,
                "Export finished",
                report.duration,
            ),
            Err(_) => sheet_progress.finish_and_clear(),
        }

        result
    }

    /// Builds the request from `form`, exports, reports the outcome and
    /// remembers the form values (unless `save` is false), whatever the outcome.
    pub fn run_export(
        &self,
        form: &SessionForm,
        header_row: u32,
        save: bool,
    ) -> Option<ExportReport> {
        let request = form.to_request(header_row);
        tracing::info!(
            workbook = %request.workbook_path.display(),
            sheets = request.sheet_names.len(),
            "starting export"
        );

        let report = match self.export(&request) {
            Ok(report) => {
                self.output_formatter.print_export_report(&report);
                Some(report)
            }
            Err(e) => {
                tracing::warn!(kind = ?e.kind(), error = %e, "export failed");
                self.handle_error(&e);
                None
            }
        };

        if save {
            match self.save_form(form) {
                Ok(()) => self.output_formatter.debug(&format!(
                    "Settings saved to {}",
                    self.settings_path.display()
                )),
                Err(e) => self.handle_error(&e),
            }
        }

        report
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &SheetcolsError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}
