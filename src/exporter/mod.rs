pub mod column_exporter;
pub mod output_manager;
pub mod sheet_reader;

pub use column_exporter::{export, ColumnExporter, ExportRequest, DEFAULT_HEADER_ROW};
pub use output_manager::{ExportReport, OutputManager, SheetSummary};
pub use sheet_reader::{SelectedColumns, SheetHeaders};
