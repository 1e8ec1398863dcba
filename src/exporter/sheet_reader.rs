use crate::error::{Result, SheetcolsError};
use calamine::{Data, Range};
use std::collections::HashSet;

/// Ordered `(column_index, header_text)` pairs of one sheet's header row.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetHeaders {
    columns: Vec<(u32, String)>,
}

impl SheetHeaders {
    /// Reads the 1-based `header_row` of `range`. Column indices are absolute,
    /// so column A is always index 0 even if the used range starts later.
    pub fn read(sheet_name: &str, range: &Range<Data>, header_row: u32) -> Result<Self> {
        let missing = || SheetcolsError::HeaderRowMissing {
            sheet: sheet_name.to_string(),
            row: header_row,
        };

        let row = header_row.checked_sub(1).ok_or_else(missing)?;
        let (last_row, last_col) = range.end().ok_or_else(missing)?;
        if row > last_row {
            return Err(missing());
        }

        let columns = (0..=last_col)
            .map(|col| {
                let text = range
                    .get_value((row, col))
                    .and_then(cell_text)
                    .unwrap_or_default();
                (col, text)
            })
            .collect();

        Ok(Self { columns })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(_, text)| text.as_str())
    }

    /// Columns whose header is one of `wanted`, in left-to-right order.
    pub fn select(&self, wanted: &HashSet<String>) -> SelectedColumns {
        let columns = self
            .columns
            .iter()
            .filter(|(_, text)| wanted.contains(text))
            .cloned()
            .collect();

        SelectedColumns { columns }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedColumns {
    columns: Vec<(u32, String)>,
}

impl SelectedColumns {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.columns.iter().map(|(col, _)| *col)
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|(_, text)| text.clone()).collect()
    }
}

/// Plain text of a cell, or `None` for an empty cell.
pub fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                match dt.as_duration() {
                    Some(duration) => format_duration(duration),
                    None => dt.as_f64().to_string(),
                }
            } else {
                match dt.as_datetime() {
                    Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
                    None => dt.as_f64().to_string(),
                }
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    };

    Some(text)
}

fn format_duration(duration: chrono::Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(start: (u32, u32), rows: &[&[Data]]) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new(start, (start.0 + height - 1, start.1 + width - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((start.0 + r as u32, start.1 + c as u32), cell.clone());
            }
        }
        range
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    fn wanted(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cell_text_conversions() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&text("abc")), Some("abc".to_string()));
        assert_eq!(cell_text(&Data::Int(42)), Some("42".to_string()));
        assert_eq!(cell_text(&Data::Float(10.0)), Some("10".to_string()));
        assert_eq!(cell_text(&Data::Float(2.5)), Some("2.5".to_string()));
        assert_eq!(cell_text(&Data::Bool(true)), Some("True".to_string()));
        assert_eq!(cell_text(&Data::Bool(false)), Some("False".to_string()));
        assert_eq!(
            cell_text(&Data::DateTimeIso("2024-03-01T08:30:00".to_string())),
            Some("2024-03-01T08:30:00".to_string())
        );
        assert_eq!(
            cell_text(&Data::Error(calamine::CellErrorType::Div0)),
            Some("#DIV/0!".to_string())
        );
    }

    #[test]
    fn test_serial_date_cells() {
        use calamine::{ExcelDateTime, ExcelDateTimeType};

        // 45352 is 2024-03-01 in the 1900 date system.
        let date = ExcelDateTime::new(45352.5, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            cell_text(&Data::DateTime(date)),
            Some("2024-03-01 12:00:00".to_string())
        );

        let morning = ExcelDateTime::new(45352.0 + 8.5 / 24.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            cell_text(&Data::DateTime(morning)),
            Some("2024-03-01 08:30:00".to_string())
        );

        let elapsed = ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false);
        assert_eq!(cell_text(&Data::DateTime(elapsed)), Some("36:00:00".to_string()));
    }

    #[test]
    fn test_empty_string_cell_is_not_null() {
        assert_eq!(cell_text(&text("")), Some(String::new()));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(chrono::Duration::seconds(3725)), "1:02:05");
        assert_eq!(format_duration(chrono::Duration::seconds(90000)), "25:00:00");
    }

    #[test]
    fn test_read_headers_from_second_row() {
        let range = grid(
            (0, 0),
            &[
                &[text("Report"), Data::Empty, Data::Empty],
                &[text("ID"), Data::Empty, text("Amount")],
            ],
        );

        let headers = SheetHeaders::read("Sheet1", &range, 2).unwrap();
        assert_eq!(headers.texts().collect::<Vec<_>>(), vec!["ID", "", "Amount"]);
    }

    #[test]
    fn test_header_columns_are_absolute() {
        // Used range starts at B2, so column A must still appear as blank.
        let range = grid((1, 1), &[&[text("Name"), text("Qty")]]);

        let headers = SheetHeaders::read("Sheet1", &range, 2).unwrap();
        assert_eq!(headers.texts().collect::<Vec<_>>(), vec!["", "Name", "Qty"]);

        let selected = headers.select(&wanted(&["Qty"]));
        assert_eq!(selected.indices().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_numeric_header_is_stringified() {
        let range = grid((1, 0), &[&[Data::Float(2024.0), text("Total")]]);
        let headers = SheetHeaders::read("Sheet1", &range, 2).unwrap();
        let selected = headers.select(&wanted(&["2024"]));
        assert_eq!(selected.headers(), vec!["2024"]);
    }

    #[test]
    fn test_missing_header_row() {
        let range = grid((0, 0), &[&[text("only one row")]]);
        let result = SheetHeaders::read("Data", &range, 2);
        assert!(matches!(
            result,
            Err(SheetcolsError::HeaderRowMissing { ref sheet, row: 2 }) if sheet == "Data"
        ));

        let empty: Range<Data> = Range::empty();
        assert!(SheetHeaders::read("Data", &empty, 2).is_err());
        assert!(SheetHeaders::read("Data", &range, 0).is_err());
    }

    #[test]
    fn test_select_preserves_sheet_order_and_duplicates() {
        let range = grid(
            (1, 0),
            &[&[text("Amount"), text("ID"), text("Name"), text("Amount")]],
        );
        let headers = SheetHeaders::read("Sheet1", &range, 2).unwrap();

        let selected = headers.select(&wanted(&["ID", "Amount", "Missing"]));
        assert_eq!(selected.indices().collect::<Vec<_>>(), vec![0, 1, 3]);
        assert_eq!(selected.headers(), vec!["Amount", "ID", "Amount"]);
    }

    #[test]
    fn test_select_nothing() {
        let range = grid((1, 0), &[&[text("ID")]]);
        let headers = SheetHeaders::read("Sheet1", &range, 2).unwrap();
        let selected = headers.select(&wanted(&["Other"]));
        assert!(selected.is_empty());
        assert!(selected.headers().is_empty());
    }
}
