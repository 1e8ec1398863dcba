#![allow(dead_code)]

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::Path;

/// A cell in a generated test workbook.
#[derive(Debug, Clone, Copy)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    /// Year, month, day, hour, minute; stored as a real Excel date cell.
    Date(u16, u8, u8, u16, u8),
    Empty,
}

pub use Cell::{Date, Empty, Number, Text};

/// Sheet name plus its rows, starting at row 1.
pub type SheetFixture<'a> = (&'a str, Vec<Vec<Cell<'a>>>);

pub fn write_workbook(path: &Path, sheets: &[SheetFixture]) {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();

        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Text(s) => {
                        worksheet.write_string(r as u32, c as u16, *s).unwrap();
                    }
                    Number(n) => {
                        worksheet.write_number(r as u32, c as u16, *n).unwrap();
                    }
                    Date(year, month, day, hour, minute) => {
                        let datetime = ExcelDateTime::from_ymd(*year, *month, *day)
                            .unwrap()
                            .and_hms(*hour, *minute, 0)
                            .unwrap();
                        worksheet
                            .write_datetime_with_format(r as u32, c as u16, &datetime, &date_format)
                            .unwrap();
                    }
                    Empty => {}
                }
            }
        }
    }

    workbook.save(path).unwrap();
}

/// The `Sheet1` layout used throughout: a title row, then headers on row 2.
pub fn sample_sheet() -> SheetFixture<'static> {
    (
        "Sheet1",
        vec![
            vec![Text("Monthly report")],
            vec![Text("ID"), Text("Name"), Text("Amount")],
            vec![Number(1.0), Text("A"), Number(10.0)],
            vec![Number(2.0), Text("B"), Empty],
            vec![Number(3.0), Text("C"), Number(30.0)],
        ],
    )
}
