//! XLSX spreadsheet reading.

use std::io::Cursor;

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use polars::frame::DataFrame;

use crate::{config::XlsxOptions, io::cell::{cells_to_column, Cell}};

/// Read one worksheet of an XLSX workbook. The first row holds the column names.
pub(crate) fn read_xlsx_bytes(bytes: &[u8], options: &XlsxOptions) -> Result<DataFrame> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .context("[io::xlsx] Failed to open workbook")?;

    let sheet = match &options.sheet {
        Some(sheet) => sheet.clone(),
        None => workbook.sheet_names().first().cloned()
            .ok_or_else(|| anyhow!("[io::xlsx] Workbook has no worksheets"))?,
    };
    let range = workbook.worksheet_range(&sheet)
        .with_context(|| format!("[io::xlsx] Failed to read worksheet {sheet:?}"))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let names = header_names(header);

    let mut columns: Vec<Vec<Cell>> = vec![Vec::with_capacity(range.height().saturating_sub(1)); names.len()];
    for row in rows {
        for (i, cells) in columns.iter_mut().enumerate() {
            cells.push(row.get(i).map_or(Cell::Null, data_to_cell));
        }
    }

    DataFrame::new(
        names.iter().zip(columns)
            .map(|(name, cells)| cells_to_column(name, cells))
            .collect(),
    ).with_context(|| format!("[io::xlsx] Failed to build DataFrame from worksheet {sheet:?}"))
}

/// Column names from the header row; blank headers get positional names, duplicates a suffix.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(header.len());
    for (i, cell) in header.iter().enumerate() {
        let base = match cell {
            Data::Empty => format!("column_{i}"),
            other => other.to_string().trim().to_string(),
        };
        let mut name = base.clone();
        let mut n = 1;
        while names.contains(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        names.push(name);
    }
    names
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Null,
        Data::Bool(b) => Cell::Bool(*b),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => float_to_cell(*f),
        Data::String(s) => Cell::Str(s.clone()),
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Str(s.clone()),
        Data::Error(e) => Cell::Str(format!("#{e:?}")),
    }
}

/// Workbooks store every number as a float; whole values that fit in i64 become integers
/// so all-integer columns infer as Int64 and mixed ones widen to Float64.
fn float_to_cell(f: f64) -> Cell {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Cell::Int(f as i64)
    } else {
        Cell::Float(f)
    }
}
