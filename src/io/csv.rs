//! CSV reading and writing.

use std::io::Cursor;

use anyhow::{bail, Context, Result};
use geozero::ToWkt;
use polars::{frame::DataFrame, io::{SerReader, SerWriter}, prelude::{Column, CsvReadOptions, CsvWriter}};

use crate::{config::CsvOptions, frame::GeoFrame};

const GEOMETRY_COLUMN: &str = "geometry";

/// Read a DataFrame from UTF-8 CSV text.
pub(crate) fn read_csv_str(text: &str, options: &CsvOptions) -> Result<DataFrame> {
    let separator = options.separator_byte()?;
    CsvReadOptions::default()
        .with_has_header(options.has_header)
        .with_infer_schema_length(options.infer_schema_length)
        .map_parse_options(|po| po.with_separator(separator))
        .into_reader_with_file_handle(Cursor::new(text.as_bytes()))
        .finish()
        .context("[io::csv] Failed to parse CSV")
}

/// Write a DataFrame to CSV bytes.
pub(crate) fn write_csv_bytes(df: &DataFrame, options: &CsvOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    CsvWriter::new(&mut out)
        .include_header(options.has_header)
        .with_separator(options.separator_byte()?)
        .finish(&mut df.clone())
        .context("[io::csv] Failed to write CSV")?;
    Ok(out)
}

/// Write a GeoFrame to CSV bytes, appending geometries as a WKT `geometry` column.
/// Errors if the attributes already hold a `geometry` column.
pub(crate) fn write_geo_csv_bytes(gf: &GeoFrame, options: &CsvOptions) -> Result<Vec<u8>> {
    if gf.data().get_column_index(GEOMETRY_COLUMN).is_some() {
        bail!("[io::csv] Attribute column {GEOMETRY_COLUMN:?} would be overwritten by the WKT geometry column");
    }
    let wkt = gf.geometry().iter()
        .map(|geom| geom.as_ref().map(|g| g.to_wkt()).transpose())
        .collect::<Result<Vec<Option<String>>, _>>()
        .context("[io::csv] Failed to encode geometry as WKT")?;

    let mut df = gf.data().clone();
    df.with_column(Column::new(GEOMETRY_COLUMN.into(), wkt))
        .context("[io::csv] Failed to add geometry column")?;
    write_csv_bytes(&df, options)
}
