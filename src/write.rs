use anyhow::Result;
use tracing::{debug, info, instrument};

use crate::{config::Config, format::FileFormat, frame::Dataset, io, store::ObjectStore, Error};

/// Serialize `dataset` by the extension of `path` and store it as a single object.
///
/// Only `.csv` and `.geojson` are writable; anything else is rejected before
/// the store is touched.
#[instrument(skip(dataset, store, config), fields(rows = dataset.height()))]
pub fn write_data(dataset: &Dataset, store: &dyn ObjectStore, bucket: &str, path: &str, config: &Config) -> Result<()> {
    let format = FileFormat::from_path(path)?;
    if !format.is_writable() {
        return Err(Error::NotWritable { path: path.to_string() }.into());
    }

    let body = match (format, dataset) {
        (FileFormat::Csv, Dataset::Table(df)) => io::csv::write_csv_bytes(df, &config.csv)?,
        (FileFormat::Csv, Dataset::Geo(gf)) => io::csv::write_geo_csv_bytes(gf, &config.csv)?,
        (FileFormat::GeoJson, Dataset::Table(df)) => io::geojson::write_geojson_bytes(df, None)?,
        (FileFormat::GeoJson, Dataset::Geo(gf)) => io::geojson::write_geojson_bytes(gf.data(), Some(gf.geometry()))?,
        _ => return Err(Error::NotWritable { path: path.to_string() }.into()),
    };

    debug!("Writing {} bytes to {}/{}", body.len(), bucket, path);
    store.put_object(bucket, path, &body)?;
    info!("Wrote {} rows to {}/{}", dataset.height(), bucket, path);
    Ok(())
}
