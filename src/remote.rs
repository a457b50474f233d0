use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    frame::GeoFrame,
    fs::{extract_zip_bytes, find_files_with_extension, scratch_dir},
    io,
    Error,
};

#[cfg(feature = "download")]
use crate::download::HttpClient;

/// Download a zipped shapefile from `url` and read it.
#[cfg(feature = "download")]
pub fn read_shapefile_from_url(http: &HttpClient, url: &str, config: &Config) -> Result<GeoFrame> {
    let bytes = http.fetch_bytes(url)?;
    read_zipped_shapefile(&bytes, url, config)
}

/// Extract an in-memory zip archive into a scratch directory and read the one
/// shapefile it contains, at any depth. `source_name` only labels errors and logs.
///
/// The scratch directory is removed before returning, on success and on error.
pub fn read_zipped_shapefile(bytes: &[u8], source_name: &str, config: &Config) -> Result<GeoFrame> {
    let scratch = scratch_dir(config.scratch_dir.as_deref())?;
    debug!("Extracting {} ({} bytes) -> {}", source_name, bytes.len(), scratch.path().display());
    extract_zip_bytes(bytes, scratch.path())
        .with_context(|| format!("[remote] Failed to extract archive from {source_name}"))?;

    let mut candidates = find_files_with_extension(scratch.path(), "shp")?;
    let shp = match candidates.len() {
        0 => {
            warn!("No shapefile found in the zip file from {}", source_name);
            return Err(Error::NoShapefile { source_name: source_name.to_string() }.into());
        },
        1 => candidates.remove(0),
        _ => {
            let candidates = candidates.iter()
                .filter_map(|p| p.strip_prefix(scratch.path()).ok().map(|p| p.to_path_buf()))
                .collect();
            return Err(Error::AmbiguousShapefile { source_name: source_name.to_string(), candidates }.into());
        },
    };

    let frame = io::shp::read_shapefile(&shp)
        .with_context(|| format!("[remote] Failed to read shapefile from {source_name}"))?;
    info!("Read {} features from {}", frame.len(), source_name);
    Ok(frame)
}
