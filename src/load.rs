use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::{
    config::Config,
    format::FileFormat,
    frame::{Dataset, GeoFrame},
    fs::scratch_dir,
    io,
    store::{ObjectRef, ObjectStore},
    Error,
};

/// Load the object at `bucket`/`path` into a dataset, choosing the parser by extension.
///
/// `.shp` paths pull in every sibling component (`.dbf`, `.shx`, `.prj`, ...)
/// stored next to the `.shp` object.
#[instrument(skip(store, config))]
pub fn load_data(store: &dyn ObjectStore, bucket: &str, path: &str, config: &Config) -> Result<Dataset> {
    let format = FileFormat::from_path(path)?;
    debug!("Loading {}/{} as {}", bucket, path, format);

    let dataset = match format {
        FileFormat::Csv => {
            let bytes = store.get_object(bucket, path)?;
            let text = utf8(&bytes, bucket, path)?;
            Dataset::Table(io::csv::read_csv_str(text, &config.csv)
                .with_context(|| format!("[load] Failed to parse {bucket}/{path}"))?)
        },
        FileFormat::GeoJson => {
            let bytes = store.get_object(bucket, path)?;
            let text = utf8(&bytes, bucket, path)?;
            Dataset::Geo(io::geojson::read_geojson_str(text)
                .with_context(|| format!("[load] Failed to parse {bucket}/{path}"))?)
        },
        FileFormat::Shapefile => Dataset::Geo(load_shapefile(store, bucket, path, config)?),
        FileFormat::Xlsx => {
            let bytes = store.get_object(bucket, path)?;
            Dataset::Table(io::xlsx::read_xlsx_bytes(&bytes, &config.xlsx)
                .with_context(|| format!("[load] Failed to parse {bucket}/{path}"))?)
        },
    };

    info!("Loaded {} rows from {}/{}", dataset.height(), bucket, path);
    Ok(dataset)
}

fn utf8<'a>(bytes: &'a [u8], bucket: &str, path: &str) -> Result<&'a str> {
    std::str::from_utf8(bytes).with_context(|| format!("[load] {bucket}/{path} is not valid UTF-8"))
}

/// Keys that belong to the component set of `shp_key`: same path, different extension.
pub(crate) fn shapefile_components(keys: Vec<String>, shp_key: &str) -> Vec<String> {
    let stem = shp_key.rsplit_once('.').map_or(shp_key, |(stem, _)| stem);
    keys.into_iter()
        .filter(|key| {
            key.strip_prefix(stem)
                .is_some_and(|rest| rest.starts_with('.') && !rest.contains('/'))
        })
        .collect()
}

/// Download a shapefile component set into a scratch directory and read it.
/// The scratch directory is removed on return, whether or not reading succeeded.
fn load_shapefile(store: &dyn ObjectStore, bucket: &str, path: &str, config: &Config) -> Result<GeoFrame> {
    let stem = path.rsplit_once('.').map_or(path, |(stem, _)| stem);
    let keys = shapefile_components(store.list_objects(bucket, stem)?, path);
    if !keys.iter().any(|key| key == path) {
        return Err(Error::ObjectNotFound { bucket: bucket.to_string(), key: path.to_string() }.into());
    }

    let scratch = scratch_dir(config.scratch_dir.as_deref())?;
    for key in &keys {
        let obj = ObjectRef::new(bucket, key.as_str());
        let local = scratch.path().join(obj.file_name());
        debug!("Downloading {} -> {}", obj, local.display());
        store.download_file(bucket, key, &local)?;
    }

    let shp = scratch.path().join(ObjectRef::new(bucket, path).file_name());
    io::shp::read_shapefile(&shp).with_context(|| format!("[load] Failed to read shapefile {bucket}/{path}"))
}
