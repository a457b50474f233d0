use std::path::PathBuf;

use thiserror::Error;

/// Outcomes callers may want to tell apart. Everything else surfaces as a
/// plain `anyhow::Error` carrying the underlying library error.
///
/// These travel inside `anyhow::Error`; use `err.downcast_ref::<Error>()`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported file format for {path:?} (expected one of: csv, geojson, shp, xlsx)")]
    UnsupportedFormat { path: String },

    #[error("cannot write {path:?}: only csv and geojson outputs are supported")]
    NotWritable { path: String },

    #[error("object not found: {bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    #[error("invalid object key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("no shapefile found in archive from {source_name}")]
    NoShapefile { source_name: String },

    #[error("archive from {source_name} contains {} shapefiles, expected exactly one: {candidates:?}", candidates.len())]
    AmbiguousShapefile { source_name: String, candidates: Vec<PathBuf> },

    #[error("geometry count ({geometries}) does not match row count ({rows})")]
    GeometryLength { rows: usize, geometries: usize },
}
