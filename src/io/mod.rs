//! Format-specific parsers and serializers.
//!
//! - `csv` - CSV text to and from DataFrames (WKT geometry column on output)
//! - `geojson` - GeoJSON FeatureCollections to and from GeoFrames
//! - `shp` - Shapefile component sets on local disk
//! - `xlsx` - XLSX workbooks (read only)

mod cell;
pub(crate) mod csv;
pub(crate) mod geojson;
pub(crate) mod shp;
pub(crate) mod xlsx;
