//! GeoJSON reading and writing.

use ahash::AHashMap;
use anyhow::{Context, Result};
use geo::Geometry;
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject};
use polars::frame::DataFrame;

use crate::{
    frame::GeoFrame,
    io::cell::{any_value_to_json, cells_to_column, Cell},
};

/// Parse GeoJSON text (a FeatureCollection, a single Feature, or a bare Geometry).
/// Feature properties become columns in first-seen order.
pub(crate) fn read_geojson_str(text: &str) -> Result<GeoFrame> {
    let geojson: GeoJson = text.parse().context("[io::geojson] Failed to parse GeoJSON")?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature { geometry: Some(geometry), ..Feature::default() }],
    };

    let mut names: Vec<String> = Vec::new();
    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut columns: Vec<Vec<Cell>> = Vec::new();
    let mut geometry = Vec::with_capacity(features.len());

    for (row, feature) in features.into_iter().enumerate() {
        geometry.push(
            feature.geometry
                .map(Geometry::<f64>::try_from)
                .transpose()
                .with_context(|| format!("[io::geojson] Invalid geometry in feature {row}"))?,
        );

        for (key, value) in feature.properties.unwrap_or_default() {
            let col = *index.entry(key.clone()).or_insert_with(|| {
                names.push(key);
                columns.push(vec![Cell::Null; row]);
                columns.len() - 1
            });
            columns[col].push(Cell::from(value));
        }

        // Pad columns this feature did not mention.
        for cells in columns.iter_mut() {
            cells.resize(row + 1, Cell::Null);
        }
    }

    let data = if names.is_empty() {
        DataFrame::empty_with_height(geometry.len())
    } else {
        DataFrame::new(
            names.iter().zip(columns)
                .map(|(name, cells)| cells_to_column(name, cells))
                .collect(),
        ).context("[io::geojson] Failed to build DataFrame from properties")?
    };

    GeoFrame::new(data, geometry)
}

/// Serialize rows as a GeoJSON FeatureCollection. Each row's cells become the
/// feature's properties; `geometry` gives one geometry per row (or none at all).
pub(crate) fn write_geojson_bytes(df: &DataFrame, geometry: Option<&[Option<Geometry<f64>>]>) -> Result<Vec<u8>> {
    let features = (0..df.height())
        .map(|row| {
            let mut properties = JsonObject::new();
            for column in df.get_columns() {
                let value = column.get(row)
                    .with_context(|| format!("[io::geojson] Failed to read {}[{row}]", column.name()))?;
                properties.insert(column.name().to_string(), any_value_to_json(value));
            }
            Ok(Feature {
                geometry: geometry
                    .and_then(|geoms| geoms.get(row))
                    .and_then(Option::as_ref)
                    .map(|geom| geojson::Geometry::new(geojson::Value::from(geom))),
                properties: Some(properties),
                ..Feature::default()
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let collection = FeatureCollection { bbox: None, features, foreign_members: None };
    serde_json::to_vec(&collection).context("[io::geojson] Failed to serialize GeoJSON")
}
