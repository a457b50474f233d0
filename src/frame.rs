use anyhow::Result;
use geo::{BoundingRect, Geometry, Rect};
use polars::frame::DataFrame;

use crate::Error;

/// A table whose rows each carry an optional geometry.
#[derive(Debug, Clone)]
pub struct GeoFrame {
    data: DataFrame,
    geometry: Vec<Option<Geometry<f64>>>,
    crs: Option<String>,
}

impl GeoFrame {
    /// Pair attribute rows with geometries; both must have the same length.
    pub fn new(data: DataFrame, geometry: Vec<Option<Geometry<f64>>>) -> Result<Self> {
        if data.height() != geometry.len() {
            return Err(Error::GeometryLength { rows: data.height(), geometries: geometry.len() }.into());
        }
        Ok(Self { data, geometry, crs: None })
    }

    /// Attach a coordinate reference system definition (e.g. the WKT of a `.prj` file).
    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = Some(crs.into());
        self
    }

    pub fn data(&self) -> &DataFrame { &self.data }

    pub fn geometry(&self) -> &[Option<Geometry<f64>>] { &self.geometry }

    pub fn crs(&self) -> Option<&str> { self.crs.as_deref() }

    pub fn len(&self) -> usize { self.geometry.len() }

    pub fn is_empty(&self) -> bool { self.geometry.is_empty() }

    /// Bounding rectangle over every non-null geometry, or `None` if there are none.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.geometry.iter()
            .flatten()
            .filter_map(|geom| geom.bounding_rect())
            .reduce(|a, b| {
                Rect::new(
                    (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                    (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
                )
            })
    }

    /// Split into attributes, geometries and CRS.
    pub fn into_parts(self) -> (DataFrame, Vec<Option<Geometry<f64>>>, Option<String>) {
        (self.data, self.geometry, self.crs)
    }
}

/// What the loader produces and the writer consumes.
#[derive(Debug, Clone)]
pub enum Dataset {
    Table(DataFrame),
    Geo(GeoFrame),
}

impl Dataset {
    /// The attribute table, with or without geometry.
    pub fn data(&self) -> &DataFrame {
        match self {
            Self::Table(df) => df,
            Self::Geo(gf) => gf.data(),
        }
    }

    pub fn height(&self) -> usize { self.data().height() }

    pub fn is_geo(&self) -> bool { matches!(self, Self::Geo(_)) }

    pub fn as_geo(&self) -> Option<&GeoFrame> {
        match self {
            Self::Geo(gf) => Some(gf),
            Self::Table(_) => None,
        }
    }

    /// Drop any geometry and return the attribute table.
    pub fn into_table(self) -> DataFrame {
        match self {
            Self::Table(df) => df,
            Self::Geo(gf) => gf.data,
        }
    }
}

impl From<DataFrame> for Dataset {
    fn from(df: DataFrame) -> Self { Self::Table(df) }
}

impl From<GeoFrame> for Dataset {
    fn from(gf: GeoFrame) -> Self { Self::Geo(gf) }
}
