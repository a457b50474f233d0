use std::{fmt, path::Path};

use crate::Error;

/// File formats recognised by their path extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Csv,
    GeoJson,
    Shapefile,
    Xlsx,
}

impl FileFormat {
    /// Detect the format from the extension of an object key or file path (case-insensitive).
    pub fn from_path(path: &str) -> Result<Self, Error> {
        let ext = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("geojson") => Ok(Self::GeoJson),
            Some("shp") => Ok(Self::Shapefile),
            Some("xlsx") => Ok(Self::Xlsx),
            _ => Err(Error::UnsupportedFormat { path: path.to_string() }),
        }
    }

    /// Canonical extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::GeoJson => "geojson",
            Self::Shapefile => "shp",
            Self::Xlsx => "xlsx",
        }
    }

    /// Whether datasets can be serialized to this format.
    pub fn is_writable(&self) -> bool {
        matches!(self, Self::Csv | Self::GeoJson)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
