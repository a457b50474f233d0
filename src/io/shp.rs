//! Shapefile reading.

use std::{fs::File, io::{BufReader, Read, Seek}, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use polars::frame::DataFrame;
use shapefile::{dbase::{self, FieldValue, Record}, PolygonRing, Reader, Shape, ShapeReader};

use crate::{frame::GeoFrame, fs::find_sibling, io::cell::{cells_to_column, Cell}};

/// Reads all shapes + attribute records from a `.shp` file and its siblings
/// (`.shx`, `.dbf`, and `.prj` when present).
/// Sibling extensions are matched case-insensitively.
pub(crate) fn read_shapefile(path: &Path) -> Result<GeoFrame> {
    let source = File::open(path)
        .with_context(|| format!("[io::shp] Failed to open shapefile: {}", path.display()))?;
    let shape_reader = match find_sibling(path, "shx")? {
        Some(shx) => {
            let index = File::open(&shx)
                .with_context(|| format!("[io::shp] Failed to open shape index: {}", shx.display()))?;
            ShapeReader::with_shx(BufReader::new(source), BufReader::new(index))
        },
        None => ShapeReader::new(BufReader::new(source)),
    }.with_context(|| format!("[io::shp] Failed to read shapefile header: {}", path.display()))?;

    let dbf = find_sibling(path, "dbf")?
        .ok_or_else(|| anyhow!("[io::shp] Missing attribute table (.dbf) for {}", path.display()))?;
    let dbase_reader = dbase::Reader::from_path(&dbf)
        .with_context(|| format!("[io::shp] Failed to open attribute table: {}", dbf.display()))?;
    let fields = field_names(&dbase_reader);

    let mut reader = Reader::new(shape_reader, dbase_reader);
    let mut geometry = Vec::new();
    let mut records = Vec::new();
    for (i, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result
            .with_context(|| format!("[io::shp] Error reading shape+record {i} of {}", path.display()))?;
        geometry.push(shape_to_geometry(shape)
            .with_context(|| format!("[io::shp] Unsupported shape {i} in {}", path.display()))?);
        records.push(record);
    }

    let data = records_to_dataframe(&fields, records, geometry.len())?;

    let frame = GeoFrame::new(data, geometry)?;
    if let Some(prj) = find_sibling(path, "prj")? {
        let wkt = std::fs::read_to_string(&prj)
            .with_context(|| format!("[io::shp] Failed to read projection: {}", prj.display()))?;
        return Ok(frame.with_crs(wkt.trim()));
    }
    Ok(frame)
}

/// Attribute field names in header order.
fn field_names<R: Read + Seek>(reader: &dbase::Reader<R>) -> Vec<String> {
    reader.fields().iter()
        .map(|field| field.name().to_string())
        .filter(|name| name != "DeletionFlag")
        .collect()
}

/// Convert dBASE records to typed columns, one per field.
fn records_to_dataframe(fields: &[String], mut records: Vec<Record>, height: usize) -> Result<DataFrame> {
    if fields.is_empty() {
        return Ok(DataFrame::empty_with_height(height));
    }

    let columns = fields.iter()
        .map(|name| {
            let cells = records.iter_mut()
                .map(|record| record.remove(name).map_or(Cell::Null, field_to_cell))
                .collect();
            cells_to_column(name, cells)
        })
        .collect();

    DataFrame::new(columns).context("[io::shp] Failed to build DataFrame from attribute table")
}

fn field_to_cell(value: FieldValue) -> Cell {
    match value {
        FieldValue::Character(Some(s)) => Cell::Str(s.trim().to_string()),
        FieldValue::Memo(s) => Cell::Str(s),
        FieldValue::Numeric(Some(n)) => Cell::Float(n),
        FieldValue::Float(Some(f)) => Cell::Float(f as f64),
        FieldValue::Double(d) | FieldValue::Currency(d) => Cell::Float(d),
        FieldValue::Integer(i) => Cell::Int(i as i64),
        FieldValue::Logical(Some(b)) => Cell::Bool(b),
        FieldValue::Date(Some(d)) => Cell::Str(format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day())),
        FieldValue::Character(None) | FieldValue::Numeric(None) | FieldValue::Float(None)
        | FieldValue::Logical(None) | FieldValue::Date(None) => Cell::Null,
        other => Cell::Str(format!("{other:?}")),
    }
}

/// Points of every dimensionality; M and Z values are dropped.
trait Planar {
    fn coord(&self) -> Coord<f64>;
}

impl Planar for shapefile::Point {
    fn coord(&self) -> Coord<f64> { Coord { x: self.x, y: self.y } }
}

impl Planar for shapefile::PointM {
    fn coord(&self) -> Coord<f64> { Coord { x: self.x, y: self.y } }
}

impl Planar for shapefile::PointZ {
    fn coord(&self) -> Coord<f64> { Coord { x: self.x, y: self.y } }
}

fn line<P: Planar>(points: &[P]) -> LineString<f64> {
    LineString(points.iter().map(Planar::coord).collect())
}

fn multipoint<P: Planar>(points: &[P]) -> Geometry<f64> {
    Geometry::MultiPoint(MultiPoint(points.iter().map(|p| Point(p.coord())).collect()))
}

fn polyline<P: Planar>(parts: &[Vec<P>]) -> Geometry<f64> {
    match parts {
        [single] => Geometry::LineString(line(single)),
        parts => Geometry::MultiLineString(MultiLineString(parts.iter().map(|part| line(part)).collect())),
    }
}

/// Group each outer ring with the inner rings that follow it.
fn polygon<P: Planar>(rings: &[PolygonRing<P>]) -> Geometry<f64> {
    let mut polys: Vec<Polygon<f64>> = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes: Vec<LineString<f64>> = Vec::new();

    for ring in rings {
        let mut ls = line(ring.points());
        ls.close();
        match ring {
            PolygonRing::Outer(_) => {
                if let Some(ext) = exterior.replace(ls) {
                    polys.push(Polygon::new(ext, std::mem::take(&mut holes)));
                }
            },
            PolygonRing::Inner(_) => {
                // A hole with no preceding exterior is kept as its own polygon.
                if exterior.is_none() { exterior = Some(ls); } else { holes.push(ls); }
            },
        }
    }
    if let Some(ext) = exterior {
        polys.push(Polygon::new(ext, holes));
    }

    match polys.len() {
        1 => Geometry::Polygon(polys.remove(0)),
        _ => Geometry::MultiPolygon(MultiPolygon(polys)),
    }
}

/// Convert a shapefile shape to a geometry; null shapes become `None`.
fn shape_to_geometry(shape: Shape) -> Result<Option<Geometry<f64>>> {
    Ok(Some(match shape {
        Shape::NullShape => return Ok(None),
        Shape::Point(p) => Geometry::Point(Point(p.coord())),
        Shape::PointM(p) => Geometry::Point(Point(p.coord())),
        Shape::PointZ(p) => Geometry::Point(Point(p.coord())),
        Shape::Multipoint(mp) => multipoint(mp.points()),
        Shape::MultipointM(mp) => multipoint(mp.points()),
        Shape::MultipointZ(mp) => multipoint(mp.points()),
        Shape::Polyline(pl) => polyline(pl.parts()),
        Shape::PolylineM(pl) => polyline(pl.parts()),
        Shape::PolylineZ(pl) => polyline(pl.parts()),
        Shape::Polygon(p) => polygon(p.rings()),
        Shape::PolygonM(p) => polygon(p.rings()),
        Shape::PolygonZ(p) => polygon(p.rings()),
        other => bail!("unsupported shape type: {:?}", other.shapetype()),
    }))
}
