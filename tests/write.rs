// Integration tests for writing datasets back to object storage and reading them again.

mod common;

use std::sync::Arc;

use blobframe::{write_data, Config, DataClient, Dataset, DiskStore, Error, GeoFrame, MemStore, ObjectStore};
use geo::{Geometry, LineString, Point};
use polars::prelude::{AnyValue, Column, DataFrame};

fn sample_table() -> DataFrame {
    DataFrame::new(vec![
        Column::new("city".into(), ["Lincoln", "Omaha", "Kearney"]),
        Column::new("population".into(), [291_082i64, 486_051, 33_790]),
        Column::new("density".into(), [Some(1_162.5f64), None, Some(942.25)]),
    ]).unwrap()
}

#[test]
fn csv_round_trip_preserves_cells() {
    let store = MemStore::new();
    let dataset = Dataset::Table(sample_table());

    write_data(&dataset, &store, "out", "cities.csv", &Config::default()).unwrap();
    let back = blobframe::load_data(&store, "out", "cities.csv", &Config::default()).unwrap().into_table();

    assert!(back.equals_missing(&sample_table()));
}

#[test]
fn csv_round_trip_through_disk_store() {
    let root = tempfile::tempdir().unwrap();
    let client = DataClient::new(Arc::new(DiskStore::new(root.path()))).unwrap();

    client.write(&Dataset::Table(sample_table()), "out", "nested/dir/cities.csv").unwrap();
    assert!(root.path().join("out/nested/dir/cities.csv").is_file());
    assert_eq!(client.store().list_objects("out", "nested/").unwrap(), ["nested/dir/cities.csv"]);

    let back = client.load("out", "nested/dir/cities.csv").unwrap().into_table();
    assert_eq!(back.shape(), (3, 3));
    assert_eq!(back.column("city").unwrap().get(2).unwrap(), AnyValue::String("Kearney"));
}

#[test]
fn geo_dataset_csv_carries_wkt_geometry() {
    let store = MemStore::new();
    let df = DataFrame::new(vec![Column::new("id".into(), [1i64, 2])]).unwrap();
    let gf = GeoFrame::new(df, vec![
        Some(Geometry::Point(Point::new(1.5, -2.0))),
        Some(Geometry::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]))),
    ]).unwrap();

    write_data(&Dataset::Geo(gf), &store, "out", "shapes.csv", &Config::default()).unwrap();
    let back = blobframe::load_data(&store, "out", "shapes.csv", &Config::default()).unwrap().into_table();

    assert_eq!(back.shape(), (2, 2));
    assert_eq!(back.column("geometry").unwrap().get(0).unwrap(), AnyValue::String("POINT(1.5 -2)"));
}

#[test]
fn client_writes_with_its_configured_separator() {
    let store = Arc::new(MemStore::new());
    let config = Config::from_json_str(r#"{"csv": {"separator": ";"}}"#).unwrap();
    let client = DataClient::with_config(store.clone(), config).unwrap();
    assert_eq!(client.config().csv.separator, ';');

    let df = DataFrame::new(vec![Column::new("a".into(), [1i64]), Column::new("b".into(), [2i64])]).unwrap();
    client.write(&Dataset::Table(df), "out", "pair.csv").unwrap();
    assert_eq!(&store.get_object("out", "pair.csv").unwrap()[..], b"a;b\n1;2\n");
}

#[test]
fn geojson_round_trip_preserves_features() {
    let store = MemStore::new();
    let geometry = vec![
        Some(Geometry::Point(Point::new(-96.7, 40.8))),
        None,
        Some(Geometry::Point(Point::new(-99.1, 40.7))),
    ];
    let gf = GeoFrame::new(sample_table(), geometry.clone()).unwrap();

    write_data(&Dataset::Geo(gf), &store, "out", "cities.geojson", &Config::default()).unwrap();
    let dataset = blobframe::load_data(&store, "out", "cities.geojson", &Config::default()).unwrap();
    let back = dataset.as_geo().unwrap();

    assert_eq!(back.len(), 3);
    assert_eq!(back.geometry(), geometry.as_slice());
    assert_eq!(back.data().column("population").unwrap().get(1).unwrap(), AnyValue::Int64(486_051));
    assert_eq!(back.data().column("density").unwrap().get(1).unwrap(), AnyValue::Null);
}

#[test]
fn shapefile_loaded_then_written_as_geojson() {
    let fixture = tempfile::tempdir().unwrap();
    common::write_polygon_shapefile(&fixture.path().join("tracts.shp"));
    let store = MemStore::new();
    common::upload_dir(&store, "geo", fixture.path(), "in/");

    let dataset = blobframe::load_data(&store, "geo", "in/tracts.shp", &Config::default()).unwrap();
    write_data(&dataset, &store, "geo", "out/tracts.geojson", &Config::default()).unwrap();

    let again = blobframe::load_data(&store, "geo", "out/tracts.geojson", &Config::default()).unwrap();
    let (before, after) = (dataset.as_geo().unwrap(), again.as_geo().unwrap());
    assert_eq!(after.len(), before.len());
    assert!(after.data().equals_missing(before.data()));
    assert_eq!(after.bounds(), before.bounds());
}

#[test]
fn unwritable_paths_leave_store_untouched() {
    let store = MemStore::new();
    let dataset = Dataset::Table(sample_table());

    for path in ["cities.xlsx", "cities.shp", "cities.parquet", "cities"] {
        let err = write_data(&dataset, &store, "out", path, &Config::default()).unwrap_err();
        assert!(
            matches!(err.downcast_ref::<Error>(), Some(Error::NotWritable { .. } | Error::UnsupportedFormat { .. })),
            "{path}",
        );
    }
    assert!(store.list_objects("out", "").unwrap().is_empty());
}
