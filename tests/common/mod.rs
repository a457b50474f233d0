// Fixture builders shared by the integration tests.
#![allow(dead_code)]

use std::{
    io::{Cursor, Read, Write},
    net::TcpListener,
    path::Path,
    thread,
};

use blobframe::ObjectStore;
use shapefile::{
    dbase::{FieldName, FieldValue, Record, TableWriterBuilder},
    Point, Polygon, PolygonRing,
};
use zip::{write::SimpleFileOptions, ZipWriter};

/// Three points with NAME (character) and POP (numeric) attributes.
pub fn write_points_shapefile(path: &Path) {
    let builder = TableWriterBuilder::new()
        .add_character_field(FieldName::try_from("NAME").unwrap(), 20)
        .add_numeric_field(FieldName::try_from("POP").unwrap(), 10, 0);
    let mut writer = shapefile::Writer::from_path(path, builder).unwrap();

    for (i, name) in ["north", "south", "east"].into_iter().enumerate() {
        let mut record = Record::default();
        record.insert("NAME".to_string(), FieldValue::Character(Some(name.to_string())));
        record.insert("POP".to_string(), FieldValue::Numeric(Some(100.0 * (i + 1) as f64)));
        writer.write_shape_and_record(&Point::new(i as f64, 10.0 + i as f64), &record).unwrap();
    }
}

/// Two unit-square polygons with a NAME attribute.
pub fn write_polygon_shapefile(path: &Path) {
    let builder = TableWriterBuilder::new()
        .add_character_field(FieldName::try_from("NAME").unwrap(), 20);
    let mut writer = shapefile::Writer::from_path(path, builder).unwrap();

    for (i, name) in ["left", "right"].into_iter().enumerate() {
        let x = i as f64 * 2.0;
        let ring = vec![
            Point::new(x, 0.0), Point::new(x, 1.0), Point::new(x + 1.0, 1.0),
            Point::new(x + 1.0, 0.0), Point::new(x, 0.0),
        ];
        let mut record = Record::default();
        record.insert("NAME".to_string(), FieldValue::Character(Some(name.to_string())));
        writer.write_shape_and_record(&Polygon::new(PolygonRing::Outer(ring)), &record).unwrap();
    }
}

/// Rename every file directly inside `dir` so its extension is uppercase.
pub fn uppercase_extensions(dir: &Path) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let ext = path.extension().unwrap().to_str().unwrap().to_uppercase();
        std::fs::rename(&path, path.with_extension(ext)).unwrap();
    }
}

/// Zip every file directly inside `dir`, placing entries under `folder` in the archive.
pub fn zip_dir(dir: &Path, folder: &str) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buf);
        let mut entries: Vec<_> = std::fs::read_dir(dir).unwrap().map(|e| e.unwrap().path()).collect();
        entries.sort();
        for path in entries {
            let name = path.file_name().unwrap().to_str().unwrap();
            let entry = if folder.is_empty() { name.to_string() } else { format!("{folder}/{name}") };
            zip.start_file(entry, SimpleFileOptions::default()).unwrap();
            zip.write_all(&std::fs::read(&path).unwrap()).unwrap();
        }
        zip.finish().unwrap();
    }
    buf.into_inner()
}

/// Zip arbitrary named entries.
pub fn zip_entries(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buf);
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body).unwrap();
        }
        zip.finish().unwrap();
    }
    buf.into_inner()
}

/// Upload every file directly inside `dir` as `{key_prefix}{file_name}`.
pub fn upload_dir(store: &dyn ObjectStore, bucket: &str, dir: &Path, key_prefix: &str) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        store.put_object(bucket, &format!("{key_prefix}{name}"), &std::fs::read(&path).unwrap()).unwrap();
    }
}

/// A one-sheet workbook named "Data":
///
/// | name  | count | ratio | ok    | year |
/// |-------|-------|-------|-------|------|
/// | alpha | 3     | 0.5   | true  | 2020 |
/// | beta  | 4     | 1.25  | false | 2021 |
/// | gamma |       | 2     | true  | 2022 |
pub fn minimal_xlsx() -> Vec<u8> {
    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;
    const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;
    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Data" sheetId="1" r:id="rId1"/></sheets></workbook>"#;
    const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;
    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>name</t></is></c><c r="B1" t="inlineStr"><is><t>count</t></is></c><c r="C1" t="inlineStr"><is><t>ratio</t></is></c><c r="D1" t="inlineStr"><is><t>ok</t></is></c><c r="E1" t="inlineStr"><is><t>year</t></is></c></row><row r="2"><c r="A2" t="inlineStr"><is><t>alpha</t></is></c><c r="B2"><v>3</v></c><c r="C2"><v>0.5</v></c><c r="D2" t="b"><v>1</v></c><c r="E2"><v>2020</v></c></row><row r="3"><c r="A3" t="inlineStr"><is><t>beta</t></is></c><c r="B3"><v>4</v></c><c r="C3"><v>1.25</v></c><c r="D3" t="b"><v>0</v></c><c r="E3"><v>2021</v></c></row><row r="4"><c r="A4" t="inlineStr"><is><t>gamma</t></is></c><c r="C4"><v>2</v></c><c r="D4" t="b"><v>1</v></c><c r="E4"><v>2022</v></c></row></sheetData></worksheet>"#;

    zip_entries(&[
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", ROOT_RELS.as_bytes()),
        ("xl/workbook.xml", WORKBOOK.as_bytes()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
        ("xl/worksheets/sheet1.xml", SHEET.as_bytes()),
    ])
}

/// Serve one HTTP response on a local port and return the URL to fetch it from.
pub fn serve_once(status: &'static str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 { break; }
            request.extend_from_slice(&buf[..n]);
        }
        let header = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/zip\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len(),
        );
        stream.write_all(header.as_bytes()).unwrap();
        stream.write_all(&body).unwrap();
        stream.flush().unwrap();
    });
    format!("http://{addr}/archive.zip")
}
