//! Loosely typed cell values and column type inference, shared by the
//! GeoJSON, dBASE and spreadsheet readers.

use polars::prelude::{AnyValue, Column};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Cell {
    fn into_string(self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) => Some(f.to_string()),
            Cell::Str(s) => Some(s),
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Int(i),
                None => n.as_f64().map_or(Cell::Null, Cell::Float),
            },
            Value::String(s) => Cell::Str(s),
            other => Cell::Str(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind { Null, Bool, Int, Float, Str }

/// Narrowest column type that holds every non-null cell.
fn infer_kind(cells: &[Cell]) -> Kind {
    cells.iter().fold(Kind::Null, |acc, cell| {
        let kind = match cell {
            Cell::Null => return acc,
            Cell::Bool(_) => Kind::Bool,
            Cell::Int(_) => Kind::Int,
            Cell::Float(_) => Kind::Float,
            Cell::Str(_) => Kind::Str,
        };
        match (acc, kind) {
            (Kind::Null, k) => k,
            (a, k) if a == k => a,
            (Kind::Int, Kind::Float) | (Kind::Float, Kind::Int) => Kind::Float,
            _ => Kind::Str,
        }
    })
}

/// Build a typed column from cells: Boolean, Int64, Float64, or String as a fallback.
/// An all-null column is typed String.
pub(crate) fn cells_to_column(name: &str, cells: Vec<Cell>) -> Column {
    match infer_kind(&cells) {
        Kind::Bool => Column::new(name.into(), cells.into_iter()
            .map(|c| match c { Cell::Bool(b) => Some(b), _ => None })
            .collect::<Vec<_>>()),
        Kind::Int => Column::new(name.into(), cells.into_iter()
            .map(|c| match c { Cell::Int(i) => Some(i), _ => None })
            .collect::<Vec<_>>()),
        Kind::Float => Column::new(name.into(), cells.into_iter()
            .map(|c| match c {
                Cell::Int(i) => Some(i as f64),
                Cell::Float(f) => Some(f),
                _ => None,
            })
            .collect::<Vec<_>>()),
        Kind::Null | Kind::Str => Column::new(name.into(), cells.into_iter()
            .map(Cell::into_string)
            .collect::<Vec<_>>()),
    }
}

/// Convert one DataFrame cell to JSON; types without a JSON counterpart use their display form.
pub(crate) fn any_value_to_json(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::Int32(v) => v.into(),
        AnyValue::Int64(v) => v.into(),
        AnyValue::UInt32(v) => v.into(),
        AnyValue::UInt64(v) => v.into(),
        AnyValue::Float32(v) => serde_json::Number::from_f64(v as f64).map_or(Value::Null, Value::Number),
        AnyValue::Float64(v) => serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number),
        other => Value::String(other.to_string()),
    }
}
