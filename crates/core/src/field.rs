// Field type tags and parsed cell values

use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Semantic type tag for a mapped record field.
///
/// Closed set: every supported cell-to-field conversion is matched
/// exhaustively, there is no string-keyed dispatch on type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    Bool,
    /// Calendar date, possibly with a time component (compact datetime input).
    Date,
    /// Always parsed through the compact `yyyyMMddHHmmss` form.
    Timestamp,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Int32 => "int32",
            FieldType::Int64 => "int64",
            FieldType::Float32 => "float32",
            FieldType::Float64 => "float64",
            FieldType::Decimal => "decimal",
            FieldType::Bool => "bool",
            FieldType::Date => "date",
            FieldType::Timestamp => "timestamp",
        }
    }
}

/// A cell value after coercion, tagged with the type it was coerced to.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    Bool(bool),
    Date(NaiveDateTime),
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Int32(_) => FieldType::Int32,
            FieldValue::Int64(_) => FieldType::Int64,
            FieldValue::Float32(_) => FieldType::Float32,
            FieldValue::Float64(_) => FieldType::Float64,
            FieldValue::Decimal(_) => FieldType::Decimal,
            FieldValue::Bool(_) => FieldType::Bool,
            FieldValue::Date(_) => FieldType::Date,
            FieldValue::Timestamp(_) => FieldType::Timestamp,
        }
    }
}

/// Canonical text rendering, the form the write path puts into a cell.
/// Dates and timestamps render compact so they read back through the
/// same length-based coercion.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Int32(n) => write!(f, "{}", n),
            FieldValue::Int64(n) => write!(f, "{}", n),
            FieldValue::Float32(n) => write!(f, "{}", n),
            FieldValue::Float64(n) => write!(f, "{}", n),
            FieldValue::Decimal(d) => write!(f, "{}", d),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Date(dt) | FieldValue::Timestamp(dt) => {
                write!(f, "{}", dt.format("%Y%m%d%H%M%S"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_display_renders_compact_datetime() {
        let dt = NaiveDate::from_ymd_opt(2023, 6, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(FieldValue::Date(dt).to_string(), "20230615103000");
        assert_eq!(FieldValue::Timestamp(dt).to_string(), "20230615103000");
    }

    #[test]
    fn test_display_plain_scalars() {
        assert_eq!(FieldValue::Int32(-7).to_string(), "-7");
        assert_eq!(FieldValue::Float64(2.5).to_string(), "2.5");
        assert_eq!(FieldValue::Bool(true).to_string(), "true");
        assert_eq!(FieldValue::Text("".into()).to_string(), "");
    }

    #[test]
    fn test_field_type_tags_match() {
        assert_eq!(FieldValue::Int64(1).field_type(), FieldType::Int64);
        assert_eq!(FieldType::Decimal.name(), "decimal");
    }
}
