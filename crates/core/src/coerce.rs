// Cell text to typed field value coercion

use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::dates;
use crate::field::{FieldType, FieldValue};

const COMPACT_DATETIME: &str = "yyyyMMddHHmmss";
const COMPACT_DATE: &str = "yyyyMMdd";

/// Convert one cell's raw text into the target field type.
///
/// Empty text means "leave the field unset" (`Ok(None)`) for every type
/// except `Text`, where the empty string is a real value. Parse failures
/// are hard errors; the read path treats them as fatal for the whole batch.
pub fn coerce(raw: &str, ty: FieldType) -> Result<Option<FieldValue>, String> {
    if raw.is_empty() && ty != FieldType::Text {
        return Ok(None);
    }
    let value = match ty {
        FieldType::Text => FieldValue::Text(raw.to_string()),
        FieldType::Int32 => FieldValue::Int32(parse_number(raw, "int32")?),
        FieldType::Int64 => FieldValue::Int64(parse_number(raw, "int64")?),
        FieldType::Float32 => FieldValue::Float32(parse_number(raw, "float32")?),
        FieldType::Float64 => FieldValue::Float64(parse_number(raw, "float64")?),
        FieldType::Decimal => FieldValue::Decimal(
            Decimal::from_str(raw).map_err(|e| format!("invalid decimal '{}': {}", raw, e))?,
        ),
        FieldType::Bool => FieldValue::Bool(parse_bool(raw)?),
        FieldType::Date => {
            // 19 is the separated datetime form, 14 the compact one;
            // every other length is treated as a plain date.
            let pattern = if raw.len() == 19 || raw.len() == 14 {
                COMPACT_DATETIME
            } else {
                COMPACT_DATE
            };
            FieldValue::Date(dates::parse_date(raw, pattern)?)
        }
        FieldType::Timestamp => FieldValue::Timestamp(dates::parse_date(raw, COMPACT_DATETIME)?),
    };
    Ok(Some(value))
}

fn parse_number<T>(raw: &str, kind: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse()
        .map_err(|e| format!("invalid {} '{}': {}", kind, raw, e))
}

/// Boolean cells come through the read path as TRUE/FALSE; plain true/false
/// text is accepted as well. Anything else is an error rather than a silent
/// false.
fn parse_bool(raw: &str) -> Result<bool, String> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(format!("invalid boolean '{}'", raw))
    }
}
