use super::Value;
use crate::{Error, Result, WireType};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

impl Value {
    /// Converts the value to the given wire type.
    ///
    /// This is the generic converter used when a column's wire type differs
    /// from the destination's. `Null` converts to `Null`. Integer narrowing is
    /// range checked, floats only convert to integers when they are whole,
    /// and text is parsed. Anything else fails with an unsupported conversion
    /// error.
    pub fn convert(self, ty: WireType) -> Result<Value> {
        match self.wire_type() {
            None => return Ok(self),
            Some(actual) if actual == ty => return Ok(self),
            _ => {}
        }

        let converted = match &self {
            Value::Bool(_)
            | Value::I8(_)
            | Value::I16(_)
            | Value::I32(_)
            | Value::I64(_)
            | Value::U8(_)
            | Value::U16(_)
            | Value::U32(_)
            | Value::U64(_) => from_integer(self.as_i128(), ty),
            Value::F32(v) => from_float(*v as f64, ty),
            Value::F64(v) => from_float(*v, ty),
            Value::String(v) => from_text(v, ty),
            Value::Bytes(v) => match ty {
                WireType::Uuid => Uuid::from_slice(v).ok().map(Value::Uuid),
                WireType::String => String::from_utf8(v.clone()).ok().map(Value::String),
                _ => None,
            },
            Value::Uuid(v) => match ty {
                WireType::String => Some(Value::String(v.to_string())),
                WireType::Bytes => Some(Value::Bytes(v.as_bytes().to_vec())),
                _ => None,
            },
            Value::Date(v) => match ty {
                WireType::Timestamp => Some(Value::Timestamp(v.and_time(NaiveTime::MIN))),
                WireType::String => Some(Value::String(v.format(DATE_FORMAT).to_string())),
                _ => None,
            },
            Value::Timestamp(v) => match ty {
                WireType::Date => Some(Value::Date(v.date())),
                WireType::String => Some(Value::String(
                    v.format(TIMESTAMP_FORMATS[0]).to_string(),
                )),
                _ => None,
            },
            Value::Null => Some(Value::Null),
        };

        converted.ok_or_else(|| Error::unsupported_conversion(&self, ty))
    }

    fn as_i128(&self) -> i128 {
        match *self {
            Value::Bool(v) => v as i128,
            Value::I8(v) => v as i128,
            Value::I16(v) => v as i128,
            Value::I32(v) => v as i128,
            Value::I64(v) => v as i128,
            Value::U8(v) => v as i128,
            Value::U16(v) => v as i128,
            Value::U32(v) => v as i128,
            Value::U64(v) => v as i128,
            _ => 0,
        }
    }
}

fn from_integer(v: i128, ty: WireType) -> Option<Value> {
    Some(match ty {
        WireType::Bool => Value::Bool(v != 0),
        WireType::I8 => Value::I8(i8::try_from(v).ok()?),
        WireType::I16 => Value::I16(i16::try_from(v).ok()?),
        WireType::I32 => Value::I32(i32::try_from(v).ok()?),
        WireType::I64 => Value::I64(i64::try_from(v).ok()?),
        WireType::U8 => Value::U8(u8::try_from(v).ok()?),
        WireType::U16 => Value::U16(u16::try_from(v).ok()?),
        WireType::U32 => Value::U32(u32::try_from(v).ok()?),
        WireType::U64 => Value::U64(u64::try_from(v).ok()?),
        WireType::F32 => Value::F32(v as f32),
        WireType::F64 => Value::F64(v as f64),
        WireType::String => Value::String(v.to_string()),
        _ => return None,
    })
}

fn from_float(v: f64, ty: WireType) -> Option<Value> {
    match ty {
        WireType::F32 => Some(Value::F32(v as f32)),
        WireType::F64 => Some(Value::F64(v)),
        WireType::Bool => Some(Value::Bool(v != 0.0)),
        WireType::String => Some(Value::String(v.to_string())),
        ty if ty.is_integer() && v.is_finite() && v.fract() == 0.0 => {
            from_integer(v as i128, ty)
        }
        _ => None,
    }
}

fn from_text(v: &str, ty: WireType) -> Option<Value> {
    let trimmed = v.trim();

    match ty {
        WireType::Bool => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "t" | "1" | "yes" => Some(Value::Bool(true)),
            "false" | "f" | "0" | "no" => Some(Value::Bool(false)),
            _ => None,
        },
        ty if ty.is_integer() => from_integer(trimmed.parse::<i128>().ok()?, ty),
        WireType::F32 => trimmed.parse::<f32>().ok().map(Value::F32),
        WireType::F64 => trimmed.parse::<f64>().ok().map(Value::F64),
        WireType::Bytes => Some(Value::Bytes(v.as_bytes().to_vec())),
        WireType::Uuid => Uuid::parse_str(trimmed).ok().map(Value::Uuid),
        WireType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .ok()
            .map(Value::Date),
        WireType::Timestamp => parse_timestamp(trimmed).map(Value::Timestamp),
        _ => None,
    }
}

fn parse_timestamp(src: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(src, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(src, DATE_FORMAT)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn same_type_is_identity() {
        assert_eq!(Value::I64(7).convert(WireType::I64).unwrap(), Value::I64(7));
    }

    #[test]
    fn null_converts_to_null() {
        assert_eq!(Value::Null.convert(WireType::String).unwrap(), Value::Null);
    }

    #[test]
    fn integer_narrowing_in_range() {
        assert_eq!(Value::I64(42).convert(WireType::I8).unwrap(), Value::I8(42));
        assert_eq!(Value::I64(42).convert(WireType::U16).unwrap(), Value::U16(42));
    }

    #[test]
    fn integer_narrowing_out_of_range() {
        let err = Value::I64(300).convert(WireType::U8).unwrap_err();
        assert!(err.is_unsupported_conversion());
        assert!(Value::I32(-1).convert(WireType::U32).is_err());
    }

    #[test]
    fn integer_to_bool() {
        assert_eq!(Value::I64(0).convert(WireType::Bool).unwrap(), Value::Bool(false));
        assert_eq!(Value::I64(1).convert(WireType::Bool).unwrap(), Value::Bool(true));
    }

    #[test]
    fn bool_to_integer() {
        assert_eq!(Value::Bool(true).convert(WireType::I32).unwrap(), Value::I32(1));
    }

    #[test]
    fn whole_float_to_integer() {
        assert_eq!(Value::F64(12.0).convert(WireType::I32).unwrap(), Value::I32(12));
        assert!(Value::F64(12.5).convert(WireType::I32).is_err());
        assert!(Value::F64(f64::NAN).convert(WireType::I64).is_err());
    }

    #[test]
    fn text_parsing() {
        assert_eq!(
            Value::from(" 17 ").convert(WireType::I64).unwrap(),
            Value::I64(17)
        );
        assert_eq!(
            Value::from("yes").convert(WireType::Bool).unwrap(),
            Value::Bool(true)
        );
        assert!(Value::from("abc").convert(WireType::I32).is_err());
    }

    #[test]
    fn text_to_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();

        for src in ["2024-03-09 10:30:00", "2024-03-09T10:30:00"] {
            assert_eq!(
                Value::from(src).convert(WireType::Timestamp).unwrap(),
                Value::Timestamp(expected)
            );
        }

        let midnight = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert_eq!(
            Value::from("2024-03-09").convert(WireType::Timestamp).unwrap(),
            Value::Timestamp(midnight)
        );
    }

    #[test]
    fn uuid_bytes_and_text() {
        let id = Uuid::new_v4();
        let bytes = Value::Uuid(id).convert(WireType::Bytes).unwrap();
        assert_eq!(bytes.convert(WireType::Uuid).unwrap(), Value::Uuid(id));
        assert_eq!(
            Value::String(id.to_string())
                .convert(WireType::Uuid)
                .unwrap(),
            Value::Uuid(id)
        );
    }

    #[test]
    fn unsupported_pair() {
        let err = Value::Bytes(vec![1, 2, 3])
            .convert(WireType::Date)
            .unwrap_err();
        assert_eq!(err.to_string(), "cannot convert Bytes to Date");
    }
}
