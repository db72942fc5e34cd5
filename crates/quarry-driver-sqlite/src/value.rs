use quarry_core::{Value as CoreValue, WireType};

use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A parameter value bound to a SQLite statement.
#[derive(Debug)]
pub(crate) struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts a SQLite value from a result row into a core value of the
    /// column's wire type.
    pub(crate) fn from_sql(value: ValueRef<'_>, ty: WireType) -> quarry_core::Result<CoreValue> {
        let value = match value {
            ValueRef::Null => return Ok(CoreValue::Null),
            ValueRef::Integer(value) => match ty {
                WireType::Bool => CoreValue::Bool(value != 0),
                _ => CoreValue::I64(value),
            },
            ValueRef::Real(value) => CoreValue::F64(value),
            ValueRef::Text(value) => CoreValue::String(String::from_utf8_lossy(value).into_owned()),
            ValueRef::Blob(value) => CoreValue::Bytes(value.to_vec()),
        };

        value.convert(ty)
    }

    /// The wire type of a column with no declared type, from the storage
    /// class of its first value.
    pub(crate) fn storage_type(value: ValueRef<'_>) -> Option<WireType> {
        match value {
            ValueRef::Null => None,
            ValueRef::Integer(_) => Some(WireType::I64),
            ValueRef::Real(_) => Some(WireType::F64),
            ValueRef::Text(_) => Some(WireType::String),
            ValueRef::Blob(_) => Some(WireType::Bytes),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use CoreValue::*;

        match &self.0 {
            Bool(true) => Ok(ToSqlOutput::Owned(SqlValue::Integer(1))),
            Bool(false) => Ok(ToSqlOutput::Owned(SqlValue::Integer(0))),
            I8(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            I16(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            I32(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            U8(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            U16(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            U32(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            U64(v) => match i64::try_from(*v) {
                Ok(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(v))),
                Err(err) => Err(rusqlite::Error::ToSqlConversionFailure(Box::new(err))),
            },
            F32(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v as f64))),
            F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            Bytes(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Blob(&v[..]))),
            Uuid(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(v.to_string()))),
            Date(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(
                v.format(DATE_FORMAT).to_string(),
            ))),
            Timestamp(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(
                v.format(TIMESTAMP_FORMAT).to_string(),
            ))),
            Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
        }
    }
}

/// Maps a declared column type to a wire type, following SQLite's type
/// affinity rules for names it does not know.
pub(crate) fn decltype_wire_type(decltype: &str) -> WireType {
    let decltype = decltype.to_ascii_uppercase();
    let base = decltype
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    match base {
        "BOOL" | "BOOLEAN" => WireType::Bool,
        "TINYINT" => WireType::I8,
        "SMALLINT" => WireType::I16,
        "MEDIUMINT" => WireType::I32,
        "UUID" => WireType::Uuid,
        "DATE" => WireType::Date,
        "DATETIME" | "TIMESTAMP" => WireType::Timestamp,
        _ if decltype.contains("INT") => WireType::I64,
        _ if decltype.contains("CHAR") || decltype.contains("CLOB") || decltype.contains("TEXT") => {
            WireType::String
        }
        _ if decltype.contains("BLOB") || decltype.is_empty() => WireType::Bytes,
        // REAL and NUMERIC affinity
        _ => WireType::F64,
    }
}
