//! Decoding MySQL rows into schema-driven values
//!
//! The column's reported SQL type decides how a cell is read; nothing
//! reflects over Rust structs.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::models::{format_timestamp, ColumnValue, DynamicRow};

/// How a SQL column type is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SqlKind {
    Signed,
    Unsigned,
    Float,
    Decimal,
    Timestamp,
    Date,
    Time,
    Binary,
    Text,
}

impl SqlKind {
    /// Classify a MySQL type name as reported by the driver
    /// (`"BIGINT UNSIGNED"`, `"DOUBLE"`, `"DATETIME"`, ...).
    pub(crate) fn of(type_name: &str) -> Self {
        let upper = type_name.to_ascii_uppercase();
        let (base, unsigned) = match upper.strip_suffix(" UNSIGNED") {
            Some(base) => (base, true),
            None => (upper.as_str(), false),
        };

        match base {
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT" => {
                if unsigned {
                    Self::Unsigned
                } else {
                    Self::Signed
                }
            }
            "BOOLEAN" | "BOOL" | "YEAR" => Self::Signed,
            "FLOAT" | "DOUBLE" | "REAL" => Self::Float,
            "DECIMAL" | "NUMERIC" => Self::Decimal,
            "DATETIME" | "TIMESTAMP" => Self::Timestamp,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" | "BIT"
            | "GEOMETRY" => Self::Binary,
            _ => Self::Text,
        }
    }
}

/// Decode every column of `row`, in select order.
pub fn decode_row(row: &MySqlRow) -> Result<DynamicRow, sqlx::Error> {
    let mut columns = Vec::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = decode_column(row, column.ordinal())?;
        columns.push((column.name().to_string(), value));
    }
    Ok(DynamicRow::new(columns))
}

/// Decode one cell by position.
pub fn decode_column(row: &MySqlRow, index: usize) -> Result<ColumnValue, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(ColumnValue::Null);
    }
    let kind = SqlKind::of(raw.type_info().name());

    // Integer and text decoders accept any width/charset of their family,
    // so the unchecked getters are used once the kind is known.
    let value = match kind {
        SqlKind::Signed => ColumnValue::Number(row.try_get_unchecked::<i64, _>(index)? as f64),
        SqlKind::Unsigned => ColumnValue::Number(row.try_get_unchecked::<u64, _>(index)? as f64),
        SqlKind::Float => ColumnValue::Number(row.try_get_unchecked::<f64, _>(index)?),
        SqlKind::Decimal => {
            let text: String = row.try_get_unchecked(index)?;
            match text.trim().parse::<f64>() {
                Ok(n) => ColumnValue::Number(n),
                Err(_) => ColumnValue::Text(text),
            }
        }
        SqlKind::Timestamp => {
            let ts: DateTime<Utc> = row.try_get(index)?;
            ColumnValue::Text(format_timestamp(&ts))
        }
        SqlKind::Date => {
            let date: NaiveDate = row.try_get(index)?;
            ColumnValue::Text(date.format("%Y-%m-%d").to_string())
        }
        SqlKind::Time => {
            let time: NaiveTime = row.try_get(index)?;
            ColumnValue::Text(time.format("%H:%M:%S%.f").to_string())
        }
        SqlKind::Binary => ColumnValue::Blob(row.try_get_unchecked::<Vec<u8>, _>(index)?),
        SqlKind::Text => ColumnValue::Text(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(value)
}

/// Decode a named column as a number, `None` for SQL NULL.
pub fn number_column(row: &MySqlRow, name: &str) -> Result<Option<f64>, sqlx::Error> {
    let index = column_index(row, name)?;
    Ok(decode_column(row, index)?.as_f64())
}

/// Decode a named column into a tagged value.
pub fn value_column(row: &MySqlRow, name: &str) -> Result<ColumnValue, sqlx::Error> {
    let index = column_index(row, name)?;
    decode_column(row, index)
}

fn column_index(row: &MySqlRow, name: &str) -> Result<usize, sqlx::Error> {
    row.columns()
        .iter()
        .find(|c| c.name().eq_ignore_ascii_case(name))
        .map(|c| c.ordinal())
        .ok_or_else(|| sqlx::Error::ColumnNotFound(name.to_string()))
}
