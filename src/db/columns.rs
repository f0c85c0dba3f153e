use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use convert_case::{Case, Casing};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};
use thiserror::Error;
use uuid::Uuid;

use crate::services::error::{Error, Result};

/// Semantic type of a record field, used to pick the decoder for a result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Uuid,
    Timestamp,
    Decimal,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Text(String),
    Integer(i64),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Json(Value),
}

#[derive(Error, Debug)]
pub enum ColumnError {
    #[error("unexpected NULL for a required field")]
    UnexpectedNull,
    #[error("expected {expected:?}, got {found}")]
    TypeMismatch { expected: FieldKind, found: String },
    #[error("integer {0} out of range")]
    OutOfRange(i64),
    #[error(transparent)]
    Decode(#[from] sqlx::Error),
}

impl ColumnValue {
    fn describe(&self) -> String {
        match self {
            ColumnValue::Null => "NULL".to_string(),
            ColumnValue::Text(_) => "text".to_string(),
            ColumnValue::Integer(_) => "integer".to_string(),
            ColumnValue::Uuid(_) => "uuid".to_string(),
            ColumnValue::Timestamp(_) => "timestamp".to_string(),
            ColumnValue::Json(_) => "json".to_string(),
        }
    }

    fn mismatch(self, expected: FieldKind) -> ColumnError {
        match self {
            ColumnValue::Null => ColumnError::UnexpectedNull,
            other => ColumnError::TypeMismatch {
                expected,
                found: other.describe(),
            },
        }
    }

    pub fn text(self) -> Result<String, ColumnError> {
        match self {
            ColumnValue::Text(s) => Ok(s),
            other => Err(other.mismatch(FieldKind::Text)),
        }
    }

    pub fn int32(self) -> Result<i32, ColumnError> {
        match self {
            ColumnValue::Integer(i) => i32::try_from(i).map_err(|_| ColumnError::OutOfRange(i)),
            other => Err(other.mismatch(FieldKind::Integer)),
        }
    }

    pub fn uuid(self) -> Result<Uuid, ColumnError> {
        match self {
            ColumnValue::Uuid(u) => Ok(u),
            other => Err(other.mismatch(FieldKind::Uuid)),
        }
    }

    pub fn timestamp(self) -> Result<DateTime<Utc>, ColumnError> {
        match self {
            ColumnValue::Timestamp(ts) => Ok(ts),
            other => Err(other.mismatch(FieldKind::Timestamp)),
        }
    }

    pub fn json_opt(self) -> Result<Option<Value>, ColumnError> {
        match self {
            ColumnValue::Null => Ok(None),
            ColumnValue::Json(v) => Ok(Some(v)),
            other => Err(other.mismatch(FieldKind::Json)),
        }
    }
}

pub type Assign<T> = fn(&mut T, ColumnValue) -> Result<(), ColumnError>;

/// One entry of a record's column table. The storage column is `db` if given,
/// else `wire` in snake case, else `field` in snake case.
pub struct ColumnBinding<T> {
    pub field: &'static str,
    pub db: Option<&'static str>,
    pub wire: Option<&'static str>,
    pub kind: FieldKind,
    pub assign: Assign<T>,
}

impl<T> ColumnBinding<T> {
    pub const fn new(field: &'static str, kind: FieldKind, assign: Assign<T>) -> Self {
        Self {
            field,
            db: None,
            wire: None,
            kind,
            assign,
        }
    }

    pub const fn wire(
        field: &'static str,
        wire: &'static str,
        kind: FieldKind,
        assign: Assign<T>,
    ) -> Self {
        Self {
            field,
            db: None,
            wire: Some(wire),
            kind,
            assign,
        }
    }

    pub fn column_name(&self) -> String {
        match (self.db, self.wire) {
            (Some(db), _) => db.to_string(),
            (None, Some(wire)) => wire.to_case(Case::Snake),
            (None, None) => self.field.to_case(Case::Snake),
        }
    }
}

pub struct ColumnMap<T: 'static> {
    by_column: HashMap<String, &'static ColumnBinding<T>>,
}

impl<T: 'static> ColumnMap<T> {
    pub fn new(bindings: &'static [ColumnBinding<T>]) -> Self {
        let by_column = bindings
            .iter()
            .map(|binding| (binding.column_name(), binding))
            .collect();
        Self { by_column }
    }

    pub fn get(&self, column: &str) -> Option<&'static ColumnBinding<T>> {
        self.by_column.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.by_column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_column.is_empty()
    }
}

/// A record shape the dynamic query can materialize rows into.
pub trait AssetRecord: Default + Serialize + DeserializeOwned + Send + Unpin + 'static {
    const TABLE: &'static str;

    fn column_map() -> &'static ColumnMap<Self>;
}

/// Minimal row access the mapper needs; implemented for Postgres rows.
pub trait RowSource {
    fn column_count(&self) -> usize;
    fn column_name(&self, index: usize) -> &str;
    fn decode(&self, index: usize, kind: FieldKind) -> Result<ColumnValue, ColumnError>;
}

pub fn map_row<T: AssetRecord, R: RowSource>(row: &R) -> Result<T> {
    let columns = T::column_map();
    let mut record = T::default();

    for index in 0..row.column_count() {
        let name = row.column_name(index);
        let Some(binding) = columns.get(name) else {
            continue;
        };
        row.decode(index, binding.kind)
            .and_then(|value| (binding.assign)(&mut record, value))
            .map_err(|source| Error::RowMapping {
                column: name.to_string(),
                source,
            })?;
    }

    Ok(record)
}

fn decoded<T, F>(value: Option<T>, f: F) -> ColumnValue
where
    F: FnOnce(T) -> ColumnValue,
{
    value.map(f).unwrap_or(ColumnValue::Null)
}

impl RowSource for PgRow {
    fn column_count(&self) -> usize {
        self.len()
    }

    fn column_name(&self, index: usize) -> &str {
        self.column(index).name()
    }

    fn decode(&self, index: usize, kind: FieldKind) -> Result<ColumnValue, ColumnError> {
        let type_name = self.column(index).type_info().name().to_ascii_uppercase();

        let value = match (kind, type_name.as_str()) {
            (FieldKind::Integer, "INT2") => {
                decoded(self.try_get::<Option<i16>, _>(index)?, |v| ColumnValue::Integer(v.into()))
            }
            (FieldKind::Integer, "INT4") => {
                decoded(self.try_get::<Option<i32>, _>(index)?, |v| ColumnValue::Integer(v.into()))
            }
            (FieldKind::Integer, _) => {
                decoded(self.try_get::<Option<i64>, _>(index)?, ColumnValue::Integer)
            }
            (FieldKind::Uuid, _) => {
                decoded(self.try_get::<Option<Uuid>, _>(index)?, ColumnValue::Uuid)
            }
            (FieldKind::Timestamp, "TIMESTAMP") => {
                decoded(self.try_get::<Option<NaiveDateTime>, _>(index)?, |v| {
                    ColumnValue::Timestamp(Utc.from_utc_datetime(&v))
                })
            }
            (FieldKind::Timestamp, _) => {
                decoded(self.try_get::<Option<DateTime<Utc>>, _>(index)?, ColumnValue::Timestamp)
            }
            (FieldKind::Decimal, "NUMERIC") => {
                decoded(self.try_get::<Option<BigDecimal>, _>(index)?, |v| {
                    ColumnValue::Text(v.to_string())
                })
            }
            (FieldKind::Json, "JSON" | "JSONB") => {
                decoded(self.try_get::<Option<Value>, _>(index)?, ColumnValue::Json)
            }
            (FieldKind::Json, _) => decoded(self.try_get::<Option<String>, _>(index)?, |v| {
                ColumnValue::Json(serde_json::from_str(&v).unwrap_or(Value::String(v)))
            }),
            (FieldKind::Text | FieldKind::Decimal, _) => {
                decoded(self.try_get::<Option<String>, _>(index)?, ColumnValue::Text)
            }
        };

        Ok(value)
    }
}
