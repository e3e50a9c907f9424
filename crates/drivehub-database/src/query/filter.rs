//! Declarative WHERE clause construction.
//!
//! Each listing publishes a static field map from API filter keys to a
//! [`FieldSpec`]: the SQL column, the comparison, and a transform that
//! coerces the raw string value. [`build_where`] turns client filters into
//! [`Predicate`]s using that map and ANDs them with the listing's base
//! predicates; [`push_where`] renders them into a `QueryBuilder`.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::types::Filter;

/// A typed value bound into a query.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Text (also used for enum columns compared as `::text`).
    Text(String),
    /// Boolean.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// UUID.
    Uuid(Uuid),
    /// Timestamp.
    Timestamp(DateTime<Utc>),
    /// SQL NULL; `Eq`/`Ne` render as `IS NULL`/`IS NOT NULL`.
    Null,
}

impl From<Uuid> for SqlValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// How a column is compared with a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=` (or `IS NULL`).
    Eq,
    /// `<>` (or `IS NOT NULL`).
    Ne,
    /// `>`.
    Gt,
    /// `>=`.
    Gte,
    /// `<`.
    Lt,
    /// `<=`.
    Lte,
    /// Case-insensitive substring match.
    Contains,
    /// Case-sensitive prefix match.
    StartsWith,
    /// Timestamp falls within the UTC day starting at the value.
    SameDay,
}

impl Operator {
    fn comparison(&self) -> &'static str {
        match self {
            Self::Eq => " = ",
            Self::Ne => " <> ",
            Self::Gt => " > ",
            Self::Gte => " >= ",
            Self::Lt => " < ",
            Self::Lte => " <= ",
            Self::Contains => " ILIKE ",
            Self::StartsWith => " LIKE ",
            Self::SameDay => " >= ",
        }
    }
}

/// Coerces a raw filter value into a bindable value.
pub type Transform = fn(&str) -> AppResult<SqlValue>;

/// How one API filter key maps onto SQL.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// SQL column expression. Static, never taken from input.
    pub column: &'static str,
    /// Comparison to apply.
    pub operator: Operator,
    /// Value coercion.
    pub transform: Transform,
}

impl FieldSpec {
    /// Create a field spec.
    pub const fn new(column: &'static str, operator: Operator, transform: Transform) -> Self {
        Self {
            column,
            operator,
            transform,
        }
    }
}

/// Static lookup table from API filter keys to field specs.
pub type FieldMap = &'static [(&'static str, FieldSpec)];

/// One condition of a WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// SQL column expression.
    pub column: &'static str,
    /// Comparison.
    pub operator: Operator,
    /// Bound value.
    pub value: SqlValue,
}

impl Predicate {
    /// Create a predicate.
    pub fn new(column: &'static str, operator: Operator, value: impl Into<SqlValue>) -> Self {
        Self {
            column,
            operator,
            value: value.into(),
        }
    }

    /// Shorthand for `column = value`.
    pub fn eq(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::new(column, Operator::Eq, value)
    }
}

/// Translate client filters into predicates and AND them with `base`.
///
/// Filters whose key is not in `fields` are ignored. A value the field's
/// transform rejects is a validation error.
pub fn build_where(filters: &[Filter], fields: FieldMap, base: Vec<Predicate>) -> AppResult<Vec<Predicate>> {
    let mut predicates = Vec::with_capacity(filters.len() + base.len());
    for filter in filters {
        let Some((_, spec)) = fields.iter().find(|(key, _)| *key == filter.id) else {
            continue;
        };
        let value = (spec.transform)(&filter.value).map_err(|e| {
            AppError::validation(format!("Invalid value for filter '{}': {}", filter.id, e.message))
        })?;
        predicates.push(Predicate {
            column: spec.column,
            operator: spec.operator,
            value,
        });
    }
    predicates.extend(base);
    Ok(predicates)
}

/// Append ` WHERE p1 AND p2 ...` to the builder. Appends nothing for no predicates.
pub fn push_where(qb: &mut QueryBuilder<'static, Postgres>, predicates: &[Predicate]) {
    for (i, predicate) in predicates.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        push_predicate(qb, predicate);
    }
}

fn push_predicate(qb: &mut QueryBuilder<'static, Postgres>, predicate: &Predicate) {
    let column = predicate.column;
    match (predicate.operator, &predicate.value) {
        (Operator::Eq, SqlValue::Null) => {
            qb.push(column).push(" IS NULL");
        }
        (Operator::Ne, SqlValue::Null) => {
            qb.push(column).push(" IS NOT NULL");
        }
        (Operator::Contains, value) => {
            qb.push(column).push(" ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(&value_as_text(value))));
        }
        (Operator::StartsWith, value) => {
            qb.push(column).push(" LIKE ");
            qb.push_bind(format!("{}%", escape_like(&value_as_text(value))));
        }
        (Operator::SameDay, SqlValue::Timestamp(start)) => {
            qb.push("(").push(column).push(" >= ");
            qb.push_bind(*start);
            qb.push(" AND ").push(column).push(" < ");
            qb.push_bind(*start + Duration::days(1));
            qb.push(")");
        }
        (operator, value) => {
            qb.push(column).push(operator.comparison());
            push_value(qb, value);
        }
    }
}

fn push_value(qb: &mut QueryBuilder<'static, Postgres>, value: &SqlValue) {
    match value {
        SqlValue::Text(v) => qb.push_bind(v.clone()),
        SqlValue::Bool(v) => qb.push_bind(*v),
        SqlValue::Int(v) => qb.push_bind(*v),
        SqlValue::Uuid(v) => qb.push_bind(*v),
        SqlValue::Timestamp(v) => qb.push_bind(*v),
        SqlValue::Null => qb.push("NULL"),
    };
}

fn value_as_text(value: &SqlValue) -> String {
    match value {
        SqlValue::Text(v) => v.clone(),
        SqlValue::Bool(v) => v.to_string(),
        SqlValue::Int(v) => v.to_string(),
        SqlValue::Uuid(v) => v.to_string(),
        SqlValue::Timestamp(v) => v.to_rfc3339(),
        SqlValue::Null => String::new(),
    }
}

/// Escape `%`, `_` and `\` so the input matches literally inside a LIKE pattern.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Ready-made value transforms for field maps.
pub mod transform {
    use super::*;

    /// Keep the value as text.
    pub fn text(value: &str) -> AppResult<SqlValue> {
        Ok(SqlValue::Text(value.to_string()))
    }

    /// Lowercased text, for enum columns compared as `::text`.
    pub fn lowercase(value: &str) -> AppResult<SqlValue> {
        Ok(SqlValue::Text(value.trim().to_lowercase()))
    }

    /// `true`/`false` (also `1`/`0`).
    pub fn boolean(value: &str) -> AppResult<SqlValue> {
        match value.trim().to_lowercase().as_str() {
            "true" | "1" => Ok(SqlValue::Bool(true)),
            "false" | "0" => Ok(SqlValue::Bool(false)),
            other => Err(AppError::validation(format!("expected a boolean, got '{other}'"))),
        }
    }

    /// Signed integer.
    pub fn integer(value: &str) -> AppResult<SqlValue> {
        value
            .trim()
            .parse::<i64>()
            .map(SqlValue::Int)
            .map_err(|_| AppError::validation(format!("expected an integer, got '{value}'")))
    }

    /// UUID.
    pub fn uuid(value: &str) -> AppResult<SqlValue> {
        Uuid::parse_str(value.trim())
            .map(SqlValue::Uuid)
            .map_err(|_| AppError::validation(format!("expected a UUID, got '{value}'")))
    }

    /// UUID, or SQL NULL for `"null"` / empty.
    pub fn uuid_or_null(value: &str) -> AppResult<SqlValue> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
            return Ok(SqlValue::Null);
        }
        uuid(trimmed)
    }

    /// Start of the UTC day named by `YYYY-MM-DD` or by any RFC 3339 timestamp.
    pub fn day_start(value: &str) -> AppResult<SqlValue> {
        let trimmed = value.trim();
        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(trimmed)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc).date_naive())
            })
            .ok_or_else(|| AppError::validation(format!("expected a date, got '{value}'")))?;
        Ok(SqlValue::Timestamp(date.and_time(NaiveTime::MIN).and_utc()))
    }

    /// RFC 3339 timestamp.
    pub fn timestamp(value: &str) -> AppResult<SqlValue> {
        DateTime::parse_from_rfc3339(value.trim())
            .map(|dt| SqlValue::Timestamp(dt.with_timezone(&Utc)))
            .map_err(|_| AppError::validation(format!("expected an RFC 3339 timestamp, got '{value}'")))
    }
}
