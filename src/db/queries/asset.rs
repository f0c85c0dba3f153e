use sqlx::postgres::Postgres;
use sqlx::{QueryBuilder, Row};

use super::*;
use crate::db::{map_row, AssetRecord, FilterSet, Predicate};
use crate::services::error::{Error, Result};

impl Queries {
    /// `SELECT *` from `table` under `filters`, mapped into `T` in store order.
    /// Non-positive `limit`/`offset` are left out of the statement.
    pub async fn query_with_dynamic_filter<T: AssetRecord>(
        &self,
        table: &str,
        limit: i64,
        offset: i64,
        filters: &FilterSet,
    ) -> Result<Vec<T>> {
        let mut builder = select_statement(table, limit, offset, filters)?;
        log::debug!("query_with_dynamic_filter: {}", builder.sql());

        let rows = builder
            .build()
            .fetch_all(self.db.as_ref())
            .await
            .map_err(|e| Error::execution(table, e))?;

        rows.iter().map(map_row::<T, _>).collect()
    }

    /// Returns `(matching rows, distinct owners)`; both counts see the same predicates.
    pub async fn count_items_with_filter(
        &self,
        table: &str,
        filters: &FilterSet,
    ) -> Result<(i64, i64)> {
        let items = self
            .fetch_count(table, count_statement(table, "COUNT(*)", filters)?)
            .await?;
        let holders = self
            .fetch_count(
                table,
                count_statement(table, "COUNT(DISTINCT owner)", filters)?,
            )
            .await?;
        Ok((items, holders))
    }

    async fn fetch_count(
        &self,
        table: &str,
        mut builder: QueryBuilder<'_, Postgres>,
    ) -> Result<i64> {
        log::debug!("count_items_with_filter: {}", builder.sql());
        builder
            .build()
            .fetch_one(self.db.as_ref())
            .await
            .and_then(|row| row.try_get::<i64, _>(0))
            .map_err(|e| Error::execution(table, e))
    }
}

pub(crate) fn select_statement<'a>(
    table: &str,
    limit: i64,
    offset: i64,
    filters: &'a FilterSet,
) -> Result<QueryBuilder<'a, Postgres>> {
    let mut builder = base_statement(table, "*")?;
    push_predicates(&mut builder, filters);

    if limit > 0 {
        builder.push(format_args!(" LIMIT {limit}"));
    }
    if offset > 0 {
        builder.push(format_args!(" OFFSET {offset}"));
    }
    Ok(builder)
}

pub(crate) fn count_statement<'a>(
    table: &str,
    projection: &str,
    filters: &'a FilterSet,
) -> Result<QueryBuilder<'a, Postgres>> {
    let mut builder = base_statement(table, projection)?;
    push_predicates(&mut builder, filters);
    Ok(builder)
}

fn base_statement<'a>(table: &str, projection: &str) -> Result<QueryBuilder<'a, Postgres>> {
    if !is_identifier(table) {
        return Err(Error::QueryBuild(format!("invalid table name `{table}`")));
    }
    Ok(QueryBuilder::new(format!("SELECT {projection} FROM {table}")))
}

fn push_predicates<'a>(builder: &mut QueryBuilder<'a, Postgres>, filters: &'a FilterSet) {
    for (i, predicate) in filters.predicates().into_iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        match predicate {
            Predicate::Gte(column, value) => {
                builder.push(format_args!("{column} >= "));
                builder.push_bind(value).push("::timestamptz");
            }
            Predicate::Lte(column, value) => {
                builder.push(format_args!("{column} <= "));
                builder.push_bind(value).push("::timestamptz");
            }
            Predicate::Eq(column, value) => {
                builder.push(format_args!("{column} = "));
                builder.push_bind(value);
            }
            Predicate::In(column, values) => {
                builder.push(format_args!("{column} IN ("));
                let mut separated = builder.separated(", ");
                for value in values {
                    separated.push_bind(value.as_str());
                }
                separated.push_unseparated(")");
            }
        }
    }
}

/// Plain or schema-qualified SQL identifier.
fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
