//! SQL rendering of predicates and scoped SELECT queries.

use std::marker::PhantomData;

use autoremove_core::auto_remove::{AutoRemovable, AutoRemoveColumns, AutoRemoveScope};
use autoremove_core::error::CoreError;
use autoremove_core::predicate::{Predicate, Value};
use autoremove_core::soft_delete::{validate_column_ref, TrashedFilter};
use autoremove_core::types::{AutoRemoveCode, DbId};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::error::DbResult;

/// Append `predicate` to `builder`.
///
/// Every column reference is validated before anything is pushed; values are
/// always bound, never interpolated.
pub fn push_predicate(
    builder: &mut QueryBuilder<'_, Postgres>,
    predicate: &Predicate,
) -> Result<(), CoreError> {
    for column in predicate.columns() {
        validate_column_ref(column)?;
    }
    render(builder, predicate);
    Ok(())
}

fn render(builder: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::IsNull(column) => {
            builder.push(column).push(" IS NULL");
        }
        Predicate::IsNotNull(column) => {
            builder.push(column).push(" IS NOT NULL");
        }
        Predicate::Eq(column, value) => {
            builder.push(column).push(" = ");
            push_value(builder, value);
        }
        Predicate::And(parts) => render_joined(builder, parts, " AND ", "TRUE"),
        Predicate::Or(parts) => render_joined(builder, parts, " OR ", "FALSE"),
    }
}

fn render_joined(
    builder: &mut QueryBuilder<'_, Postgres>,
    parts: &[Predicate],
    separator: &str,
    empty: &str,
) {
    if parts.is_empty() {
        builder.push(empty);
        return;
    }
    builder.push("(");
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            builder.push(separator);
        }
        render(builder, part);
    }
    builder.push(")");
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &Value) {
    match value {
        Value::Int(v) => builder.push_bind(*v),
        Value::Text(v) => builder.push_bind(v.clone()),
        Value::Bool(v) => builder.push_bind(*v),
    };
}

/// A SELECT over one auto-removable table.
///
/// Starts out excluding trashed rows, like any soft-delete aware query. The
/// last call among [`with_trashed`](Self::with_trashed),
/// [`only_trashed`](Self::only_trashed), [`without_trashed`](Self::without_trashed)
/// and [`scope`](Self::scope) decides the trashed filter; scope predicates and
/// [`filter`](Self::filter) predicates accumulate and are ANDed together.
#[derive(Debug, Clone)]
pub struct ScopedQuery<M> {
    trashed: TrashedFilter,
    scopes: Vec<AutoRemoveScope>,
    filters: Vec<Predicate>,
    limit: Option<i64>,
    _model: PhantomData<fn() -> M>,
}

impl<M: AutoRemovable> Default for ScopedQuery<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: AutoRemovable> ScopedQuery<M> {
    pub fn new() -> Self {
        Self {
            trashed: TrashedFilter::Without,
            scopes: Vec::new(),
            filters: Vec::new(),
            limit: None,
            _model: PhantomData,
        }
    }

    pub fn with_trashed(mut self) -> Self {
        self.trashed = TrashedFilter::With;
        self
    }

    pub fn only_trashed(mut self) -> Self {
        self.trashed = TrashedFilter::Only;
        self
    }

    pub fn without_trashed(mut self) -> Self {
        self.trashed = TrashedFilter::Without;
        self
    }

    /// Apply an auto-remove scope, switching to the trashed filter it needs.
    pub fn scope(mut self, scope: AutoRemoveScope) -> Self {
        self.trashed = scope.trashed_filter();
        self.scopes.push(scope);
        self
    }

    /// AND an extra caller predicate onto the query.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn trashed_filter(&self) -> TrashedFilter {
        self.trashed
    }

    /// The complete WHERE predicate for this query.
    pub fn predicate(&self) -> Result<Predicate, CoreError> {
        let columns = AutoRemoveColumns::for_model::<M>()?;
        let mut predicate = self.trashed.predicate(&columns.qualified_deleted_at());
        for scope in &self.scopes {
            predicate = predicate.and(scope.predicate(&columns));
        }
        for filter in &self.filters {
            predicate = predicate.and(filter.clone());
        }
        Ok(predicate)
    }

    /// Render the query. `projection` is the SELECT list.
    pub fn build(&self, projection: &str) -> Result<QueryBuilder<'static, Postgres>, CoreError> {
        let columns = AutoRemoveColumns::for_model::<M>()?;
        let table = columns.table();
        let mut builder = QueryBuilder::new(format!("SELECT {projection} FROM {table} WHERE "));
        push_predicate(&mut builder, &self.predicate()?)?;
        Ok(builder)
    }

    fn build_select(&self) -> Result<QueryBuilder<'static, Postgres>, CoreError> {
        let columns = AutoRemoveColumns::for_model::<M>()?;
        let mut builder = self.build(&format!("{}.*", columns.table()))?;
        builder.push(" ORDER BY ").push(columns.qualified_id());
        if let Some(limit) = self.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }
        Ok(builder)
    }

    /// Count matching rows. Ignores the limit.
    pub async fn count(&self, pool: &PgPool) -> DbResult<i64> {
        let mut builder = self.build("COUNT(*)")?;
        let count = builder.build_query_scalar::<i64>().fetch_one(pool).await?;
        Ok(count)
    }
}

impl<M> ScopedQuery<M>
where
    M: AutoRemovable + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    /// Fetch matching rows ordered by id.
    pub async fn fetch_all(&self, pool: &PgPool) -> DbResult<Vec<M>> {
        let mut builder = self.build_select()?;
        let rows = builder.build_query_as::<M>().fetch_all(pool).await?;
        tracing::debug!(table = M::TABLE, rows = rows.len(), "Fetched scoped rows");
        Ok(rows)
    }

    /// Fetch the first matching row by id, if any.
    pub async fn fetch_optional(&self, pool: &PgPool) -> DbResult<Option<M>> {
        let mut builder = self.build_select()?;
        let row = builder.build_query_as::<M>().fetch_optional(pool).await?;
        Ok(row)
    }
}

/// Live rows plus rows auto-removed with `code` (any code when `None`).
pub fn with_auto_removed<M: AutoRemovable>(code: Option<AutoRemoveCode>) -> ScopedQuery<M> {
    ScopedQuery::new().scope(AutoRemoveScope::WithAutoRemoved(code))
}

/// Trashed rows auto-removed with `code` (any code when `None`).
pub fn only_auto_removed<M: AutoRemovable>(code: Option<AutoRemoveCode>) -> ScopedQuery<M> {
    ScopedQuery::new().scope(AutoRemoveScope::OnlyAutoRemoved(code))
}

/// Trashed rows carrying no code.
pub fn only_not_auto_removed<M: AutoRemovable>() -> ScopedQuery<M> {
    ScopedQuery::new().scope(AutoRemoveScope::OnlyNotAutoRemoved)
}

/// Find a row by id regardless of its deleted status.
pub async fn find_with_trashed<M>(pool: &PgPool, id: DbId) -> DbResult<Option<M>>
where
    M: AutoRemovable + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let columns = AutoRemoveColumns::for_model::<M>()?;
    ScopedQuery::<M>::new()
        .with_trashed()
        .filter(Predicate::eq(columns.qualified_id(), id))
        .fetch_optional(pool)
        .await
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
