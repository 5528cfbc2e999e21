//! Bulk auto-remove / auto-restore over sets of related rows.
//!
//! When a parent is removed, its children are auto-removed under a code that
//! identifies the parent's removal. Restoring the parent then restores exactly
//! those children, while children a user deleted by hand stay in the bin.
//! Each function is a single `UPDATE`, so it is atomic on its own.

use autoremove_core::auto_remove::{AutoRemovable, AutoRemoveColumns, AutoRemoveScope};
use autoremove_core::predicate::Predicate;
use autoremove_core::soft_delete::TrashedFilter;
use autoremove_core::types::AutoRemoveCode;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::DbResult;
use crate::query::push_predicate;

/// Auto-remove every live row of `M` matching `filter`, tagging it with `code`.
///
/// Returns the number of rows removed. Already trashed rows are left alone,
/// so a manual deletion never gets a code retrofitted.
pub async fn auto_remove_where<M: AutoRemovable>(
    pool: &PgPool,
    code: AutoRemoveCode,
    filter: &Predicate,
) -> DbResult<u64> {
    let columns = AutoRemoveColumns::for_model::<M>()?;
    let mut builder: QueryBuilder<'_, Postgres> =
        QueryBuilder::new(format!("UPDATE {} SET {} = ", columns.table(), columns.auto_remove()));
    builder
        .push_bind(code)
        .push(format!(", {} = NOW() WHERE ", columns.deleted_at()));

    let predicate = TrashedFilter::Without
        .predicate(&columns.qualified_deleted_at())
        .and(filter.clone());
    push_predicate(&mut builder, &predicate)?;

    let affected = builder.build().execute(pool).await?.rows_affected();
    tracing::info!(table = M::TABLE, code, rows_affected = affected, "Auto-removed rows");
    Ok(affected)
}

/// Restore every row of `M` auto-removed with exactly `code` and matching
/// `filter`, clearing the code in the same statement.
///
/// Returns the number of rows restored.
pub async fn auto_restore_by_code<M: AutoRemovable>(
    pool: &PgPool,
    code: AutoRemoveCode,
    filter: &Predicate,
) -> DbResult<u64> {
    let columns = AutoRemoveColumns::for_model::<M>()?;
    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
        "UPDATE {} SET {} = NULL, {} = NULL WHERE ",
        columns.table(),
        columns.deleted_at(),
        columns.auto_remove()
    ));

    let predicate = AutoRemoveScope::OnlyAutoRemoved(Some(code))
        .filter(&columns)
        .and(filter.clone());
    push_predicate(&mut builder, &predicate)?;

    let affected = builder.build().execute(pool).await?.rows_affected();
    tracing::info!(table = M::TABLE, code, rows_affected = affected, "Auto-restored rows");
    Ok(affected)
}
