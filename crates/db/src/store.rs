//! `SoftDeleteStore` backed by a PostgreSQL pool.

use async_trait::async_trait;
use autoremove_core::auto_remove::{AutoRemovable, AutoRemoveColumns};
use autoremove_core::soft_delete::ID_COLUMN;
use autoremove_core::store::{self, SoftDeleteStore};
use autoremove_core::types::{AutoRemoveCode, Timestamp};
use sqlx::PgPool;

use crate::error::{DbError, DbResult};

/// Runs soft-delete writes for any [`AutoRemovable`] model against a pool.
///
/// Each write is a single `UPDATE` keyed by `id`, and succeeds whenever that
/// row exists: deleting a trashed row restamps it, restoring a live row is a
/// successful no-op. Table and column names come from the model's associated
/// constants and are validated before use.
#[derive(Debug, Clone)]
pub struct PgSoftDeleteStore {
    pool: PgPool,
}

impl PgSoftDeleteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Tag `model` with `code` and soft-delete it. Returns the soft-delete result.
    pub async fn auto_remove<M>(&self, model: &mut M, code: AutoRemoveCode) -> DbResult<bool>
    where
        M: AutoRemovable + Send + Sync,
    {
        store::auto_remove(self, model, code).await
    }

    /// Restore `model` and clear its code. Returns the restore result.
    pub async fn auto_restore<M>(&self, model: &mut M) -> DbResult<bool>
    where
        M: AutoRemovable + Send + Sync,
    {
        store::auto_restore(self, model).await
    }
}

#[async_trait]
impl<M> SoftDeleteStore<M> for PgSoftDeleteStore
where
    M: AutoRemovable + Send + Sync,
{
    type Error = DbError;

    async fn save_auto_remove_code(&self, model: &M) -> DbResult<bool> {
        let columns = AutoRemoveColumns::for_model::<M>()?;
        let query = format!(
            "UPDATE {} SET {} = $1 WHERE {ID_COLUMN} = $2",
            columns.table(),
            columns.auto_remove()
        );
        let result = sqlx::query(&query)
            .bind(model.auto_remove_code())
            .bind(model.id())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, model: &mut M) -> DbResult<bool> {
        let columns = AutoRemoveColumns::for_model::<M>()?;
        let deleted_at = columns.deleted_at();
        let query = format!(
            "UPDATE {} SET {deleted_at} = NOW() WHERE {ID_COLUMN} = $1 RETURNING {deleted_at}",
            columns.table()
        );
        let stamped: Option<Timestamp> = sqlx::query_scalar(&query)
            .bind(model.id())
            .fetch_optional(&self.pool)
            .await?;
        Ok(match stamped {
            Some(at) => {
                model.set_deleted_at(Some(at));
                true
            }
            None => false,
        })
    }

    async fn restore(&self, model: &mut M) -> DbResult<bool> {
        let columns = AutoRemoveColumns::for_model::<M>()?;
        let deleted_at = columns.deleted_at();
        let query = format!(
            "UPDATE {} SET {deleted_at} = NULL WHERE {ID_COLUMN} = $1",
            columns.table()
        );
        let result = sqlx::query(&query)
            .bind(model.id())
            .execute(&self.pool)
            .await?;
        let restored = result.rows_affected() > 0;
        if restored {
            model.set_deleted_at(None);
        }
        Ok(restored)
    }
}
