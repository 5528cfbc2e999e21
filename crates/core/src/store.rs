//! Persistence seam and the auto-remove / auto-restore operations.
//!
//! Both operations are two sequential writes. Neither opens a transaction;
//! callers wanting atomicity wrap the calls in one on their side.

use async_trait::async_trait;

use crate::auto_remove::AutoRemovable;
use crate::types::AutoRemoveCode;

/// Writes needed by the auto-remove operations.
///
/// `delete` and `restore` report success as a boolean the way a soft-delete
/// layer does. Both act on the row by id whatever its current state, so
/// `false` means the row was not there. Errors are store failures
/// (connectivity, constraint violations) and are propagated unchanged.
#[async_trait]
pub trait SoftDeleteStore<M>: Send + Sync
where
    M: AutoRemovable + Send + Sync,
{
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist the model's current auto-remove code. Returns `false` if the
    /// row does not exist.
    async fn save_auto_remove_code(&self, model: &M) -> Result<bool, Self::Error>;

    /// Soft-delete the row and record the new timestamp on `model`.
    async fn delete(&self, model: &mut M) -> Result<bool, Self::Error>;

    /// Clear the soft-delete timestamp and update `model` to match.
    async fn restore(&self, model: &mut M) -> Result<bool, Self::Error>;
}

/// Tag `model` with `code`, persist it, then soft-delete it.
///
/// Returns the soft-delete result.
pub async fn auto_remove<M, S>(
    store: &S,
    model: &mut M,
    code: AutoRemoveCode,
) -> Result<bool, S::Error>
where
    M: AutoRemovable + Send + Sync,
    S: SoftDeleteStore<M> + ?Sized,
{
    model.set_auto_remove_code(Some(code));
    if !store.save_auto_remove_code(model).await? {
        tracing::warn!(table = M::TABLE, id = model.id(), code, "Auto-remove code not saved: row missing");
    }

    let deleted = store.delete(model).await?;
    tracing::debug!(table = M::TABLE, id = model.id(), code, deleted, "Auto-removed entity");
    Ok(deleted)
}

/// Restore `model` and, only if that succeeded, clear its code.
///
/// A failed restore leaves the code untouched and returns `Ok(false)`.
pub async fn auto_restore<M, S>(store: &S, model: &mut M) -> Result<bool, S::Error>
where
    M: AutoRemovable + Send + Sync,
    S: SoftDeleteStore<M> + ?Sized,
{
    if !store.restore(model).await? {
        tracing::warn!(
            table = M::TABLE,
            id = model.id(),
            code = ?model.auto_remove_code(),
            "Auto-restore skipped: restore reported failure"
        );
        return Ok(false);
    }

    let previous = model.auto_remove_code();
    model.set_auto_remove_code(None);
    store.save_auto_remove_code(model).await?;
    tracing::debug!(table = M::TABLE, id = model.id(), code = ?previous, "Auto-restored entity");
    Ok(true)
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
