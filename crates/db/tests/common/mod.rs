//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use autoremove_core::auto_remove::AutoRemovable;
use autoremove_core::soft_delete::SoftDeletable;
use autoremove_core::types::{AutoRemoveCode, DbId, Timestamp};
use sqlx::{FromRow, PgPool};

/// Code used when a project's removal cascades to its documents.
pub const PROJECT_REMOVED: AutoRemoveCode = 10;

/// Code used when a document's removal cascades to its attachments.
pub const DOCUMENT_REMOVED: AutoRemoveCode = 20;

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct Document {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub deleted_at: Option<Timestamp>,
    pub auto_remove: Option<AutoRemoveCode>,
    pub created_at: Timestamp,
}

impl SoftDeletable for Document {
    const TABLE: &'static str = "documents";

    fn id(&self) -> DbId {
        self.id
    }

    fn deleted_at(&self) -> Option<Timestamp> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, deleted_at: Option<Timestamp>) {
        self.deleted_at = deleted_at;
    }
}

impl AutoRemovable for Document {
    const DEFAULT_AUTO_REMOVE_CODE: Option<AutoRemoveCode> = Some(PROJECT_REMOVED);

    fn auto_remove_code(&self) -> Option<AutoRemoveCode> {
        self.auto_remove
    }

    fn set_auto_remove_code(&mut self, code: Option<AutoRemoveCode>) {
        self.auto_remove = code;
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Attachment {
    pub id: DbId,
    pub document_id: DbId,
    pub file_name: String,
    pub removed_at: Option<Timestamp>,
    pub removal_reason: Option<AutoRemoveCode>,
    pub created_at: Timestamp,
}

impl SoftDeletable for Attachment {
    const TABLE: &'static str = "attachments";
    const DELETED_AT_COLUMN: &'static str = "removed_at";

    fn id(&self) -> DbId {
        self.id
    }

    fn deleted_at(&self) -> Option<Timestamp> {
        self.removed_at
    }

    fn set_deleted_at(&mut self, deleted_at: Option<Timestamp>) {
        self.removed_at = deleted_at;
    }
}

impl AutoRemovable for Attachment {
    const AUTO_REMOVE_COLUMN: &'static str = "removal_reason";

    fn auto_remove_code(&self) -> Option<AutoRemoveCode> {
        self.removal_reason
    }

    fn set_auto_remove_code(&mut self, code: Option<AutoRemoveCode>) {
        self.removal_reason = code;
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub async fn create_project(pool: &PgPool, name: &str) -> DbId {
    let (id,): (DbId,) = sqlx::query_as("INSERT INTO projects (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap();
    id
}

pub async fn create_document(pool: &PgPool, project_id: DbId, title: &str) -> Document {
    sqlx::query_as::<_, Document>(
        "INSERT INTO documents (project_id, title) VALUES ($1, $2) RETURNING *",
    )
    .bind(project_id)
    .bind(title)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_attachment(pool: &PgPool, document_id: DbId, file_name: &str) -> Attachment {
    sqlx::query_as::<_, Attachment>(
        "INSERT INTO attachments (document_id, file_name) VALUES ($1, $2) RETURNING *",
    )
    .bind(document_id)
    .bind(file_name)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Soft-delete a document the way a user would: no code.
pub async fn trash_document_manually(pool: &PgPool, id: DbId) {
    sqlx::query("UPDATE documents SET deleted_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
}

/// Write a document's columns directly, bypassing the extension.
pub async fn force_document_state(
    pool: &PgPool,
    id: DbId,
    trashed: bool,
    code: Option<AutoRemoveCode>,
) {
    sqlx::query(
        "UPDATE documents SET \
         deleted_at = CASE WHEN $2 THEN NOW() ELSE NULL END, auto_remove = $3 \
         WHERE id = $1",
    )
    .bind(id)
    .bind(trashed)
    .bind(code)
    .execute(pool)
    .await
    .unwrap();
}

/// Read a document's `(deleted_at, auto_remove)` straight from the table.
pub async fn document_row(pool: &PgPool, id: DbId) -> (Option<Timestamp>, Option<AutoRemoveCode>) {
    sqlx::query_as("SELECT deleted_at, auto_remove FROM documents WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn ids<M: SoftDeletable>(rows: &[M]) -> Vec<DbId> {
    rows.iter().map(|row| row.id()).collect()
}
