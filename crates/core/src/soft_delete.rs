//! Soft-delete capability and the base trashed filters.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::predicate::Predicate;
use crate::types::{DbId, Timestamp};

/// Primary key column every soft-deletable table is expected to have.
pub const ID_COLUMN: &str = "id";

/// Default name of the soft-delete timestamp column.
pub const DEFAULT_DELETED_AT_COLUMN: &str = "deleted_at";

/// PostgreSQL truncates identifiers beyond 63 bytes.
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Pattern for bare SQL identifiers accepted as table or column names.
pub const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IDENTIFIER_PATTERN).expect("valid regex"));

/// An entity whose rows are marked deleted by a timestamp instead of removed.
pub trait SoftDeletable {
    /// Table backing the entity.
    const TABLE: &'static str;

    /// Column holding the soft-delete timestamp.
    const DELETED_AT_COLUMN: &'static str = DEFAULT_DELETED_AT_COLUMN;

    fn id(&self) -> DbId;

    fn deleted_at(&self) -> Option<Timestamp>;

    fn set_deleted_at(&mut self, deleted_at: Option<Timestamp>);

    /// Whether the entity is currently soft-deleted.
    fn trashed(&self) -> bool {
        self.deleted_at().is_some()
    }
}

/// Which rows a query sees with respect to soft deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrashedFilter {
    /// Live rows only.
    #[default]
    Without,
    /// Live and trashed rows.
    With,
    /// Trashed rows only.
    Only,
}

impl TrashedFilter {
    /// The predicate this filter contributes over `deleted_at_column`.
    pub fn predicate(self, deleted_at_column: &str) -> Predicate {
        match self {
            TrashedFilter::Without => Predicate::is_null(deleted_at_column),
            TrashedFilter::With => Predicate::always(),
            TrashedFilter::Only => Predicate::is_not_null(deleted_at_column),
        }
    }

    /// In-memory counterpart of [`TrashedFilter::predicate`].
    pub fn matches(self, trashed: bool) -> bool {
        match self {
            TrashedFilter::Without => !trashed,
            TrashedFilter::With => true,
            TrashedFilter::Only => trashed,
        }
    }
}

/// Validate a bare identifier (table or column name) destined for SQL text.
pub fn validate_identifier(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Identifier must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(CoreError::Validation(format!(
            "Identifier '{name}' exceeds {MAX_IDENTIFIER_LENGTH} characters"
        )));
    }
    if !IDENTIFIER_RE.is_match(name) {
        return Err(CoreError::Validation(format!(
            "Identifier '{name}' must match {IDENTIFIER_PATTERN}"
        )));
    }
    Ok(())
}

/// Validate a column reference, either `column` or `table.column`.
pub fn validate_column_ref(reference: &str) -> Result<(), CoreError> {
    let mut parts = reference.split('.');
    let first = parts.next().unwrap_or_default();
    validate_identifier(first)?;
    match (parts.next(), parts.next()) {
        (None, _) => Ok(()),
        (Some(column), None) => validate_identifier(column),
        (Some(_), Some(_)) => Err(CoreError::Validation(format!(
            "Column reference '{reference}' has too many parts"
        ))),
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Value;

    struct Note {
        id: DbId,
        deleted_at: Option<Timestamp>,
    }

    impl SoftDeletable for Note {
        const TABLE: &'static str = "notes";

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

    // -- SoftDeletable --

    #[test]
    fn trashed_follows_deleted_at() {
        let mut note = Note {
            id: 1,
            deleted_at: None,
        };
        assert!(!note.trashed());
        note.set_deleted_at(Some(chrono::Utc::now()));
        assert!(note.trashed());
        assert_eq!(note.id(), 1);
    }

    #[test]
    fn default_deleted_at_column() {
        assert_eq!(Note::DELETED_AT_COLUMN, "deleted_at");
    }

    // -- TrashedFilter --

    #[test]
    fn filter_predicate_agrees_with_matches() {
        for filter in [TrashedFilter::Without, TrashedFilter::With, TrashedFilter::Only] {
            let predicate = filter.predicate("deleted_at");
            for trashed in [false, true] {
                let row = |col: &str| match col {
                    "deleted_at" if trashed => Some(Value::Int(1)),
                    _ => None,
                };
                assert_eq!(
                    predicate.evaluate(&row),
                    filter.matches(trashed),
                    "{filter:?} disagrees for trashed={trashed}"
                );
            }
        }
    }

    #[test]
    fn default_filter_excludes_trashed() {
        assert_eq!(TrashedFilter::default(), TrashedFilter::Without);
        assert!(!TrashedFilter::default().matches(true));
    }

    // -- identifiers --

    #[test]
    fn valid_identifiers_accepted() {
        assert!(validate_identifier("deleted_at").is_ok());
        assert!(validate_identifier("_private").is_ok());
        assert!(validate_identifier("Table2").is_ok());
    }

    #[test]
    fn invalid_identifiers_rejected() {
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("1abc").is_err());
        assert!(validate_identifier("drop table;").is_err());
        assert!(validate_identifier("a\"b").is_err());
        assert!(validate_identifier(&"x".repeat(64)).is_err());
    }

    #[test]
    fn column_refs_allow_one_qualifier() {
        assert!(validate_column_ref("auto_remove").is_ok());
        assert!(validate_column_ref("documents.auto_remove").is_ok());
        assert!(validate_column_ref("public.documents.auto_remove").is_err());
        assert!(validate_column_ref("documents.").is_err());
    }
}
