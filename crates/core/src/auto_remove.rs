//! Auto-remove codes layered on top of soft deletion.
//!
//! A trashed row carrying a code was removed by the system (typically as a
//! consequence of its parent being removed); a trashed row without a code was
//! removed by hand. The scopes here let callers tell the two apart, and
//! [`crate::store`] provides the operations that set and clear the code.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::predicate::Predicate;
use crate::soft_delete::{validate_identifier, SoftDeletable, TrashedFilter, ID_COLUMN};
use crate::types::AutoRemoveCode;

/// Default name of the auto-remove code column.
pub const DEFAULT_AUTO_REMOVE_COLUMN: &str = "auto_remove";

/// A soft-deletable entity that also records why it was removed.
pub trait AutoRemovable: SoftDeletable {
    /// Column holding the auto-remove code.
    const AUTO_REMOVE_COLUMN: &'static str = DEFAULT_AUTO_REMOVE_COLUMN;

    /// Code reported by [`AutoRemovable::auto_remove_or_default`] when the
    /// instance has none. Entity types that auto-remove should pick a value
    /// unique among their siblings.
    const DEFAULT_AUTO_REMOVE_CODE: Option<AutoRemoveCode> = None;

    fn auto_remove_code(&self) -> Option<AutoRemoveCode>;

    fn set_auto_remove_code(&mut self, code: Option<AutoRemoveCode>);

    /// Trashed and carrying a code.
    fn is_auto_removed(&self) -> bool {
        self.trashed() && self.auto_remove_code().is_some()
    }

    /// The instance code, falling back to the type-level default.
    fn auto_remove_or_default(&self) -> Option<AutoRemoveCode> {
        self.auto_remove_code().or(Self::DEFAULT_AUTO_REMOVE_CODE)
    }
}

/// Validated table and column names for one auto-removable entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoRemoveColumns {
    table: String,
    deleted_at: String,
    auto_remove: String,
}

impl AutoRemoveColumns {
    pub fn new(
        table: impl Into<String>,
        deleted_at: impl Into<String>,
        auto_remove: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let columns = Self {
            table: table.into(),
            deleted_at: deleted_at.into(),
            auto_remove: auto_remove.into(),
        };
        validate_identifier(&columns.table)?;
        validate_identifier(&columns.deleted_at)?;
        validate_identifier(&columns.auto_remove)?;
        Ok(columns)
    }

    /// Columns declared by the entity type's associated constants.
    pub fn for_model<M: AutoRemovable>() -> Result<Self, CoreError> {
        Self::new(M::TABLE, M::DELETED_AT_COLUMN, M::AUTO_REMOVE_COLUMN)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn deleted_at(&self) -> &str {
        &self.deleted_at
    }

    pub fn auto_remove(&self) -> &str {
        &self.auto_remove
    }

    /// `table.id`
    pub fn qualified_id(&self) -> String {
        format!("{}.{ID_COLUMN}", self.table)
    }

    /// `table.deleted_at`
    pub fn qualified_deleted_at(&self) -> String {
        format!("{}.{}", self.table, self.deleted_at)
    }

    /// `table.auto_remove`
    pub fn qualified_auto_remove(&self) -> String {
        format!("{}.{}", self.table, self.auto_remove)
    }
}

/// Query scopes distinguishing automatic from manual removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoRemoveScope {
    /// Live rows plus rows auto-removed with the given code (any code when
    /// `None`). Manually deleted rows are excluded.
    WithAutoRemoved(Option<AutoRemoveCode>),
    /// Trashed rows auto-removed with the given code (any code when `None`).
    OnlyAutoRemoved(Option<AutoRemoveCode>),
    /// Trashed rows without a code.
    OnlyNotAutoRemoved,
}

impl AutoRemoveScope {
    /// The trashed filter the scope runs under.
    pub fn trashed_filter(self) -> TrashedFilter {
        match self {
            AutoRemoveScope::WithAutoRemoved(_) => TrashedFilter::With,
            AutoRemoveScope::OnlyAutoRemoved(_) | AutoRemoveScope::OnlyNotAutoRemoved => {
                TrashedFilter::Only
            }
        }
    }

    /// The scope's own predicate, on top of [`AutoRemoveScope::trashed_filter`].
    pub fn predicate(self, columns: &AutoRemoveColumns) -> Predicate {
        let deleted_at = columns.qualified_deleted_at();
        let auto_remove = columns.qualified_auto_remove();
        match self {
            AutoRemoveScope::WithAutoRemoved(code) => Predicate::is_not_null(deleted_at.clone())
                .and(code_match(code, auto_remove))
                .or(Predicate::is_null(deleted_at)),
            AutoRemoveScope::OnlyAutoRemoved(code) => code_match(code, auto_remove),
            AutoRemoveScope::OnlyNotAutoRemoved => Predicate::is_null(auto_remove),
        }
    }

    /// Trashed filter and scope predicate combined.
    pub fn filter(self, columns: &AutoRemoveColumns) -> Predicate {
        self.trashed_filter()
            .predicate(&columns.qualified_deleted_at())
            .and(self.predicate(columns))
    }

    /// In-memory counterpart of [`AutoRemoveScope::filter`].
    pub fn matches(self, trashed: bool, code: Option<AutoRemoveCode>) -> bool {
        if !self.trashed_filter().matches(trashed) {
            return false;
        }
        match self {
            AutoRemoveScope::WithAutoRemoved(wanted) => {
                !trashed || code_matches(wanted, code)
            }
            AutoRemoveScope::OnlyAutoRemoved(wanted) => code_matches(wanted, code),
            AutoRemoveScope::OnlyNotAutoRemoved => code.is_none(),
        }
    }

    /// Evaluate the scope against an entity instance.
    pub fn matches_model<M: AutoRemovable>(self, model: &M) -> bool {
        self.matches(model.trashed(), model.auto_remove_code())
    }
}

fn code_match(code: Option<AutoRemoveCode>, column: String) -> Predicate {
    match code {
        Some(code) => Predicate::eq(column, code),
        None => Predicate::is_not_null(column),
    }
}

fn code_matches(wanted: Option<AutoRemoveCode>, actual: Option<AutoRemoveCode>) -> bool {
    match wanted {
        Some(wanted) => actual == Some(wanted),
        None => actual.is_some(),
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
