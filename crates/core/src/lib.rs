//! Domain layer for auto-removable soft-deleted entities.
//!
//! An entity that can be soft-deleted ([`soft_delete::SoftDeletable`]) may
//! additionally carry an auto-remove code ([`auto_remove::AutoRemovable`]).
//! A trashed row with a code was removed by the system; a trashed row without
//! one was removed by hand. Persistence is reached through
//! [`store::SoftDeleteStore`], which the `autoremove-db` crate implements for
//! PostgreSQL.

pub mod auto_remove;
pub mod error;
pub mod predicate;
pub mod soft_delete;
pub mod store;
pub mod types;
