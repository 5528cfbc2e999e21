/// Entity primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Integer tag recorded on rows soft-deleted by the system rather than a user.
pub type AutoRemoveCode = i32;
