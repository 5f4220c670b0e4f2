/// The error type for database operations.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// A database error occurred.
    #[error("database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),
    /// A stored value could not be parsed.
    #[error("invalid value {value} for {field}")]
    InvalidValue {
        /// The field holding the value.
        field: &'static str,
        /// The stored value.
        value: String,
    },
    /// A numeric value does not fit in the database column.
    #[error("value {0} overflows the database column")]
    Overflow(u64),
}
