//! A library responsible for interacting with the database.

mod connection;
pub use connection::DatabaseConnectionProvider;

mod db;
pub use db::Database;

mod error;
pub use error::DatabaseError;

mod models;
pub use models::*;

mod operations;
pub use operations::{DatabaseOperations, MetadataKey};

mod transaction;
pub use transaction::DatabaseTransaction;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use sea_orm::DbErr;
