pub use sea_orm_migration::prelude::*;

mod m20250304_125946_add_l1_msg_table;
mod m20250616_223947_add_metadata;
mod m20250702_091512_add_finalized_batch_table;
mod m20250702_093044_add_batch_chunk_range_table;

/// The migrator for the rollup node database.
#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        tracing::trace!(target: "scroll::migration", "loading database migrations");
        vec![
            Box::new(m20250304_125946_add_l1_msg_table::Migration),
            Box::new(m20250616_223947_add_metadata::Migration),
            Box::new(m20250702_091512_add_finalized_batch_table::Migration),
            Box::new(m20250702_093044_add_batch_chunk_range_table::Migration),
        ]
    }
}
