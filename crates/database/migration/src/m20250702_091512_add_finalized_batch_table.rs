use sea_orm_migration::{prelude::*, schema::*};

const HASH_LENGTH: u32 = 32;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FinalizedBatch::Table)
                    .if_not_exists()
                    .col(big_unsigned(FinalizedBatch::BatchIndex).primary_key())
                    .col(binary_len(FinalizedBatch::BatchHash, HASH_LENGTH))
                    .col(big_unsigned(FinalizedBatch::TotalL1MessagePopped))
                    .col(binary_len(FinalizedBatch::StateRoot, HASH_LENGTH))
                    .col(binary_len(FinalizedBatch::WithdrawRoot, HASH_LENGTH))
                    .col(big_unsigned(FinalizedBatch::LastBlockNumber))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FinalizedBatch::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum FinalizedBatch {
    Table,
    BatchIndex,
    BatchHash,
    TotalL1MessagePopped,
    StateRoot,
    WithdrawRoot,
    LastBlockNumber,
}
