use sea_orm_migration::prelude::*;

use super::m20260215_000001_create_gpus::Gpus;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PriceHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PriceHistories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PriceHistories::GpuId).integer().not_null())
                    .col(ColumnDef::new(PriceHistories::Price).integer().not_null())
                    .col(
                        ColumnDef::new(PriceHistories::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PriceHistories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_price_histories_gpu_id")
                            .from(PriceHistories::Table, PriceHistories::GpuId)
                            .to(Gpus::Table, Gpus::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Trend queries: (gpu_id, recorded_at)
        manager
            .create_index(
                Index::create()
                    .name("idx_price_histories_gpu_recorded")
                    .table(PriceHistories::Table)
                    .col(PriceHistories::GpuId)
                    .col(PriceHistories::RecordedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PriceHistories::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PriceHistories {
    Table,
    Id,
    GpuId,
    Price,
    RecordedAt,
    CreatedAt,
}
