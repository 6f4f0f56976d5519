use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Gpus::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Gpus::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Gpus::Name).string().not_null())
                    .col(ColumnDef::new(Gpus::Manufacturer).string().null())
                    .col(ColumnDef::new(Gpus::Series).string().null())
                    .col(ColumnDef::new(Gpus::Vram).integer().null())
                    .col(ColumnDef::new(Gpus::BenchmarkScore).integer().null())
                    .col(ColumnDef::new(Gpus::ImageUrl).string().null())
                    .col(ColumnDef::new(Gpus::AmazonAsin).string_len(20).null())
                    .col(
                        ColumnDef::new(Gpus::CurrentPrice)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Gpus::Popularity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Gpus::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Gpus::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_gpus_name")
                    .table(Gpus::Table)
                    .col(Gpus::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // NULLs are distinct, so many gpus may lack an ASIN
        manager
            .create_index(
                Index::create()
                    .name("idx_gpus_amazon_asin")
                    .table(Gpus::Table)
                    .col(Gpus::AmazonAsin)
                    .unique()
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_gpus_current_price", Gpus::CurrentPrice),
            ("idx_gpus_manufacturer", Gpus::Manufacturer),
            ("idx_gpus_popularity", Gpus::Popularity),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Gpus::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Gpus::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Gpus {
    Table,
    Id,
    Name,
    Manufacturer,
    Series,
    Vram,
    BenchmarkScore,
    ImageUrl,
    AmazonAsin,
    CurrentPrice,
    Popularity,
    CreatedAt,
    UpdatedAt,
}
