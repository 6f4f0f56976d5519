pub use sea_orm_migration::prelude::*;

mod m20260215_000001_create_gpus;
mod m20260215_000002_create_price_histories;
mod m20260215_000003_create_favorites;
mod m20260215_000004_create_sync_status;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260215_000001_create_gpus::Migration),
            Box::new(m20260215_000002_create_price_histories::Migration),
            Box::new(m20260215_000003_create_favorites::Migration),
            Box::new(m20260215_000004_create_sync_status::Migration),
        ]
    }
}
