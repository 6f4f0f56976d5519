//! SeaORM Entity for GPU price observations (append-only)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "price_histories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub gpu_id: i32,
    /// Observed price in whole currency units
    pub price: i32,
    /// When the price was observed
    pub recorded_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::gpus::Entity",
        from = "Column::GpuId",
        to = "super::gpus::Column::Id",
        on_delete = "Cascade"
    )]
    Gpu,
}

impl Related<super::gpus::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Gpu.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
