//! SeaORM Entity for user favorites

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "favorites")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identity issued by the session layer
    pub user_id: i64,
    pub gpu_id: i32,
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
