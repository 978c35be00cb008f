//! UNP reference table entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Unp;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "unps")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub unp: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Unp {
    fn from(model: Model) -> Self {
        Unp {
            id: model.id,
            unp: model.unp,
            created_at: model.created_at,
        }
    }
}
