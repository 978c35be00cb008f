//! Vehicle database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Vehicle;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub license_plate: String,
    #[sea_orm(column_name = "model")]
    pub model_name: Option<String>,
    pub vehicle_type: Option<String>,
    pub year_of_manufacture: Option<i32>,
    pub capacity: Option<f64>,
    pub client_id: i64,
    pub created_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ClientId",
        to = "super::user::Column::Id"
    )]
    Client,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<(Model, Option<super::user::Model>)> for Vehicle {
    fn from((model, client): (Model, Option<super::user::Model>)) -> Self {
        Vehicle {
            id: model.id,
            license_plate: model.license_plate,
            model: model.model_name,
            vehicle_type: model.vehicle_type,
            year_of_manufacture: model.year_of_manufacture,
            capacity: model.capacity,
            client_id: model.client_id,
            client_name: client.and_then(|c| c.name),
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
