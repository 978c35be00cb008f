//! Customs declaration database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Declaration, DeclarationStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "declarations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub declaration_number: String,
    pub declaration_type: String,
    pub tnved_code: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub product_description: String,
    pub product_value: f64,
    pub net_weight: f64,
    pub quantity: i32,
    pub country_of_origin: Option<String>,
    pub country_of_destination: Option<String>,
    pub customs_office: Option<String>,
    pub status: String,
    pub client_id: i64,
    pub submitted_at: DateTimeUtc,
    pub reviewed_at: Option<DateTimeUtc>,
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

impl From<(Model, Option<super::user::Model>)> for Declaration {
    fn from((model, client): (Model, Option<super::user::Model>)) -> Self {
        Declaration {
            id: model.id,
            declaration_number: model.declaration_number,
            declaration_type: model.declaration_type,
            tnved_code: model.tnved_code,
            product_description: model.product_description,
            product_value: model.product_value,
            net_weight: model.net_weight,
            quantity: model.quantity,
            country_of_origin: model.country_of_origin,
            country_of_destination: model.country_of_destination,
            customs_office: model.customs_office,
            status: DeclarationStatus::from(model.status.as_str()),
            client_id: model.client_id,
            client_name: client.and_then(|c| c.name),
            submitted_at: model.submitted_at,
            reviewed_at: model.reviewed_at,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
