//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{User, UserRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub activity_type: Option<String>,
    /// Bound UNP reference row (clients only)
    #[sea_orm(unique)]
    pub unp_id: Option<i64>,
    pub verified: bool,
    pub created_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::unp::Entity",
        from = "Column::UnpId",
        to = "super::unp::Column::Id"
    )]
    Unp,
}

impl Related<super::unp::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unp.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model (with its joined UNP row) to domain entity
impl From<(Model, Option<super::unp::Model>)> for User {
    fn from((model, unp): (Model, Option<super::unp::Model>)) -> Self {
        User {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
            role: UserRole::from(model.role.as_str()),
            name: model.name,
            email: model.email,
            activity_type: model.activity_type,
            unp: unp.map(|u| u.unp),
            verified: model.verified,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
