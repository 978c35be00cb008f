//! Activity database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Activity;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub activity_date: DateTimeUtc,
    pub created_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<(Model, Option<super::user::Model>)> for Activity {
    fn from((model, user): (Model, Option<super::user::Model>)) -> Self {
        Activity {
            id: model.id,
            user_id: model.user_id,
            user_name: user.and_then(|u| u.name),
            description: model.description,
            activity_date: model.activity_date,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
