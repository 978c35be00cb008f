//! UNP reference table repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::conflict_on_unique;
use super::entities::unp::{self, ActiveModel, Entity as UnpEntity};
use crate::domain::Unp;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UnpRepository: Send + Sync {
    /// Look up a reference entry by its nine-digit value
    async fn find_by_value(&self, value: &str) -> AppResult<Option<Unp>>;

    /// Add a reference entry
    async fn create(&self, value: &str) -> AppResult<Unp>;

    async fn list(&self) -> AppResult<Vec<Unp>>;
}

pub struct UnpStore {
    db: DatabaseConnection,
}

impl UnpStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnpRepository for UnpStore {
    async fn find_by_value(&self, value: &str) -> AppResult<Option<Unp>> {
        let model = UnpEntity::find()
            .filter(unp::Column::Unp.eq(value))
            .one(&self.db)
            .await?;

        Ok(model.map(Unp::from))
    }

    async fn create(&self, value: &str) -> AppResult<Unp> {
        let active_model = ActiveModel {
            unp: Set(value.to_string()),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, format!("UNP {}", value).as_str()))?;

        Ok(Unp::from(model))
    }

    async fn list(&self) -> AppResult<Vec<Unp>> {
        let models = UnpEntity::find()
            .order_by_asc(unp::Column::Unp)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Unp::from).collect())
    }
}
