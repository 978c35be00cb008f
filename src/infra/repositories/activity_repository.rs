//! Activity repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::entities::{
    activity::{self, ActiveModel, Entity as ActivityEntity},
    user::Entity as UserEntity,
};
use crate::domain::{Activity, ActivityChanges, NewActivity};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Activity>>;

    /// All activities, newest first
    async fn list(&self) -> AppResult<Vec<Activity>>;

    /// A user's activities, newest first
    async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<Activity>>;

    /// At most `limit` of a user's most recent activities
    async fn list_recent_by_user(&self, user_id: i64, limit: u64) -> AppResult<Vec<Activity>>;

    async fn list_by_user_paginated(
        &self,
        user_id: i64,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Activity>, u64)>;

    /// Activities dated within `[start, end]`, newest first
    async fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Activity>>;

    async fn list_by_user_and_date_range(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Activity>>;

    /// Case-insensitive substring match on the description
    async fn search_by_user(&self, user_id: i64, keyword: &str) -> AppResult<Vec<Activity>>;

    async fn create(&self, activity: NewActivity) -> AppResult<Activity>;

    async fn update(&self, id: i64, changes: ActivityChanges) -> AppResult<Activity>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: i64) -> AppResult<bool>;

    /// Number of rows removed
    async fn delete_by_user(&self, user_id: i64) -> AppResult<u64>;

    async fn count_by_user(&self, user_id: i64) -> AppResult<u64>;

    /// Activities dated within `[start, end)`
    async fn count_by_user_between(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<u64>;
}

pub struct ActivityStore {
    db: DatabaseConnection,
}

impl ActivityStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActivityRepository for ActivityStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Activity>> {
        let result = ActivityEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await?;

        Ok(result.map(Activity::from))
    }

    async fn list(&self) -> AppResult<Vec<Activity>> {
        let models = ActivityEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(activity::Column::ActivityDate)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Activity::from).collect())
    }

    async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<Activity>> {
        let models = ActivityEntity::find()
            .filter(activity::Column::UserId.eq(user_id))
            .find_also_related(UserEntity)
            .order_by_desc(activity::Column::ActivityDate)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Activity::from).collect())
    }

    async fn list_recent_by_user(&self, user_id: i64, limit: u64) -> AppResult<Vec<Activity>> {
        let models = ActivityEntity::find()
            .filter(activity::Column::UserId.eq(user_id))
            .find_also_related(UserEntity)
            .order_by_desc(activity::Column::ActivityDate)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Activity::from).collect())
    }

    async fn list_by_user_paginated(
        &self,
        user_id: i64,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Activity>, u64)> {
        let paginator = ActivityEntity::find()
            .filter(activity::Column::UserId.eq(user_id))
            .find_also_related(UserEntity)
            .order_by_desc(activity::Column::ActivityDate)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_index()).await?;

        Ok((models.into_iter().map(Activity::from).collect(), total))
    }

    async fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Activity>> {
        let models = ActivityEntity::find()
            .filter(activity::Column::ActivityDate.between(start, end))
            .find_also_related(UserEntity)
            .order_by_desc(activity::Column::ActivityDate)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Activity::from).collect())
    }

    async fn list_by_user_and_date_range(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Activity>> {
        let models = ActivityEntity::find()
            .filter(activity::Column::UserId.eq(user_id))
            .filter(activity::Column::ActivityDate.between(start, end))
            .find_also_related(UserEntity)
            .order_by_desc(activity::Column::ActivityDate)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Activity::from).collect())
    }

    async fn search_by_user(&self, user_id: i64, keyword: &str) -> AppResult<Vec<Activity>> {
        let pattern = format!("%{}%", keyword.to_lowercase());
        let models = ActivityEntity::find()
            .filter(activity::Column::UserId.eq(user_id))
            .filter(
                Expr::expr(Func::lower(Expr::col((
                    activity::Entity,
                    activity::Column::Description,
                ))))
                .like(pattern),
            )
            .find_also_related(UserEntity)
            .order_by_desc(activity::Column::ActivityDate)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Activity::from).collect())
    }

    async fn create(&self, new_activity: NewActivity) -> AppResult<Activity> {
        let now = Utc::now();
        let active_model = ActiveModel {
            user_id: Set(new_activity.user_id),
            description: Set(new_activity.description),
            activity_date: Set(new_activity.activity_date),
            created_by: Set(Some(new_activity.created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;

        self.find_by_id(model.id)
            .await?
            .ok_or_else(|| AppError::internal("Created activity could not be reloaded"))
    }

    async fn update(&self, id: i64, changes: ActivityChanges) -> AppResult<Activity> {
        let existing = ActivityEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found(format!("Activity with id {} not found", id))?;

        let mut active: ActiveModel = existing.into();
        active.description = Set(changes.description);
        if let Some(date) = changes.activity_date {
            active.activity_date = Set(date);
        }
        active.updated_at = Set(Utc::now());

        active.update(&self.db).await?;

        self.find_by_id(id)
            .await?
            .ok_or_not_found(format!("Activity with id {} not found", id))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = ActivityEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_by_user(&self, user_id: i64) -> AppResult<u64> {
        let result = ActivityEntity::delete_many()
            .filter(activity::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn count_by_user(&self, user_id: i64) -> AppResult<u64> {
        let count = ActivityEntity::find()
            .filter(activity::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn count_by_user_between(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<u64> {
        let count = ActivityEntity::find()
            .filter(activity::Column::UserId.eq(user_id))
            .filter(activity::Column::ActivityDate.gte(start))
            .filter(activity::Column::ActivityDate.lt(end))
            .count(&self.db)
            .await?;

        Ok(count)
    }
}
