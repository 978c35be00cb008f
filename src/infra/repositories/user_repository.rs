//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::conflict_on_unique;
use super::entities::{
    activity, declaration,
    unp::Entity as UnpEntity,
    user::{self, ActiveModel, Entity as UserEntity},
    vehicle,
};
use crate::domain::{NewUser, User, UserChanges, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find user by login name
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;

    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// Whether any user is bound to the given UNP reference row
    async fn exists_by_unp_id(&self, unp_id: i64) -> AppResult<bool>;

    /// Create a new user
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Apply the present fields of `changes`
    async fn update(&self, id: i64, changes: UserChanges) -> AppResult<User>;

    /// Delete the user together with their activities, vehicles and
    /// declarations in one transaction
    async fn delete_with_dependents(&self, id: i64) -> AppResult<()>;

    /// List all users ordered by ID
    async fn list(&self) -> AppResult<Vec<User>>;

    /// One page of users plus the total count
    async fn list_paginated(&self, params: &PaginationParams) -> AppResult<(Vec<User>, u64)>;

    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .find_also_related(UnpEntity)
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .find_also_related(UnpEntity)
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn exists_by_unp_id(&self, unp_id: i64) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::UnpId.eq(unp_id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            username: Set(new_user.username),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.to_string()),
            name: Set(new_user.name),
            email: Set(new_user.email),
            activity_type: Set(new_user.activity_type),
            unp_id: Set(new_user.unp_id),
            verified: Set(new_user.verified),
            created_by: Set(Some(new_user.created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        // Unique indexes cover both the username and the UNP binding
        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, "User with this username or UNP"))?;

        self.find_by_id(model.id)
            .await?
            .ok_or_else(|| AppError::internal("Created user could not be reloaded"))
    }

    async fn update(&self, id: i64, changes: UserChanges) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found(format!("User with id {} not found", id))?;

        let mut active: ActiveModel = user.into();

        if let Some(email) = changes.email {
            active.email = Set(Some(email));
        }
        if let Some(name) = changes.name {
            active.name = Set(Some(name));
        }
        if let Some(activity_type) = changes.activity_type {
            active.activity_type = Set(Some(activity_type));
        }
        active.updated_at = Set(chrono::Utc::now());

        active.update(&self.db).await?;

        self.find_by_id(id)
            .await?
            .ok_or_not_found(format!("User with id {} not found", id))
    }

    async fn delete_with_dependents(&self, id: i64) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let outcome = async {
            activity::Entity::delete_many()
                .filter(activity::Column::UserId.eq(id))
                .exec(&txn)
                .await?;
            vehicle::Entity::delete_many()
                .filter(vehicle::Column::ClientId.eq(id))
                .exec(&txn)
                .await?;
            declaration::Entity::delete_many()
                .filter(declaration::Column::ClientId.eq(id))
                .exec(&txn)
                .await?;
            UserEntity::delete_by_id(id).exec(&txn).await
        }
        .await;

        match outcome {
            Ok(result) if result.rows_affected > 0 => {
                txn.commit().await?;
                Ok(())
            }
            Ok(_) => {
                txn.rollback().await?;
                Err(AppError::not_found(format!("User with id {} not found", id)))
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(AppError::from(e))
            }
        }
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .find_also_related(UnpEntity)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn list_paginated(&self, params: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let paginator = UserEntity::find()
            .find_also_related(UnpEntity)
            .order_by_asc(user::Column::Id)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_index()).await?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }

    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(user::Column::Role.eq(role.as_str()))
            .find_also_related(UnpEntity)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }
}
