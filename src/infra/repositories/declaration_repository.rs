//! Customs declaration repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::conflict_on_unique;
use super::entities::{
    declaration::{self, ActiveModel, Entity as DeclarationEntity},
    user::Entity as UserEntity,
};
use crate::domain::{
    declaration_number_prefix, declaration_sequence, Declaration, DeclarationFields,
    DeclarationStatus, NewDeclaration,
};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DeclarationRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Declaration>>;

    /// All declarations, most recently submitted first
    async fn list(&self) -> AppResult<Vec<Declaration>>;

    async fn list_by_client(&self, client_id: i64) -> AppResult<Vec<Declaration>>;

    async fn list_by_status(&self, status: DeclarationStatus) -> AppResult<Vec<Declaration>>;

    /// Highest sequence issued in `year`, 0 when none is stored
    async fn latest_sequence(&self, year: i32) -> AppResult<u64>;

    /// Insert; a taken declaration number yields `AppError::Conflict`
    async fn create(&self, declaration: NewDeclaration) -> AppResult<Declaration>;

    /// Replace the mutable fields only while the declaration is PENDING.
    /// `None` when no pending declaration with that id was found.
    async fn update_pending(
        &self,
        id: i64,
        fields: DeclarationFields,
    ) -> AppResult<Option<Declaration>>;

    /// Move a PENDING declaration to `status`, stamping `reviewed_at`.
    /// `None` when no pending declaration with that id was found.
    async fn review_pending(
        &self,
        id: i64,
        status: DeclarationStatus,
        reviewed_at: DateTime<Utc>,
    ) -> AppResult<Option<Declaration>>;

    /// Returns false when no pending declaration was deleted
    async fn delete_pending(&self, id: i64) -> AppResult<bool>;

    async fn count_by_client(&self, client_id: i64) -> AppResult<u64>;

    async fn count_by_client_and_status(
        &self,
        client_id: i64,
        status: DeclarationStatus,
    ) -> AppResult<u64>;
}

pub struct DeclarationStore {
    db: DatabaseConnection,
}

impl DeclarationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn reload(&self, id: i64) -> AppResult<Declaration> {
        self.find_by_id(id)
            .await?
            .ok_or_not_found(format!("Declaration with id {} not found", id))
    }
}

#[async_trait]
impl DeclarationRepository for DeclarationStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Declaration>> {
        let result = DeclarationEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await?;

        Ok(result.map(Declaration::from))
    }

    async fn list(&self) -> AppResult<Vec<Declaration>> {
        let models = DeclarationEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(declaration::Column::SubmittedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Declaration::from).collect())
    }

    async fn list_by_client(&self, client_id: i64) -> AppResult<Vec<Declaration>> {
        let models = DeclarationEntity::find()
            .filter(declaration::Column::ClientId.eq(client_id))
            .find_also_related(UserEntity)
            .order_by_desc(declaration::Column::SubmittedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Declaration::from).collect())
    }

    async fn list_by_status(&self, status: DeclarationStatus) -> AppResult<Vec<Declaration>> {
        let models = DeclarationEntity::find()
            .filter(declaration::Column::Status.eq(status.as_str()))
            .find_also_related(UserEntity)
            .order_by_desc(declaration::Column::SubmittedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Declaration::from).collect())
    }

    async fn latest_sequence(&self, year: i32) -> AppResult<u64> {
        let prefix = declaration_number_prefix(year);
        let numbers: Vec<String> = DeclarationEntity::find()
            .select_only()
            .column(declaration::Column::DeclarationNumber)
            .filter(declaration::Column::DeclarationNumber.starts_with(prefix.as_str()))
            .into_tuple()
            .all(&self.db)
            .await?;

        // Numeric max: sequences wider than the padding do not sort as text
        Ok(numbers
            .iter()
            .filter_map(|number| declaration_sequence(number, year))
            .max()
            .unwrap_or(0))
    }

    async fn create(&self, new_declaration: NewDeclaration) -> AppResult<Declaration> {
        let now = Utc::now();
        let fields = new_declaration.fields;
        let active_model = ActiveModel {
            declaration_number: Set(new_declaration.declaration_number),
            declaration_type: Set(fields.declaration_type),
            tnved_code: Set(fields.tnved_code),
            product_description: Set(fields.product_description),
            product_value: Set(fields.product_value),
            net_weight: Set(fields.net_weight),
            quantity: Set(fields.quantity),
            country_of_origin: Set(fields.country_of_origin),
            country_of_destination: Set(fields.country_of_destination),
            customs_office: Set(fields.customs_office),
            status: Set(DeclarationStatus::Pending.to_string()),
            client_id: Set(new_declaration.client_id),
            submitted_at: Set(new_declaration.submitted_at),
            reviewed_at: Set(None),
            created_by: Set(Some(new_declaration.created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, "Declaration number"))?;

        self.find_by_id(model.id)
            .await?
            .ok_or_else(|| AppError::internal("Created declaration could not be reloaded"))
    }

    async fn update_pending(
        &self,
        id: i64,
        fields: DeclarationFields,
    ) -> AppResult<Option<Declaration>> {
        let changes = ActiveModel {
            declaration_type: Set(fields.declaration_type),
            tnved_code: Set(fields.tnved_code),
            product_description: Set(fields.product_description),
            product_value: Set(fields.product_value),
            net_weight: Set(fields.net_weight),
            quantity: Set(fields.quantity),
            country_of_origin: Set(fields.country_of_origin),
            country_of_destination: Set(fields.country_of_destination),
            customs_office: Set(fields.customs_office),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        let result = DeclarationEntity::update_many()
            .set(changes)
            .filter(declaration::Column::Id.eq(id))
            .filter(declaration::Column::Status.eq(DeclarationStatus::Pending.as_str()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.reload(id).await.map(Some)
    }

    async fn review_pending(
        &self,
        id: i64,
        status: DeclarationStatus,
        reviewed_at: DateTime<Utc>,
    ) -> AppResult<Option<Declaration>> {
        let changes = ActiveModel {
            status: Set(status.to_string()),
            reviewed_at: Set(Some(reviewed_at)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        let result = DeclarationEntity::update_many()
            .set(changes)
            .filter(declaration::Column::Id.eq(id))
            .filter(declaration::Column::Status.eq(DeclarationStatus::Pending.as_str()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.reload(id).await.map(Some)
    }

    async fn delete_pending(&self, id: i64) -> AppResult<bool> {
        let result = DeclarationEntity::delete_many()
            .filter(declaration::Column::Id.eq(id))
            .filter(declaration::Column::Status.eq(DeclarationStatus::Pending.as_str()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn count_by_client(&self, client_id: i64) -> AppResult<u64> {
        let count = DeclarationEntity::find()
            .filter(declaration::Column::ClientId.eq(client_id))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn count_by_client_and_status(
        &self,
        client_id: i64,
        status: DeclarationStatus,
    ) -> AppResult<u64> {
        let count = DeclarationEntity::find()
            .filter(declaration::Column::ClientId.eq(client_id))
            .filter(declaration::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await?;

        Ok(count)
    }
}
