//! Vehicle repository implementation.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::conflict_on_unique;
use super::entities::{
    user::Entity as UserEntity,
    vehicle::{self, ActiveModel, Entity as VehicleEntity},
};
use crate::config::TRUCK_VEHICLE_TYPE;
use crate::domain::{NewVehicle, Vehicle, VehicleChanges};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Vehicle>>;

    async fn find_by_license_plate(&self, plate: &str) -> AppResult<Option<Vehicle>>;

    async fn exists_by_license_plate(&self, plate: &str) -> AppResult<bool>;

    async fn list(&self) -> AppResult<Vec<Vehicle>>;

    async fn list_by_client(&self, client_id: i64) -> AppResult<Vec<Vehicle>>;

    /// Vehicles whose type contains `vehicle_type`, ignoring case
    async fn list_by_type(&self, vehicle_type: &str) -> AppResult<Vec<Vehicle>>;

    async fn create(&self, vehicle: NewVehicle) -> AppResult<Vehicle>;

    async fn update(&self, id: i64, changes: VehicleChanges) -> AppResult<Vehicle>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: i64) -> AppResult<bool>;

    async fn count_by_client(&self, client_id: i64) -> AppResult<u64>;

    /// Vehicles whose type contains "truck", ignoring case
    async fn count_trucks_by_client(&self, client_id: i64) -> AppResult<u64>;

    /// Sum of known capacities; zero when the client has none
    async fn total_capacity_by_client(&self, client_id: i64) -> AppResult<f64>;
}

pub struct VehicleStore {
    db: DatabaseConnection,
}

impl VehicleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn plate_conflict(plate: &str) -> String {
    format!("Vehicle with license plate {}", plate)
}

#[async_trait]
impl VehicleRepository for VehicleStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Vehicle>> {
        let result = VehicleEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await?;

        Ok(result.map(Vehicle::from))
    }

    async fn find_by_license_plate(&self, plate: &str) -> AppResult<Option<Vehicle>> {
        let result = VehicleEntity::find()
            .filter(vehicle::Column::LicensePlate.eq(plate))
            .find_also_related(UserEntity)
            .one(&self.db)
            .await?;

        Ok(result.map(Vehicle::from))
    }

    async fn exists_by_license_plate(&self, plate: &str) -> AppResult<bool> {
        let count = VehicleEntity::find()
            .filter(vehicle::Column::LicensePlate.eq(plate))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let models = VehicleEntity::find()
            .find_also_related(UserEntity)
            .order_by_asc(vehicle::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Vehicle::from).collect())
    }

    async fn list_by_client(&self, client_id: i64) -> AppResult<Vec<Vehicle>> {
        let models = VehicleEntity::find()
            .filter(vehicle::Column::ClientId.eq(client_id))
            .find_also_related(UserEntity)
            .order_by_asc(vehicle::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Vehicle::from).collect())
    }

    async fn list_by_type(&self, vehicle_type: &str) -> AppResult<Vec<Vehicle>> {
        let models = VehicleEntity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col((
                    vehicle::Entity,
                    vehicle::Column::VehicleType,
                ))))
                .like(format!("%{}%", vehicle_type.to_lowercase())),
            )
            .find_also_related(UserEntity)
            .order_by_asc(vehicle::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Vehicle::from).collect())
    }

    async fn create(&self, new_vehicle: NewVehicle) -> AppResult<Vehicle> {
        let now = chrono::Utc::now();
        let plate = new_vehicle.license_plate.clone();
        let active_model = ActiveModel {
            license_plate: Set(new_vehicle.license_plate),
            model_name: Set(new_vehicle.model),
            vehicle_type: Set(new_vehicle.vehicle_type),
            year_of_manufacture: Set(new_vehicle.year_of_manufacture),
            capacity: Set(new_vehicle.capacity),
            client_id: Set(new_vehicle.client_id),
            created_by: Set(Some(new_vehicle.created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, &plate_conflict(&plate)))?;

        self.find_by_id(model.id)
            .await?
            .ok_or_else(|| AppError::internal("Created vehicle could not be reloaded"))
    }

    async fn update(&self, id: i64, changes: VehicleChanges) -> AppResult<Vehicle> {
        let existing = VehicleEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found(format!("Vehicle with id {} not found", id))?;

        let plate = changes.license_plate.clone();
        let mut active: ActiveModel = existing.into();
        active.license_plate = Set(changes.license_plate);
        active.model_name = Set(changes.model);
        active.vehicle_type = Set(changes.vehicle_type);
        active.year_of_manufacture = Set(changes.year_of_manufacture);
        active.capacity = Set(changes.capacity);
        active.updated_at = Set(chrono::Utc::now());

        active
            .update(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, &plate_conflict(&plate)))?;

        self.find_by_id(id)
            .await?
            .ok_or_not_found(format!("Vehicle with id {} not found", id))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = VehicleEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn count_by_client(&self, client_id: i64) -> AppResult<u64> {
        let count = VehicleEntity::find()
            .filter(vehicle::Column::ClientId.eq(client_id))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn count_trucks_by_client(&self, client_id: i64) -> AppResult<u64> {
        let count = VehicleEntity::find()
            .filter(vehicle::Column::ClientId.eq(client_id))
            .filter(
                Expr::expr(Func::lower(Expr::col((
                    vehicle::Entity,
                    vehicle::Column::VehicleType,
                ))))
                .like(format!("%{}%", TRUCK_VEHICLE_TYPE)),
            )
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn total_capacity_by_client(&self, client_id: i64) -> AppResult<f64> {
        let total: Option<Option<f64>> = VehicleEntity::find()
            .select_only()
            .column_as(vehicle::Column::Capacity.sum(), "total")
            .filter(vehicle::Column::ClientId.eq(client_id))
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(total.flatten().unwrap_or(0.0))
    }
}
