//! Vehicle service - fleet registration and client statistics.

use async_trait::async_trait;
use std::sync::Arc;

use super::Auditor;
use crate::domain::validation::is_blank;
use crate::domain::{NewVehicle, Vehicle, VehicleChanges, VehicleInput, VehicleStats};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait VehicleService: Send + Sync {
    async fn create_vehicle(&self, input: VehicleInput) -> AppResult<Vehicle>;

    async fn get_vehicle(&self, id: i64) -> AppResult<Vehicle>;

    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>>;

    async fn list_by_client(&self, client_id: i64) -> AppResult<Vec<Vehicle>>;

    /// Case-insensitive substring match on the vehicle type
    async fn list_by_type(&self, vehicle_type: &str) -> AppResult<Vec<Vehicle>>;

    async fn get_by_license_plate(&self, plate: &str) -> AppResult<Vehicle>;

    async fn license_plate_exists(&self, plate: &str) -> AppResult<bool>;

    /// Replace every mutable field; the owner never changes
    async fn update_vehicle(&self, id: i64, input: VehicleInput) -> AppResult<Vehicle>;

    async fn delete_vehicle(&self, id: i64) -> AppResult<()>;

    async fn client_stats(&self, client_id: i64) -> AppResult<VehicleStats>;
}

pub struct VehicleManager<U: UnitOfWork> {
    uow: Arc<U>,
    auditor: Arc<dyn Auditor>,
}

impl<U: UnitOfWork> VehicleManager<U> {
    pub fn new(uow: Arc<U>, auditor: Arc<dyn Auditor>) -> Self {
        Self { uow, auditor }
    }

    async fn ensure_client_exists(&self, client_id: i64) -> AppResult<()> {
        self.uow
            .users()
            .find_by_id(client_id)
            .await?
            .ok_or_not_found(format!("Client with id {} not found", client_id))
            .map(|_| ())
    }
}

fn plate_taken(plate: &str) -> AppError {
    AppError::conflict(format!("Vehicle with license plate {}", plate))
}

#[async_trait]
impl<U: UnitOfWork> VehicleService for VehicleManager<U> {
    async fn create_vehicle(&self, input: VehicleInput) -> AppResult<Vehicle> {
        let client_id = input
            .client_id
            .ok_or_else(|| AppError::validation("Client id is required"))?;

        if is_blank(Some(&input.license_plate)) {
            return Err(AppError::validation("License plate is required"));
        }

        if self
            .uow
            .vehicles()
            .exists_by_license_plate(&input.license_plate)
            .await?
        {
            return Err(plate_taken(&input.license_plate));
        }

        self.ensure_client_exists(client_id).await?;

        let new_vehicle = NewVehicle {
            license_plate: input.license_plate,
            model: input.model,
            vehicle_type: input.vehicle_type,
            year_of_manufacture: input.year_of_manufacture,
            capacity: input.capacity,
            client_id,
            created_by: self.auditor.current_auditor(),
        };

        let vehicle = self.uow.vehicles().create(new_vehicle).await?;
        tracing::info!(vehicle_id = vehicle.id, client_id, "Vehicle registered");

        Ok(vehicle)
    }

    async fn get_vehicle(&self, id: i64) -> AppResult<Vehicle> {
        self.uow
            .vehicles()
            .find_by_id(id)
            .await?
            .ok_or_not_found(format!("Vehicle with id {} not found", id))
    }

    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        self.uow.vehicles().list().await
    }

    async fn list_by_client(&self, client_id: i64) -> AppResult<Vec<Vehicle>> {
        self.uow.vehicles().list_by_client(client_id).await
    }

    async fn list_by_type(&self, vehicle_type: &str) -> AppResult<Vec<Vehicle>> {
        self.uow.vehicles().list_by_type(vehicle_type).await
    }

    async fn get_by_license_plate(&self, plate: &str) -> AppResult<Vehicle> {
        self.uow
            .vehicles()
            .find_by_license_plate(plate)
            .await?
            .ok_or_not_found(format!("Vehicle with license plate {} not found", plate))
    }

    async fn license_plate_exists(&self, plate: &str) -> AppResult<bool> {
        self.uow.vehicles().exists_by_license_plate(plate).await
    }

    async fn update_vehicle(&self, id: i64, input: VehicleInput) -> AppResult<Vehicle> {
        let existing = self.get_vehicle(id).await?;

        if is_blank(Some(&input.license_plate)) {
            return Err(AppError::validation("License plate is required"));
        }

        if existing.license_plate != input.license_plate
            && self
                .uow
                .vehicles()
                .exists_by_license_plate(&input.license_plate)
                .await?
        {
            return Err(plate_taken(&input.license_plate));
        }

        self.uow
            .vehicles()
            .update(id, VehicleChanges::from(input))
            .await
    }

    async fn delete_vehicle(&self, id: i64) -> AppResult<()> {
        if !self.uow.vehicles().delete(id).await? {
            return Err(AppError::not_found(format!(
                "Vehicle with id {} not found",
                id
            )));
        }
        tracing::info!(vehicle_id = id, "Vehicle deleted");
        Ok(())
    }

    async fn client_stats(&self, client_id: i64) -> AppResult<VehicleStats> {
        self.ensure_client_exists(client_id).await?;

        let vehicles = self.uow.vehicles();
        Ok(VehicleStats {
            total_vehicles: vehicles.count_by_client(client_id).await?,
            trucks_count: vehicles.count_trucks_by_client(client_id).await?,
            total_capacity: vehicles.total_capacity_by_client(client_id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::unit_of_work::testing::{MockRepositories, MockUnitOfWork};
    use crate::services::test_support::{sample_user, sample_vehicle};
    use crate::services::StaticAuditor;
    use mockall::predicate::eq;

    fn manager(repos: MockRepositories) -> VehicleManager<MockUnitOfWork> {
        VehicleManager::new(Arc::new(repos.build()), Arc::new(StaticAuditor::new("tester")))
    }

    fn input(plate: &str) -> VehicleInput {
        VehicleInput {
            license_plate: plate.to_string(),
            model: Some("Volvo FH16".to_string()),
            vehicle_type: Some("Truck".to_string()),
            year_of_manufacture: Some(2019),
            capacity: Some(20.0),
            client_id: Some(1),
        }
    }

    #[tokio::test]
    async fn test_create_requires_client_id() {
        let service = manager(MockRepositories::default());
        let result = service
            .create_vehicle(VehicleInput {
                client_id: None,
                ..input("1234 AB-7")
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_plate() {
        let service = manager(MockRepositories::default());
        let result = service.create_vehicle(input(" ")).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_plate() {
        let mut repos = MockRepositories::default();
        repos
            .vehicles
            .expect_exists_by_license_plate()
            .returning(|_| Ok(true));
        repos.vehicles.expect_create().never();

        let result = manager(repos).create_vehicle(input("1234 AB-7")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_for_missing_client() {
        let mut repos = MockRepositories::default();
        repos
            .vehicles
            .expect_exists_by_license_plate()
            .returning(|_| Ok(false));
        repos.users.expect_find_by_id().returning(|_| Ok(None));

        let result = manager(repos).create_vehicle(input("1234 AB-7")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_stamps_auditor() {
        let mut repos = MockRepositories::default();
        repos
            .vehicles
            .expect_exists_by_license_plate()
            .returning(|_| Ok(false));
        repos
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id, UserRole::Client))));
        repos
            .vehicles
            .expect_create()
            .withf(|v| v.client_id == 1 && v.created_by == "tester")
            .times(1)
            .returning(|v| Ok(sample_vehicle(9, v.client_id, &v.license_plate)));

        let vehicle = manager(repos).create_vehicle(input("1234 AB-7")).await.unwrap();
        assert_eq!(vehicle.id, 9);
        assert_eq!(vehicle.license_plate, "1234 AB-7");
    }

    #[tokio::test]
    async fn test_update_with_unchanged_plate_skips_uniqueness_check() {
        let mut repos = MockRepositories::default();
        repos
            .vehicles
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_vehicle(id, 1, "1234 AB-7"))));
        repos.vehicles.expect_exists_by_license_plate().never();
        repos
            .vehicles
            .expect_update()
            .times(1)
            .returning(|id, changes| {
                let mut vehicle = sample_vehicle(id, 1, &changes.license_plate);
                vehicle.model = changes.model;
                Ok(vehicle)
            });

        let result = manager(repos)
            .update_vehicle(
                4,
                VehicleInput {
                    model: Some("Scania R450".to_string()),
                    ..input("1234 AB-7")
                },
            )
            .await
            .unwrap();

        assert_eq!(result.model.as_deref(), Some("Scania R450"));
    }

    #[tokio::test]
    async fn test_update_to_taken_plate() {
        let mut repos = MockRepositories::default();
        repos
            .vehicles
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_vehicle(id, 1, "1234 AB-7"))));
        repos
            .vehicles
            .expect_exists_by_license_plate()
            .returning(|_| Ok(true));
        repos.vehicles.expect_update().never();

        let result = manager(repos).update_vehicle(4, input("9999 XX-1")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_missing_vehicle() {
        let mut repos = MockRepositories::default();
        repos.vehicles.expect_find_by_id().returning(|_| Ok(None));

        let result = manager(repos).update_vehicle(4, input("1234 AB-7")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_vehicle() {
        let mut repos = MockRepositories::default();
        repos
            .vehicles
            .expect_delete()
            .with(eq(8))
            .returning(|_| Ok(false));

        let result = manager(repos).delete_vehicle(8).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_client_stats() {
        let mut repos = MockRepositories::default();
        repos
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id, UserRole::Client))));
        repos.vehicles.expect_count_by_client().returning(|_| Ok(3));
        repos
            .vehicles
            .expect_count_trucks_by_client()
            .returning(|_| Ok(2));
        repos
            .vehicles
            .expect_total_capacity_by_client()
            .returning(|_| Ok(52.5));

        let stats = manager(repos).client_stats(1).await.unwrap();
        assert_eq!(
            stats,
            VehicleStats {
                total_vehicles: 3,
                trucks_count: 2,
                total_capacity: 52.5,
            }
        );
    }

    #[tokio::test]
    async fn test_client_stats_for_missing_client() {
        let mut repos = MockRepositories::default();
        repos.users.expect_find_by_id().returning(|_| Ok(None));

        let result = manager(repos).client_stats(1).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
