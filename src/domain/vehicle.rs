//! Vehicle domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Vehicle owned by a client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub id: i64,
    pub license_plate: String,
    pub model: Option<String>,
    pub vehicle_type: Option<String>,
    pub year_of_manufacture: Option<i32>,
    pub capacity: Option<f64>,
    pub client_id: i64,
    /// Owner's company name
    pub client_name: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vehicle input for both create and update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleInput {
    pub license_plate: String,
    pub model: Option<String>,
    pub vehicle_type: Option<String>,
    pub year_of_manufacture: Option<i32>,
    pub capacity: Option<f64>,
    /// Required on create, ignored on update
    pub client_id: Option<i64>,
}

/// Validated vehicle record ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    pub license_plate: String,
    pub model: Option<String>,
    pub vehicle_type: Option<String>,
    pub year_of_manufacture: Option<i32>,
    pub capacity: Option<f64>,
    pub client_id: i64,
    pub created_by: String,
}

/// Full replacement of a vehicle's mutable fields
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleChanges {
    pub license_plate: String,
    pub model: Option<String>,
    pub vehicle_type: Option<String>,
    pub year_of_manufacture: Option<i32>,
    pub capacity: Option<f64>,
}

impl From<VehicleInput> for VehicleChanges {
    fn from(input: VehicleInput) -> Self {
        Self {
            license_plate: input.license_plate,
            model: input.model,
            vehicle_type: input.vehicle_type,
            year_of_manufacture: input.year_of_manufacture,
            capacity: input.capacity,
        }
    }
}

/// Vehicle response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "1234 AB-7")]
    pub license_plate: String,
    #[schema(example = "Volvo FH16")]
    pub model: Option<String>,
    #[schema(example = "Truck")]
    pub vehicle_type: Option<String>,
    #[schema(example = 2019)]
    pub year_of_manufacture: Option<i32>,
    /// Load capacity in tonnes
    #[schema(example = 20.5)]
    pub capacity: Option<f64>,
    #[schema(example = 1)]
    pub client_id: i64,
    #[schema(example = "ACME Logistics")]
    pub client_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            license_plate: vehicle.license_plate,
            model: vehicle.model,
            vehicle_type: vehicle.vehicle_type,
            year_of_manufacture: vehicle.year_of_manufacture,
            capacity: vehicle.capacity,
            client_id: vehicle.client_id,
            client_name: vehicle.client_name,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        }
    }
}

/// Fleet figures for one client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleStats {
    pub total_vehicles: u64,
    pub trucks_count: u64,
    pub total_capacity: f64,
}
