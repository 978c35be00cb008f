//! Vehicle handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{VehicleInput, VehicleResponse, VehicleStats};
use crate::errors::AppResult;
use crate::types::{Created, ExistsResponse, NoContent};

/// Vehicle registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "License plate is required"))]
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
    /// Owning client
    #[validate(required(message = "Client id is required"))]
    #[schema(example = 1)]
    pub client_id: Option<i64>,
}

impl From<CreateVehicleRequest> for VehicleInput {
    fn from(request: CreateVehicleRequest) -> Self {
        Self {
            license_plate: request.license_plate,
            model: request.model,
            vehicle_type: request.vehicle_type,
            year_of_manufacture: request.year_of_manufacture,
            capacity: request.capacity,
            client_id: request.client_id,
        }
    }
}

/// Full replacement of a vehicle's fields; the owner cannot change
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "License plate is required"))]
    #[schema(example = "1234 AB-7")]
    pub license_plate: String,
    #[schema(example = "Volvo FH16")]
    pub model: Option<String>,
    #[schema(example = "Truck")]
    pub vehicle_type: Option<String>,
    #[schema(example = 2019)]
    pub year_of_manufacture: Option<i32>,
    #[schema(example = 20.5)]
    pub capacity: Option<f64>,
}

impl From<UpdateVehicleRequest> for VehicleInput {
    fn from(request: UpdateVehicleRequest) -> Self {
        Self {
            license_plate: request.license_plate,
            model: request.model,
            vehicle_type: request.vehicle_type,
            year_of_manufacture: request.year_of_manufacture,
            capacity: request.capacity,
            client_id: None,
        }
    }
}

/// Create vehicle routes
pub fn vehicle_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/client/:client_id", get(list_client_vehicles))
        .route("/client/:client_id/stats", get(client_vehicle_stats))
        .route("/type/:vehicle_type", get(list_vehicles_by_type))
        .route("/license-plate/:plate", get(get_vehicle_by_plate))
        .route("/check-license-plate/:plate", get(check_license_plate))
        .route(
            "/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
}

/// Register a vehicle for a client
#[utoipa::path(
    post,
    path = "/api/vehicles",
    tag = "Vehicles",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle registered", body = VehicleResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Client not found"),
        (status = 409, description = "License plate already registered")
    )
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateVehicleRequest>,
) -> AppResult<Created<VehicleResponse>> {
    let vehicle = state
        .vehicle_service
        .create_vehicle(VehicleInput::from(payload))
        .await?;
    Ok(Created(VehicleResponse::from(vehicle)))
}

/// List all vehicles
#[utoipa::path(
    get,
    path = "/api/vehicles",
    tag = "Vehicles",
    responses(
        (status = 200, description = "All vehicles", body = Vec<VehicleResponse>)
    )
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<VehicleResponse>>> {
    let vehicles = state.vehicle_service.list_vehicles().await?;
    Ok(Json(vehicles.into_iter().map(VehicleResponse::from).collect()))
}

/// Get vehicle by ID
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = i64, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle", body = VehicleResponse),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<VehicleResponse>> {
    let vehicle = state.vehicle_service.get_vehicle(id).await?;
    Ok(Json(VehicleResponse::from(vehicle)))
}

/// List a client's vehicles
#[utoipa::path(
    get,
    path = "/api/vehicles/client/{client_id}",
    tag = "Vehicles",
    params(("client_id" = i64, Path, description = "Client user ID")),
    responses(
        (status = 200, description = "Client's vehicles", body = Vec<VehicleResponse>)
    )
)]
pub async fn list_client_vehicles(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> AppResult<Json<Vec<VehicleResponse>>> {
    let vehicles = state.vehicle_service.list_by_client(client_id).await?;
    Ok(Json(vehicles.into_iter().map(VehicleResponse::from).collect()))
}

/// Fleet statistics of a client
#[utoipa::path(
    get,
    path = "/api/vehicles/client/{client_id}/stats",
    tag = "Vehicles",
    params(("client_id" = i64, Path, description = "Client user ID")),
    responses(
        (status = 200, description = "Fleet statistics", body = VehicleStats),
        (status = 404, description = "Client not found")
    )
)]
pub async fn client_vehicle_stats(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> AppResult<Json<VehicleStats>> {
    let stats = state.vehicle_service.client_stats(client_id).await?;
    Ok(Json(stats))
}

/// List vehicles by type
#[utoipa::path(
    get,
    path = "/api/vehicles/type/{vehicle_type}",
    tag = "Vehicles",
    params(("vehicle_type" = String, Path, description = "Type fragment, case-insensitive")),
    responses(
        (status = 200, description = "Matching vehicles", body = Vec<VehicleResponse>)
    )
)]
pub async fn list_vehicles_by_type(
    State(state): State<AppState>,
    Path(vehicle_type): Path<String>,
) -> AppResult<Json<Vec<VehicleResponse>>> {
    let vehicles = state.vehicle_service.list_by_type(&vehicle_type).await?;
    Ok(Json(vehicles.into_iter().map(VehicleResponse::from).collect()))
}

/// Get vehicle by license plate
#[utoipa::path(
    get,
    path = "/api/vehicles/license-plate/{plate}",
    tag = "Vehicles",
    params(("plate" = String, Path, description = "License plate")),
    responses(
        (status = 200, description = "Vehicle", body = VehicleResponse),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn get_vehicle_by_plate(
    State(state): State<AppState>,
    Path(plate): Path<String>,
) -> AppResult<Json<VehicleResponse>> {
    let vehicle = state.vehicle_service.get_by_license_plate(&plate).await?;
    Ok(Json(VehicleResponse::from(vehicle)))
}

/// Check whether a license plate is registered
#[utoipa::path(
    get,
    path = "/api/vehicles/check-license-plate/{plate}",
    tag = "Vehicles",
    params(("plate" = String, Path, description = "License plate")),
    responses(
        (status = 200, description = "Lookup result", body = ExistsResponse)
    )
)]
pub async fn check_license_plate(
    State(state): State<AppState>,
    Path(plate): Path<String>,
) -> AppResult<Json<ExistsResponse>> {
    let exists = state.vehicle_service.license_plate_exists(&plate).await?;
    Ok(Json(ExistsResponse::from(exists)))
}

/// Replace a vehicle's fields
#[utoipa::path(
    put,
    path = "/api/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = i64, Path, description = "Vehicle ID")),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle updated", body = VehicleResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Vehicle not found"),
        (status = 409, description = "License plate already registered")
    )
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateVehicleRequest>,
) -> AppResult<Json<VehicleResponse>> {
    let vehicle = state
        .vehicle_service
        .update_vehicle(id, VehicleInput::from(payload))
        .await?;
    Ok(Json(VehicleResponse::from(vehicle)))
}

/// Delete a vehicle
#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = i64, Path, description = "Vehicle ID")),
    responses(
        (status = 204, description = "Vehicle deleted"),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.vehicle_service.delete_vehicle(id).await?;
    Ok(NoContent)
}
