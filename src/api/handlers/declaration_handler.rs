//! Customs declaration handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    Declaration, DeclarationInput, DeclarationResponse, DeclarationStats, DeclarationStatus,
};
use crate::errors::{AppError, AppResult};
use crate::types::{Created, NoContent};

/// Declaration fields for create and update
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationRequest {
    /// Declaring client, ignored on update
    #[schema(example = 1)]
    pub client_id: Option<i64>,
    #[schema(example = "IM40")]
    pub declaration_type: Option<String>,
    /// Commodity code
    #[schema(example = "8708999709")]
    pub tnved_code: Option<String>,
    #[schema(example = "Truck spare parts")]
    pub product_description: Option<String>,
    /// Must not be negative; 0 when absent
    #[schema(example = 15000.0)]
    pub product_value: Option<f64>,
    #[schema(example = 820.5)]
    pub net_weight: Option<f64>,
    #[schema(example = 40)]
    pub quantity: Option<i32>,
    #[schema(example = "DE")]
    pub country_of_origin: Option<String>,
    #[schema(example = "BY")]
    pub country_of_destination: Option<String>,
    #[schema(example = "Minsk regional customs")]
    pub customs_office: Option<String>,
}

impl From<DeclarationRequest> for DeclarationInput {
    fn from(request: DeclarationRequest) -> Self {
        Self {
            client_id: request.client_id,
            declaration_type: request.declaration_type,
            tnved_code: request.tnved_code,
            product_description: request.product_description,
            product_value: request.product_value,
            net_weight: request.net_weight,
            quantity: request.quantity,
            country_of_origin: request.country_of_origin,
            country_of_destination: request.country_of_destination,
            customs_office: request.customs_office,
        }
    }
}

/// Review decision
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StatusChangeRequest {
    #[validate(required(message = "Status is required"))]
    pub status: Option<DeclarationStatus>,
}

/// Create declaration routes
pub fn declaration_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_declarations).post(create_declaration))
        .route("/client/:client_id", get(list_client_declarations))
        .route("/client/:client_id/stats", get(client_declaration_stats))
        .route("/status/:status", get(list_declarations_by_status))
        .route("/:id/status", patch(change_declaration_status))
        .route(
            "/:id",
            get(get_declaration)
                .put(update_declaration)
                .delete(delete_declaration),
        )
}

/// Submit a declaration; it starts out PENDING with a generated number
#[utoipa::path(
    post,
    path = "/api/declarations",
    tag = "Declarations",
    request_body = DeclarationRequest,
    responses(
        (status = 201, description = "Declaration submitted", body = DeclarationResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn create_declaration(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<DeclarationRequest>,
) -> AppResult<Created<DeclarationResponse>> {
    let declaration = state
        .declaration_service
        .create_declaration(DeclarationInput::from(payload))
        .await?;
    Ok(Created(DeclarationResponse::from(declaration)))
}

/// List all declarations, most recently submitted first
#[utoipa::path(
    get,
    path = "/api/declarations",
    tag = "Declarations",
    responses(
        (status = 200, description = "All declarations", body = Vec<DeclarationResponse>)
    )
)]
pub async fn list_declarations(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<DeclarationResponse>>> {
    let declarations = state.declaration_service.list_declarations().await?;
    Ok(Json(into_responses(declarations)))
}

/// Get declaration by ID
#[utoipa::path(
    get,
    path = "/api/declarations/{id}",
    tag = "Declarations",
    params(("id" = i64, Path, description = "Declaration ID")),
    responses(
        (status = 200, description = "Declaration", body = DeclarationResponse),
        (status = 404, description = "Declaration not found")
    )
)]
pub async fn get_declaration(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeclarationResponse>> {
    let declaration = state.declaration_service.get_declaration(id).await?;
    Ok(Json(DeclarationResponse::from(declaration)))
}

/// List a client's declarations
#[utoipa::path(
    get,
    path = "/api/declarations/client/{client_id}",
    tag = "Declarations",
    params(("client_id" = i64, Path, description = "Client user ID")),
    responses(
        (status = 200, description = "Client's declarations", body = Vec<DeclarationResponse>)
    )
)]
pub async fn list_client_declarations(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> AppResult<Json<Vec<DeclarationResponse>>> {
    let declarations = state.declaration_service.list_by_client(client_id).await?;
    Ok(Json(into_responses(declarations)))
}

/// Declaration counters of a client
#[utoipa::path(
    get,
    path = "/api/declarations/client/{client_id}/stats",
    tag = "Declarations",
    params(("client_id" = i64, Path, description = "Client user ID")),
    responses(
        (status = 200, description = "Declaration counters", body = DeclarationStats),
        (status = 404, description = "Client not found")
    )
)]
pub async fn client_declaration_stats(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> AppResult<Json<DeclarationStats>> {
    let stats = state.declaration_service.client_stats(client_id).await?;
    Ok(Json(stats))
}

/// List declarations in a review status
#[utoipa::path(
    get,
    path = "/api/declarations/status/{status}",
    tag = "Declarations",
    params(("status" = DeclarationStatus, Path, description = "PENDING, APPROVED or REJECTED")),
    responses(
        (status = 200, description = "Declarations in the status", body = Vec<DeclarationResponse>)
    )
)]
pub async fn list_declarations_by_status(
    State(state): State<AppState>,
    Path(status): Path<DeclarationStatus>,
) -> AppResult<Json<Vec<DeclarationResponse>>> {
    let declarations = state.declaration_service.list_by_status(status).await?;
    Ok(Json(into_responses(declarations)))
}

/// Replace the fields of a pending declaration
#[utoipa::path(
    put,
    path = "/api/declarations/{id}",
    tag = "Declarations",
    params(("id" = i64, Path, description = "Declaration ID")),
    request_body = DeclarationRequest,
    responses(
        (status = 200, description = "Declaration updated", body = DeclarationResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Declaration not found"),
        (status = 409, description = "Declaration already processed")
    )
)]
pub async fn update_declaration(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<DeclarationRequest>,
) -> AppResult<Json<DeclarationResponse>> {
    let declaration = state
        .declaration_service
        .update_declaration(id, DeclarationInput::from(payload))
        .await?;
    Ok(Json(DeclarationResponse::from(declaration)))
}

/// Approve or reject a pending declaration
#[utoipa::path(
    patch,
    path = "/api/declarations/{id}/status",
    tag = "Declarations",
    params(("id" = i64, Path, description = "Declaration ID")),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Status changed", body = DeclarationResponse),
        (status = 404, description = "Declaration not found"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn change_declaration_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<StatusChangeRequest>,
) -> AppResult<Json<DeclarationResponse>> {
    let status = payload
        .status
        .ok_or_else(|| AppError::validation("Status is required"))?;
    let declaration = state.declaration_service.change_status(id, status).await?;
    Ok(Json(DeclarationResponse::from(declaration)))
}

/// Delete a pending declaration
#[utoipa::path(
    delete,
    path = "/api/declarations/{id}",
    tag = "Declarations",
    params(("id" = i64, Path, description = "Declaration ID")),
    responses(
        (status = 204, description = "Declaration deleted"),
        (status = 404, description = "Declaration not found"),
        (status = 409, description = "Declaration already processed")
    )
)]
pub async fn delete_declaration(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.declaration_service.delete_declaration(id).await?;
    Ok(NoContent)
}

fn into_responses(declarations: Vec<Declaration>) -> Vec<DeclarationResponse> {
    declarations
        .into_iter()
        .map(DeclarationResponse::from)
        .collect()
}
