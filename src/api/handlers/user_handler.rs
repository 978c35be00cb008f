//! User handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{RegisterUser, UserChanges, UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::types::{Created, ExistsResponse, NoContent, Paginated, PaginationParams};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "acme1")]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "S3cret!")]
    pub password: String,
    /// CLIENT or DRIVER; ADMIN is refused
    #[validate(required(message = "Role is required"))]
    pub role: Option<UserRole>,
    /// Company name, required for clients and refused for drivers
    #[schema(example = "ACME Logistics")]
    pub name: Option<String>,
    #[validate(email(message = "Email must be a valid address"))]
    #[schema(example = "office@acme.example")]
    pub email: Option<String>,
    #[schema(example = "Freight forwarding")]
    pub activity_type: Option<String>,
    /// Nine-digit registration number, required for clients
    #[schema(example = "190000001")]
    pub unp: Option<String>,
}

impl RegisterUserRequest {
    fn into_command(self) -> AppResult<RegisterUser> {
        let role = self
            .role
            .ok_or_else(|| AppError::validation("Role is required"))?;

        Ok(RegisterUser {
            username: self.username,
            password: self.password,
            role,
            name: self.name,
            email: self.email,
            activity_type: self.activity_type,
            unp: self.unp,
        })
    }
}

/// Partial profile update; absent fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(email(message = "Email must be a valid address"))]
    #[schema(example = "office@acme.example")]
    pub email: Option<String>,
    #[schema(example = "ACME Logistics")]
    pub name: Option<String>,
    #[schema(example = "Freight forwarding")]
    pub activity_type: Option<String>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            email: request.email,
            name: request.name,
            activity_type: request.activity_type,
        }
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(register_user))
        .route("/page", get(list_users_page))
        .route("/role/:role", get(list_users_by_role))
        .route("/check-username/:username", get(check_username))
        .route("/check-email/:email", get(check_email))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// Register a client or driver
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or UNP already taken")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterUserRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state.user_service.register(payload.into_command()?).await?;
    Ok(Created(UserResponse::from(user)))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// List users one page at a time
#[utoipa::path(
    get,
    path = "/api/users/page",
    tag = "Users",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of users", body = UserPage)
    )
)]
pub async fn list_users_page(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let (users, total) = state
        .user_service
        .list_users_paginated(params.clone())
        .await?;
    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(Paginated::new(data, &params, total)))
}

/// List users holding a role
#[utoipa::path(
    get,
    path = "/api/users/role/{role}",
    tag = "Users",
    params(("role" = UserRole, Path, description = "CLIENT, DRIVER or ADMIN")),
    responses(
        (status = 200, description = "Users with the role", body = Vec<UserResponse>)
    )
)]
pub async fn list_users_by_role(
    State(state): State<AppState>,
    Path(role): Path<UserRole>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users_by_role(role).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Check whether a username is taken
#[utoipa::path(
    get,
    path = "/api/users/check-username/{username}",
    tag = "Users",
    params(("username" = String, Path, description = "Login name")),
    responses(
        (status = 200, description = "Lookup result", body = ExistsResponse)
    )
)]
pub async fn check_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<ExistsResponse>> {
    let exists = state.user_service.username_exists(&username).await?;
    Ok(Json(ExistsResponse::from(exists)))
}

/// Check whether an email is in use
#[utoipa::path(
    get,
    path = "/api/users/check-email/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "Email address")),
    responses(
        (status = 200, description = "Lookup result", body = ExistsResponse)
    )
)]
pub async fn check_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<ExistsResponse>> {
    let exists = state.user_service.email_exists(&email).await?;
    Ok(Json(ExistsResponse::from(exists)))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update email, company name or activity type
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_user(id, UserChanges::from(payload))
        .await?;
    Ok(Json(UserResponse::from(user)))
}

/// Delete a user together with their activities, vehicles and declarations
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.user_service.delete_user(id).await?;
    Ok(NoContent)
}
