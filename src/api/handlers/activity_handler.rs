//! Activity log handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Activity, ActivityChanges, ActivityInput, ActivityResponse, ActivityStats};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, Paginated, PaginationParams};

/// Activity log entry request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    /// Owner of the entry; taken from the path when logging by username
    #[schema(example = 1)]
    pub user_id: Option<i64>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    #[schema(example = "Submitted transit documents")]
    pub description: String,
    /// Defaults to the current time
    pub activity_date: Option<DateTime<Utc>>,
}

impl From<ActivityRequest> for ActivityInput {
    fn from(request: ActivityRequest) -> Self {
        Self {
            user_id: request.user_id,
            description: request.description,
            activity_date: request.activity_date,
        }
    }
}

impl From<ActivityRequest> for ActivityChanges {
    fn from(request: ActivityRequest) -> Self {
        Self {
            description: request.description,
            activity_date: request.activity_date,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentQuery {
    /// Number of entries, 5 by default
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct DateRangeQuery {
    /// Inclusive lower bound, RFC 3339
    pub start_date: DateTime<Utc>,
    /// Inclusive upper bound, RFC 3339
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive fragment of the description
    #[serde(default)]
    pub keyword: String,
}

/// Create activity routes
pub fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_activities).post(create_activity))
        .route("/date-range", get(list_activities_in_range))
        .route(
            "/user/:user",
            get(list_user_activities)
                .post(create_activity_for_username)
                .delete(delete_user_activities),
        )
        .route("/user/:user/recent", get(recent_user_activities))
        .route("/user/:user/page", get(list_user_activities_page))
        .route("/user/:user/date-range", get(list_user_activities_in_range))
        .route("/user/:user/search", get(search_user_activities))
        .route("/user/:user/stats", get(user_activity_stats))
        .route(
            "/:id",
            get(get_activity)
                .put(update_activity)
                .delete(delete_activity),
        )
}

/// Log an activity for a user ID
#[utoipa::path(
    post,
    path = "/api/activities",
    tag = "Activities",
    request_body = ActivityRequest,
    responses(
        (status = 201, description = "Activity logged", body = ActivityResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    )
)]
pub async fn create_activity(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ActivityRequest>,
) -> AppResult<Created<ActivityResponse>> {
    let activity = state
        .activity_service
        .create_activity(ActivityInput::from(payload))
        .await?;
    Ok(Created(ActivityResponse::from(activity)))
}

/// Log an activity for a login name
#[utoipa::path(
    post,
    path = "/api/activities/user/{username}",
    tag = "Activities",
    params(("username" = String, Path, description = "Login name")),
    request_body = ActivityRequest,
    responses(
        (status = 201, description = "Activity logged", body = ActivityResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    )
)]
pub async fn create_activity_for_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
    ValidatedJson(payload): ValidatedJson<ActivityRequest>,
) -> AppResult<Created<ActivityResponse>> {
    let activity = state
        .activity_service
        .create_for_username(&username, ActivityInput::from(payload))
        .await?;
    Ok(Created(ActivityResponse::from(activity)))
}

/// List all activities, newest first
#[utoipa::path(
    get,
    path = "/api/activities",
    tag = "Activities",
    responses(
        (status = 200, description = "All activities", body = Vec<ActivityResponse>)
    )
)]
pub async fn list_activities(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ActivityResponse>>> {
    let activities = state.activity_service.list_activities().await?;
    Ok(Json(into_responses(activities)))
}

/// List activities dated within a range
#[utoipa::path(
    get,
    path = "/api/activities/date-range",
    tag = "Activities",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Activities in range", body = Vec<ActivityResponse>),
        (status = 400, description = "Start is after end")
    )
)]
pub async fn list_activities_in_range(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<ActivityResponse>>> {
    let activities = state
        .activity_service
        .list_by_date_range(range.start_date, range.end_date)
        .await?;
    Ok(Json(into_responses(activities)))
}

/// List a user's activities, newest first
#[utoipa::path(
    get,
    path = "/api/activities/user/{user_id}",
    tag = "Activities",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User's activities", body = Vec<ActivityResponse>)
    )
)]
pub async fn list_user_activities(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<ActivityResponse>>> {
    let activities = state.activity_service.list_by_user(user_id).await?;
    Ok(Json(into_responses(activities)))
}

/// Most recent activities of a user
#[utoipa::path(
    get,
    path = "/api/activities/user/{user_id}/recent",
    tag = "Activities",
    params(("user_id" = i64, Path, description = "User ID"), RecentQuery),
    responses(
        (status = 200, description = "Recent activities", body = Vec<ActivityResponse>)
    )
)]
pub async fn recent_user_activities(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<RecentQuery>,
) -> AppResult<Json<Vec<ActivityResponse>>> {
    let activities = state
        .activity_service
        .recent_by_user(user_id, query.limit)
        .await?;
    Ok(Json(into_responses(activities)))
}

/// A user's activities one page at a time
#[utoipa::path(
    get,
    path = "/api/activities/user/{user_id}/page",
    tag = "Activities",
    params(("user_id" = i64, Path, description = "User ID"), PaginationParams),
    responses(
        (status = 200, description = "One page of activities", body = ActivityPage)
    )
)]
pub async fn list_user_activities_page(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<ActivityResponse>>> {
    let (activities, total) = state
        .activity_service
        .list_by_user_paginated(user_id, params.clone())
        .await?;
    Ok(Json(Paginated::new(into_responses(activities), &params, total)))
}

/// A user's activities dated within a range
#[utoipa::path(
    get,
    path = "/api/activities/user/{user_id}/date-range",
    tag = "Activities",
    params(("user_id" = i64, Path, description = "User ID"), DateRangeQuery),
    responses(
        (status = 200, description = "Activities in range", body = Vec<ActivityResponse>),
        (status = 400, description = "Start is after end")
    )
)]
pub async fn list_user_activities_in_range(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<ActivityResponse>>> {
    let activities = state
        .activity_service
        .list_by_user_and_date_range(user_id, range.start_date, range.end_date)
        .await?;
    Ok(Json(into_responses(activities)))
}

/// Search a user's activity descriptions
#[utoipa::path(
    get,
    path = "/api/activities/user/{user_id}/search",
    tag = "Activities",
    params(("user_id" = i64, Path, description = "User ID"), SearchQuery),
    responses(
        (status = 200, description = "Matching activities", body = Vec<ActivityResponse>),
        (status = 400, description = "Blank keyword")
    )
)]
pub async fn search_user_activities(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<ActivityResponse>>> {
    let activities = state
        .activity_service
        .search(user_id, &query.keyword)
        .await?;
    Ok(Json(into_responses(activities)))
}

/// Activity counters of a user
#[utoipa::path(
    get,
    path = "/api/activities/user/{user_id}/stats",
    tag = "Activities",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Activity counters", body = ActivityStats),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_activity_stats(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<ActivityStats>> {
    let stats = state.activity_service.user_stats(user_id).await?;
    Ok(Json(stats))
}

/// Delete every activity of a user
#[utoipa::path(
    delete,
    path = "/api/activities/user/{user_id}",
    tag = "Activities",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "Activities deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user_activities(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<NoContent> {
    state.activity_service.delete_all_for_user(user_id).await?;
    Ok(NoContent)
}

/// Get activity by ID
#[utoipa::path(
    get,
    path = "/api/activities/{id}",
    tag = "Activities",
    params(("id" = i64, Path, description = "Activity ID")),
    responses(
        (status = 200, description = "Activity", body = ActivityResponse),
        (status = 404, description = "Activity not found")
    )
)]
pub async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ActivityResponse>> {
    let activity = state.activity_service.get_activity(id).await?;
    Ok(Json(ActivityResponse::from(activity)))
}

/// Replace an activity's description and, when given, its date
#[utoipa::path(
    put,
    path = "/api/activities/{id}",
    tag = "Activities",
    params(("id" = i64, Path, description = "Activity ID")),
    request_body = ActivityRequest,
    responses(
        (status = 200, description = "Activity updated", body = ActivityResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Activity not found")
    )
)]
pub async fn update_activity(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ActivityRequest>,
) -> AppResult<Json<ActivityResponse>> {
    let activity = state
        .activity_service
        .update_activity(id, ActivityChanges::from(payload))
        .await?;
    Ok(Json(ActivityResponse::from(activity)))
}

/// Delete an activity
#[utoipa::path(
    delete,
    path = "/api/activities/{id}",
    tag = "Activities",
    params(("id" = i64, Path, description = "Activity ID")),
    responses(
        (status = 204, description = "Activity deleted"),
        (status = 404, description = "Activity not found")
    )
)]
pub async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.activity_service.delete_activity(id).await?;
    Ok(NoContent)
}

fn into_responses(activities: Vec<Activity>) -> Vec<ActivityResponse> {
    activities.into_iter().map(ActivityResponse::from).collect()
}
