//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::{activity_handler, declaration_handler, user_handler, vehicle_handler};
use crate::domain::{
    ActivityResponse, ActivityStats, DeclarationResponse, DeclarationStats, DeclarationStatus,
    UserResponse, UserRole, VehicleResponse, VehicleStats,
};
use crate::types::{ActivityPage, ExistsResponse, PaginationMeta, UserPage};

/// OpenAPI documentation for the customs back office
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Customs Back Office API",
        version = "0.1.0",
        description = "Clients, drivers, vehicles, activity logs and customs declarations"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // User endpoints
        user_handler::register_user,
        user_handler::list_users,
        user_handler::list_users_page,
        user_handler::list_users_by_role,
        user_handler::check_username,
        user_handler::check_email,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
        // Vehicle endpoints
        vehicle_handler::create_vehicle,
        vehicle_handler::list_vehicles,
        vehicle_handler::get_vehicle,
        vehicle_handler::list_client_vehicles,
        vehicle_handler::client_vehicle_stats,
        vehicle_handler::list_vehicles_by_type,
        vehicle_handler::get_vehicle_by_plate,
        vehicle_handler::check_license_plate,
        vehicle_handler::update_vehicle,
        vehicle_handler::delete_vehicle,
        // Activity endpoints
        activity_handler::create_activity,
        activity_handler::create_activity_for_username,
        activity_handler::list_activities,
        activity_handler::list_activities_in_range,
        activity_handler::list_user_activities,
        activity_handler::recent_user_activities,
        activity_handler::list_user_activities_page,
        activity_handler::list_user_activities_in_range,
        activity_handler::search_user_activities,
        activity_handler::user_activity_stats,
        activity_handler::delete_user_activities,
        activity_handler::get_activity,
        activity_handler::update_activity,
        activity_handler::delete_activity,
        // Declaration endpoints
        declaration_handler::create_declaration,
        declaration_handler::list_declarations,
        declaration_handler::get_declaration,
        declaration_handler::list_client_declarations,
        declaration_handler::client_declaration_stats,
        declaration_handler::list_declarations_by_status,
        declaration_handler::update_declaration,
        declaration_handler::change_declaration_status,
        declaration_handler::delete_declaration,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            VehicleResponse,
            VehicleStats,
            ActivityResponse,
            ActivityStats,
            DeclarationStatus,
            DeclarationResponse,
            DeclarationStats,
            // Shared types
            ExistsResponse,
            PaginationMeta,
            UserPage,
            ActivityPage,
            // Request bodies
            user_handler::RegisterUserRequest,
            user_handler::UpdateUserRequest,
            vehicle_handler::CreateVehicleRequest,
            vehicle_handler::UpdateVehicleRequest,
            activity_handler::ActivityRequest,
            declaration_handler::DeclarationRequest,
            declaration_handler::StatusChangeRequest,
        )
    ),
    tags(
        (name = "Users", description = "Client and driver registration and profiles"),
        (name = "Vehicles", description = "Client fleets"),
        (name = "Activities", description = "Per-user activity log"),
        (name = "Declarations", description = "Customs declarations and their review")
    )
)]
pub struct ApiDoc;
