//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    ActivityService, DeclarationService, ServiceContainer, Services, UserService, VehicleService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub vehicle_service: Arc<dyn VehicleService>,
    pub activity_service: Arc<dyn ActivityService>,
    pub declaration_service: Arc<dyn DeclarationService>,
    /// Database connection, probed by the health check when present
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_container(&container).with_database(database)
    }

    /// Take every service from a container.
    pub fn from_container(container: &dyn ServiceContainer) -> Self {
        Self::new(
            container.users(),
            container.vehicles(),
            container.activities(),
            container.declarations(),
        )
    }

    /// Create new application state with manually injected services.
    pub fn new(
        user_service: Arc<dyn UserService>,
        vehicle_service: Arc<dyn VehicleService>,
        activity_service: Arc<dyn ActivityService>,
        declaration_service: Arc<dyn DeclarationService>,
    ) -> Self {
        Self {
            user_service,
            vehicle_service,
            activity_service,
            declaration_service,
            database: None,
        }
    }

    pub fn with_database(mut self, database: Arc<Database>) -> Self {
        self.database = Some(database);
        self
    }
}
