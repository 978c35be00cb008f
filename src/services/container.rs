//! Service Container - Centralized service access.
//!
//! Wires every service to one `Persistence` unit of work and the shared
//! collaborators (password encoder, UNP verifier, auditor).

use std::sync::Arc;

use super::{
    ActivityManager, ActivityService, DeclarationManager, DeclarationService, FormatUnpVerifier,
    StaticAuditor, UserManager, UserService, VehicleManager, VehicleService,
};
use crate::config::Config;
use crate::domain::Argon2Encoder;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn users(&self) -> Arc<dyn UserService>;

    fn vehicles(&self) -> Arc<dyn VehicleService>;

    fn activities(&self) -> Arc<dyn ActivityService>;

    fn declarations(&self) -> Arc<dyn DeclarationService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    user_service: Arc<dyn UserService>,
    vehicle_service: Arc<dyn VehicleService>,
    activity_service: Arc<dyn ActivityService>,
    declaration_service: Arc<dyn DeclarationService>,
}

impl Services {
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
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let auditor = Arc::new(StaticAuditor::from_config(config));

        let user_service = Arc::new(UserManager::new(
            uow.clone(),
            Arc::new(Argon2Encoder::new()),
            Arc::new(FormatUnpVerifier),
            auditor.clone(),
        ));
        let vehicle_service = Arc::new(VehicleManager::new(uow.clone(), auditor.clone()));
        let activity_service = Arc::new(ActivityManager::new(uow.clone(), auditor.clone()));
        let declaration_service = Arc::new(DeclarationManager::new(uow, auditor));

        Self::new(
            user_service,
            vehicle_service,
            activity_service,
            declaration_service,
        )
    }
}

impl ServiceContainer for Services {
    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn vehicles(&self) -> Arc<dyn VehicleService> {
        self.vehicle_service.clone()
    }

    fn activities(&self) -> Arc<dyn ActivityService> {
        self.activity_service.clone()
    }

    fn declarations(&self) -> Arc<dyn DeclarationService> {
        self.declaration_service.clone()
    }
}
