//! Unit of Work pattern implementation.
//!
//! Centralizes access to every repository so services depend on a single
//! handle. Multi-table writes that must be atomic (removing a user with
//! everything they own) run in a transaction inside the owning repository.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    ActivityRepository, ActivityStore, DeclarationRepository, DeclarationStore, UnpRepository,
    UnpStore, UserRepository, UserStore, VehicleRepository, VehicleStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    /// UNP reference registry
    fn unps(&self) -> Arc<dyn UnpRepository>;

    fn vehicles(&self) -> Arc<dyn VehicleRepository>;

    fn activities(&self) -> Arc<dyn ActivityRepository>;

    fn declarations(&self) -> Arc<dyn DeclarationRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    unp_repo: Arc<UnpStore>,
    vehicle_repo: Arc<VehicleStore>,
    activity_repo: Arc<ActivityStore>,
    declaration_repo: Arc<DeclarationStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            unp_repo: Arc::new(UnpStore::new(db.clone())),
            vehicle_repo: Arc::new(VehicleStore::new(db.clone())),
            activity_repo: Arc::new(ActivityStore::new(db.clone())),
            declaration_repo: Arc::new(DeclarationStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn unps(&self) -> Arc<dyn UnpRepository> {
        self.unp_repo.clone()
    }

    fn vehicles(&self) -> Arc<dyn VehicleRepository> {
        self.vehicle_repo.clone()
    }

    fn activities(&self) -> Arc<dyn ActivityRepository> {
        self.activity_repo.clone()
    }

    fn declarations(&self) -> Arc<dyn DeclarationRepository> {
        self.declaration_repo.clone()
    }
}

/// Unit of work backed by mockall repositories.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use std::sync::Arc;

    use super::UnitOfWork;
    use crate::infra::repositories::{
        ActivityRepository, DeclarationRepository, MockActivityRepository,
        MockDeclarationRepository, MockUnpRepository, MockUserRepository, MockVehicleRepository,
        UnpRepository, UserRepository, VehicleRepository,
    };

    /// Set expectations on the public mocks, then call [`MockRepositories::build`].
    #[derive(Default)]
    pub struct MockRepositories {
        pub users: MockUserRepository,
        pub unps: MockUnpRepository,
        pub vehicles: MockVehicleRepository,
        pub activities: MockActivityRepository,
        pub declarations: MockDeclarationRepository,
    }

    impl MockRepositories {
        pub fn build(self) -> MockUnitOfWork {
            MockUnitOfWork {
                users: Arc::new(self.users),
                unps: Arc::new(self.unps),
                vehicles: Arc::new(self.vehicles),
                activities: Arc::new(self.activities),
                declarations: Arc::new(self.declarations),
            }
        }
    }

    pub struct MockUnitOfWork {
        users: Arc<MockUserRepository>,
        unps: Arc<MockUnpRepository>,
        vehicles: Arc<MockVehicleRepository>,
        activities: Arc<MockActivityRepository>,
        declarations: Arc<MockDeclarationRepository>,
    }

    impl UnitOfWork for MockUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }

        fn unps(&self) -> Arc<dyn UnpRepository> {
            self.unps.clone()
        }

        fn vehicles(&self) -> Arc<dyn VehicleRepository> {
            self.vehicles.clone()
        }

        fn activities(&self) -> Arc<dyn ActivityRepository> {
            self.activities.clone()
        }

        fn declarations(&self) -> Arc<dyn DeclarationRepository> {
            self.declarations.clone()
        }
    }
}
