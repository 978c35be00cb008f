//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and migrations
//! - SeaORM repositories
//! - Unit of Work for repository access

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    ActivityRepository, ActivityStore, DeclarationRepository, DeclarationStore, UnpRepository,
    UnpStore, UserRepository, UserStore, VehicleRepository, VehicleStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockActivityRepository, MockDeclarationRepository, MockUnpRepository, MockUserRepository,
    MockVehicleRepository,
};
