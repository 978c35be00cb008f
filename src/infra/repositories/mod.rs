//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod activity_repository;
mod declaration_repository;
pub(crate) mod entities;
mod unp_repository;
mod user_repository;
mod vehicle_repository;

use sea_orm::{DbErr, SqlErr};

use crate::errors::AppError;

pub use activity_repository::{ActivityRepository, ActivityStore};
pub use declaration_repository::{DeclarationRepository, DeclarationStore};
pub use unp_repository::{UnpRepository, UnpStore};
pub use user_repository::{UserRepository, UserStore};
pub use vehicle_repository::{VehicleRepository, VehicleStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use activity_repository::MockActivityRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use declaration_repository::MockDeclarationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use unp_repository::MockUnpRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use vehicle_repository::MockVehicleRepository;

/// Turn a unique-index violation into a conflict on `what`; other errors pass through.
pub(crate) fn conflict_on_unique(err: DbErr, what: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(what),
        _ => AppError::from(err),
    }
}
