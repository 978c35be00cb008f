//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use the Unit of Work for centralized repository access.

mod activity_service;
mod auditor;
pub mod container;
mod declaration_service;
mod unp_verifier;
mod user_service;
mod vehicle_service;

#[cfg(test)]
mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Collaborators injected into the services
pub use auditor::{Auditor, StaticAuditor};
pub use unp_verifier::{FormatUnpVerifier, UnpVerifier};

// Service traits and implementations
pub use activity_service::{ActivityManager, ActivityService};
pub use declaration_service::{DeclarationManager, DeclarationService};
pub use user_service::{UserManager, UserService};
pub use vehicle_service::{VehicleManager, VehicleService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use unp_verifier::MockUnpVerifier;
