//! Customs back office
//!
//! Registers business clients and their drivers, keeps each client's fleet
//! and a per-user activity log, and takes customs declarations through a
//! `PENDING -> APPROVED | REJECTED` review.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and rules
//! - **services**: Application use cases and business logic
//! - **infra**: Database, migrations and repositories
//! - **api**: HTTP handlers, extractors and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Allow a client to register with a UNP
//! cargo run -- unp add 190000001
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Declaration, DeclarationStatus, User, UserRole};
pub use errors::{AppError, AppResult};
