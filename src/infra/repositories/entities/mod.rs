//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod activity;
pub mod declaration;
pub mod unp;
pub mod user;
pub mod vehicle;
