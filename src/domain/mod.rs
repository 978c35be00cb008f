//! Domain layer - Core business entities and logic
//!
//! Records, commands and response shapes for users, UNP reference entries,
//! vehicles, activities and customs declarations. No database types live
//! here; the infrastructure layer maps its models into these.

pub mod activity;
pub mod declaration;
pub mod password;
pub mod unp;
pub mod user;
pub mod validation;
pub mod vehicle;

pub use activity::{
    Activity, ActivityChanges, ActivityInput, ActivityResponse, ActivityStats, NewActivity,
};
pub use declaration::{
    declaration_number_prefix, declaration_sequence, format_declaration_number, Declaration,
    DeclarationFields, DeclarationInput, DeclarationResponse, DeclarationStats, DeclarationStatus,
    NewDeclaration,
};
pub use password::{Argon2Encoder, Password, PasswordEncoder};
pub use unp::Unp;
pub use user::{NewUser, RegisterUser, User, UserChanges, UserResponse, UserRole};
pub use vehicle::{NewVehicle, Vehicle, VehicleChanges, VehicleInput, VehicleResponse, VehicleStats};
