//! HTTP request handlers.

pub mod activity_handler;
pub mod declaration_handler;
pub mod user_handler;
pub mod vehicle_handler;

pub use activity_handler::activity_routes;
pub use declaration_handler::declaration_routes;
pub use user_handler::user_routes;
pub use vehicle_handler::vehicle_routes;
