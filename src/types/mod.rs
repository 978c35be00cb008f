//! Shared request and response types.

mod pagination;
mod response;

pub use pagination::{ActivityPage, Paginated, PaginationMeta, PaginationParams, UserPage};
pub use response::{Created, ExistsResponse, NoContent};
