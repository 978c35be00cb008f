//! UNP reference entry.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Pre-approved registration number a client may bind to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unp {
    pub id: i64,
    pub unp: String,
    pub created_at: DateTime<Utc>,
}
