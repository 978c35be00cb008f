//! Activity log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub id: i64,
    pub user_id: i64,
    pub user_name: Option<String>,
    pub description: String,
    pub activity_date: DateTime<Utc>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityInput {
    pub user_id: Option<i64>,
    pub description: String,
    /// Defaults to the current time when absent
    pub activity_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub user_id: i64,
    pub description: String,
    pub activity_date: DateTime<Utc>,
    pub created_by: String,
}

/// Replacement description; the date is kept when `None`
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityChanges {
    pub description: String,
    pub activity_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub user_id: i64,
    #[schema(example = "ACME Logistics")]
    pub user_name: Option<String>,
    #[schema(example = "Submitted transit documents")]
    pub description: String,
    pub activity_date: DateTime<Utc>,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id,
            user_id: activity.user_id,
            user_name: activity.user_name,
            description: activity.description,
            activity_date: activity.activity_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub total_activities: u64,
    pub today_activities: u64,
}
