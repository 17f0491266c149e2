use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// System generated notification shown to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i32,
    pub title: String,
    pub link: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
