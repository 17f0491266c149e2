use super::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A suggestion submitted to a tenant's board.
///
/// `id` is global; `number` is the tenant-local sequence shown in URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: i32,
    pub number: i32,
    pub title: String,
    pub description: String,
    pub created_on: DateTime<Utc>,
    pub user: UserSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i32,
    pub content: String,
    pub created_on: DateTime<Utc>,
    pub user: UserSummary,
}
