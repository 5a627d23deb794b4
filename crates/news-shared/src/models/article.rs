use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Comment;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    /// Read-only: always the full comment set, never taken from input.
    #[serde(default)]
    pub comments: Vec<Comment>,
}
