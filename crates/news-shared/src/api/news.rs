use serde::{Deserialize, Serialize};

/// Required fields arrive as `Option` so the server can answer a missing one
/// with a field-level 400 instead of a deserialization failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateArticleRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateArticleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}
