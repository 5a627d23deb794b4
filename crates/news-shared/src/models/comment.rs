use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(rename = "article")]
    pub article_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_serializes_owner_as_article() {
        let comment = Comment {
            id: 7,
            article_id: 3,
            body: "A sample comment.".to_string(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&comment).unwrap();
        assert_eq!(value["article"], 3);
        assert_eq!(value["body"], "A sample comment.");
        assert!(value.get("article_id").is_none());
        assert!(value["created_at"].is_string());
    }

    #[test]
    fn comment_deserializes_article_field() {
        let comment: Comment = serde_json::from_str(
            r#"{"id":1,"article":9,"body":"hi","created_at":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(comment.article_id, 9);
    }
}
