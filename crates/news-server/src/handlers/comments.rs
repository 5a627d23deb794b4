use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use news_shared::{
    api::{CreateCommentRequest, UpdateCommentRequest},
    Comment,
};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::routes::AppState;

/// Helper to verify a comment's article reference points at an existing row.
/// A dangling reference is a validation failure, not a missing resource.
async fn verify_article_ref(state: &AppState, article_id: i64) -> Result<(), AppError> {
    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM articles WHERE id = ?")
        .bind(article_id)
        .fetch_optional(&state.db)
        .await?;

    if exists.is_none() {
        return Err(AppError::Validation {
            field: "article",
            message: format!("article {} does not exist", article_id),
        });
    }
    Ok(())
}

/// Helper to verify the addressed comment exists
async fn verify_comment(state: &AppState, id: i64) -> Result<(), AppError> {
    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM comments WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;

    if exists.is_none() {
        return Err(AppError::NotFound);
    }
    Ok(())
}

fn check_body(body: &str) -> Result<(), AppError> {
    if body.trim().is_empty() {
        return Err(AppError::missing_field("body"));
    }
    Ok(())
}

type CommentRow = (
    i64,                   // id
    i64,                   // article_id
    String,                // body
    chrono::DateTime<Utc>, // created_at
);

fn row_to_comment(row: CommentRow) -> Comment {
    Comment {
        id: row.0,
        article_id: row.1,
        body: row.2,
        created_at: row.3,
    }
}

/// GET /api/comments
pub async fn list_comments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let rows: Vec<CommentRow> =
        sqlx::query_as("SELECT id, article_id, body, created_at FROM comments ORDER BY id ASC")
            .fetch_all(&state.db)
            .await?;

    let comments = rows.into_iter().map(row_to_comment).collect();

    Ok(Json(comments))
}

/// POST /api/comments
pub async fn create_comment(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let article_id = req
        .article
        .ok_or_else(|| AppError::missing_field("article"))?;
    let body = req.body.unwrap_or_default();
    check_body(&body)?;

    verify_article_ref(&state, article_id).await?;

    let now = Utc::now();

    let result =
        sqlx::query("INSERT INTO comments (article_id, body, created_at) VALUES (?, ?, ?)")
            .bind(article_id)
            .bind(&body)
            .bind(now)
            .execute(&state.db)
            .await?;

    let comment = Comment {
        id: result.last_insert_rowid(),
        article_id,
        body,
        created_at: now,
    };

    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/comments/:id
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Comment>, AppError> {
    let row: CommentRow =
        sqlx::query_as("SELECT id, article_id, body, created_at FROM comments WHERE id = ?")
            .bind(id)
            .fetch_optional(&state.db)
            .await?
            .ok_or(AppError::NotFound)?;

    Ok(Json(row_to_comment(row)))
}

/// PUT /api/comments/:id
pub async fn replace_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<CreateCommentRequest>,
) -> Result<Json<Comment>, AppError> {
    verify_comment(&state, id).await?;

    let article_id = req
        .article
        .ok_or_else(|| AppError::missing_field("article"))?;
    let body = req.body.unwrap_or_default();
    check_body(&body)?;

    verify_article_ref(&state, article_id).await?;

    let row: CommentRow = sqlx::query_as(
        r#"
        UPDATE comments
        SET article_id = ?, body = ?
        WHERE id = ?
        RETURNING id, article_id, body, created_at
        "#,
    )
    .bind(article_id)
    .bind(&body)
    .bind(id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(row_to_comment(row)))
}

/// PATCH /api/comments/:id
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UpdateCommentRequest>,
) -> Result<Json<Comment>, AppError> {
    verify_comment(&state, id).await?;

    if let Some(article_id) = req.article {
        verify_article_ref(&state, article_id).await?;
    }
    if let Some(ref body) = req.body {
        check_body(body)?;
    }

    let row: CommentRow = sqlx::query_as(
        r#"
        UPDATE comments
        SET article_id = COALESCE(?, article_id),
            body = COALESCE(?, body)
        WHERE id = ?
        RETURNING id, article_id, body, created_at
        "#,
    )
    .bind(req.article)
    .bind(&req.body)
    .bind(id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(row_to_comment(row)))
}

/// DELETE /api/comments/:id
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
