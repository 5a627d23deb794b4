use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use news_shared::{
    api::{CreateArticleRequest, UpdateArticleRequest},
    Article, Comment,
};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::routes::AppState;

const TITLE_MAX_CHARS: usize = 511;

/// Helper to verify the addressed article exists
async fn verify_article(state: &AppState, id: i64) -> Result<(), AppError> {
    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM articles WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;

    if exists.is_none() {
        return Err(AppError::NotFound);
    }
    Ok(())
}

fn check_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::missing_field("title"));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(AppError::Validation {
            field: "title",
            message: format!("title must be at most {} characters", TITLE_MAX_CHARS),
        });
    }
    Ok(())
}

fn check_body(body: &str) -> Result<(), AppError> {
    if body.trim().is_empty() {
        return Err(AppError::missing_field("body"));
    }
    Ok(())
}

type ArticleRow = (
    i64,                   // id
    String,                // title
    String,                // body
    chrono::DateTime<Utc>, // created_at
);

fn row_to_article(row: ArticleRow, comments: Vec<Comment>) -> Article {
    Article {
        id: row.0,
        title: row.1,
        body: row.2,
        created_at: row.3,
        comments,
    }
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

async fn fetch_comments_for(state: &AppState, article_id: i64) -> Result<Vec<Comment>, AppError> {
    let rows: Vec<CommentRow> = sqlx::query_as(
        r#"
        SELECT id, article_id, body, created_at
        FROM comments
        WHERE article_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(&state.db)
    .await?;

    Ok(rows.into_iter().map(row_to_comment).collect())
}

/// GET /api/news
pub async fn list_news(State(state): State<AppState>) -> Result<Json<Vec<Article>>, AppError> {
    let article_rows: Vec<ArticleRow> =
        sqlx::query_as("SELECT id, title, body, created_at FROM articles ORDER BY id ASC")
            .fetch_all(&state.db)
            .await?;

    let comment_rows: Vec<CommentRow> =
        sqlx::query_as("SELECT id, article_id, body, created_at FROM comments ORDER BY id ASC")
            .fetch_all(&state.db)
            .await?;

    let mut by_article: HashMap<i64, Vec<Comment>> = HashMap::new();
    for row in comment_rows {
        let comment = row_to_comment(row);
        by_article
            .entry(comment.article_id)
            .or_default()
            .push(comment);
    }

    let articles = article_rows
        .into_iter()
        .map(|row| {
            let comments = by_article.remove(&row.0).unwrap_or_default();
            row_to_article(row, comments)
        })
        .collect();

    Ok(Json(articles))
}

/// POST /api/news
pub async fn create_news(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateArticleRequest>,
) -> Result<(StatusCode, Json<Article>), AppError> {
    let title = req.title.unwrap_or_default();
    let body = req.body.unwrap_or_default();
    check_title(&title)?;
    check_body(&body)?;

    let now = Utc::now();

    let result = sqlx::query("INSERT INTO articles (title, body, created_at) VALUES (?, ?, ?)")
        .bind(&title)
        .bind(&body)
        .bind(now)
        .execute(&state.db)
        .await?;

    let article = Article {
        id: result.last_insert_rowid(),
        title,
        body,
        created_at: now,
        comments: Vec::new(),
    };

    Ok((StatusCode::CREATED, Json(article)))
}

/// GET /api/news/:id
pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Article>, AppError> {
    let row: ArticleRow =
        sqlx::query_as("SELECT id, title, body, created_at FROM articles WHERE id = ?")
            .bind(id)
            .fetch_optional(&state.db)
            .await?
            .ok_or(AppError::NotFound)?;

    let comments = fetch_comments_for(&state, id).await?;

    Ok(Json(row_to_article(row, comments)))
}

/// PUT /api/news/:id
pub async fn replace_news(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<CreateArticleRequest>,
) -> Result<Json<Article>, AppError> {
    verify_article(&state, id).await?;

    let title = req.title.unwrap_or_default();
    let body = req.body.unwrap_or_default();
    check_title(&title)?;
    check_body(&body)?;

    let row: ArticleRow = sqlx::query_as(
        r#"
        UPDATE articles
        SET title = ?, body = ?
        WHERE id = ?
        RETURNING id, title, body, created_at
        "#,
    )
    .bind(&title)
    .bind(&body)
    .bind(id)
    .fetch_one(&state.db)
    .await?;

    let comments = fetch_comments_for(&state, id).await?;

    Ok(Json(row_to_article(row, comments)))
}

/// PATCH /api/news/:id
pub async fn update_news(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UpdateArticleRequest>,
) -> Result<Json<Article>, AppError> {
    verify_article(&state, id).await?;

    if let Some(ref title) = req.title {
        check_title(title)?;
    }
    if let Some(ref body) = req.body {
        check_body(body)?;
    }

    let row: ArticleRow = sqlx::query_as(
        r#"
        UPDATE articles
        SET title = COALESCE(?, title),
            body = COALESCE(?, body)
        WHERE id = ?
        RETURNING id, title, body, created_at
        "#,
    )
    .bind(&req.title)
    .bind(&req.body)
    .bind(id)
    .fetch_one(&state.db)
    .await?;

    let comments = fetch_comments_for(&state, id).await?;

    Ok(Json(row_to_article(row, comments)))
}

/// DELETE /api/news/:id
pub async fn delete_news(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    // Comments go with the article via the FK cascade
    let result = sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
