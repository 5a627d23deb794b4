use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::db::DbPool;
use crate::handlers::{comments as comment_handlers, news as news_handlers};

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
}

pub fn create_router(db: DbPool) -> Router {
    let state = AppState { db };

    // Collection and item routes per entity
    let news_routes = Router::new()
        .route("/", get(news_handlers::list_news))
        .route("/", post(news_handlers::create_news))
        .route("/:id", get(news_handlers::get_news))
        .route("/:id", put(news_handlers::replace_news))
        .route("/:id", patch(news_handlers::update_news))
        .route("/:id", delete(news_handlers::delete_news));

    let comment_routes = Router::new()
        .route("/", get(comment_handlers::list_comments))
        .route("/", post(comment_handlers::create_comment))
        .route("/:id", get(comment_handlers::get_comment))
        .route("/:id", put(comment_handlers::replace_comment))
        .route("/:id", patch(comment_handlers::update_comment))
        .route("/:id", delete(comment_handlers::delete_comment));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/news", news_routes)
        .nest("/api/comments", comment_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
