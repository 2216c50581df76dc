use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, add_book, borrow_book, compute_fine, get_availability, get_book, list_books,
    remove_book, return_book,
};

/// APIルーターを構築する
///
/// 蔵書管理:
/// - POST   /books - 書籍を登録
/// - GET    /books - 書籍一覧（?title= / ?author= で部分一致）
/// - GET    /books/:isbn - 書籍詳細
/// - DELETE /books/:isbn - 書籍を削除
/// - GET    /books/:isbn/availability - 在庫確認
///
/// 貸出・返却:
/// - POST /lending/borrow - 貸出
/// - POST /lending/return - 返却
///
/// 罰金:
/// - POST /fines/compute - 罰金計算（純粋・状態変更なし）
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Inventory endpoints
        .route("/books", post(add_book).get(list_books))
        .route("/books/:isbn", get(get_book).delete(remove_book))
        .route("/books/:isbn/availability", get(get_availability))
        // Lending endpoints
        .route("/lending/borrow", post(borrow_book))
        .route("/lending/return", post(return_book))
        // Fine endpoints
        .route("/fines/compute", post(compute_fine))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
