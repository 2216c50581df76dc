use crate::application::lending::{LendingError, LendingService};
use crate::domain::fine;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{
        AddBookRequest, AvailabilityResponse, BookResponse, ComputeFineRequest, FineResponse,
        LendingRequest, LendingResponse, ListBooksQuery,
    },
};

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub lending: LendingService,
}

// ============================================================================
// Book handlers
// ============================================================================

/// POST /books - 書籍を登録
///
/// 強制されるビジネスルール:
/// - 書籍が検証を通過すること（ISBN形式・非空のタイトル/著者・価格非負）
/// - 同じISBNの書籍が存在しないこと
pub async fn add_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let book = req.into_book();
    state.lending.add_book(book.clone()).await?;

    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

/// DELETE /books/:isbn - 書籍を削除
///
/// 強制されるビジネスルール:
/// - 貸出中の冊数がないこと（available == total）
pub async fn remove_book(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.lending.remove_book(&isbn).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /books/:isbn - 書籍詳細を取得
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state
        .lending
        .find_book_by_isbn(&isbn)
        .await?
        .ok_or(ApiError::from(LendingError::BookNotFound))?;

    Ok(Json(BookResponse::from(book)))
}

/// GET /books - 書籍一覧（title / author で部分一致フィルタ）
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListBooksQuery>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = if let Some(title) = &query.title {
        state.lending.find_books_by_title(title).await?
    } else if let Some(author) = &query.author {
        state.lending.find_books_by_author(author).await?
    } else {
        state.lending.list_books().await?
    };

    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// GET /books/:isbn/availability - 在庫を確認
///
/// 書籍が存在しない場合は available = 0, in_stock = false を返す
/// （404にはしない）。
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let available = state.lending.available_count(&isbn).await?;
    let in_stock = state.lending.is_available(&isbn).await?;

    Ok(Json(AvailabilityResponse {
        isbn,
        available,
        in_stock,
    }))
}

// ============================================================================
// Lending handlers
// ============================================================================

/// POST /lending/borrow - 書籍を貸し出す
///
/// 会員の状態はリクエストボディで渡され、更新後の会員がレスポンスで
/// 返る（コアは会員を永続化しない）。失敗時はリクエストの会員のまま
/// 変更されない。
pub async fn borrow_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LendingRequest>,
) -> Result<Json<LendingResponse>, ApiError> {
    let mut member = req.member;
    state.lending.borrow_book(&req.isbn, &mut member).await?;

    Ok(Json(LendingResponse {
        isbn: req.isbn,
        member,
    }))
}

/// POST /lending/return - 書籍を返却する
///
/// 罰金の計算はこの操作に含まれない。POST /fines/compute を参照。
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LendingRequest>,
) -> Result<Json<LendingResponse>, ApiError> {
    let mut member = req.member;
    state.lending.return_book(&req.isbn, &mut member).await?;

    Ok(Json(LendingResponse {
        isbn: req.isbn,
        member,
    }))
}

// ============================================================================
// Fine handlers
// ============================================================================

/// POST /fines/compute - 罰金を計算する（報告ステップ）
///
/// 純粋な計算のみで状態は変更しない。「今日」はリクエストで指定でき、
/// 省略時のみここでサーバーの現在日付を読む（コア内では読まない）。
pub async fn compute_fine(Json(req): Json<ComputeFineRequest>) -> Json<FineResponse> {
    let today = req
        .today
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let amount = fine::compute_fine(&req.loan, &req.member, today);
    let severity = fine::fine_severity(amount);

    Json(FineResponse {
        loan_id: req.loan.loan_id.value(),
        days_overdue: req.loan.days_overdue(today),
        amount,
        severity: severity.as_str().to_string(),
    })
}
