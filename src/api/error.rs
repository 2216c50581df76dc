use crate::application::lending::LendingError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを
/// 提供する。
#[derive(Debug)]
pub struct ApiError(LendingError);

impl From<LendingError> for ApiError {
    fn from(err: LendingError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self.0 {
            // 400 Bad Request - 入力の形式不正
            LendingError::InvalidIsbn => (StatusCode::BAD_REQUEST, "INVALID_ISBN", "Invalid ISBN"),
            LendingError::InvalidBook => (
                StatusCode::BAD_REQUEST,
                "INVALID_BOOK",
                "Book failed validation",
            ),
            LendingError::InvalidMember => (
                StatusCode::BAD_REQUEST,
                "INVALID_MEMBER",
                "Member failed validation",
            ),

            // 404 Not Found
            LendingError::BookNotFound => {
                (StatusCode::NOT_FOUND, "BOOK_NOT_FOUND", "Book not found")
            }

            // 409 Conflict - 既存リソースとの衝突、または更新競合
            LendingError::BookAlreadyExists => (
                StatusCode::CONFLICT,
                "BOOK_ALREADY_EXISTS",
                "Book with this ISBN already exists",
            ),
            LendingError::StockUpdateRejected => (
                StatusCode::CONFLICT,
                "STOCK_UPDATE_REJECTED",
                "Store rejected the stock update",
            ),

            // 422 Unprocessable Entity - ビジネスルール違反
            LendingError::MemberInactive => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MEMBER_INACTIVE",
                "Member is not active",
            ),
            LendingError::BorrowLimitReached => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "BORROW_LIMIT_REACHED",
                "Borrow limit reached for member type",
            ),
            LendingError::BookNotAvailable => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "BOOK_NOT_AVAILABLE",
                "Book is not available",
            ),
            LendingError::CopiesOnLoan => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "COPIES_ON_LOAN",
                "Copies are currently on loan",
            ),
            LendingError::NotBorrowedByMember => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NOT_BORROWED_BY_MEMBER",
                "Book is not borrowed by this member",
            ),

            // 500 Internal Server Error - ストア障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            LendingError::BookStore(ref e) => {
                tracing::error!("Book store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "BOOK_STORE_ERROR",
                    "Book store error",
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
