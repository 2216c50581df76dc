use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Book, Loan, Member};

/// 書籍登録リクエスト（POST /books）
#[derive(Debug, Deserialize)]
pub struct AddBookRequest {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub total: u32,
    pub price: i64,
}

impl AddBookRequest {
    /// availableはtotalで初期化される（登録時点で貸出中の冊数はない）
    pub fn into_book(self) -> Book {
        Book::new(self.isbn, self.title, self.author, self.total, self.price)
    }
}

/// 書籍レスポンス
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub total: u32,
    pub available: u32,
    pub price: i64,
    pub in_stock: bool,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        let in_stock = book.is_in_stock();
        Self {
            isbn: book.isbn,
            title: book.title,
            author: book.author,
            total: book.total,
            available: book.available,
            price: book.price,
            in_stock,
        }
    }
}

/// 書籍一覧のクエリパラメータ（title / author は部分一致）
#[derive(Debug, Deserialize)]
pub struct ListBooksQuery {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// 在庫レスポンス（GET /books/:isbn/availability）
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub isbn: String,
    pub available: u32,
    pub in_stock: bool,
}

/// 貸出・返却リクエスト
///
/// 会員の状態はコアが永続化しない（呼び出し側が所有する）ため、
/// リクエストボディで渡し、更新後の会員をレスポンスで返す。
#[derive(Debug, Deserialize)]
pub struct LendingRequest {
    pub isbn: String,
    pub member: Member,
}

/// 貸出・返却レスポンス
#[derive(Debug, Serialize)]
pub struct LendingResponse {
    pub isbn: String,
    pub member: Member,
}

/// 罰金計算リクエスト（POST /fines/compute）
///
/// todayを省略した場合はサーバーの現在日付を使う。決定的な結果が
/// 必要な呼び出し側（テスト・レポート再現）は明示的に渡す。
#[derive(Debug, Deserialize)]
pub struct ComputeFineRequest {
    pub loan: Loan,
    pub member: Member,
    pub today: Option<NaiveDate>,
}

/// 罰金計算レスポンス
#[derive(Debug, Serialize)]
pub struct FineResponse {
    pub loan_id: Uuid,
    pub days_overdue: i64,
    pub amount: i64,
    pub severity: String,
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
