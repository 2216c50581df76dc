use thiserror::Error;

/// 貸出管理アプリケーション層のエラー
///
/// 通常のドメイン失敗（見つからない、入力不正、業務ルール違反、ストアが
/// 更新を拒否）はすべてこの列挙型の値として返し、呼び出し側が分岐して
/// 扱う。パニックは使わない。リトライは行わない（必要なら呼び出し側の
/// 責務）。
#[derive(Debug, Error)]
pub enum LendingError {
    /// 書籍の検証に失敗した
    #[error("Book failed validation")]
    InvalidBook,

    /// ISBNの形式が不正
    #[error("Invalid ISBN")]
    InvalidIsbn,

    /// 会員の検証に失敗した
    #[error("Member failed validation")]
    InvalidMember,

    /// 会員が無効化されている
    #[error("Member is not active")]
    MemberInactive,

    /// 会員種別の貸出上限に達している
    #[error("Borrow limit reached for member type")]
    BorrowLimitReached,

    /// 同じISBNの書籍が既に存在する
    #[error("Book with this ISBN already exists")]
    BookAlreadyExists,

    /// 書籍が見つからない
    #[error("Book not found")]
    BookNotFound,

    /// 在庫がない
    #[error("Book is not available")]
    BookNotAvailable,

    /// 貸出中の冊数があるため削除できない
    #[error("Copies are currently on loan")]
    CopiesOnLoan,

    /// この会員はこの書籍を借りていない
    #[error("Book is not borrowed by this member")]
    NotBorrowedByMember,

    /// ストアが在庫更新を拒否した（競合またはストア側の不変条件違反）
    #[error("Store rejected the stock update")]
    StockUpdateRejected,

    /// BookStoreのエラー（輸送・格納層の障害）
    #[error("Book store error")]
    BookStore(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層のResult型
pub type Result<T> = std::result::Result<T, LendingError>;
