use rusty_lending::adapters::mock::BookStore as MockBookStore;
use rusty_lending::application::lending::{LendingError, LendingService};
use rusty_lending::domain::{Book, Member, MemberType};
use rusty_lending::ports::{BookStore, book_store};
use std::sync::Arc;

// ============================================================================
// テスト用のヘルパー
// ============================================================================

fn student() -> Member {
    Member::new(
        "M001",
        "John Student",
        "john@student.ac.id",
        "081234567890",
        MemberType::Student,
    )
}

fn faculty() -> Member {
    Member::new(
        "M002",
        "Jane Faculty",
        "jane@faculty.ac.id",
        "+6281234567890",
        MemberType::Faculty,
    )
}

fn rust_book() -> Book {
    Book::new(
        "9781593278281",
        "The Rust Programming Language",
        "Steve Klabnik",
        3,
        450000,
    )
}

async fn setup_service_with_books(books: Vec<Book>) -> (LendingService, Arc<MockBookStore>) {
    let store = Arc::new(MockBookStore::new());
    let service = LendingService::new(store.clone());
    for book in books {
        service.add_book(book).await.expect("Failed to add book");
    }
    (service, store)
}

/// 在庫更新を常に拒否するストア
///
/// 検証は通過するが更新が競合に負けるケース（他の貸出が先に在庫を
/// 取った等）をシミュレートする。
struct RejectingBookStore {
    inner: MockBookStore,
}

impl RejectingBookStore {
    fn new() -> Self {
        Self {
            inner: MockBookStore::new(),
        }
    }
}

#[async_trait::async_trait]
impl BookStore for RejectingBookStore {
    async fn find(&self, isbn: &str) -> book_store::Result<Option<Book>> {
        self.inner.find(isbn).await
    }

    async fn save(&self, book: Book) -> book_store::Result<()> {
        self.inner.save(book).await
    }

    async fn delete(&self, isbn: &str) -> book_store::Result<bool> {
        self.inner.delete(isbn).await
    }

    async fn update_available(&self, _isbn: &str, _available: u32) -> book_store::Result<bool> {
        Ok(false)
    }

    async fn find_by_title_contains(&self, title: &str) -> book_store::Result<Vec<Book>> {
        self.inner.find_by_title_contains(title).await
    }

    async fn find_by_author_contains(&self, author: &str) -> book_store::Result<Vec<Book>> {
        self.inner.find_by_author_contains(author).await
    }

    async fn all(&self) -> book_store::Result<Vec<Book>> {
        self.inner.all().await
    }
}

// ============================================================================
// 蔵書管理
// ============================================================================

#[tokio::test]
async fn test_add_book_starts_fully_available() {
    let (service, _store) = setup_service_with_books(vec![rust_book()]).await;

    let book = service
        .find_book_by_isbn("9781593278281")
        .await
        .unwrap()
        .expect("Book should exist");
    assert_eq!(book.total, 3);
    assert_eq!(book.available, 3);
    assert!(book.is_in_stock());
}

#[tokio::test]
async fn test_add_duplicate_isbn_fails() {
    let (service, store) = setup_service_with_books(vec![rust_book()]).await;

    let result = service.add_book(rust_book()).await;
    assert!(matches!(result, Err(LendingError::BookAlreadyExists)));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_add_invalid_book_fails() {
    let (service, store) = setup_service_with_books(vec![]).await;

    // ISBNが10桁でも13桁でもない
    let bad_isbn = Book::new("12345", "Title", "Author", 1, 1000);
    assert!(matches!(
        service.add_book(bad_isbn).await,
        Err(LendingError::InvalidBook)
    ));

    // タイトルが空白のみ
    let blank_title = Book::new("9781593278281", "   ", "Author", 1, 1000);
    assert!(matches!(
        service.add_book(blank_title).await,
        Err(LendingError::InvalidBook)
    ));

    // 価格が負
    let negative_price = Book::new("9781593278281", "Title", "Author", 1, -1);
    assert!(matches!(
        service.add_book(negative_price).await,
        Err(LendingError::InvalidBook)
    ));

    assert!(store.is_empty());
}

#[tokio::test]
async fn test_remove_book_fails_while_copies_on_loan() {
    let (service, store) = setup_service_with_books(vec![rust_book()]).await;
    let mut member = student();
    service.borrow_book("9781593278281", &mut member).await.unwrap();

    let result = service.remove_book("9781593278281").await;
    assert!(matches!(result, Err(LendingError::CopiesOnLoan)));
    // 書籍は残る
    assert!(store.contains("9781593278281"));
}

#[tokio::test]
async fn test_remove_book_succeeds_when_all_copies_returned() {
    let (service, store) = setup_service_with_books(vec![rust_book()]).await;
    let mut member = student();
    service.borrow_book("9781593278281", &mut member).await.unwrap();
    service.return_book("9781593278281", &mut member).await.unwrap();

    service.remove_book("9781593278281").await.unwrap();
    assert!(!store.contains("9781593278281"));
}

#[tokio::test]
async fn test_remove_missing_book_fails() {
    let (service, _store) = setup_service_with_books(vec![]).await;

    let result = service.remove_book("9781593278281").await;
    assert!(matches!(result, Err(LendingError::BookNotFound)));
}

#[tokio::test]
async fn test_find_book_with_invalid_isbn_is_none() {
    let (service, _store) = setup_service_with_books(vec![rust_book()]).await;

    // 形式不正なISBNはエラーではなく「見つからない」
    let found = service.find_book_by_isbn("not-an-isbn").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_find_books_by_title_is_case_insensitive() {
    let (service, _store) = setup_service_with_books(vec![
        rust_book(),
        Book::new("9780134685991", "Effective Java", "Joshua Bloch", 2, 550000),
    ])
    .await;

    let found = service.find_books_by_title("rust").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].isbn, "9781593278281");

    let found = service.find_books_by_author("BLOCH").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].isbn, "9780134685991");
}

#[tokio::test]
async fn test_availability_for_unknown_book() {
    let (service, _store) = setup_service_with_books(vec![]).await;

    assert_eq!(service.available_count("9781593278281").await.unwrap(), 0);
    assert!(!service.is_available("9781593278281").await.unwrap());
}

// ============================================================================
// 貸出
// ============================================================================

#[tokio::test]
async fn test_borrow_decrements_stock_and_records_loan() {
    let (service, _store) = setup_service_with_books(vec![rust_book()]).await;
    let mut member = student();

    service.borrow_book("9781593278281", &mut member).await.unwrap();

    assert_eq!(service.available_count("9781593278281").await.unwrap(), 2);
    assert!(member.has_borrowed("9781593278281"));
}

#[tokio::test]
async fn test_borrow_fails_when_out_of_stock() {
    let book = Book::new("9781593278281", "The Rust Programming Language", "Steve Klabnik", 1, 450000);
    let (service, _store) = setup_service_with_books(vec![book]).await;

    let mut first = student();
    service.borrow_book("9781593278281", &mut first).await.unwrap();

    // 在庫0での貸出は何度試みても失敗し、状態は変わらない
    let mut second = faculty();
    for _ in 0..3 {
        let result = service.borrow_book("9781593278281", &mut second).await;
        assert!(matches!(result, Err(LendingError::BookNotAvailable)));
        assert!(!second.has_borrowed("9781593278281"));
        assert_eq!(service.available_count("9781593278281").await.unwrap(), 0);
    }
}

#[tokio::test]
async fn test_borrow_fails_at_member_limit() {
    let books = vec![
        Book::new("1111111111", "Book One", "Author", 1, 1000),
        Book::new("2222222222", "Book Two", "Author", 1, 1000),
        Book::new("3333333333", "Book Three", "Author", 1, 1000),
        Book::new("4444444444", "Book Four", "Author", 1, 1000),
    ];
    let (service, _store) = setup_service_with_books(books).await;

    // 学生の上限は3冊
    let mut member = student();
    service.borrow_book("1111111111", &mut member).await.unwrap();
    service.borrow_book("2222222222", &mut member).await.unwrap();
    service.borrow_book("3333333333", &mut member).await.unwrap();

    let result = service.borrow_book("4444444444", &mut member).await;
    assert!(matches!(result, Err(LendingError::BorrowLimitReached)));
    assert_eq!(member.borrowed_isbns.len(), 3);
    // 4冊目の在庫には触れていない
    assert_eq!(service.available_count("4444444444").await.unwrap(), 1);
}

#[tokio::test]
async fn test_borrow_fails_for_inactive_member() {
    let (service, _store) = setup_service_with_books(vec![rust_book()]).await;

    let mut member = student();
    member.active = false;

    let result = service.borrow_book("9781593278281", &mut member).await;
    assert!(matches!(result, Err(LendingError::MemberInactive)));
    assert_eq!(service.available_count("9781593278281").await.unwrap(), 3);
}

#[tokio::test]
async fn test_borrow_fails_for_invalid_member() {
    let (service, _store) = setup_service_with_books(vec![rust_book()]).await;

    let mut member = student();
    member.email = "not-an-email".to_string();

    let result = service.borrow_book("9781593278281", &mut member).await;
    assert!(matches!(result, Err(LendingError::InvalidMember)));
}

#[tokio::test]
async fn test_borrow_fails_for_missing_book() {
    let (service, _store) = setup_service_with_books(vec![]).await;
    let mut member = student();

    let result = service.borrow_book("9781593278281", &mut member).await;
    assert!(matches!(result, Err(LendingError::BookNotFound)));
    assert!(!member.has_borrowed("9781593278281"));
}

#[tokio::test]
async fn test_borrow_leaves_member_untouched_when_store_rejects() {
    let store = Arc::new(RejectingBookStore::new());
    let service = LendingService::new(store);
    service.add_book(rust_book()).await.unwrap();

    let mut member = student();
    let result = service.borrow_book("9781593278281", &mut member).await;

    assert!(matches!(result, Err(LendingError::StockUpdateRejected)));
    // ストアの更新が確定していないので会員側は変更されない
    assert!(!member.has_borrowed("9781593278281"));
    assert!(member.borrowed_isbns.is_empty());
}

// ============================================================================
// 返却
// ============================================================================

#[tokio::test]
async fn test_return_restores_stock_and_clears_loan() {
    let (service, _store) = setup_service_with_books(vec![rust_book()]).await;
    let mut member = student();
    service.borrow_book("9781593278281", &mut member).await.unwrap();

    service.return_book("9781593278281", &mut member).await.unwrap();

    assert_eq!(service.available_count("9781593278281").await.unwrap(), 3);
    assert!(!member.has_borrowed("9781593278281"));
}

#[tokio::test]
async fn test_return_fails_for_book_not_borrowed() {
    let (service, _store) = setup_service_with_books(vec![rust_book()]).await;
    let mut member = student();

    let result = service.return_book("9781593278281", &mut member).await;
    assert!(matches!(result, Err(LendingError::NotBorrowedByMember)));
    assert_eq!(service.available_count("9781593278281").await.unwrap(), 3);
}

#[tokio::test]
async fn test_return_leaves_member_untouched_when_store_rejects() {
    let store = Arc::new(RejectingBookStore::new());
    let service = LendingService::new(store);
    service.add_book(rust_book()).await.unwrap();

    let mut member = student();
    member.add_borrowed("9781593278281");

    let result = service.return_book("9781593278281", &mut member).await;

    assert!(matches!(result, Err(LendingError::StockUpdateRejected)));
    // 貸出と同じ順序制約：ストアの更新が確定するまで会員側は変更されない
    assert!(member.has_borrowed("9781593278281"));
}

#[tokio::test]
async fn test_return_fails_when_stock_count_cannot_grow() {
    // ストアが全冊在庫ありと主張する一方で会員が貸出を記帳している
    // 不整合。在庫カウンタを壊さずに失敗する
    let book = Book::new("9781593278281", "The Rust Programming Language", "Steve Klabnik", u32::MAX, 450000);
    let (service, _store) = setup_service_with_books(vec![book]).await;

    let mut member = student();
    member.add_borrowed("9781593278281");

    let result = service.return_book("9781593278281", &mut member).await;

    assert!(matches!(result, Err(LendingError::StockUpdateRejected)));
    assert!(member.has_borrowed("9781593278281"));
    assert_eq!(
        service.available_count("9781593278281").await.unwrap(),
        u32::MAX
    );
}

#[tokio::test]
async fn test_borrow_return_cycle_is_reversible() {
    let (service, _store) = setup_service_with_books(vec![rust_book()]).await;
    let mut member = faculty();

    for _ in 0..5 {
        service.borrow_book("9781593278281", &mut member).await.unwrap();
        service.return_book("9781593278281", &mut member).await.unwrap();
    }

    assert_eq!(service.available_count("9781593278281").await.unwrap(), 3);
    assert!(member.borrowed_isbns.is_empty());
}
