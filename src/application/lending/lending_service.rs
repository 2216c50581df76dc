use std::sync::Arc;

use crate::domain::{Book, Member, validation};
use crate::ports::BookStore;

use super::errors::{LendingError, Result};

/// 貸出サービス
///
/// 貸出・返却・登録・削除を編成し、Bookの在庫とMemberの貸出中集合に
/// またがる不変条件を強制する。入力はValidationで門前検査し、在庫の
/// 現在値はBookStoreに問い合わせ、補償的な在庫更新をストアに発行する。
///
/// サービス自身はロックを持たない。在庫カウンタの原子性はストアの
/// `update_available`契約に委ねる。1回の貸出・返却につきストアへの変更は
/// 最大1回で、成功が確認された後にのみ会員側のインメモリ状態を変更する
/// （逆順にはしない。両方を楽観的に行うこともしない）。
#[derive(Clone)]
pub struct LendingService {
    book_store: Arc<dyn BookStore>,
}

impl LendingService {
    pub fn new(book_store: Arc<dyn BookStore>) -> Self {
        Self { book_store }
    }

    /// 書籍を登録する
    ///
    /// 検証に失敗した書籍、および同じISBNが既に存在する場合は失敗する。
    pub async fn add_book(&self, book: Book) -> Result<()> {
        if !validation::is_valid_book(&book) {
            return Err(LendingError::InvalidBook);
        }

        let existing = self
            .book_store
            .find(&book.isbn)
            .await
            .map_err(LendingError::BookStore)?;
        if existing.is_some() {
            return Err(LendingError::BookAlreadyExists);
        }

        self.book_store
            .save(book)
            .await
            .map_err(LendingError::BookStore)?;
        Ok(())
    }

    /// 書籍を削除する
    ///
    /// 貸出中の冊数がある間（available != total）は削除できない。
    pub async fn remove_book(&self, isbn: &str) -> Result<()> {
        if !validation::is_valid_isbn(isbn) {
            return Err(LendingError::InvalidIsbn);
        }

        let book = self
            .book_store
            .find(isbn)
            .await
            .map_err(LendingError::BookStore)?
            .ok_or(LendingError::BookNotFound)?;

        if book.available != book.total {
            return Err(LendingError::CopiesOnLoan);
        }

        let deleted = self
            .book_store
            .delete(isbn)
            .await
            .map_err(LendingError::BookStore)?;
        if !deleted {
            return Err(LendingError::BookNotFound);
        }
        Ok(())
    }

    /// ISBNで書籍を検索する
    ///
    /// 形式不正なISBNは「見つからない」として扱い、エラーにはしない。
    pub async fn find_book_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        if !validation::is_valid_isbn(isbn) {
            return Ok(None);
        }
        self.book_store
            .find(isbn)
            .await
            .map_err(LendingError::BookStore)
    }

    /// タイトルの部分一致検索
    pub async fn find_books_by_title(&self, title: &str) -> Result<Vec<Book>> {
        self.book_store
            .find_by_title_contains(title)
            .await
            .map_err(LendingError::BookStore)
    }

    /// 著者名の部分一致検索
    pub async fn find_books_by_author(&self, author: &str) -> Result<Vec<Book>> {
        self.book_store
            .find_by_author_contains(author)
            .await
            .map_err(LendingError::BookStore)
    }

    /// すべての書籍を取得する
    pub async fn list_books(&self) -> Result<Vec<Book>> {
        self.book_store.all().await.map_err(LendingError::BookStore)
    }

    /// 在庫があるか（書籍が存在し、貸出可能な冊数 > 0）
    pub async fn is_available(&self, isbn: &str) -> Result<bool> {
        let book = self
            .book_store
            .find(isbn)
            .await
            .map_err(LendingError::BookStore)?;
        Ok(book.is_some_and(|b| b.is_in_stock()))
    }

    /// 貸出可能な冊数。書籍が見つからない場合は0
    pub async fn available_count(&self, isbn: &str) -> Result<u32> {
        let book = self
            .book_store
            .find(isbn)
            .await
            .map_err(LendingError::BookStore)?;
        Ok(book.map(|b| b.available).unwrap_or(0))
    }

    /// 書籍を貸し出す
    ///
    /// 検査順：ISBN形式 → 会員の妥当性 → 会員が有効 → 貸出上限 →
    /// 書籍の存在と在庫。すべて通過したら在庫を1減らす更新をストアに
    /// 発行し、ストアが成功を確認した後にのみ会員の貸出中集合へISBNを
    /// 追加する。ストアが更新を拒否した場合（競合に負けた等）、会員側の
    /// 状態は一切変更されない。
    pub async fn borrow_book(&self, isbn: &str, member: &mut Member) -> Result<()> {
        if !validation::is_valid_isbn(isbn) {
            return Err(LendingError::InvalidIsbn);
        }
        if !validation::is_valid_member(member) {
            return Err(LendingError::InvalidMember);
        }
        if !member.active {
            return Err(LendingError::MemberInactive);
        }
        if !member.can_borrow_more() {
            return Err(LendingError::BorrowLimitReached);
        }

        let book = self
            .book_store
            .find(isbn)
            .await
            .map_err(LendingError::BookStore)?
            .ok_or(LendingError::BookNotFound)?;
        if !book.is_in_stock() {
            return Err(LendingError::BookNotAvailable);
        }

        let updated = self
            .book_store
            .update_available(isbn, book.available - 1)
            .await
            .map_err(LendingError::BookStore)?;
        if !updated {
            tracing::warn!(isbn, member_id = %member.id, "store rejected stock decrement");
            return Err(LendingError::StockUpdateRejected);
        }

        // ストア側の更新が確定してから会員側を変更する
        member.add_borrowed(isbn);
        Ok(())
    }

    /// 書籍を返却する
    ///
    /// このサービスの記帳上、会員が借りていない書籍は返却できない。
    /// 書籍レコードがストアに存在しない場合はデータ不整合として失敗する
    /// （正常な運用では起こらない）。在庫を1増やす更新をストアに発行し、
    /// 成功後に会員の貸出中集合からISBNを取り除く。
    ///
    /// 罰金の計算・記録はこの操作の範囲外で、FineCalculatorを使った
    /// 別の報告ステップに委ねられる。
    pub async fn return_book(&self, isbn: &str, member: &mut Member) -> Result<()> {
        if !validation::is_valid_isbn(isbn) {
            return Err(LendingError::InvalidIsbn);
        }
        if !member.has_borrowed(isbn) {
            return Err(LendingError::NotBorrowedByMember);
        }

        let book = self
            .book_store
            .find(isbn)
            .await
            .map_err(LendingError::BookStore)?
            .ok_or(LendingError::BookNotFound)?;

        // available == u32::MAX はストアのレコードと会員の記帳が矛盾して
        // いる場合にしか起こらない。BookNotFoundと同様にデータ不整合として
        // 失敗させる
        let restored = book
            .available
            .checked_add(1)
            .ok_or(LendingError::StockUpdateRejected)?;

        let updated = self
            .book_store
            .update_available(isbn, restored)
            .await
            .map_err(LendingError::BookStore)?;
        if !updated {
            tracing::warn!(isbn, member_id = %member.id, "store rejected stock increment");
            return Err(LendingError::StockUpdateRejected);
        }

        member.remove_borrowed(isbn);
        Ok(())
    }
}
