use crate::domain::Book;
use crate::ports::book_store::{BookStore as BookStoreTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// BookStoreのインメモリ実装
///
/// ISBNをキーとしたHashMapで書籍を保持する。テストとローカル開発用。
/// マップ全体を単一のMutexで守るため、在庫更新の検証と適用は同一ISBNに
/// 対する並行呼び出しについて原子的になる。
pub struct BookStore {
    books: Mutex<HashMap<String, Book>>,
}

impl BookStore {
    pub fn new() -> Self {
        Self {
            books: Mutex::new(HashMap::new()),
        }
    }

    /// テスト用：指定のISBNを保持しているか
    pub fn contains(&self, isbn: &str) -> bool {
        self.books.lock().unwrap().contains_key(isbn)
    }

    /// テスト用：保持している書籍数
    pub fn len(&self) -> usize {
        self.books.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookStoreTrait for BookStore {
    async fn find(&self, isbn: &str) -> Result<Option<Book>> {
        Ok(self.books.lock().unwrap().get(isbn).cloned())
    }

    /// insert or replace
    async fn save(&self, book: Book) -> Result<()> {
        self.books.lock().unwrap().insert(book.isbn.clone(), book);
        Ok(())
    }

    async fn delete(&self, isbn: &str) -> Result<bool> {
        Ok(self.books.lock().unwrap().remove(isbn).is_some())
    }

    /// ロックを保持したまま検証と適用を行う（原子的な更新）
    async fn update_available(&self, isbn: &str, new_available: u32) -> Result<bool> {
        let mut books = self.books.lock().unwrap();
        let Some(book) = books.get_mut(isbn) else {
            return Ok(false);
        };
        if new_available > book.total {
            return Ok(false);
        }
        book.available = new_available;
        Ok(true)
    }

    async fn find_by_title_contains(&self, title: &str) -> Result<Vec<Book>> {
        let needle = title.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .books
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn find_by_author_contains(&self, author: &str) -> Result<Vec<Book>> {
        let needle = author.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .books
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.author.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn all(&self) -> Result<Vec<Book>> {
        Ok(self.books.lock().unwrap().values().cloned().collect())
    }
}
