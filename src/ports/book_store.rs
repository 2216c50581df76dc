use crate::domain::Book;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 書籍ストアポート
///
/// 書籍レコードのキー付き保管と在庫数の原子的な更新を抽象化する。
/// コアはこの契約のみに依存し、格納方式（インメモリ・PostgreSQLなど）は
/// アダプタが決める。
#[async_trait]
pub trait BookStore: Send + Sync {
    /// ISBNで書籍を検索する
    async fn find(&self, isbn: &str) -> Result<Option<Book>>;

    /// 書籍を保存する（insert or replace）
    async fn save(&self, book: Book) -> Result<()>;

    /// ISBNで書籍を削除する
    ///
    /// 存在しないISBNの場合はfalseを返す。
    async fn delete(&self, isbn: &str) -> Result<bool>;

    /// 貸出可能な冊数を更新する
    ///
    /// `0 <= new_available <= total` を満たさない更新、および存在しない
    /// ISBNへの更新はfalseを返して拒否する。同一ISBNに対する並行した
    /// 貸出・返却に対して、検証と適用は原子的でなければならない。
    async fn update_available(&self, isbn: &str, new_available: u32) -> Result<bool>;

    /// タイトルの部分一致検索（大文字小文字を区別しない）
    async fn find_by_title_contains(&self, title: &str) -> Result<Vec<Book>>;

    /// 著者名の部分一致検索（大文字小文字を区別しない）
    async fn find_by_author_contains(&self, author: &str) -> Result<Vec<Book>>;

    /// すべての書籍を取得する
    async fn all(&self) -> Result<Vec<Book>>;
}
