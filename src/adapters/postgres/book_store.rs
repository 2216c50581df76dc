use crate::domain::Book;
use crate::ports::book_store::{BookStore as BookStoreTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

/// PostgreSQLの行データをBookに変換する
///
/// 冊数カラムはINTEGER（i32）で保持されるため、ドメインのu32への変換で
/// エラーハンドリングを行う。
fn map_row_to_book(row: &PgRow) -> Result<Book> {
    let total_i32: i32 = row.get("total");
    let available_i32: i32 = row.get("available");

    let total: u32 = total_i32.try_into().map_err(|_| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("total out of range: {}", total_i32),
        )) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let available: u32 = available_i32.try_into().map_err(|_| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("available out of range: {}", available_i32),
        )) as Box<dyn std::error::Error + Send + Sync>
    })?;

    Ok(Book {
        isbn: row.get("isbn"),
        title: row.get("title"),
        author: row.get("author"),
        total,
        available,
        price: row.get("price"),
    })
}

/// BookStoreのPostgreSQL実装
pub struct BookStore {
    pool: PgPool,
}

impl BookStore {
    /// PostgreSQLコネクションプールから新しいBookStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStoreTrait for BookStore {
    async fn find(&self, isbn: &str) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT isbn, title, author, total, available, price
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    /// 書籍を保存する（upsert）
    ///
    /// INSERT ... ON CONFLICT UPDATEを使用して insert-or-replace を
    /// 1文で行う。
    async fn save(&self, book: Book) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO books (isbn, title, author, total, available, price)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (isbn)
            DO UPDATE SET
                title = EXCLUDED.title,
                author = EXCLUDED.author,
                total = EXCLUDED.total,
                available = EXCLUDED.available,
                price = EXCLUDED.price,
                updated_at = now()
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.total as i32)
        .bind(book.available as i32)
        .bind(book.price)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, isbn: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 在庫数を更新する
    ///
    /// 範囲検査（0 <= new_available <= total）をUPDATE文のWHERE句に
    /// 含めることで、検証と適用がデータベース内で原子的に行われる。
    /// 条件を満たさない更新と存在しないISBNはともに0行更新となり、
    /// falseを返す。
    async fn update_available(&self, isbn: &str, new_available: u32) -> Result<bool> {
        let Ok(new_count) = i32::try_from(new_available) else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE books
            SET available = $2, updated_at = now()
            WHERE isbn = $1 AND $2 >= 0 AND $2 <= total
            "#,
        )
        .bind(isbn)
        .bind(new_count)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_title_contains(&self, title: &str) -> Result<Vec<Book>> {
        if title.trim().is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT isbn, title, author, total, available, price
            FROM books
            WHERE title ILIKE '%' || $1 || '%'
            ORDER BY title ASC
            "#,
        )
        .bind(title.trim())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_book).collect()
    }

    async fn find_by_author_contains(&self, author: &str) -> Result<Vec<Book>> {
        if author.trim().is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT isbn, title, author, total, available, price
            FROM books
            WHERE author ILIKE '%' || $1 || '%'
            ORDER BY title ASC
            "#,
        )
        .bind(author.trim())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_book).collect()
    }

    async fn all(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT isbn, title, author, total, available, price
            FROM books
            ORDER BY title ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_book).collect()
    }
}
