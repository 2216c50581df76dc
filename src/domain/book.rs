use serde::{Deserialize, Serialize};

/// 書籍エンティティ - ISBNを識別子とする
///
/// 不変条件：`available <= total`。この条件を破る更新は拒否される
/// （丸め込みはしない）。検証は[`crate::domain::validation::is_valid_book`]と
/// BookStoreの在庫更新の両方で行われる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// ISBN（正規化後10桁または13桁）
    pub isbn: String,
    pub title: String,
    pub author: String,
    /// 所蔵冊数
    pub total: u32,
    /// 貸出可能な冊数（0 <= available <= total）
    pub available: u32,
    /// 単価（ルピア）
    pub price: i64,
}

impl Book {
    /// 新しい書籍を作成する
    ///
    /// 登録時点では貸出中の冊数はないため、availableはtotalと同じ値で
    /// 初期化される。
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        total: u32,
        price: i64,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            total,
            available: total,
            price,
        }
    }

    /// 在庫があるか（貸出可能な冊数 > 0）
    pub fn is_in_stock(&self) -> bool {
        self.available > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book_initializes_available_to_total() {
        let book = Book::new("9781234567897", "Clean Code", "Robert Martin", 5, 150_000);
        assert_eq!(book.total, 5);
        assert_eq!(book.available, 5);
    }

    #[test]
    fn test_is_in_stock() {
        let mut book = Book::new("9781234567897", "Clean Code", "Robert Martin", 2, 150_000);
        assert!(book.is_in_stock());

        book.available = 0;
        assert!(!book.is_in_stock());
    }
}
