use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 会員種別
///
/// 種別ごとの貸出上限と罰金ポリシーは閉じた列挙型へのmatchで表現する
/// （小さく固定された種別集合のため、動的ディスパッチは不要）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberType {
    /// 学生
    Student,
    /// 教員
    Faculty,
    /// 一般
    General,
}

impl MemberType {
    /// 同時に借りられる冊数の上限
    pub fn borrow_limit(self) -> usize {
        match self {
            MemberType::Student => 3,
            MemberType::Faculty => 10,
            MemberType::General => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberType::Student => "student",
            MemberType::Faculty => "faculty",
            MemberType::General => "general",
        }
    }
}

impl std::str::FromStr for MemberType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(MemberType::Student),
            "faculty" => Ok(MemberType::Faculty),
            "general" => Ok(MemberType::General),
            _ => Err(format!("Invalid member type: {}", s)),
        }
    }
}

/// 会員エンティティ
///
/// 貸出中のISBN集合はこの構造体が持ち、コアは永続化しない（呼び出し側が
/// 所有する）。集合の変更は貸出・返却トランザクションの成功時に限られる。
///
/// 不変条件：`borrowed_isbns.len() <= member_type.borrow_limit()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    /// 電話番号（インドネシア携帯形式）
    pub phone: String,
    pub member_type: MemberType,
    pub active: bool,
    /// 現在借りている書籍のISBN集合
    pub borrowed_isbns: HashSet<String>,
}

impl Member {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        member_type: MemberType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            member_type,
            active: true,
            borrowed_isbns: HashSet::new(),
        }
    }

    /// まだ貸出上限に達していないか
    pub fn can_borrow_more(&self) -> bool {
        self.borrowed_isbns.len() < self.member_type.borrow_limit()
    }

    /// この会員が指定のISBNを借りているか
    pub fn has_borrowed(&self, isbn: &str) -> bool {
        self.borrowed_isbns.contains(isbn)
    }

    /// 貸出中の集合にISBNを追加する
    ///
    /// 貸出トランザクションの成功時（ストア側の更新確定後）にのみ呼ばれる。
    pub fn add_borrowed(&mut self, isbn: impl Into<String>) {
        self.borrowed_isbns.insert(isbn.into());
    }

    /// 貸出中の集合からISBNを取り除く
    pub fn remove_borrowed(&mut self, isbn: &str) -> bool {
        self.borrowed_isbns.remove(isbn)
    }
}
