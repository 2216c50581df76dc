use once_cell::sync::Lazy;
use regex::Regex;

use super::{Book, Member};

/// メールアドレスの簡易パターン
///
/// ローカル部（英数字と一部記号、ドット区切り）@ ドメイン部（英数字と
/// ハイフン、ドット区切り）+ 2〜4文字のTLD。
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_+&*-]+(?:\.[a-zA-Z0-9_+&*-]+)*@(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,4}$")
        .expect("valid regex")
});

/// インドネシアの携帯番号パターン（正規化後に適用）
///
/// 08 または +628 で始まり、続く8〜11桁で合計10〜13桁になる。
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(08|\+628)[0-9]{8,11}$").expect("valid regex"));

/// 空白とハイフンを取り除く（ISBN・電話番号の正規化）
fn strip_separators(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// メールアドレスとして妥当か
pub fn is_valid_email(email: &str) -> bool {
    !email.trim().is_empty() && EMAIL_RE.is_match(email)
}

/// インドネシア携帯番号として妥当か
pub fn is_valid_phone(phone: &str) -> bool {
    if phone.trim().is_empty() {
        return false;
    }
    PHONE_RE.is_match(&strip_separators(phone))
}

/// ISBNとして妥当か
///
/// 空白とハイフンを除いた残りが、ちょうど10桁または13桁の十進数字で
/// あること。チェックディジットの検証は行わない。
pub fn is_valid_isbn(isbn: &str) -> bool {
    let digits = strip_separators(isbn);
    (digits.len() == 10 || digits.len() == 13) && digits.chars().all(|c| c.is_ascii_digit())
}

/// 空白を除いて空でない文字列か
pub fn is_valid_string(s: &str) -> bool {
    !s.trim().is_empty()
}

pub fn is_non_negative(x: i64) -> bool {
    x >= 0
}

pub fn is_positive(x: i64) -> bool {
    x > 0
}

/// 書籍全体の妥当性
///
/// 冊数はu32のため負になり得ない。available <= totalはここでも検査する
/// （丸め込みではなく拒否するため）。
pub fn is_valid_book(book: &Book) -> bool {
    is_valid_isbn(&book.isbn)
        && is_valid_string(&book.title)
        && is_valid_string(&book.author)
        && book.available <= book.total
        && is_non_negative(book.price)
}

/// 会員全体の妥当性
pub fn is_valid_member(member: &Member) -> bool {
    is_valid_string(&member.id)
        && is_valid_string(&member.name)
        && is_valid_email(&member.email)
        && is_valid_phone(&member.phone)
}
