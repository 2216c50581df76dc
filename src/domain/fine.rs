use chrono::NaiveDate;

use super::{Loan, Member, MemberType};

/// 延滞猶予期間（日数）
///
/// この日数以内の延滞には罰金を課さない。
pub const GRACE_PERIOD_DAYS: i64 = 3;

// 種別ごとの1日あたり罰金額（ルピア）
const STUDENT_DAILY_RATE: i64 = 1_000;
const FACULTY_DAILY_RATE: i64 = 1_500;
const GENERAL_DAILY_RATE: i64 = 1_500;

// 種別ごとの罰金上限
const STUDENT_MAX_FINE: i64 = 50_000;
const FACULTY_MAX_FINE: i64 = 75_000;
const GENERAL_MAX_FINE: i64 = 75_000;

/// 会員種別ごとの1日あたりの罰金額
pub fn daily_fine_rate(member_type: MemberType) -> i64 {
    match member_type {
        MemberType::Student => STUDENT_DAILY_RATE,
        MemberType::Faculty => FACULTY_DAILY_RATE,
        MemberType::General => GENERAL_DAILY_RATE,
    }
}

/// 会員種別ごとの罰金上限
pub fn max_fine(member_type: MemberType) -> i64 {
    match member_type {
        MemberType::Student => STUDENT_MAX_FINE,
        MemberType::Faculty => FACULTY_MAX_FINE,
        MemberType::General => GENERAL_MAX_FINE,
    }
}

/// 貸出の罰金額を計算する
///
/// 1. 延滞していなければ0
/// 2. 延滞日数が猶予期間（3日）以内なら0
/// 3. それ以外は `1日あたりの罰金額 × 延滞日数` を上限で打ち切った額
///
/// 日数は会員種別に対して単調非減少で、上限を超えることはない。
pub fn compute_fine(loan: &Loan, member: &Member, today: NaiveDate) -> i64 {
    if !loan.is_overdue(today) {
        return 0;
    }

    let days_overdue = loan.days_overdue(today);
    if days_overdue <= GRACE_PERIOD_DAYS {
        return 0;
    }

    let raw_fine = daily_fine_rate(member.member_type) * days_overdue;
    raw_fine.min(max_fine(member.member_type))
}

/// 罰金が発生し得るか
///
/// 猶予期間を考慮しない点で`compute_fine`と非対称：延滞1〜3日では
/// `has_fine`がtrueを返す一方、`compute_fine`は0を返す。元の仕様の
/// 振る舞いをそのまま維持している。
pub fn has_fine(loan: &Loan, today: NaiveDate) -> bool {
    loan.is_overdue(today) && loan.days_overdue(today) > 0
}

/// 罰金額の重さのラベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FineSeverity {
    /// 罰金なし（0以下）
    None,
    /// 軽度（10,000未満）
    Light,
    /// 中程度（50,000未満）
    Moderate,
    /// 重度（50,000以上）
    Heavy,
}

impl FineSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            FineSeverity::None => "none",
            FineSeverity::Light => "light",
            FineSeverity::Moderate => "moderate",
            FineSeverity::Heavy => "heavy",
        }
    }
}

/// 罰金額から重さのラベルを求める
pub fn fine_severity(amount: i64) -> FineSeverity {
    if amount <= 0 {
        FineSeverity::None
    } else if amount < 10_000 {
        FineSeverity::Light
    } else if amount < 50_000 {
        FineSeverity::Moderate
    } else {
        FineSeverity::Heavy
    }
}
