use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 貸出ID - 貸出レコードの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(Uuid);

impl LoanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

/// 貸出の状態
///
/// 返却日は返却済みの場合にのみ存在するため、nullableなフィールドではなく
/// 直和型で表現する。「nullなら未返却」という暗黙の取り決めを排除できる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoanState {
    /// 貸出中
    Open,
    /// 返却済み（終端状態）
    Returned { returned_on: NaiveDate },
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CloseLoanError {
    /// 既に返却済み
    #[error("loan is already returned")]
    AlreadyReturned,
}

/// 貸出レコード - 1冊の書籍の1回の貸出
///
/// BookとMemberへの参照はキー値（ISBN・会員ID）のみ。参照先が到達可能で
/// あることをコアは仮定せず、解決は呼び出し側が行う。
///
/// 延滞判定・延滞日数・貸出期間はすべて日付から導出し、冗長に保持しない。
/// 「今日」は必ず引数として渡す（環境から読まない）ため決定的にテストできる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: LoanId,
    pub member_id: String,
    pub isbn: String,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
    #[serde(flatten)]
    pub state: LoanState,
}

impl Loan {
    /// 新しい貸出レコードを作成する（状態はOpen）
    pub fn open(
        member_id: impl Into<String>,
        isbn: impl Into<String>,
        borrowed_on: NaiveDate,
        due_on: NaiveDate,
    ) -> Self {
        Self {
            loan_id: LoanId::new(),
            member_id: member_id.into(),
            isbn: isbn.into(),
            borrowed_on,
            due_on,
            state: LoanState::Open,
        }
    }

    pub fn is_returned(&self) -> bool {
        matches!(self.state, LoanState::Returned { .. })
    }

    pub fn returned_on(&self) -> Option<NaiveDate> {
        match self.state {
            LoanState::Open => None,
            LoanState::Returned { returned_on } => Some(returned_on),
        }
    }

    /// 返却を記録する
    ///
    /// 状態遷移はOpen → Returnedの一方向のみ。返却済みの貸出は凍結され、
    /// 以後の延滞判定は記録された返却日で行われる。
    pub fn close(&self, returned_on: NaiveDate) -> Result<Loan, CloseLoanError> {
        if self.is_returned() {
            return Err(CloseLoanError::AlreadyReturned);
        }

        Ok(Loan {
            state: LoanState::Returned { returned_on },
            ..self.clone()
        })
    }

    /// 延滞しているか
    ///
    /// 返却済みなら返却日が期限より厳密に後かどうか、貸出中なら「今日」が
    /// 期限より厳密に後かどうかで判定する。
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.state {
            LoanState::Returned { returned_on } => returned_on > self.due_on,
            LoanState::Open => today > self.due_on,
        }
    }

    /// 延滞日数（暦日単位）
    ///
    /// 終端日（返却日または「今日」）が期限より後の場合のみ日数を数え、
    /// それ以外は0を返す。
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        let end = self.returned_on().unwrap_or(today);
        if end > self.due_on {
            (end - self.due_on).num_days()
        } else {
            0
        }
    }

    /// 貸出期間（暦日単位）
    ///
    /// 貸出日から返却日（未返却なら「今日」）までの日数。
    pub fn duration(&self, today: NaiveDate) -> i64 {
        let end = self.returned_on().unwrap_or(today);
        (end - self.borrowed_on).num_days()
    }
}
