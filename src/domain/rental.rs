use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    Book, BookId, Member, MemberId, MemberTier, RentBookError, RentalDays, RentalId,
    ReturnRentalError, book, discount,
};

/// 会員1人あたりの同時貸出上限
pub const MAX_ACTIVE_RENTALS: usize = 3;

/// 貸出状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalStatus {
    /// 貸出中
    Active,
    /// 返却済み
    Returned,
    /// 延滞中
    Overdue,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Active => "ACTIVE",
            RentalStatus::Returned => "RETURNED",
            RentalStatus::Overdue => "OVERDUE",
        }
    }

    pub fn is_returned(&self) -> bool {
        matches!(self, RentalStatus::Returned)
    }
}

impl std::str::FromStr for RentalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(RentalStatus::Active),
            "RETURNED" => Ok(RentalStatus::Returned),
            "OVERDUE" => Ok(RentalStatus::Overdue),
            _ => Err(format!("Invalid rental status: {}", s)),
        }
    }
}

/// 貸出集約 - 1冊の漫画本の1回の貸出
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rental {
    pub rental_id: RentalId,

    // 他の集約への参照（IDのみ）
    pub member_id: MemberId,
    pub book_id: BookId,

    pub rented_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: RentalStatus,

    // 料金
    /// 割引前（1日料金 × 日数）
    pub base_fee: Decimal,
    /// ランク割引後
    pub discounted_fee: Decimal,

    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 貸出料金
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalFee {
    pub base: Decimal,
    pub discounted: Decimal,
}

/// 純粋関数：貸出料金を計算する
///
/// 基本料金 = 1日料金 × 日数。割引は注文と同じ`discount::apply_discount`を使う。
/// 基本料金が保存できる金額を超える場合はNone。
pub fn quote_fee(daily_price: Decimal, days: RentalDays, tier: MemberTier) -> Option<RentalFee> {
    let base = daily_price.checked_mul(Decimal::from(days.value()))?;
    if !discount::is_storable_amount(base) {
        return None;
    }

    Some(RentalFee {
        base,
        discounted: discount::apply_discount(tier, base),
    })
}

/// 純粋関数：書籍を貸し出す
///
/// ビジネスルール：
/// - 書籍はAVAILABLEであること
/// - 返却期限は貸出日時 + 日数
/// - 料金と返却期限は表現できる範囲に収まること
/// - 状態はACTIVE
///
/// 副作用なし。新しいRentalとRENTEDになった書籍を返す。
/// 会員の貸出数・延滞の確認はリポジトリが必要なためアプリケーション層で行う。
pub fn rent_book(
    member: &Member,
    target: &Book,
    days: RentalDays,
    note: Option<String>,
    rented_at: DateTime<Utc>,
) -> Result<(Rental, Book), RentBookError> {
    let rented_book = book::mark_rented(target, rented_at)?;
    let fee = quote_fee(target.rental_price, days, member.tier)
        .ok_or(RentBookError::FeeOutOfRange)?;
    let due_at = rented_at
        .checked_add_signed(Duration::days(i64::from(days.value())))
        .ok_or(RentBookError::DueDateOutOfRange)?;

    let rental = Rental {
        rental_id: RentalId::new(),
        member_id: member.member_id,
        book_id: target.book_id,
        rented_at,
        due_at,
        returned_at: None,
        status: RentalStatus::Active,
        base_fee: fee.base,
        discounted_fee: fee.discounted,
        note,
        created_at: rented_at,
        updated_at: rented_at,
    };

    Ok((rental, rented_book))
}

/// 純粋関数：書籍を返却する
///
/// ビジネスルール：
/// - 返却済みは不可
/// - 延滞中でも返却は受け付ける
/// - 書籍はRENTED → AVAILABLEに戻す
///
/// 副作用なし。返却済みのRentalとAVAILABLEになった書籍を返す。
pub fn return_rental(
    rental: &Rental,
    rented_book: &Book,
    returned_at: DateTime<Utc>,
) -> Result<(Rental, Book), ReturnRentalError> {
    if rental.status.is_returned() {
        return Err(ReturnRentalError::AlreadyReturned);
    }

    let released_book = book::mark_available(rented_book, returned_at)
        .map_err(|_| ReturnRentalError::BookNotRented(rented_book.status))?;

    let returned = Rental {
        returned_at: Some(returned_at),
        status: RentalStatus::Returned,
        updated_at: returned_at,
        ..rental.clone()
    };

    Ok((returned, released_book))
}

/// 純粋関数：延滞判定
pub fn is_overdue(rental: &Rental, now: DateTime<Utc>) -> bool {
    match rental.status {
        RentalStatus::Overdue => true,
        RentalStatus::Active => now > rental.due_at,
        RentalStatus::Returned => false,
    }
}

/// 純粋関数：参照時点での状態
///
/// 延滞は保存された状態ではなく、参照時に計算する。
pub fn effective_status(rental: &Rental, now: DateTime<Utc>) -> RentalStatus {
    if is_overdue(rental, now) {
        RentalStatus::Overdue
    } else {
        rental.status
    }
}

/// 純粋関数：延滞として記録する
///
/// ACTIVEかつ期限切れの場合のみ新しいRentalを返す。
pub fn mark_overdue(rental: &Rental, detected_at: DateTime<Utc>) -> Option<Rental> {
    if rental.status != RentalStatus::Active || detected_at <= rental.due_at {
        return None;
    }

    Some(Rental {
        status: RentalStatus::Overdue,
        updated_at: detected_at,
        ..rental.clone()
    })
}
