use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// UUIDをラップした集約IDを定義する
///
/// 各IDは別の型として扱われ、会員IDを書籍IDとして渡すような
/// 取り違えをコンパイル時に防ぐ。
macro_rules! aggregate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
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

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

aggregate_id!(
    /// 会員ID
    MemberId
);
aggregate_id!(
    /// 書籍ID - 1冊の物理的な漫画本
    BookId
);
aggregate_id!(
    /// 貸出ID - 貸出管理の集約ID
    RentalId
);
aggregate_id!(
    /// 注文ID - 座席からの飲食注文
    OrderId
);
aggregate_id!(
    /// 座席ID
    SeatId
);
aggregate_id!(
    /// メニューID
    MenuId
);

/// 貸出日数エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RentalDaysError {
    /// 1日未満
    Zero,
    /// 上限（`RentalDays::MAX`日）を超える
    TooLong(u32),
}

/// 貸出日数
///
/// 不変条件：1日以上、`RentalDays::MAX`日以下。
/// 0日の貸出は料金0・即日延滞になるため、型で作成できないようにする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RentalDays(u32);

impl RentalDays {
    /// 指定がない場合の貸出日数
    pub const DEFAULT: RentalDays = RentalDays(7);
    /// 1回の貸出で指定できる最大日数
    pub const MAX: u32 = 365;

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for RentalDays {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for RentalDays {
    type Error = RentalDaysError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err(RentalDaysError::Zero);
        }
        if value > Self::MAX {
            return Err(RentalDaysError::TooLong(value));
        }
        Ok(Self(value))
    }
}

impl From<RentalDays> for u32 {
    fn from(days: RentalDays) -> Self {
        days.0
    }
}

/// 数量エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// 1個未満
    Zero,
    /// 上限（`Quantity::MAX`個）を超える
    TooMany(u32),
}

/// 注文数量
///
/// 不変条件：1以上、`Quantity::MAX`以下。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// 1回の注文で指定できる最大数量
    pub const MAX: u32 = 999;

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err(QuantityError::Zero);
        }
        if value > Self::MAX {
            return Err(QuantityError::TooMany(value));
        }
        Ok(Self(value))
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for RentalDaysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RentalDaysError::Zero => write!(f, "rental days must be at least 1"),
            RentalDaysError::TooLong(days) => write!(
                f,
                "rental days must be at most {} (got {})",
                RentalDays::MAX,
                days
            ),
        }
    }
}

impl fmt::Display for QuantityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityError::Zero => write!(f, "quantity must be at least 1"),
            QuantityError::TooMany(quantity) => write!(
                f,
                "quantity must be at most {} (got {})",
                Quantity::MAX,
                quantity
            ),
        }
    }
}
