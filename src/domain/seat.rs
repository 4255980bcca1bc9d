use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SeatId;

/// 座席
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub seat_id: SeatId,
    /// 座席番号（例: A-01）。一意。
    pub seat_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 純粋関数：座席を登録する
pub fn register_seat(seat_number: String, registered_at: DateTime<Utc>) -> Seat {
    Seat {
        seat_id: SeatId::new(),
        seat_number,
        created_at: registered_at,
        updated_at: registered_at,
    }
}
