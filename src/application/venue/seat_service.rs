use crate::domain::{self, Seat, SeatId};
use chrono::{DateTime, Utc};

use super::super::{ApplicationError, Result, ServiceDependencies};

/// 座席を登録する。座席番号は一意。
pub async fn register_seat(
    deps: &ServiceDependencies,
    seat_number: String,
    registered_at: DateTime<Utc>,
) -> Result<Seat> {
    if seat_number.trim().is_empty() {
        return Err(ApplicationError::InvalidRequest(
            "Seat number must not be empty".to_string(),
        ));
    }

    let exists = deps
        .seats
        .exists_by_number(&seat_number)
        .await
        .map_err(ApplicationError::RepositoryError)?;
    if exists {
        return Err(ApplicationError::SeatNumberAlreadyExists(seat_number));
    }

    let seat = domain::seat::register_seat(seat_number, registered_at);
    deps.seats
        .save(&seat)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(seat_id = %seat.seat_id, seat_number = %seat.seat_number, "seat registered");
    Ok(seat)
}

pub async fn get_seat(deps: &ServiceDependencies, seat_id: SeatId) -> Result<Seat> {
    deps.seats
        .get_by_id(seat_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::SeatNotFound(seat_id))
}

pub async fn list_seats(deps: &ServiceDependencies) -> Result<Vec<Seat>> {
    deps.seats
        .list()
        .await
        .map_err(ApplicationError::RepositoryError)
}
