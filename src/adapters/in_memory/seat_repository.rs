use crate::domain::{Seat, SeatId};
use crate::ports::{Result, SeatRepository};
use async_trait::async_trait;

use super::{InMemoryStore, sorted_by};

#[async_trait]
impl SeatRepository for InMemoryStore {
    async fn get_by_id(&self, seat_id: SeatId) -> Result<Option<Seat>> {
        Ok(self.lock()?.seats.get(&seat_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Seat>> {
        let state = self.lock()?;
        Ok(sorted_by(state.seats.values().cloned(), |s| s.seat_number.clone()))
    }

    async fn exists_by_number(&self, seat_number: &str) -> Result<bool> {
        Ok(self
            .lock()?
            .seats
            .values()
            .any(|s| s.seat_number == seat_number))
    }

    async fn save(&self, seat: &Seat) -> Result<()> {
        self.lock()?.seats.insert(seat.seat_id, seat.clone());
        Ok(())
    }
}
