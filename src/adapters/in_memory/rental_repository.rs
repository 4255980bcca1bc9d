use crate::domain::{Book, BookId, BookStatus, MemberId, Rental, RentalId, RentalStatus};
use crate::ports::{RentalRepository, Result, WriteOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;

use super::{InMemoryStore, sorted_by};

#[async_trait]
impl RentalRepository for InMemoryStore {
    async fn get_by_id(&self, rental_id: RentalId) -> Result<Option<Rental>> {
        Ok(self.lock()?.rentals.get(&rental_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Rental>> {
        let state = self.lock()?;
        Ok(sorted_by(state.rentals.values().cloned(), |r| Reverse(r.rented_at)))
    }

    async fn find_by_member_id(&self, member_id: MemberId) -> Result<Vec<Rental>> {
        let state = self.lock()?;
        Ok(sorted_by(
            state.rentals.values().filter(|r| r.member_id == member_id).cloned(),
            |r| Reverse(r.rented_at),
        ))
    }

    async fn find_by_member_and_status(
        &self,
        member_id: MemberId,
        status: RentalStatus,
    ) -> Result<Vec<Rental>> {
        let state = self.lock()?;
        Ok(sorted_by(
            state
                .rentals
                .values()
                .filter(|r| r.member_id == member_id && r.status == status)
                .cloned(),
            |r| Reverse(r.rented_at),
        ))
    }

    async fn count_by_member_and_status(
        &self,
        member_id: MemberId,
        status: RentalStatus,
    ) -> Result<usize> {
        Ok(self
            .lock()?
            .rentals
            .values()
            .filter(|r| r.member_id == member_id && r.status == status)
            .count())
    }

    async fn find_overdue_candidates(&self, cutoff: DateTime<Utc>) -> Result<Vec<Rental>> {
        let state = self.lock()?;
        Ok(sorted_by(
            state
                .rentals
                .values()
                .filter(|r| r.status == RentalStatus::Active && r.due_at < cutoff)
                .cloned(),
            |r| r.due_at,
        ))
    }

    async fn exists_open_by_book_id(&self, book_id: BookId) -> Result<bool> {
        Ok(self
            .lock()?
            .rentals
            .values()
            .any(|r| r.book_id == book_id && r.status != RentalStatus::Returned))
    }

    async fn save(&self, rental: &Rental) -> Result<()> {
        let mut state = self.lock()?;
        let returned = state
            .rentals
            .get(&rental.rental_id)
            .is_some_and(|r| r.status == RentalStatus::Returned);
        if !returned {
            state.rentals.insert(rental.rental_id, rental.clone());
        }
        Ok(())
    }

    async fn delete_by_id(&self, rental_id: RentalId) -> Result<bool> {
        Ok(self.lock()?.rentals.remove(&rental_id).is_some())
    }

    async fn open_rental(&self, rental: &Rental, rented_book: &Book) -> Result<WriteOutcome> {
        let mut state = self.lock()?;

        let available = state
            .books
            .get(&rented_book.book_id)
            .is_some_and(|b| b.status == BookStatus::Available);
        if !available {
            return Ok(WriteOutcome::Conflict);
        }

        state.books.insert(rented_book.book_id, rented_book.clone());
        state.rentals.insert(rental.rental_id, rental.clone());
        Ok(WriteOutcome::Applied)
    }

    async fn close_rental(&self, returned: &Rental, released_book: &Book) -> Result<WriteOutcome> {
        let mut state = self.lock()?;

        let rental_open = state
            .rentals
            .get(&returned.rental_id)
            .is_some_and(|r| r.status != RentalStatus::Returned);
        let book_rented = state
            .books
            .get(&released_book.book_id)
            .is_some_and(|b| b.status == BookStatus::Rented);
        if !rental_open || !book_rented {
            return Ok(WriteOutcome::Conflict);
        }

        state.rentals.insert(returned.rental_id, returned.clone());
        state.books.insert(released_book.book_id, released_book.clone());
        Ok(WriteOutcome::Applied)
    }
}
