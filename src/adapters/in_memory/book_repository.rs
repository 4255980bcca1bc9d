use crate::domain::{Book, BookId, BookStatus, RentalStatus};
use crate::ports::{BookRepository, Result, WriteOutcome};
use async_trait::async_trait;

use super::{InMemoryStore, sorted_by};

#[async_trait]
impl BookRepository for InMemoryStore {
    async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        Ok(self.lock()?.books.get(&book_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let state = self.lock()?;
        Ok(sorted_by(state.books.values().cloned(), |b| b.code.clone()))
    }

    async fn find_by_status(&self, status: BookStatus) -> Result<Vec<Book>> {
        let state = self.lock()?;
        Ok(sorted_by(
            state.books.values().filter(|b| b.status == status).cloned(),
            |b| b.code.clone(),
        ))
    }

    async fn find_by_genre(&self, genre: &str) -> Result<Vec<Book>> {
        let state = self.lock()?;
        Ok(sorted_by(
            state.books.values().filter(|b| b.genre == genre).cloned(),
            |b| b.code.clone(),
        ))
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool> {
        Ok(self.lock()?.books.values().any(|b| b.code == code))
    }

    async fn save(&self, book: &Book) -> Result<()> {
        let mut state = self.lock()?;
        let mut saved = book.clone();
        if let Some(current) = state.books.get(&book.book_id) {
            if current.status == BookStatus::Rented || book.status == BookStatus::Rented {
                saved.status = current.status;
            }
        }
        state.books.insert(saved.book_id, saved);
        Ok(())
    }

    async fn release_rented(&self, book: &Book) -> Result<WriteOutcome> {
        let mut state = self.lock()?;
        let rented = state
            .books
            .get(&book.book_id)
            .is_some_and(|b| b.status == BookStatus::Rented);
        let open = state
            .rentals
            .values()
            .any(|r| r.book_id == book.book_id && r.status != RentalStatus::Returned);

        if !rented || open {
            return Ok(WriteOutcome::Conflict);
        }
        state.books.insert(book.book_id, book.clone());
        Ok(WriteOutcome::Applied)
    }

    async fn delete_by_id(&self, book_id: BookId) -> Result<bool> {
        Ok(self.lock()?.books.remove(&book_id).is_some())
    }
}
