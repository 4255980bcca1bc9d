use crate::domain::{
    self, MemberId, RentBookError, RentalDays, RentalId, RentalStatus, ReturnRentalError,
    commands::*, rental::MAX_ACTIVE_RENTALS,
};
use crate::ports::WriteOutcome;
use chrono::{DateTime, Utc};

use super::super::{ApplicationError, Result, ServiceDependencies};
use super::details::{RentalDetails, describe, describe_all};

/// 書籍を貸し出す
///
/// ビジネスルール（この順で確認する）：
/// 1. 会員が存在すること
/// 2. 書籍が存在すること
/// 3. 書籍がAVAILABLEであること
/// 4. 会員の貸出中の冊数が3冊未満であること
/// 5. 会員に延滞中の貸出がないこと
///
/// # 一貫性保証
///
/// 貸出記録の作成と書籍のRENTED化は`RentalRepository::open_rental`の
/// 1トランザクションで行われる。3の確認後に別のリクエストが同じ書籍を
/// 貸し出した場合、書籍の条件付き更新が失敗し`Conflict`を返す。
///
/// 4・5は読み取り時点のスナップショットで判定するため、同じ会員の
/// 同時リクエストでは上限を超えて貸し出される可能性がある。
///
/// # 戻り値
/// 作成された貸出のビュー
pub async fn rent_book(deps: &ServiceDependencies, cmd: RentBook) -> Result<RentalDetails> {
    let now = cmd.rented_at;

    // 1. 会員の存在確認
    let member = deps
        .members
        .get_by_id(cmd.member_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::MemberNotFound(cmd.member_id))?;

    // 2. 書籍の存在確認
    let book = deps
        .books
        .get_by_id(cmd.book_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::BookNotFound(cmd.book_id))?;

    // 3. 貸出可否の確認
    if !domain::book::is_available(&book) {
        tracing::debug!(book_id = %book.book_id, status = %book.status, "book is not available");
        return Err(ApplicationError::BookNotAvailable { title: book.title });
    }

    // 4. 貸出上限の確認（3冊まで）
    let active_count = deps
        .rentals
        .count_by_member_and_status(member.member_id, RentalStatus::Active)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if active_count >= MAX_ACTIVE_RENTALS {
        return Err(ApplicationError::RentalLimitExceeded {
            current: active_count,
            max: MAX_ACTIVE_RENTALS,
        });
    }

    // 5. 延滞の確認
    if has_overdue_rental(deps, member.member_id, now).await? {
        return Err(ApplicationError::MemberHasOverdueRental);
    }

    // 6〜8. 日数・料金・割引（ドメイン層の純粋関数）
    let days = cmd.rental_days.unwrap_or(RentalDays::DEFAULT);
    let (rental, rented_book) = domain::rental::rent_book(&member, &book, days, cmd.note, now)
        .map_err(|e| match e {
            RentBookError::BookNotAvailable(_) => ApplicationError::BookNotAvailable {
                title: book.title.clone(),
            },
            RentBookError::FeeOutOfRange => ApplicationError::InvalidRequest(format!(
                "Rental fee is out of range for {} days",
                days.value()
            )),
            RentBookError::DueDateOutOfRange => ApplicationError::InvalidRequest(format!(
                "Due date is out of range for {} days",
                days.value()
            )),
        })?;

    // 9. 貸出記録の作成と書籍のRENTED化（同一トランザクション）
    let outcome = deps
        .rentals
        .open_rental(&rental, &rented_book)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if outcome == WriteOutcome::Conflict {
        tracing::warn!(book_id = %book.book_id, "book was rented by a concurrent request");
        return Err(ApplicationError::Conflict(format!(
            "Book was rented by another request: {}",
            book.title
        )));
    }

    tracing::info!(
        rental_id = %rental.rental_id,
        member_id = %member.member_id,
        book_id = %book.book_id,
        days = days.value(),
        base_fee = %rental.base_fee,
        discounted_fee = %rental.discounted_fee,
        "rental opened"
    );

    // 10. 表示用ビュー
    Ok(describe(rental, Some(&member), Some(&rented_book), now))
}

/// 会員が延滞中の貸出を持っているか
///
/// 延滞バッチで記録されたOVERDUEと、期限切れのACTIVEの両方を延滞とみなす。
async fn has_overdue_rental(
    deps: &ServiceDependencies,
    member_id: MemberId,
    now: DateTime<Utc>,
) -> Result<bool> {
    let recorded = deps
        .rentals
        .find_by_member_and_status(member_id, RentalStatus::Overdue)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if !recorded.is_empty() {
        return Ok(true);
    }

    let active = deps
        .rentals
        .find_by_member_and_status(member_id, RentalStatus::Active)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    Ok(active
        .iter()
        .any(|rental| domain::rental::is_overdue(rental, now)))
}

/// 書籍を返却する
///
/// ビジネスルール：
/// - 貸出が存在すること
/// - 返却済みでないこと
/// - 延滞していても返却は受け付ける
///
/// 貸出記録のRETURNED化と書籍のAVAILABLE化は
/// `RentalRepository::close_rental`の1トランザクションで順に行われる。
pub async fn return_rental(deps: &ServiceDependencies, cmd: ReturnRental) -> Result<RentalDetails> {
    // 1. 貸出の取得
    let rental = deps
        .rentals
        .get_by_id(cmd.rental_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::RentalNotFound(cmd.rental_id))?;

    // 2. 返却済みの確認
    if rental.status.is_returned() {
        return Err(ApplicationError::AlreadyReturned);
    }

    // 3. 書籍の取得とドメイン層の純粋関数
    let book = deps
        .books
        .get_by_id(rental.book_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::BookNotFound(rental.book_id))?;

    let (returned, released_book) = domain::rental::return_rental(&rental, &book, cmd.returned_at)
        .map_err(|e| match e {
            ReturnRentalError::AlreadyReturned => ApplicationError::AlreadyReturned,
            ReturnRentalError::BookNotRented(status) => ApplicationError::BookNotRented(status),
        })?;

    // 4. 貸出記録と書籍の更新（同一トランザクション）
    let outcome = deps
        .rentals
        .close_rental(&returned, &released_book)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if outcome == WriteOutcome::Conflict {
        tracing::warn!(rental_id = %rental.rental_id, "rental was closed by a concurrent request");
        return Err(ApplicationError::Conflict(format!(
            "Rental was updated by another request: {}",
            rental.rental_id
        )));
    }

    tracing::info!(
        rental_id = %returned.rental_id,
        book_id = %released_book.book_id,
        "rental returned"
    );

    let member = deps
        .members
        .get_by_id(returned.member_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    Ok(describe(
        returned,
        member.as_ref(),
        Some(&released_book),
        cmd.returned_at,
    ))
}

/// 貸出記録を削除する
///
/// 書籍の貸出状態は元に戻さない。
pub async fn delete_rental(deps: &ServiceDependencies, rental_id: RentalId) -> Result<()> {
    let deleted = deps
        .rentals
        .delete_by_id(rental_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if !deleted {
        return Err(ApplicationError::RentalNotFound(rental_id));
    }

    tracing::info!(rental_id = %rental_id, "rental deleted");
    Ok(())
}

/// IDで貸出を取得する
pub async fn get_rental(
    deps: &ServiceDependencies,
    rental_id: RentalId,
    now: DateTime<Utc>,
) -> Result<RentalDetails> {
    let rental = deps
        .rentals
        .get_by_id(rental_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::RentalNotFound(rental_id))?;

    describe_all(deps, vec![rental], now)
        .await
        .map(|mut details| details.remove(0))
}

/// 全貸出を取得する
pub async fn list_rentals(deps: &ServiceDependencies, now: DateTime<Utc>) -> Result<Vec<RentalDetails>> {
    let rentals = deps
        .rentals
        .list()
        .await
        .map_err(ApplicationError::RepositoryError)?;

    describe_all(deps, rentals, now).await
}

/// 会員の貸出履歴を取得する
pub async fn list_member_rentals(
    deps: &ServiceDependencies,
    member_id: MemberId,
    now: DateTime<Utc>,
) -> Result<Vec<RentalDetails>> {
    let rentals = deps
        .rentals
        .find_by_member_id(member_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    describe_all(deps, rentals, now).await
}
