use crate::domain::{Book, BookId, Member, MemberId, MemberTier, Rental, RentalStatus, rental};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::super::{ApplicationError, Result, ServiceDependencies};

/// 貸出の表示用ビュー
///
/// 会員名・ランク、書籍タイトル・コードを非正規化して持つ。
/// 会員や書籍が削除済みの場合、それらの項目はNone。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalDetails {
    pub rental: Rental,
    /// 参照時点の状態（期限切れのACTIVEはOVERDUE）
    pub status: RentalStatus,
    pub member_name: Option<String>,
    pub member_tier: Option<MemberTier>,
    pub book_title: Option<String>,
    pub book_code: Option<String>,
}

pub(super) fn describe(
    rental: Rental,
    member: Option<&Member>,
    book: Option<&Book>,
    now: DateTime<Utc>,
) -> RentalDetails {
    RentalDetails {
        status: rental::effective_status(&rental, now),
        member_name: member.map(|m| m.name.clone()),
        member_tier: member.map(|m| m.tier),
        book_title: book.map(|b| b.title.clone()),
        book_code: book.map(|b| b.code.clone()),
        rental,
    }
}

/// 会員・書籍を引いてビューを組み立てる
///
/// 同じ会員・書籍は一覧の中で1回だけ読み込む。
pub(super) async fn describe_all(
    deps: &ServiceDependencies,
    rentals: Vec<Rental>,
    now: DateTime<Utc>,
) -> Result<Vec<RentalDetails>> {
    let mut members: HashMap<MemberId, Option<Member>> = HashMap::new();
    let mut books: HashMap<BookId, Option<Book>> = HashMap::new();
    let mut details = Vec::with_capacity(rentals.len());

    for rental in rentals {
        if !members.contains_key(&rental.member_id) {
            let member = deps
                .members
                .get_by_id(rental.member_id)
                .await
                .map_err(ApplicationError::RepositoryError)?;
            members.insert(rental.member_id, member);
        }
        if !books.contains_key(&rental.book_id) {
            let book = deps
                .books
                .get_by_id(rental.book_id)
                .await
                .map_err(ApplicationError::RepositoryError)?;
            books.insert(rental.book_id, book);
        }

        let member = members.get(&rental.member_id).and_then(Option::as_ref);
        let book = books.get(&rental.book_id).and_then(Option::as_ref);
        details.push(describe(rental, member, book, now));
    }

    Ok(details)
}
