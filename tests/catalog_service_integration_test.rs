use chrono::Utc;
use manga_cafe::application::{
    ApplicationError, ErrorKind, book, book::BookFilter, member, rental, venue,
};
use manga_cafe::domain::{
    Book, BookStatus, Member, MemberTier,
    book::{BookPatch, MAX_VOLUME},
    commands::RentBook,
    discount,
    member::{MemberPatch, MemberProfile},
};
use rust_decimal::Decimal;

mod common;

use common::*;

fn profile(name: &str, email: &str) -> MemberProfile {
    MemberProfile {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
    }
}

fn rent_cmd(member: &Member, book: &Book) -> RentBook {
    RentBook {
        member_id: member.member_id,
        book_id: book.book_id,
        rental_days: None,
        note: None,
        rented_at: Utc::now(),
    }
}

fn status_patch(status: BookStatus) -> BookPatch {
    BookPatch {
        status: Some(status),
        ..Default::default()
    }
}

// ============================================================================
// 会員
// ============================================================================

#[tokio::test]
async fn test_register_member_defaults_to_bronze() {
    let deps = in_memory_deps();

    let registered = member::register_member(&deps, profile("Kim", "kim@example.com"), None, Utc::now())
        .await
        .unwrap();

    assert_eq!(registered.tier, MemberTier::Bronze);
    assert_eq!(
        member::get_member(&deps, registered.member_id).await.unwrap(),
        registered
    );
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let deps = in_memory_deps();
    member::register_member(&deps, profile("Kim", "dup@example.com"), None, Utc::now())
        .await
        .unwrap();

    let err = member::register_member(&deps, profile("Lee", "dup@example.com"), None, Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(err, ApplicationError::EmailAlreadyExists(_)));
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(member::list_members(&deps).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_member_keeps_tier_and_checks_new_email() {
    let deps = in_memory_deps();
    let gold = given_member(&deps, "Gold", MemberTier::Gold).await;
    let other = given_member(&deps, "Other", MemberTier::Bronze).await;

    // 自分のメールアドレスのままなら更新できる
    let updated = member::update_member(
        &deps,
        gold.member_id,
        profile("Gold Renamed", &gold.email),
        Utc::now(),
    )
    .await
    .unwrap();
    assert_eq!(updated.name, "Gold Renamed");
    assert_eq!(updated.tier, MemberTier::Gold);

    // 他の会員のメールアドレスには変更できない
    let err = member::patch_member(
        &deps,
        gold.member_id,
        MemberPatch {
            email: Some(other.email.clone()),
            ..Default::default()
        },
        Utc::now(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApplicationError::EmailAlreadyExists(_)));
}

#[tokio::test]
async fn test_patch_member_changes_only_given_fields() {
    let deps = in_memory_deps();
    let registered = given_member(&deps, "Patch", MemberTier::Silver).await;

    let patched = member::patch_member(
        &deps,
        registered.member_id,
        MemberPatch {
            phone: Some("010-0000-0000".to_string()),
            ..Default::default()
        },
        Utc::now(),
    )
    .await
    .unwrap();

    assert_eq!(patched.name, registered.name);
    assert_eq!(patched.email, registered.email);
    assert_eq!(patched.phone.as_deref(), Some("010-0000-0000"));
}

#[tokio::test]
async fn test_delete_member() {
    let deps = in_memory_deps();
    let registered = given_member(&deps, "Gone", MemberTier::Bronze).await;

    member::delete_member(&deps, registered.member_id).await.unwrap();

    assert!(matches!(
        member::get_member(&deps, registered.member_id).await,
        Err(ApplicationError::MemberNotFound(_))
    ));
    assert!(matches!(
        member::delete_member(&deps, registered.member_id).await,
        Err(ApplicationError::MemberNotFound(_))
    ));
}

// ============================================================================
// 書籍
// ============================================================================

#[tokio::test]
async fn test_duplicate_book_code_is_rejected() {
    let deps = in_memory_deps();
    book::register_book(
        &deps,
        book_details("MH-001-001", "One Piece 1", Decimal::new(1000, 0)),
        Utc::now(),
    )
    .await
    .unwrap();

    let err = book::register_book(
        &deps,
        book_details("MH-001-001", "One Piece 1 (copy)", Decimal::new(1000, 0)),
        Utc::now(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApplicationError::BookCodeAlreadyExists(_)));
}

#[tokio::test]
async fn test_invalid_price_and_volume_are_rejected() {
    let deps = in_memory_deps();

    let err = book::register_book(
        &deps,
        book_details("MH-002-001", "Negative", Decimal::new(-1, 0)),
        Utc::now(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let mut details = book_details("MH-002-002", "Volume zero", Decimal::new(1000, 0));
    details.volume = 0;
    let err = book::register_book(&deps, details, Utc::now()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    // 0円は許可される
    assert!(
        book::register_book(
            &deps,
            book_details("MH-002-003", "Free", Decimal::ZERO),
            Utc::now()
        )
        .await
        .is_ok()
    );
}

#[tokio::test]
async fn test_price_and_volume_must_fit_storage() {
    let deps = in_memory_deps();

    let err = book::register_book(
        &deps,
        book_details("MH-003-001", "Too expensive", Decimal::new(10_000_000_000, 0)),
        Utc::now(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let mut details = book_details("MH-003-002", "Too many volumes", Decimal::new(1000, 0));
    details.volume = MAX_VOLUME + 1;
    let err = book::register_book(&deps, details, Utc::now()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    // 上限ちょうどは許可される
    let mut details = book_details("MH-003-003", "Limit", discount::max_amount());
    details.volume = MAX_VOLUME;
    let registered = book::register_book(&deps, details, Utc::now()).await.unwrap();

    let err = book::patch_book(
        &deps,
        registered.book_id,
        BookPatch {
            volume: Some(u32::MAX),
            ..Default::default()
        },
        Utc::now(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(
        book::list_books(&deps, BookFilter::default()).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_catalog_cannot_set_rented_status() {
    let deps = in_memory_deps();
    let registered = given_book(&deps, "Status").await;

    let err = book::patch_book(
        &deps,
        registered.book_id,
        BookPatch {
            status: Some(BookStatus::Rented),
            ..Default::default()
        },
        Utc::now(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApplicationError::BookStatusManagedByRental(_)));
    assert_eq!(
        book::get_book(&deps, registered.book_id).await.unwrap().status,
        BookStatus::Available
    );
}

#[tokio::test]
async fn test_rented_book_status_is_locked_but_details_are_editable() {
    // Arrange: 貸出中の書籍
    let deps = in_memory_deps();
    let borrower = given_member(&deps, "Borrower", MemberTier::Bronze).await;
    let rented = given_book(&deps, "Locked").await;
    rental::rent_book(
        &deps,
        RentBook {
            member_id: borrower.member_id,
            book_id: rented.book_id,
            rental_days: None,
            note: None,
            rented_at: Utc::now(),
        },
    )
    .await
    .unwrap();

    // 状態の変更は拒否される
    let err = book::patch_book(
        &deps,
        rented.book_id,
        BookPatch {
            status: Some(BookStatus::Lost),
            ..Default::default()
        },
        Utc::now(),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::BookStatusManagedByRental(BookStatus::Rented)
    ));

    // 状態以外は変更できる
    let patched = book::patch_book(
        &deps,
        rented.book_id,
        BookPatch {
            location: Some("B-07".to_string()),
            ..Default::default()
        },
        Utc::now(),
    )
    .await
    .unwrap();
    assert_eq!(patched.location.as_deref(), Some("B-07"));
    assert_eq!(patched.status, BookStatus::Rented);

    // 貸出中の書籍は削除できない
    let err = book::delete_book(&deps, rented.book_id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[tokio::test]
async fn test_rented_book_without_rental_can_be_released_and_rented_again() {
    // Arrange: 貸出記録だけが削除され、RENTEDのまま残った書籍
    let deps = in_memory_deps();
    let borrower = given_member(&deps, "Orphan", MemberTier::Bronze).await;
    let stranded = given_book(&deps, "Stranded").await;
    let created = rental::rent_book(&deps, rent_cmd(&borrower, &stranded))
        .await
        .unwrap();
    rental::delete_rental(&deps, created.rental.rental_id)
        .await
        .unwrap();
    assert_eq!(
        book::get_book(&deps, stranded.book_id).await.unwrap().status,
        BookStatus::Rented
    );

    // Act: 書籍管理から貸出可能に戻す
    let released = book::patch_book(
        &deps,
        stranded.book_id,
        status_patch(BookStatus::Available),
        Utc::now(),
    )
    .await
    .unwrap();

    // Assert: 再び貸し出せる
    assert_eq!(released.status, BookStatus::Available);
    let again = rental::rent_book(&deps, rent_cmd(&borrower, &stranded))
        .await
        .unwrap();
    assert_eq!(again.rental.book_id, stranded.book_id);

    // 新しい貸出が残っている間は再び状態を変更できない
    let err = book::patch_book(
        &deps,
        stranded.book_id,
        status_patch(BookStatus::Lost),
        Utc::now(),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::BookStatusManagedByRental(BookStatus::Rented)
    ));
}

#[tokio::test]
async fn test_rented_book_without_rental_can_be_marked_lost_or_deleted() {
    let deps = in_memory_deps();
    let borrower = given_member(&deps, "Lost", MemberTier::Silver).await;
    let lost = given_book(&deps, "Lost volume").await;
    let deleted = given_book(&deps, "Deleted volume").await;

    for target in [&lost, &deleted] {
        let created = rental::rent_book(&deps, rent_cmd(&borrower, target))
            .await
            .unwrap();
        rental::delete_rental(&deps, created.rental.rental_id)
            .await
            .unwrap();
    }

    // 全体更新でもRENTEDから解放できる
    let mut details = book_details(&lost.code, &lost.title, lost.rental_price);
    details.status = BookStatus::Lost;
    let updated = book::update_book(&deps, lost.book_id, details, Utc::now())
        .await
        .unwrap();
    assert_eq!(updated.status, BookStatus::Lost);

    // 未返却の貸出がなければ削除できる
    book::delete_book(&deps, deleted.book_id).await.unwrap();
    assert!(matches!(
        book::get_book(&deps, deleted.book_id).await,
        Err(ApplicationError::BookNotFound(_))
    ));
}

#[tokio::test]
async fn test_list_books_by_status_and_genre() {
    let deps = in_memory_deps();
    let action = given_book(&deps, "Action").await;
    let mut romance_details = book_details("MH-R-001", "Romance", Decimal::new(1200, 0));
    romance_details.genre = "Romance".to_string();
    let romance = book::register_book(&deps, romance_details, Utc::now())
        .await
        .unwrap();
    book::patch_book(
        &deps,
        action.book_id,
        BookPatch {
            status: Some(BookStatus::Damaged),
            ..Default::default()
        },
        Utc::now(),
    )
    .await
    .unwrap();

    let damaged = book::list_books(
        &deps,
        BookFilter {
            status: Some(BookStatus::Damaged),
            genre: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(damaged.len(), 1);
    assert_eq!(damaged[0].book_id, action.book_id);

    let romance_books = book::list_books(
        &deps,
        BookFilter {
            status: None,
            genre: Some("Romance".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(romance_books.len(), 1);
    assert_eq!(romance_books[0].book_id, romance.book_id);

    let none = book::list_books(
        &deps,
        BookFilter {
            status: Some(BookStatus::Damaged),
            genre: Some("Romance".to_string()),
        },
    )
    .await
    .unwrap();
    assert!(none.is_empty());

    assert_eq!(book::list_books(&deps, BookFilter::default()).await.unwrap().len(), 2);
}

// ============================================================================
// 座席・メニュー
// ============================================================================

#[tokio::test]
async fn test_duplicate_seat_number_is_rejected() {
    let deps = in_memory_deps();
    given_seat(&deps, "A-01").await;

    let err = venue::register_seat(&deps, "A-01".to_string(), Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(err, ApplicationError::SeatNumberAlreadyExists(_)));
    assert_eq!(venue::list_seats(&deps).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_menu_price_must_not_be_negative() {
    let deps = in_memory_deps();

    let err = venue::register_menu_item(&deps, "Refund".to_string(), Decimal::new(-500, 0), Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = venue::register_menu_item(
        &deps,
        "Gold leaf".to_string(),
        Decimal::new(1_000_000_000_000, 2),
        Utc::now(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let menu = given_menu_item(&deps, "Coffee", Decimal::new(3500, 0)).await;
    assert_eq!(
        venue::get_menu_item(&deps, menu.menu_id).await.unwrap().price,
        Decimal::new(3500, 0)
    );
}
