use crate::application::{ApplicationError, order::OrderDetails, rental::RentalDetails};
use crate::domain::{
    Book, BookCondition, BookId, BookStatus, Member, MemberId, MemberTier, MenuId, MenuItem,
    OrderStatus, Quantity, RentalDays, RentalStatus, Seat, SeatId,
    book::{BookDetails, BookPatch, DEFAULT_RENTAL_PRICE},
    commands::{PlaceOrder, RentBook},
    member::{MemberPatch, MemberProfile},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// 会員
// ============================================================================

/// 会員登録リクエスト（POST /api/members）
#[derive(Debug, Deserialize)]
pub struct RegisterMemberRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// 未指定の場合はBRONZE
    pub tier: Option<MemberTier>,
}

impl RegisterMemberRequest {
    pub fn into_parts(self) -> (MemberProfile, Option<MemberTier>) {
        let profile = MemberProfile {
            name: self.name,
            email: self.email,
            phone: self.phone,
        };
        (profile, self.tier)
    }
}

/// 会員の全体更新リクエスト（PUT /api/members/:id）
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<UpdateMemberRequest> for MemberProfile {
    fn from(req: UpdateMemberRequest) -> Self {
        MemberProfile {
            name: req.name,
            email: req.email,
            phone: req.phone,
        }
    }
}

/// 会員の部分更新リクエスト（PATCH /api/members/:id）
#[derive(Debug, Default, Deserialize)]
pub struct PatchMemberRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<PatchMemberRequest> for MemberPatch {
    fn from(req: PatchMemberRequest) -> Self {
        MemberPatch {
            name: req.name,
            email: req.email,
            phone: req.phone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub member_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub tier: MemberTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            member_id: member.member_id.value(),
            name: member.name,
            email: member.email,
            phone: member.phone,
            tier: member.tier,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

// ============================================================================
// 書籍
// ============================================================================

/// 書籍の登録・全体更新リクエスト（POST /api/books, PUT /api/books/:id）
///
/// 未指定の項目は既定値（料金1000、AVAILABLE、GOOD）になる。
#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub code: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub volume: u32,
    pub genre: String,
    pub rental_price: Option<Decimal>,
    pub status: Option<BookStatus>,
    pub condition: Option<BookCondition>,
    pub location: Option<String>,
    pub note: Option<String>,
}

impl From<BookRequest> for BookDetails {
    fn from(req: BookRequest) -> Self {
        BookDetails {
            code: req.code,
            title: req.title,
            author: req.author,
            publisher: req.publisher,
            volume: req.volume,
            genre: req.genre,
            rental_price: req
                .rental_price
                .unwrap_or(Decimal::new(DEFAULT_RENTAL_PRICE, 0)),
            status: req.status.unwrap_or_default(),
            condition: req.condition.unwrap_or_default(),
            location: req.location,
            note: req.note,
        }
    }
}

/// 書籍の部分更新リクエスト（PATCH /api/books/:id）
#[derive(Debug, Default, Deserialize)]
pub struct PatchBookRequest {
    pub code: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub volume: Option<u32>,
    pub genre: Option<String>,
    pub rental_price: Option<Decimal>,
    pub status: Option<BookStatus>,
    pub condition: Option<BookCondition>,
    pub location: Option<String>,
    pub note: Option<String>,
}

impl From<PatchBookRequest> for BookPatch {
    fn from(req: PatchBookRequest) -> Self {
        BookPatch {
            code: req.code,
            title: req.title,
            author: req.author,
            publisher: req.publisher,
            volume: req.volume,
            genre: req.genre,
            rental_price: req.rental_price,
            status: req.status,
            condition: req.condition,
            location: req.location,
            note: req.note,
        }
    }
}

/// 書籍一覧取得のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ListBooksQuery {
    pub status: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub book_id: Uuid,
    pub code: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub volume: u32,
    pub genre: String,
    pub rental_price: Decimal,
    pub status: BookStatus,
    pub condition: BookCondition,
    pub location: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            book_id: book.book_id.value(),
            code: book.code,
            title: book.title,
            author: book.author,
            publisher: book.publisher,
            volume: book.volume,
            genre: book.genre,
            rental_price: book.rental_price,
            status: book.status,
            condition: book.condition,
            location: book.location,
            note: book.note,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

// ============================================================================
// 座席・メニュー
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SeatRequest {
    pub seat_number: String,
}

#[derive(Debug, Serialize)]
pub struct SeatResponse {
    pub seat_id: Uuid,
    pub seat_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Seat> for SeatResponse {
    fn from(seat: Seat) -> Self {
        Self {
            seat_id: seat.seat_id.value(),
            seat_number: seat.seat_number,
            created_at: seat.created_at,
            updated_at: seat.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MenuRequest {
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub menu_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MenuItem> for MenuResponse {
    fn from(menu_item: MenuItem) -> Self {
        Self {
            menu_id: menu_item.menu_id.value(),
            name: menu_item.name,
            price: menu_item.price,
            created_at: menu_item.created_at,
            updated_at: menu_item.updated_at,
        }
    }
}

// ============================================================================
// 貸出
// ============================================================================

/// 貸出リクエスト（POST /api/rentals）
#[derive(Debug, Deserialize)]
pub struct RentalRequest {
    pub member_id: Uuid,
    pub book_id: Uuid,
    /// 未指定の場合は7日
    pub rental_days: Option<u32>,
    pub note: Option<String>,
}

impl RentalRequest {
    /// コマンドへ変換する。貸出日数が1未満の場合はエラー。
    pub fn to_command(&self, rented_at: DateTime<Utc>) -> Result<RentBook, ApplicationError> {
        let rental_days = self.rental_days.map(RentalDays::try_from).transpose()?;

        Ok(RentBook {
            member_id: MemberId::from_uuid(self.member_id),
            book_id: BookId::from_uuid(self.book_id),
            rental_days,
            note: self.note.clone(),
            rented_at,
        })
    }
}

/// 貸出レスポンス
///
/// statusは参照時点の状態（期限切れのACTIVEはOVERDUE）。
#[derive(Debug, Serialize)]
pub struct RentalResponse {
    pub rental_id: Uuid,
    pub member_id: Uuid,
    pub member_name: Option<String>,
    pub member_tier: Option<MemberTier>,
    pub book_id: Uuid,
    pub book_title: Option<String>,
    pub book_code: Option<String>,
    pub rented_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: RentalStatus,
    pub base_fee: Decimal,
    pub discounted_fee: Decimal,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RentalDetails> for RentalResponse {
    fn from(details: RentalDetails) -> Self {
        let rental = details.rental;
        Self {
            rental_id: rental.rental_id.value(),
            member_id: rental.member_id.value(),
            member_name: details.member_name,
            member_tier: details.member_tier,
            book_id: rental.book_id.value(),
            book_title: details.book_title,
            book_code: details.book_code,
            rented_at: rental.rented_at,
            due_at: rental.due_at,
            returned_at: rental.returned_at,
            status: details.status,
            base_fee: rental.base_fee,
            discounted_fee: rental.discounted_fee,
            note: rental.note,
            created_at: rental.created_at,
            updated_at: rental.updated_at,
        }
    }
}

// ============================================================================
// 注文
// ============================================================================

/// 注文リクエスト（POST /api/orders）
#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub member_id: Uuid,
    pub seat_id: Uuid,
    pub menu_id: Uuid,
    pub quantity: u32,
    pub note: Option<String>,
}

impl OrderRequest {
    /// コマンドへ変換する。数量が1未満の場合はエラー。
    pub fn to_command(&self, ordered_at: DateTime<Utc>) -> Result<PlaceOrder, ApplicationError> {
        Ok(PlaceOrder {
            member_id: MemberId::from_uuid(self.member_id),
            seat_id: SeatId::from_uuid(self.seat_id),
            menu_id: MenuId::from_uuid(self.menu_id),
            quantity: Quantity::try_from(self.quantity)?,
            note: self.note.clone(),
            ordered_at,
        })
    }
}

/// 注文状態変更リクエスト（POST /api/orders/:id/status）
#[derive(Debug, Deserialize)]
pub struct OrderStatusRequest {
    pub status: OrderStatus,
}

/// 注文一覧取得のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub member_id: Uuid,
    pub member_name: Option<String>,
    pub member_tier: Option<MemberTier>,
    pub seat_id: Uuid,
    pub seat_number: Option<String>,
    pub menu_id: Uuid,
    pub menu_name: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub discounted_price: Decimal,
    pub ordered_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderDetails> for OrderResponse {
    fn from(details: OrderDetails) -> Self {
        let order = details.order;
        Self {
            order_id: order.order_id.value(),
            member_id: order.member_id.value(),
            member_name: details.member_name,
            member_tier: details.member_tier,
            seat_id: order.seat_id.value(),
            seat_number: details.seat_number,
            menu_id: order.menu_id.value(),
            menu_name: details.menu_name,
            quantity: order.quantity.value(),
            unit_price: order.unit_price,
            total_price: order.total_price(),
            discounted_price: order.discounted_price,
            ordered_at: order.ordered_at,
            status: order.status,
            note: order.note,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

// ============================================================================
// 共通
// ============================================================================

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// エラーコード（例: BOOK_NOT_AVAILABLE）
    pub error: String,
    pub message: String,
    /// 同じリクエストを再送すれば成功し得るか
    pub retryable: bool,
}

/// 列挙型のクエリパラメータをパースする
pub fn parse_filter<T>(value: Option<&str>) -> Result<Option<T>, ApplicationError>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .map(|v| v.parse::<T>().map_err(ApplicationError::InvalidRequest))
        .transpose()
}
