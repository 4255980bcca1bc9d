use crate::ports::*;
use std::sync::Arc;

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、各サービス関数に明示的に渡される。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub members: Arc<dyn MemberRepository>,
    pub books: Arc<dyn BookRepository>,
    pub seats: Arc<dyn SeatRepository>,
    pub menus: Arc<dyn MenuRepository>,
    pub rentals: Arc<dyn RentalRepository>,
    pub orders: Arc<dyn OrderRepository>,
}
