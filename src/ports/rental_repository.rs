use crate::domain::{Book, BookId, MemberId, Rental, RentalId, RentalStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::Result;

/// 条件付き書き込みの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// すべての書き込みが反映された
    Applied,
    /// 前提とした状態が他のリクエストにより変わっていた。何も書き込まれていない。
    Conflict,
}

/// 貸出リポジトリポート
#[async_trait]
pub trait RentalRepository: Send + Sync {
    async fn get_by_id(&self, rental_id: RentalId) -> Result<Option<Rental>>;

    /// 貸出日時の新しい順
    async fn list(&self) -> Result<Vec<Rental>>;

    /// 会員の全貸出（貸出履歴）
    async fn find_by_member_id(&self, member_id: MemberId) -> Result<Vec<Rental>>;

    /// 会員の指定状態の貸出
    ///
    /// 延滞確認に使用される。
    async fn find_by_member_and_status(
        &self,
        member_id: MemberId,
        status: RentalStatus,
    ) -> Result<Vec<Rental>>;

    /// 会員の指定状態の貸出件数
    ///
    /// 貸出上限（会員ごと最大3冊）の確認に使用される。
    async fn count_by_member_and_status(
        &self,
        member_id: MemberId,
        status: RentalStatus,
    ) -> Result<usize>;

    /// 延滞候補を検索する
    ///
    /// due_at < cutoff かつ status が ACTIVE の貸出を返す。
    async fn find_overdue_candidates(&self, cutoff: DateTime<Utc>) -> Result<Vec<Rental>>;

    /// 書籍にRETURNED以外の貸出が存在するか
    async fn exists_open_by_book_id(&self, book_id: BookId) -> Result<bool>;

    /// 貸出の状態を保存する（upsert）。書籍の状態には触れない。
    ///
    /// 既にRETURNEDとして保存されている貸出は更新しない。
    async fn save(&self, rental: &Rental) -> Result<()>;

    /// 貸出記録を削除する。書籍の状態は戻さない。
    async fn delete_by_id(&self, rental_id: RentalId) -> Result<bool>;

    /// 貸出を開始する
    ///
    /// 1つのトランザクションで以下を行う：
    /// 1. 書籍を`rented_book`の状態へ更新（現在AVAILABLEの場合のみ）
    /// 2. 貸出記録を挿入
    ///
    /// 1で対象行がなければロールバックし`WriteOutcome::Conflict`を返す。
    async fn open_rental(&self, rental: &Rental, rented_book: &Book) -> Result<WriteOutcome>;

    /// 貸出を終了する
    ///
    /// 1つのトランザクションで以下を順に行う：
    /// 1. 貸出記録を`returned`の状態へ更新（現在RETURNEDでない場合のみ）
    /// 2. 書籍を`released_book`の状態へ更新（現在RENTEDの場合のみ）
    ///
    /// いずれかで対象行がなければロールバックし`WriteOutcome::Conflict`を返す。
    async fn close_rental(&self, returned: &Rental, released_book: &Book) -> Result<WriteOutcome>;
}
