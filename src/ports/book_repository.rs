use crate::domain::{Book, BookId, BookStatus};
use async_trait::async_trait;

use super::{Result, WriteOutcome};

/// 書籍リポジトリポート
///
/// 貸出に伴う状態変更（AVAILABLE ⇔ RENTED）は`RentalRepository`の
/// トランザクション内で行われ、ここの`save`では扱わない。
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>>;

    /// 書籍コード順に全書籍を返す
    async fn list(&self) -> Result<Vec<Book>>;

    async fn find_by_status(&self, status: BookStatus) -> Result<Vec<Book>>;

    async fn find_by_genre(&self, genre: &str) -> Result<Vec<Book>>;

    /// 書籍コードの重複確認に使用される。
    async fn exists_by_code(&self, code: &str) -> Result<bool>;

    /// upsert
    ///
    /// 保存済みの状態とbookの状態のどちらかがRENTEDの場合、状態列は
    /// 更新しない（貸出状態は貸出処理だけが書き換える）。
    async fn save(&self, book: &Book) -> Result<()>;

    /// 貸出記録の残っていないRENTEDの書籍をbookの内容で更新する
    ///
    /// 保存済みの状態がRENTEDで、RETURNED以外の貸出がその書籍に存在しない
    /// 場合のみ書き込む。それ以外は何も書き込まず`WriteOutcome::Conflict`。
    async fn release_rented(&self, book: &Book) -> Result<WriteOutcome>;

    async fn delete_by_id(&self, book_id: BookId) -> Result<bool>;
}
