use crate::domain::{Member, MemberId};
use async_trait::async_trait;

use super::Result;

/// 会員リポジトリポート
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn get_by_id(&self, member_id: MemberId) -> Result<Option<Member>>;

    /// 登録順に全会員を返す
    async fn list(&self) -> Result<Vec<Member>>;

    async fn exists_by_id(&self, member_id: MemberId) -> Result<bool>;

    /// メールアドレスの重複確認に使用される。
    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    /// 新規の場合はINSERT、既存の場合はUPDATE（upsert）。
    async fn save(&self, member: &Member) -> Result<()>;

    /// 削除した場合はtrue、存在しなかった場合はfalse。
    async fn delete_by_id(&self, member_id: MemberId) -> Result<bool>;
}
