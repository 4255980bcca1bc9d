use crate::domain::{Member, MemberId};
use crate::ports::{MemberRepository, Result};
use async_trait::async_trait;

use super::{InMemoryStore, sorted_by};

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn get_by_id(&self, member_id: MemberId) -> Result<Option<Member>> {
        Ok(self.lock()?.members.get(&member_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Member>> {
        let state = self.lock()?;
        Ok(sorted_by(state.members.values().cloned(), |m| m.created_at))
    }

    async fn exists_by_id(&self, member_id: MemberId) -> Result<bool> {
        Ok(self.lock()?.members.contains_key(&member_id))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        Ok(self.lock()?.members.values().any(|m| m.email == email))
    }

    async fn save(&self, member: &Member) -> Result<()> {
        self.lock()?.members.insert(member.member_id, member.clone());
        Ok(())
    }

    async fn delete_by_id(&self, member_id: MemberId) -> Result<bool> {
        Ok(self.lock()?.members.remove(&member_id).is_some())
    }
}
