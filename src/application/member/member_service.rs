use crate::domain::{
    self, Member, MemberId, MemberTier,
    member::{MemberPatch, MemberProfile},
};
use chrono::{DateTime, Utc};

use super::super::{ApplicationError, Result, ServiceDependencies};

/// 会員を登録する
///
/// メールアドレスは未使用であること。ランク未指定の場合はBRONZE。
pub async fn register_member(
    deps: &ServiceDependencies,
    profile: MemberProfile,
    tier: Option<MemberTier>,
    registered_at: DateTime<Utc>,
) -> Result<Member> {
    ensure_email_unused(deps, &profile.email).await?;

    let member = domain::member::register_member(profile, tier.unwrap_or_default(), registered_at);

    deps.members
        .save(&member)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(member_id = %member.member_id, tier = member.tier.as_str(), "member registered");
    Ok(member)
}

pub async fn get_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<Member> {
    load_member(deps, member_id).await
}

pub async fn list_members(deps: &ServiceDependencies) -> Result<Vec<Member>> {
    deps.members
        .list()
        .await
        .map_err(ApplicationError::RepositoryError)
}

/// 会員情報を全体更新する（名前・メール・電話番号）
pub async fn update_member(
    deps: &ServiceDependencies,
    member_id: MemberId,
    profile: MemberProfile,
    updated_at: DateTime<Utc>,
) -> Result<Member> {
    let member = load_member(deps, member_id).await?;

    if profile.email != member.email {
        ensure_email_unused(deps, &profile.email).await?;
    }

    let updated = domain::member::replace_profile(&member, profile, updated_at);
    deps.members
        .save(&updated)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(member_id = %member_id, "member updated");
    Ok(updated)
}

/// 会員情報を部分更新する
pub async fn patch_member(
    deps: &ServiceDependencies,
    member_id: MemberId,
    patch: MemberPatch,
    updated_at: DateTime<Utc>,
) -> Result<Member> {
    let member = load_member(deps, member_id).await?;

    if let Some(email) = patch.email.as_deref() {
        if email != member.email {
            ensure_email_unused(deps, email).await?;
        }
    }

    let updated = domain::member::apply_patch(&member, patch, updated_at);
    deps.members
        .save(&updated)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(member_id = %member_id, "member patched");
    Ok(updated)
}

pub async fn delete_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<()> {
    let deleted = deps
        .members
        .delete_by_id(member_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if !deleted {
        return Err(ApplicationError::MemberNotFound(member_id));
    }

    tracing::info!(member_id = %member_id, "member deleted");
    Ok(())
}

async fn load_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<Member> {
    deps.members
        .get_by_id(member_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::MemberNotFound(member_id))
}

async fn ensure_email_unused(deps: &ServiceDependencies, email: &str) -> Result<()> {
    let exists = deps
        .members
        .exists_by_email(email)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if exists {
        return Err(ApplicationError::EmailAlreadyExists(email.to_string()));
    }
    Ok(())
}
