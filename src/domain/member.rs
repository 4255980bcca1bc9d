use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MemberId;

/// 会員ランク
///
/// 割引率の決定にのみ使用される。貸出・注文処理では変更しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberTier {
    /// 基本ランク
    #[default]
    Bronze,
    Silver,
    Gold,
    Vip,
}

impl MemberTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberTier::Bronze => "BRONZE",
            MemberTier::Silver => "SILVER",
            MemberTier::Gold => "GOLD",
            MemberTier::Vip => "VIP",
        }
    }
}

impl std::str::FromStr for MemberTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BRONZE" => Ok(MemberTier::Bronze),
            "SILVER" => Ok(MemberTier::Silver),
            "GOLD" => Ok(MemberTier::Gold),
            "VIP" => Ok(MemberTier::Vip),
            _ => Err(format!("Invalid member tier: {}", s)),
        }
    }
}

/// 会員
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: MemberId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub tier: MemberTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 会員の連絡先情報（全体更新用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberProfile {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// 会員の部分更新。Noneの項目は変更しない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// 純粋関数：会員を登録する
pub fn register_member(
    profile: MemberProfile,
    tier: MemberTier,
    registered_at: DateTime<Utc>,
) -> Member {
    Member {
        member_id: MemberId::new(),
        name: profile.name,
        email: profile.email,
        phone: profile.phone,
        tier,
        created_at: registered_at,
        updated_at: registered_at,
    }
}

/// 純粋関数：連絡先情報を置き換える
///
/// ランクは変更しない。
pub fn replace_profile(member: &Member, profile: MemberProfile, updated_at: DateTime<Utc>) -> Member {
    Member {
        name: profile.name,
        email: profile.email,
        phone: profile.phone,
        updated_at,
        ..member.clone()
    }
}

/// 純粋関数：指定された項目のみ更新する
pub fn apply_patch(member: &Member, patch: MemberPatch, updated_at: DateTime<Utc>) -> Member {
    let current = member.clone();
    Member {
        name: patch.name.unwrap_or(current.name),
        email: patch.email.unwrap_or(current.email),
        phone: patch.phone.or(current.phone),
        updated_at,
        ..current
    }
}
