use crate::domain;
use chrono::{DateTime, Utc};

use super::super::{ApplicationError, Result, ServiceDependencies};

/// 延滞検出バッチ
///
/// 定期的に実行され、返却期限を過ぎたACTIVEの貸出をOVERDUEとして記録する。
///
/// ビジネスルール：
/// - 返却期限（due_at）を過ぎたACTIVEの貸出を延滞とする
/// - 既にOVERDUEの貸出は処理しない
/// - RETURNEDの貸出は処理しない
///
/// 延滞の判定自体は参照時にも行われるため、このバッチを止めても
/// 貸出・返却の判定結果は変わらない。保存された状態を揃えるためのもの。
///
/// # 戻り値
/// 延滞として記録した貸出の件数
pub async fn detect_overdue_rentals(deps: &ServiceDependencies, now: DateTime<Utc>) -> Result<usize> {
    let candidates = deps
        .rentals
        .find_overdue_candidates(now)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    let mut detected_count = 0;

    for rental in candidates {
        let Some(overdue) = domain::rental::mark_overdue(&rental, now) else {
            continue;
        };

        deps.rentals
            .save(&overdue)
            .await
            .map_err(ApplicationError::RepositoryError)?;

        tracing::info!(
            rental_id = %overdue.rental_id,
            member_id = %overdue.member_id,
            due_at = %overdue.due_at,
            "rental became overdue"
        );
        detected_count += 1;
    }

    Ok(detected_count)
}
