use rust_decimal::{Decimal, RoundingStrategy};

use super::MemberTier;

/// 金額の小数点以下桁数（NUMERIC(12,2)と同じ）
pub const MONEY_SCALE: u32 = 2;

/// ランク別割引ポリシー
///
/// ランクとポリシーは1対1。`for_tier`の網羅的matchにより、
/// ポリシーが見つからないランクはコンパイル時に存在し得ない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountPolicy {
    /// 割引なし
    Bronze,
    /// 5%割引
    Silver,
    /// 10%割引
    Gold,
    /// 15%割引
    Vip,
}

impl DiscountPolicy {
    /// ランクに適用されるポリシーを選択する
    pub fn for_tier(tier: MemberTier) -> Self {
        match tier {
            MemberTier::Bronze => DiscountPolicy::Bronze,
            MemberTier::Silver => DiscountPolicy::Silver,
            MemberTier::Gold => DiscountPolicy::Gold,
            MemberTier::Vip => DiscountPolicy::Vip,
        }
    }

    /// 価格に掛ける倍率
    pub fn multiplier(&self) -> Decimal {
        match self {
            DiscountPolicy::Bronze => Decimal::ONE,
            DiscountPolicy::Silver => Decimal::new(95, 2),
            DiscountPolicy::Gold => Decimal::new(90, 2),
            DiscountPolicy::Vip => Decimal::new(85, 2),
        }
    }

    /// 割引後の価格を計算する
    ///
    /// 乗算は厳密に行い、最後に小数点以下2桁へ四捨五入する。
    pub fn apply(&self, amount: Decimal) -> Decimal {
        round_money(amount * self.multiplier())
    }
}

/// 純粋関数：ランクに応じた割引を適用する
///
/// 貸出料金と注文金額の両方から同じ方法で呼ばれる。
pub fn apply_discount(tier: MemberTier, amount: Decimal) -> Decimal {
    DiscountPolicy::for_tier(tier).apply(amount)
}

/// 保存できる最大金額（NUMERIC(12,2)の上限）
pub fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999, MONEY_SCALE)
}

/// 0以上かつ丸めた後に`max_amount()`以下か
pub fn is_storable_amount(amount: Decimal) -> bool {
    amount >= Decimal::ZERO && round_money(amount) <= max_amount()
}

/// 金額を小数点以下2桁に丸める（0.5は0から遠い方へ）
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
