//! Min / max transferable amounts.

use crate::amount::FixedPoint;
use crate::types::TokenAmount;

/// Safety factor applied to the estimated origin fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeFactor {
    pub numerator: u32,
    pub denominator: u32,
}

impl FeeFactor {
    /// 1.2, headroom for fee drift between estimation and submission.
    pub const DEFAULT: FeeFactor = FeeFactor { numerator: 12, denominator: 10 };
    pub const ONE: FeeFactor = FeeFactor { numerator: 1, denominator: 1 };
}

impl Default for FeeFactor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// `available - origin_fee * factor - dest_ed`.
///
/// `origin_fee` is zero unless the transferred token pays the origin fee. The result is
/// not clamped, a negative value means the balance cannot cover the transfer.
pub fn max_input(
    available: &FixedPoint,
    origin_fee: &FixedPoint,
    dest_ed: &FixedPoint,
    factor: FeeFactor,
) -> FixedPoint {
    let fee = origin_fee.mul_ratio(factor.numerator, factor.denominator);
    &(available - &fee) - dest_ed
}

/// The destination existential deposit, plus the destination fee when it is charged in the
/// transferred token.
pub fn min_input(token: &str, dest_ed: &FixedPoint, dest_fee: &TokenAmount) -> FixedPoint {
    if dest_fee.token == token {
        dest_ed + &dest_fee.amount
    } else {
        dest_ed.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(inner: u64) -> FixedPoint {
        FixedPoint::from_inner(inner, 12)
    }

    #[test]
    fn native_max_input_reserves_the_scaled_fee() {
        let max = max_input(&units(500_000_000_000_000), &units(200_000_000_000), &units(100_000_000_000), FeeFactor::DEFAULT);
        assert_eq!(max, units(499_660_000_000_000));
    }

    #[test]
    fn non_native_max_input_only_keeps_the_ed() {
        let max = max_input(&units(500_000_000_000_000), &FixedPoint::zero(12), &units(100_000_000_000), FeeFactor::DEFAULT);
        assert_eq!(max, units(499_900_000_000_000));
    }

    #[test]
    fn max_input_does_not_grow_with_the_factor() {
        let available = units(1_000_000);
        let fee = units(333);
        let ed = units(10);
        let plain = max_input(&available, &fee, &ed, FeeFactor::ONE);
        let padded = max_input(&available, &fee, &ed, FeeFactor::DEFAULT);
        assert!(padded <= plain);
    }

    #[test]
    fn max_input_can_go_negative() {
        let max = max_input(&units(10), &units(100), &units(5), FeeFactor::DEFAULT);
        assert!(max.is_negative());
        assert_eq!(max, FixedPoint::from_inner(-115, 12));
    }

    #[test]
    fn min_input_adds_fee_only_in_the_same_token() {
        let ed = FixedPoint::from_inner(100_000_000_000u64, 12);
        let same = TokenAmount { token: "KAR".into(), amount: FixedPoint::from_inner(469_417_452u64, 12) };
        let other = TokenAmount { token: "KSM".into(), amount: FixedPoint::from_inner(469_417_452u64, 12) };
        assert_eq!(min_input("KAR", &ed, &same), FixedPoint::from_inner(100_469_417_452u64, 12));
        assert_eq!(min_input("KAR", &ed, &other), ed);
    }
}
