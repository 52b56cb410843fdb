//! Numeric derivations shared by selectors and adapters.

use crate::core::Amount;

/// Each value's share of the sum, in percent.
///
/// A zero (or empty) total yields zero for every entry instead of a division error.
pub fn percentages(values: &[Amount]) -> Vec<Amount> {
    let total: Amount = values.iter().sum();
    values.iter().map(|v| percent_of(v, &total)).collect()
}

/// `part / total × 100`, zero when `total` is zero.
pub fn percent_of(part: &Amount, total: &Amount) -> Amount {
    match part.checked_div(total) {
        Some(share) => &share * &Amount::from(100u64),
        None => Amount::zero(),
    }
}

/// Approval gate: any positive allowance counts, not only an unlimited one.
pub fn is_approved(allowance: &Amount) -> bool {
    allowance.is_positive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::amt;

    #[test]
    fn test_percentages_sum_to_hundred() {
        let values = vec![amt("1"), amt("1"), amt("1")];
        let pct = percentages(&values);
        let sum: Amount = pct.iter().sum();
        let diff = &sum - &amt("100");
        assert!(diff < amt("0.0000000001") && diff > amt("-0.0000000001"));
        assert_eq!(pct[0].to_fixed(2), "33.33");
    }

    #[test]
    fn test_percentages_zero_total() {
        let pct = percentages(&[Amount::zero(), Amount::zero()]);
        assert_eq!(pct, vec![Amount::zero(), Amount::zero()]);
        assert!(percentages(&[]).is_empty());
    }

    #[test]
    fn test_is_approved_threshold() {
        assert!(!is_approved(&Amount::zero()));
        assert!(is_approved(&Amount::from_wei(alloy_primitives::U256::from(1u8))));
    }
}
