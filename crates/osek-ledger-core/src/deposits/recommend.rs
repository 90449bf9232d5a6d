use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::deposits::caps::RemainingRoom;
use crate::types::{DepositMode, Money};

/// Suggested deposit per category for the next month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepositSuggestion {
    pub pension: Money,
    pub study_deductible: Money,
    pub study_total: Money,
}

impl DepositSuggestion {
    /// Pension plus the full study-fund figure.
    pub fn total(&self) -> Money {
        self.pension + self.study_total
    }
}

/// Suggestions under every strategy, computed independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSet {
    pub balanced: DepositSuggestion,
    pub aggressive: DepositSuggestion,
    pub conservative: DepositSuggestion,
}

impl SuggestionSet {
    pub fn for_mode(&self, mode: DepositMode) -> &DepositSuggestion {
        match mode {
            DepositMode::Balanced => &self.balanced,
            DepositMode::Aggressive => &self.aggressive,
            DepositMode::Conservative => &self.conservative,
        }
    }
}

/// Monthly deposit suggestion for one strategy.
///
/// `months_left <= 0` yields all zeros in every mode.
pub fn calculate_monthly_suggestions(
    remaining: &RemainingRoom,
    months_left: i32,
    mode: DepositMode,
) -> DepositSuggestion {
    if months_left <= 0 {
        return DepositSuggestion::default();
    }

    match mode {
        DepositMode::Aggressive => DepositSuggestion {
            pension: remaining.pension_remaining,
            study_deductible: remaining.study_deductible_remaining,
            study_total: remaining.study_total_remaining,
        },
        DepositMode::Balanced => spread(remaining, Decimal::from(months_left)),
        DepositMode::Conservative => {
            let balanced = spread(remaining, Decimal::from(months_left));
            DepositSuggestion {
                pension: balanced.pension / dec!(2),
                study_deductible: balanced.study_deductible / dec!(2),
                study_total: balanced.study_total / dec!(2),
            }
        }
    }
}

/// Run every strategy against the same headroom.
pub fn calculate_all_suggestions(remaining: &RemainingRoom, months_left: i32) -> SuggestionSet {
    SuggestionSet {
        balanced: calculate_monthly_suggestions(remaining, months_left, DepositMode::Balanced),
        aggressive: calculate_monthly_suggestions(remaining, months_left, DepositMode::Aggressive),
        conservative: calculate_monthly_suggestions(
            remaining,
            months_left,
            DepositMode::Conservative,
        ),
    }
}

fn spread(remaining: &RemainingRoom, divisor: Decimal) -> DepositSuggestion {
    DepositSuggestion {
        pension: remaining.pension_remaining / divisor,
        study_deductible: remaining.study_deductible_remaining / divisor,
        study_total: remaining.study_total_remaining / divisor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert_eq, proptest};

    fn room() -> RemainingRoom {
        RemainingRoom {
            pension_remaining: dec!(12000),
            study_deductible_remaining: dec!(3000),
            study_total_remaining: dec!(18000),
        }
    }

    #[test]
    fn test_balanced_spreads_evenly() {
        let s = calculate_monthly_suggestions(&room(), 6, DepositMode::Balanced);
        assert_eq!(
            s,
            DepositSuggestion {
                pension: dec!(2000),
                study_deductible: dec!(500),
                study_total: dec!(3000),
            }
        );
        assert_eq!(s.total(), dec!(5000));
    }

    #[test]
    fn test_conservative_is_half_of_balanced() {
        let balanced = calculate_monthly_suggestions(&room(), 6, DepositMode::Balanced);
        let conservative = calculate_monthly_suggestions(&room(), 6, DepositMode::Conservative);
        assert_eq!(conservative.pension, balanced.pension / dec!(2));
        assert_eq!(conservative.study_deductible, dec!(250));
        assert_eq!(conservative.study_total, dec!(1500));
    }

    #[test]
    fn test_aggressive_front_loads() {
        let s = calculate_monthly_suggestions(&room(), 6, DepositMode::Aggressive);
        assert_eq!(s.pension, dec!(12000));
        assert_eq!(s.study_total, dec!(18000));
    }

    #[test]
    fn test_no_months_left_is_zero_for_every_mode() {
        for mode in DepositMode::ALL {
            assert_eq!(
                calculate_monthly_suggestions(&room(), 0, mode),
                DepositSuggestion::default()
            );
            assert_eq!(
                calculate_monthly_suggestions(&room(), -3, mode),
                DepositSuggestion::default()
            );
        }
    }

    #[test]
    fn test_suggestion_set_lookup() {
        let set = calculate_all_suggestions(&room(), 4);
        assert_eq!(set.for_mode(DepositMode::Balanced).pension, dec!(3000));
        assert_eq!(set.for_mode(DepositMode::Aggressive).pension, dec!(12000));
        assert_eq!(set.for_mode(DepositMode::Conservative).pension, dec!(1500));
    }

    proptest! {
        #[test]
        fn prop_aggressive_ignores_months_left(
            months in 1i32..=12,
            pension in 0u32..100_000,
            study in 0u32..30_000
        ) {
            let r = RemainingRoom {
                pension_remaining: Decimal::from(pension),
                study_deductible_remaining: Decimal::from(study),
                study_total_remaining: Decimal::from(study),
            };
            let s = calculate_monthly_suggestions(&r, months, DepositMode::Aggressive);
            prop_assert_eq!(s.pension, r.pension_remaining);
            prop_assert_eq!(s.study_deductible, r.study_deductible_remaining);
            prop_assert_eq!(s.study_total, r.study_total_remaining);
        }
    }
}
