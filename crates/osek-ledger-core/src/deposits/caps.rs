use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::settings::RateSettings;
use crate::types::Money;

/// Deductible-contribution ceilings for the year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionCaps {
    pub pension_cap: Money,
    pub study_deductible_cap: Money,
    /// Absolute ceiling from settings, not income-scaled.
    pub study_total_cap: Money,
}

/// Room left under each cap, never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemainingRoom {
    pub pension_remaining: Money,
    pub study_deductible_remaining: Money,
    pub study_total_remaining: Money,
}

pub fn calculate_caps(net_income_ytd: Money, rates: &RateSettings) -> ContributionCaps {
    ContributionCaps {
        pension_cap: net_income_ytd * rates.pension_rate,
        study_deductible_cap: net_income_ytd * rates.study_rate_deductible,
        study_total_cap: rates.study_cap_total,
    }
}

/// Headroom under each cap given what was deposited so far.
///
/// Both study figures are measured against the full study deposit total.
pub fn calculate_remaining_room(
    caps: &ContributionCaps,
    pension_total: Money,
    study_total: Money,
) -> RemainingRoom {
    RemainingRoom {
        pension_remaining: floor_zero(caps.pension_cap - pension_total),
        study_deductible_remaining: floor_zero(caps.study_deductible_cap - study_total),
        study_total_remaining: floor_zero(caps.study_total_cap - study_total),
    }
}

fn floor_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    #[test]
    fn test_caps_from_net_income() {
        let caps = calculate_caps(dec!(120000), &RateSettings::default());
        assert_eq!(
            caps,
            ContributionCaps {
                pension_cap: dec!(19800),
                study_deductible_cap: dec!(5400),
                study_total_cap: dec!(20520),
            }
        );
    }

    #[test]
    fn test_study_total_cap_not_income_scaled() {
        let rates = RateSettings::default();
        assert_eq!(calculate_caps(dec!(0), &rates).study_total_cap, dec!(20520));
        assert_eq!(calculate_caps(dec!(900000), &rates).study_total_cap, dec!(20520));
    }

    #[test]
    fn test_over_deposit_floors_at_zero() {
        let caps = calculate_caps(dec!(120000), &RateSettings::default());
        let room = calculate_remaining_room(&caps, dec!(25000), dec!(3000));
        assert_eq!(room.pension_remaining, dec!(0));
        assert_eq!(room.study_deductible_remaining, dec!(2400));
        assert_eq!(room.study_total_remaining, dec!(17520));
    }

    #[test]
    fn test_negative_net_income_has_no_room() {
        let caps = calculate_caps(dec!(-10000), &RateSettings::default());
        let room = calculate_remaining_room(&caps, dec!(0), dec!(0));
        assert_eq!(room.pension_remaining, dec!(0));
        assert_eq!(room.study_deductible_remaining, dec!(0));
        assert_eq!(room.study_total_remaining, dec!(20520));
    }

    proptest! {
        #[test]
        fn prop_remaining_is_floored_difference(
            net in 0u32..1_000_000,
            pension in 0u32..300_000,
            study in 0u32..100_000
        ) {
            let caps = calculate_caps(Decimal::from(net), &RateSettings::default());
            let room =
                calculate_remaining_room(&caps, Decimal::from(pension), Decimal::from(study));
            prop_assert!(room.pension_remaining >= Decimal::ZERO);
            prop_assert!(room.study_deductible_remaining >= Decimal::ZERO);
            prop_assert!(room.study_total_remaining >= Decimal::ZERO);
            prop_assert_eq!(
                room.pension_remaining,
                (caps.pension_cap - Decimal::from(pension)).max(Decimal::ZERO)
            );
        }
    }
}
