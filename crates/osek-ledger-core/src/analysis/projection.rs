use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analysis::full::run_full_analysis;
use crate::deposits::recommend::DepositSuggestion;
use crate::state::AnnualState;
use crate::tax::comprehensive::calculate_comprehensive_tax_analysis;
use crate::tax::income_tax::{calculate_income_tax, IncomeTaxResult};
use crate::types::{safe_div, Money, MONTHS_IN_YEAR, TWELVE};
use crate::LedgerResult;

// ---------------------------------------------------------------------------
// Single-month estimate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProjection {
    pub month: u32,
    pub year: i32,
    pub income: Money,
    pub expenses: Money,
    pub net_income: Money,
    pub pension: Money,
    pub study: Money,
    pub deposits_total: Money,
    /// Net income less deposits, floored at zero.
    pub taxable_income: Money,
    pub annualized_taxable_income: Money,
    pub estimated_tax: Money,
    pub estimated_ni: Money,
    pub estimated_burden: Money,
    /// Balanced suggestion for the rest of the year.
    pub recommended: DepositSuggestion,
}

/// Tax and NI estimate for one month, as if that month recurred all year.
///
/// The month's taxable income is annualized and run through the
/// comprehensive analysis; the monthly view of that analysis is reported.
pub fn project_month(
    state: &AnnualState,
    month: u32,
    year: i32,
) -> LedgerResult<MonthlyProjection> {
    let record = state.month(month)?;
    let settings = &state.settings.rates;

    let net_income = record.net_income();
    let deposits_total = record.pension + record.study;
    let taxable_income = (net_income - deposits_total).max(Decimal::ZERO);
    let annualized = taxable_income * TWELVE;

    let analysis = calculate_comprehensive_tax_analysis(
        annualized,
        &settings.tax,
        &settings.ni,
        Decimal::ZERO,
    );
    let monthly = &analysis.comparison.monthly;

    let recommended = run_full_analysis(state, month).suggestions.balanced;

    Ok(MonthlyProjection {
        month,
        year,
        income: record.income,
        expenses: record.expenses,
        net_income,
        pension: record.pension,
        study: record.study,
        deposits_total,
        taxable_income,
        annualized_taxable_income: annualized,
        estimated_tax: monthly.tax,
        estimated_ni: monthly.ni_employee,
        estimated_burden: monthly.total_burden,
        recommended,
    })
}

// ---------------------------------------------------------------------------
// Year-end projection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeededMonthly {
    pub income: Money,
    pub pension: Money,
    pub study: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearEndProjection {
    pub current_month: u32,
    pub months_left: i32,
    pub average_monthly_income: Money,
    pub average_monthly_expenses: Money,
    pub projected_income: Money,
    pub projected_expenses: Money,
    pub projected_net_income: Money,
    pub projected_pension: Money,
    pub projected_study: Money,
    pub projected_taxable_income: Money,
    pub projected_tax: IncomeTaxResult,
    /// All zero when no months are left.
    pub needed_monthly: NeededMonthly,
}

/// Extrapolate the year from the YTD average, assuming balanced deposits.
pub fn project_year_end(state: &AnnualState, current_month: u32) -> YearEndProjection {
    let rates = &state.settings.rates;
    let analysis = run_full_analysis(state, current_month);
    let totals = &analysis.totals;

    let elapsed = Decimal::from(current_month.min(MONTHS_IN_YEAR));
    let months_left = Decimal::from(totals.months_left.max(0));

    let average_monthly_income = safe_div(totals.income_ytd, elapsed);
    let average_monthly_expenses = safe_div(totals.expenses_ytd, elapsed);
    let projected_income = totals.income_ytd + average_monthly_income * months_left;
    let projected_expenses = totals.expenses_ytd + average_monthly_expenses * months_left;
    let projected_net_income = projected_income - projected_expenses;

    let balanced = &analysis.suggestions.balanced;
    let pension_uncapped = totals.pension_total + balanced.pension * months_left;
    let study_uncapped = totals.study_total + balanced.study_total * months_left;
    let projected_pension = pension_uncapped.min(projected_net_income * rates.pension_rate);
    let projected_study = study_uncapped.min(rates.study_cap_total);

    let study_deductible = projected_study.min(projected_net_income * rates.study_rate_deductible);
    let projected_taxable_income = projected_net_income - projected_pension - study_deductible;
    let projected_tax = calculate_income_tax(projected_taxable_income, &rates.tax);

    let needed_monthly = if months_left > Decimal::ZERO {
        NeededMonthly {
            income: (projected_income - totals.income_ytd) / months_left,
            pension: ((projected_pension - totals.pension_total) / months_left)
                .max(Decimal::ZERO),
            study: ((projected_study - totals.study_total) / months_left).max(Decimal::ZERO),
        }
    } else {
        NeededMonthly::default()
    };

    YearEndProjection {
        current_month,
        months_left: totals.months_left,
        average_monthly_income,
        average_monthly_expenses,
        projected_income,
        projected_expenses,
        projected_net_income,
        projected_pension,
        projected_study,
        projected_taxable_income,
        projected_tax,
        needed_monthly,
    }
}

// ---------------------------------------------------------------------------
// December top-up
// ---------------------------------------------------------------------------

/// Exact amounts that max out the year's caps, offered only in December.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TopUpPlan {
    Available { pension: Money, study_fund: Money },
    Unavailable { current_month: u32 },
}

pub fn december_top_up(state: &AnnualState, current_month: u32) -> TopUpPlan {
    if current_month != MONTHS_IN_YEAR {
        return TopUpPlan::Unavailable { current_month };
    }
    let remaining = run_full_analysis(state, current_month).remaining;
    TopUpPlan::Available {
        pension: remaining.pension_remaining,
        study_fund: remaining.study_total_remaining,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::parse_ledger_updates;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn state_with(month: u32, text: &str) -> AnnualState {
        let mut state = AnnualState::new(2025);
        state
            .apply_update(month, &parse_ledger_updates(text).unwrap())
            .unwrap();
        state
    }

    #[test]
    fn test_month_projection_annualizes_taxable_income() {
        let state = state_with(4, "income=12000 expenses=1000 pension=1000");
        let p = project_month(&state, 4, 2025).unwrap();
        assert_eq!(p.net_income, dec!(11000));
        assert_eq!(p.taxable_income, dec!(10000));
        assert_eq!(p.annualized_taxable_income, dec!(120000));
        // 7,135.2 / 12
        assert_eq!(p.estimated_tax, dec!(594.6));
        assert_eq!(p.estimated_ni, dec!(622.5142));
        assert_eq!(p.estimated_burden, p.estimated_tax + p.estimated_ni);
    }

    #[test]
    fn test_month_projection_with_deposits_above_net() {
        let state = state_with(2, "income=3000 pension=5000");
        let p = project_month(&state, 2, 2025).unwrap();
        assert_eq!(p.taxable_income, dec!(0));
        assert_eq!(p.estimated_burden, dec!(0));
    }

    #[test]
    fn test_month_projection_rejects_bad_month() {
        let state = AnnualState::new(2025);
        assert!(project_month(&state, 0, 2025).is_err());
    }

    #[test]
    fn test_year_end_projection() {
        let mut state = AnnualState::new(2025);
        for m in 1..=9 {
            state
                .apply_update(m, &parse_ledger_updates("income=10000").unwrap())
                .unwrap();
        }
        // month 9 counts as elapsed; months 9..=12 are left
        let p = project_year_end(&state, 9);
        assert_eq!(p.months_left, 4);
        assert_eq!(p.average_monthly_income, dec!(10000));
        assert_eq!(p.projected_income, dec!(130000));
        assert_eq!(p.projected_net_income, dec!(130000));
        assert_eq!(p.projected_pension, dec!(14850));
        assert_eq!(p.projected_study, dec!(20520));
        // 130,000 - 14,850 - min(20,520, 5,850)
        assert_eq!(p.projected_taxable_income, dec!(109300));
        assert_eq!(
            p.projected_tax,
            calculate_income_tax(dec!(109300), &state.settings.rates.tax)
        );
        let needed = &p.needed_monthly;
        assert_eq!(needed.income, dec!(10000));
        assert_eq!(needed.pension, dec!(3712.5));
        assert_eq!(needed.study, dec!(5130));
    }

    #[test]
    fn test_year_end_projection_empty_year() {
        let p = project_year_end(&AnnualState::new(2025), 1);
        assert_eq!(p.projected_income, dec!(0));
        assert_eq!(p.projected_pension, dec!(0));
        assert_eq!(p.projected_tax.net_tax, dec!(0));
    }

    #[test]
    fn test_year_end_projection_no_months_left() {
        let state = state_with(1, "income=10000");
        let p = project_year_end(&state, 13);
        assert_eq!(p.months_left, 0);
        assert_eq!(p.projected_income, dec!(10000));
        assert_eq!(p.needed_monthly, NeededMonthly::default());
    }

    #[test]
    fn test_top_up_only_in_december() {
        let state = state_with(1, "income=120000 pension=4000");
        assert_eq!(
            december_top_up(&state, 11),
            TopUpPlan::Unavailable { current_month: 11 }
        );
        assert_eq!(
            december_top_up(&state, 12),
            TopUpPlan::Available {
                pension: dec!(15800),
                study_fund: dec!(20520),
            }
        );
    }

    #[test]
    fn test_top_up_serializes_with_status_tag() {
        let json = serde_json::to_value(TopUpPlan::Unavailable { current_month: 3 }).unwrap();
        assert_eq!(json["status"], serde_json::json!("unavailable"));
    }
}
