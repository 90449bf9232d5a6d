use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::clock::ClockSource;
use crate::deposits::caps::{
    calculate_caps, calculate_remaining_room, ContributionCaps, RemainingRoom,
};
use crate::deposits::deductible::{calculate_deductible_analysis, DeductibleAnalysis};
use crate::deposits::recommend::{calculate_all_suggestions, SuggestionSet};
use crate::deposits::ytd::{calculate_ytd_totals, YtdTotals};
use crate::state::AnnualState;
use crate::tax::comprehensive::{calculate_comprehensive_tax_analysis, ComprehensiveTaxAnalysis};
use crate::types::{with_metadata, ComputationOutput};

/// Everything the presentation layer needs, computed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub totals: YtdTotals,
    pub caps: ContributionCaps,
    pub remaining: RemainingRoom,
    pub suggestions: SuggestionSet,
    pub deductible_analysis: DeductibleAnalysis,
    pub tax_analysis: ComprehensiveTaxAnalysis,
}

/// Run the whole pipeline over a state snapshot.
///
/// Pure: the same `state` and `current_month` always produce the same
/// result, and `state` is never modified. Steps run in a fixed order:
/// totals, caps, headroom, suggestions (one per mode), deductible split,
/// then the tax analysis on YTD net income.
pub fn run_full_analysis(state: &AnnualState, current_month: u32) -> AnalysisResult {
    let rates = &state.settings.rates;

    let totals = calculate_ytd_totals(&state.records(), current_month);
    log::debug!(
        "YTD net income {} with {} month(s) left",
        totals.net_income_ytd,
        totals.months_left
    );

    let caps = calculate_caps(totals.net_income_ytd, rates);
    let remaining = calculate_remaining_room(&caps, totals.pension_total, totals.study_total);
    log::debug!(
        "Remaining room: pension {}, study deductible {}, study total {}",
        remaining.pension_remaining,
        remaining.study_deductible_remaining,
        remaining.study_total_remaining
    );

    let suggestions = calculate_all_suggestions(&remaining, totals.months_left);

    let deductible_analysis =
        calculate_deductible_analysis(totals.pension_total, totals.study_total, &caps);

    let tax_analysis = calculate_comprehensive_tax_analysis(
        totals.net_income_ytd,
        &rates.tax,
        &rates.ni,
        state.ni_paid(),
    );
    log::debug!(
        "Tax burden {} on net income {}",
        tax_analysis.summary.total_tax_burden,
        totals.net_income_ytd
    );

    AnalysisResult {
        totals,
        caps,
        remaining,
        suggestions,
        deductible_analysis,
        tax_analysis,
    }
}

/// Resolve the month from `clock` and wrap the analysis with warnings.
pub fn analyze(
    state: &AnnualState,
    clock: &dyn ClockSource,
) -> ComputationOutput<AnalysisResult> {
    let start = Instant::now();
    let current_month = state.clock(clock).current_month();
    if !(1..=12).contains(&current_month) {
        log::warn!("Resolved current month {} is outside 1..=12", current_month);
    }

    let result = run_full_analysis(state, current_month);
    let warnings = collect_warnings(&result);
    let ni_paid_source = match state.totals.ni_paid_manually {
        Some(_) => "manual",
        None => "monthly",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "YTD aggregation, deductible caps, deposit strategies and progressive tax/NI analysis",
        &serde_json::json!({
            "year": state.year,
            "current_month": current_month,
            "simulated": state.simulation.is_active(),
            "pension_rate": state.settings.rates.pension_rate.to_string(),
            "study_rate_deductible": state.settings.rates.study_rate_deductible.to_string(),
            "study_cap_total": state.settings.rates.study_cap_total.to_string(),
            "ni_paid_source": ni_paid_source,
        }),
        warnings,
        elapsed,
        result,
    )
}

fn collect_warnings(result: &AnalysisResult) -> Vec<String> {
    let mut warnings = Vec::new();
    if result.totals.months_left <= 0 {
        warnings.push("No months left in the year; deposit suggestions are zero".into());
    }
    if result.totals.net_income_ytd < Decimal::ZERO {
        warnings.push(format!(
            "Net income is negative ({}); no deductible room is available",
            result.totals.net_income_ytd
        ));
    }
    let pension = &result.deductible_analysis.pension;
    if pension.non_deductible > Decimal::ZERO {
        warnings.push(format!(
            "Pension deposits exceed the deductible cap by {}",
            pension.non_deductible
        ));
    }
    let study = &result.deductible_analysis.study;
    if study.taxable > Decimal::ZERO {
        warnings.push(format!(
            "Study-fund deposits exceed the tax-free ceiling by {}",
            study.taxable
        ));
    }
    let ni = &result.tax_analysis.national_insurance;
    if ni.overpaid > Decimal::ZERO {
        warnings.push(format!("National insurance overpaid by {}", ni.overpaid));
    }
    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::state::{parse_ledger_updates, MonthlyRecord};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    /// Ten months at 12,000 income / 0 expenses = 120,000 net.
    fn sample_state() -> AnnualState {
        let mut state = AnnualState::new(2025);
        for m in 1..=10 {
            state
                .apply_update(m, &parse_ledger_updates("income=12000").unwrap())
                .unwrap();
        }
        state
    }

    #[test]
    fn test_pipeline_figures() {
        let mut state = sample_state();
        state.record_deposit(1, Some(dec!(25000)), Some(dec!(3000))).unwrap();

        let r = run_full_analysis(&state, 11);
        assert_eq!(r.totals.net_income_ytd, dec!(120000));
        assert_eq!(r.totals.months_left, 2);
        assert_eq!(r.caps.pension_cap, dec!(19800));
        assert_eq!(r.remaining.pension_remaining, dec!(0));
        assert_eq!(r.remaining.study_deductible_remaining, dec!(2400));
        assert_eq!(r.deductible_analysis.pension.non_deductible, dec!(5200));
        assert_eq!(r.suggestions.balanced.study_deductible, dec!(1200));
        assert_eq!(r.suggestions.aggressive.study_deductible, dec!(2400));
        assert_eq!(r.suggestions.conservative.study_deductible, dec!(600));
        assert_eq!(r.tax_analysis.tax.net_tax, dec!(7135.2));
    }

    #[test]
    fn test_deterministic_and_input_untouched() {
        let state = sample_state();
        let before = state.clone();
        let a = run_full_analysis(&state, 5);
        let b = run_full_analysis(&state, 5);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_empty_state_is_neutral() {
        let r = run_full_analysis(&AnnualState::new(2025), 1);
        assert_eq!(r.totals.income_ytd, dec!(0));
        assert_eq!(r.remaining.pension_remaining, dec!(0));
        assert_eq!(r.suggestions.balanced.study_total, dec!(20520) / dec!(12));
        assert_eq!(r.tax_analysis.income.take_home_pay, dec!(0));
        assert_eq!(r.tax_analysis.national_insurance.total_amount, dec!(0));
    }

    #[test]
    fn test_month_past_december_zeroes_suggestions() {
        let r = run_full_analysis(&sample_state(), 13);
        assert_eq!(r.totals.months_left, 0);
        assert_eq!(r.suggestions.balanced.pension, dec!(0));
        assert_eq!(r.suggestions.aggressive.pension, dec!(0));
        assert_eq!(r.suggestions.conservative.pension, dec!(0));
    }

    #[test]
    fn test_manual_ni_feeds_reconciliation() {
        let mut state = sample_state();
        state.months.insert(
            "2".into(),
            MonthlyRecord {
                income: dec!(12000),
                ni_paid: dec!(1000),
                ..Default::default()
            },
        );
        let r = run_full_analysis(&state, 6);
        assert_eq!(r.tax_analysis.national_insurance.paid_manually, dec!(1000));

        state.set_ni_paid_manually(dec!(20000)).unwrap();
        let r = run_full_analysis(&state, 6);
        assert_eq!(r.tax_analysis.national_insurance.paid_manually, dec!(20000));
        assert!(r.tax_analysis.national_insurance.overpaid > dec!(0));
    }

    #[test]
    fn test_analyze_uses_simulated_month() {
        let mut state = sample_state();
        state.set_simulation(12, 2025).unwrap();
        let out = analyze(&state, &FixedClock::new(3, 2026));
        assert_eq!(out.result.totals.months_left, 1);
        assert_eq!(out.assumptions["current_month"], serde_json::json!(12));
        assert_eq!(out.assumptions["simulated"], serde_json::json!(true));
    }

    #[test]
    fn test_analyze_warnings() {
        let mut state = sample_state();
        state.record_deposit(1, Some(dec!(25000)), Some(dec!(30000))).unwrap();
        state.set_ni_paid_manually(dec!(50000)).unwrap();
        let out = analyze(&state, &FixedClock::new(12, 2025));
        assert_eq!(out.warnings.len(), 3);
        assert!(out.warnings[0].contains("Pension"));
        assert!(out.warnings[1].contains("Study-fund"));
        assert!(out.warnings[2].contains("overpaid"));
    }
}
