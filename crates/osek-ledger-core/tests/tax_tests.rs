use osek_ledger_core::settings::{IncomeTaxSettings, NationalInsuranceSettings};
use osek_ledger_core::tax::comprehensive::calculate_comprehensive_tax_analysis;
use osek_ledger_core::tax::income_tax::calculate_income_tax;
use osek_ledger_core::tax::national_insurance::calculate_national_insurance;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// National insurance: two-band monthly assessment
// ===========================================================================

#[test]
fn test_ni_ten_thousand_per_month() {
    // 7,522 x (1.04% + 3.23%) + 2,478 x (7% + 5.16%)
    let r = calculate_national_insurance(dec!(10000), &NationalInsuranceSettings::default());
    assert_eq!(r.breakdown[0].total_amount, dec!(321.1894));
    assert_eq!(r.breakdown[1].total_amount, dec!(301.3248));
    assert_eq!(r.total_amount, dec!(622.5142));
    assert_eq!(r.total_amount, r.ni_amount + r.health_amount);
}

#[test]
fn test_ni_below_low_threshold_uses_reduced_rates_only() {
    let r = calculate_national_insurance(dec!(5000), &NationalInsuranceSettings::default());
    assert_eq!(r.ni_amount, dec!(52));
    assert_eq!(r.health_amount, dec!(161.5));
    assert_eq!(r.breakdown.len(), 1);
}

#[test]
fn test_ni_ceiling_caps_contribution() {
    let s = NationalInsuranceSettings::default();
    let at_ceiling = calculate_national_insurance(dec!(50695), &s);
    let far_above = calculate_national_insurance(dec!(250000), &s);
    assert_eq!(at_ceiling.total_amount, far_above.total_amount);
    assert!(far_above.effective_rate < at_ceiling.effective_rate);
}

// ===========================================================================
// Income tax: brackets, surtax and credit points
// ===========================================================================

#[test]
fn test_income_tax_at_each_boundary_sums_full_brackets() {
    let s = IncomeTaxSettings::default();
    let mut expected = Decimal::ZERO;
    for bracket in &s.brackets {
        let Some(max) = bracket.max else { break };
        expected += (max - bracket.min) * bracket.rate;
        let r = calculate_income_tax(max, &s);
        assert_eq!(r.amount, expected, "boundary {}", max);
    }
}

#[test]
fn test_income_tax_credit_points_floor_at_zero() {
    let r = calculate_income_tax(dec!(60000), &IncomeTaxSettings::default());
    assert_eq!(r.amount, dec!(6000));
    assert_eq!(r.net_tax, dec!(0));
}

#[test]
fn test_income_tax_surtax_slice() {
    let s = IncomeTaxSettings::default();
    let at = calculate_income_tax(dec!(721560), &s);
    let above = calculate_income_tax(dec!(731560), &s);
    assert_eq!(at.surtax, dec!(0));
    assert_eq!(above.surtax, dec!(300));
    // 10,000 more at 50% top bracket plus 3% surtax
    assert_eq!(above.amount - at.amount, dec!(5300));
}

// ===========================================================================
// Comprehensive analysis
// ===========================================================================

#[test]
fn test_comprehensive_zero_income() {
    let a = calculate_comprehensive_tax_analysis(
        dec!(0),
        &IncomeTaxSettings::default(),
        &NationalInsuranceSettings::default(),
        dec!(0),
    );
    assert_eq!(a.tax.net_tax, dec!(0));
    assert_eq!(a.national_insurance.total_amount, dec!(0));
    assert_eq!(a.income.take_home_pay, dec!(0));
    assert_eq!(a.summary.ni_percentage, dec!(0));
}

#[test]
fn test_comprehensive_monthly_view_is_a_twelfth() {
    let a = calculate_comprehensive_tax_analysis(
        dec!(300000),
        &IncomeTaxSettings::default(),
        &NationalInsuranceSettings::default(),
        dec!(0),
    );
    let yearly = &a.comparison.yearly;
    let monthly = &a.comparison.monthly;
    assert_eq!(monthly.income, dec!(25000));
    assert_eq!(monthly.tax * dec!(12), yearly.tax);
    assert_eq!(monthly.take_home * dec!(12), yearly.take_home);
    assert_eq!(yearly.income, yearly.tax + yearly.ni_employee + yearly.take_home);
}
