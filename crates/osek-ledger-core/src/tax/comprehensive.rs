use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::settings::{IncomeTaxSettings, NationalInsuranceSettings};
use crate::tax::income_tax::{calculate_income_tax, TaxBracketLine};
use crate::tax::national_insurance::{calculate_national_insurance, NiBracketLine};
use crate::types::{safe_div, Money, Rate, TWELVE};

const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSummary {
    pub net_income: Money,
    pub take_home_pay: Money,
    pub monthly_income: Money,
    pub monthly_take_home: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSummary {
    pub gross_tax: Money,
    pub credit_points_value: Money,
    pub net_tax: Money,
    pub monthly_tax: Money,
    pub surtax: Money,
    pub marginal_rate: Rate,
    pub effective_rate: Rate,
    pub breakdown: Vec<TaxBracketLine>,
}

/// Annualized NI figures plus reconciliation against what was already paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalInsuranceSummary {
    pub ni_amount: Money,
    pub health_amount: Money,
    pub total_amount: Money,
    pub monthly_total: Money,
    pub effective_rate: Rate,
    /// Breakdown of the monthly-equivalent assessment.
    pub breakdown: Vec<NiBracketLine>,
    pub paid_manually: Money,
    pub monthly_paid: Money,
    pub remaining: Money,
    pub monthly_remaining: Money,
    pub overpaid: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurdenSummary {
    pub total_tax_burden: Money,
    pub monthly_tax_burden: Money,
    pub total_effective_rate: Rate,
    /// Percent of income (0-100 scale).
    pub tax_percentage: Decimal,
    /// NI and health tax together.
    pub ni_percentage: Decimal,
    pub health_percentage: Decimal,
    pub take_home_pay: Money,
    pub monthly_take_home: Money,
}

/// The same figures over one period, yearly or monthly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodView {
    pub income: Money,
    pub tax: Money,
    /// Self-employed NI + health (there is no employer share).
    pub ni_employee: Money,
    pub total_burden: Money,
    pub take_home: Money,
    pub effective_rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NiPaymentStatus {
    pub yearly_paid: Money,
    pub yearly_due: Money,
    pub yearly_remaining: Money,
    pub yearly_overpaid: Money,
    pub monthly_paid: Money,
    pub monthly_due: Money,
    pub monthly_remaining: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub yearly: PeriodView,
    pub monthly: PeriodView,
    pub ni_status: NiPaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensiveTaxAnalysis {
    pub income: IncomeSummary,
    pub tax: TaxSummary,
    pub national_insurance: NationalInsuranceSummary,
    pub summary: BurdenSummary,
    pub comparison: PeriodComparison,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Income tax, NI and take-home for one year of net (taxable) income.
///
/// Income tax is assessed on the annual figure. NI is assessed on the
/// monthly equivalent (`annual / 12`) and multiplied back by twelve, because
/// its thresholds are monthly. `ni_paid_manually` only feeds the
/// paid/remaining/overpaid reconciliation; it never changes what is due.
pub fn calculate_comprehensive_tax_analysis(
    net_income: Money,
    tax_settings: &IncomeTaxSettings,
    ni_settings: &NationalInsuranceSettings,
    ni_paid_manually: Money,
) -> ComprehensiveTaxAnalysis {
    let tax = calculate_income_tax(net_income, tax_settings);

    let monthly_income = net_income / TWELVE;
    let ni_monthly = calculate_national_insurance(monthly_income, ni_settings);
    let ni_annual = ni_monthly.ni_amount * TWELVE;
    let health_annual = ni_monthly.health_amount * TWELVE;
    let ni_total_annual = ni_monthly.total_amount * TWELVE;

    let total_tax_burden = tax.net_tax + ni_total_annual;
    let total_effective_rate = safe_div(total_tax_burden, net_income);
    let take_home_pay = net_income - total_tax_burden;

    let ni_remaining = (ni_total_annual - ni_paid_manually).max(Decimal::ZERO);
    let ni_overpaid = (ni_paid_manually - ni_total_annual).max(Decimal::ZERO);

    let monthly_tax = tax.net_tax / TWELVE;
    let monthly_ni_total = ni_total_annual / TWELVE;
    let monthly_tax_burden = total_tax_burden / TWELVE;
    let monthly_take_home = take_home_pay / TWELVE;
    let monthly_ni_paid = ni_paid_manually / TWELVE;
    let monthly_ni_remaining = ni_remaining / TWELVE;

    let comparison = PeriodComparison {
        yearly: PeriodView {
            income: net_income,
            tax: tax.net_tax,
            ni_employee: ni_total_annual,
            total_burden: total_tax_burden,
            take_home: take_home_pay,
            effective_rate: total_effective_rate,
        },
        monthly: PeriodView {
            income: monthly_income,
            tax: monthly_tax,
            ni_employee: monthly_ni_total,
            total_burden: monthly_tax_burden,
            take_home: monthly_take_home,
            effective_rate: total_effective_rate,
        },
        ni_status: NiPaymentStatus {
            yearly_paid: ni_paid_manually,
            yearly_due: ni_total_annual,
            yearly_remaining: ni_remaining,
            yearly_overpaid: ni_overpaid,
            monthly_paid: monthly_ni_paid,
            monthly_due: monthly_ni_total,
            monthly_remaining: monthly_ni_remaining,
        },
    };

    ComprehensiveTaxAnalysis {
        income: IncomeSummary {
            net_income,
            take_home_pay,
            monthly_income,
            monthly_take_home,
        },
        summary: BurdenSummary {
            total_tax_burden,
            monthly_tax_burden,
            total_effective_rate,
            tax_percentage: safe_div(tax.net_tax, net_income) * HUNDRED,
            ni_percentage: safe_div(ni_total_annual, net_income) * HUNDRED,
            health_percentage: safe_div(health_annual, net_income) * HUNDRED,
            take_home_pay,
            monthly_take_home,
        },
        national_insurance: NationalInsuranceSummary {
            ni_amount: ni_annual,
            health_amount: health_annual,
            total_amount: ni_total_annual,
            monthly_total: monthly_ni_total,
            effective_rate: ni_monthly.effective_rate,
            breakdown: ni_monthly.breakdown,
            paid_manually: ni_paid_manually,
            monthly_paid: monthly_ni_paid,
            remaining: ni_remaining,
            monthly_remaining: monthly_ni_remaining,
            overpaid: ni_overpaid,
        },
        tax: TaxSummary {
            gross_tax: tax.amount,
            credit_points_value: tax.credit_points_value,
            net_tax: tax.net_tax,
            monthly_tax,
            surtax: tax.surtax,
            marginal_rate: tax.marginal_rate,
            effective_rate: tax.effective_rate,
            breakdown: tax.breakdown,
        },
        comparison,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
