use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::settings::IncomeTaxSettings;
use crate::types::{safe_div, Money, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxLineKind {
    Bracket,
    Surtax,
}

/// Tax attributed to one bracket (or to the surtax slice).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracketLine {
    pub kind: TaxLineKind,
    pub lower: Money,
    pub upper: Option<Money>,
    pub rate: Rate,
    pub taxable_amount: Money,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeTaxResult {
    /// Bracket tax plus surtax, before credit points.
    pub amount: Money,
    pub marginal_rate: Rate,
    pub effective_rate: Rate,
    pub credit_points_value: Money,
    /// `max(0, amount - credit_points_value)`.
    pub net_tax: Money,
    pub surtax: Money,
    pub breakdown: Vec<TaxBracketLine>,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Progressive income tax on an annual taxable figure.
///
/// Requires `settings.brackets` ascending and contiguous (see
/// [`crate::settings::RateSettings::validate`]): iteration stops at the first
/// bracket the income does not reach.
pub fn calculate_income_tax(income: Money, settings: &IncomeTaxSettings) -> IncomeTaxResult {
    let mut bracket_tax = Decimal::ZERO;
    let mut marginal_rate = Decimal::ZERO;
    let mut breakdown = Vec::new();

    for bracket in &settings.brackets {
        if income <= bracket.min {
            break;
        }
        let top = match bracket.max {
            Some(max) => income.min(max),
            None => income,
        };
        let taxable_amount = top - bracket.min;
        let tax = taxable_amount * bracket.rate;
        bracket_tax += tax;
        marginal_rate = bracket.rate;

        if tax > Decimal::ZERO {
            breakdown.push(TaxBracketLine {
                kind: TaxLineKind::Bracket,
                lower: bracket.min,
                upper: bracket.max,
                rate: bracket.rate,
                taxable_amount,
                amount: tax,
            });
        }
    }

    let mut surtax = Decimal::ZERO;
    if income > settings.surtax_threshold {
        let taxable_amount = income - settings.surtax_threshold;
        surtax = taxable_amount * settings.surtax_rate;
        marginal_rate += settings.surtax_rate;
        breakdown.push(TaxBracketLine {
            kind: TaxLineKind::Surtax,
            lower: settings.surtax_threshold,
            upper: None,
            rate: settings.surtax_rate,
            taxable_amount,
            amount: surtax,
        });
    }

    let amount = bracket_tax + surtax;
    let credit_points_value = settings.credit_points_value();
    let net_tax = (amount - credit_points_value).max(Decimal::ZERO);

    IncomeTaxResult {
        amount,
        marginal_rate,
        effective_rate: safe_div(net_tax, income),
        credit_points_value,
        net_tax,
        surtax,
        breakdown,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
