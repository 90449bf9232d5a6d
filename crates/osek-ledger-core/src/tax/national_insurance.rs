use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::settings::NationalInsuranceSettings;
use crate::types::{safe_div, Money, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NiBand {
    /// Up to the low threshold, reduced rates.
    Low,
    /// Between the thresholds, full rates.
    High,
    /// Above the contribution ceiling; informational, always zero.
    AboveCeiling,
}

/// One line of the NI breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NiBracketLine {
    pub band: NiBand,
    pub lower: Money,
    /// `None` for the open band above the ceiling.
    pub upper: Option<Money>,
    pub ni_rate: Rate,
    pub health_rate: Rate,
    pub income_in_band: Money,
    pub ni_amount: Money,
    pub health_amount: Money,
    pub total_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalInsuranceResult {
    pub ni_amount: Money,
    pub health_amount: Money,
    pub total_amount: Money,
    pub effective_rate: Rate,
    pub breakdown: Vec<NiBracketLine>,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// National insurance and health tax on one month of self-employed income.
///
/// Two progressive bands split at the low threshold; income above the high
/// threshold carries no further contribution. Non-positive income yields an
/// all-zero result with an empty breakdown.
pub fn calculate_national_insurance(
    monthly_income: Money,
    settings: &NationalInsuranceSettings,
) -> NationalInsuranceResult {
    let low = settings.monthly_thresholds.low;
    let high = settings.monthly_thresholds.high;
    let rates = &settings.rates;

    let mut ni_amount = Decimal::ZERO;
    let mut health_amount = Decimal::ZERO;
    let mut breakdown = Vec::new();

    if monthly_income > Decimal::ZERO {
        let in_low = monthly_income.min(low);
        let line = band_line(
            NiBand::Low,
            Decimal::ZERO,
            Some(low),
            rates.ni_low,
            rates.health_low,
            in_low,
        );
        ni_amount += line.ni_amount;
        health_amount += line.health_amount;
        if line.total_amount > Decimal::ZERO {
            breakdown.push(line);
        }
    }

    if monthly_income > low {
        let in_high = monthly_income.min(high) - low;
        let line = band_line(
            NiBand::High,
            low,
            Some(high),
            rates.ni_high,
            rates.health_high,
            in_high,
        );
        ni_amount += line.ni_amount;
        health_amount += line.health_amount;
        if line.total_amount > Decimal::ZERO {
            breakdown.push(line);
        }
    }

    if monthly_income > high {
        breakdown.push(band_line(
            NiBand::AboveCeiling,
            high,
            None,
            Decimal::ZERO,
            Decimal::ZERO,
            monthly_income - high,
        ));
    }

    let total_amount = ni_amount + health_amount;
    NationalInsuranceResult {
        ni_amount,
        health_amount,
        total_amount,
        effective_rate: safe_div(total_amount, monthly_income),
        breakdown,
    }
}

fn band_line(
    band: NiBand,
    lower: Money,
    upper: Option<Money>,
    ni_rate: Rate,
    health_rate: Rate,
    income_in_band: Money,
) -> NiBracketLine {
    let ni_amount = income_in_band * ni_rate;
    let health_amount = income_in_band * health_rate;
    NiBracketLine {
        band,
        lower,
        upper,
        ni_rate,
        health_rate,
        income_in_band,
        ni_amount,
        health_amount,
        total_amount: ni_amount + health_amount,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
