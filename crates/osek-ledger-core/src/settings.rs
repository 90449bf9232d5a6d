use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::types::{DepositMode, Money, Rate};
use crate::LedgerResult;

// ---------------------------------------------------------------------------
// Rate tables
// ---------------------------------------------------------------------------

/// One band of the progressive income-tax schedule.
///
/// Brackets are contiguous and ascending by `min`; `max = None` marks the
/// open-ended top bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min: Money,
    #[serde(default)]
    pub max: Option<Money>,
    pub rate: Rate,
}

impl TaxBracket {
    pub fn new(min: Money, max: Option<Money>, rate: Rate) -> Self {
        TaxBracket { min, max, rate }
    }
}

/// Annual income-tax schedule with surtax and credit points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeTaxSettings {
    pub brackets: Vec<TaxBracket>,
    pub surtax_threshold: Money,
    pub surtax_rate: Rate,
    pub credit_points: Decimal,
    pub credit_point_value: Money,
}

impl IncomeTaxSettings {
    /// Total annual credit, `credit_points * credit_point_value`.
    pub fn credit_points_value(&self) -> Money {
        self.credit_points * self.credit_point_value
    }
}

impl Default for IncomeTaxSettings {
    fn default() -> Self {
        IncomeTaxSettings {
            brackets: vec![
                TaxBracket::new(dec!(0), Some(dec!(84120)), dec!(0.10)),
                TaxBracket::new(dec!(84120), Some(dec!(120720)), dec!(0.14)),
                TaxBracket::new(dec!(120720), Some(dec!(193800)), dec!(0.20)),
                TaxBracket::new(dec!(193800), Some(dec!(269280)), dec!(0.31)),
                TaxBracket::new(dec!(269280), Some(dec!(560280)), dec!(0.35)),
                TaxBracket::new(dec!(560280), Some(dec!(721560)), dec!(0.47)),
                TaxBracket::new(dec!(721560), None, dec!(0.50)),
            ],
            surtax_threshold: dec!(721560),
            surtax_rate: dec!(0.03),
            credit_points: dec!(2.25),
            credit_point_value: dec!(2800),
        }
    }
}

/// Monthly income breakpoints of the national-insurance schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NiThresholds {
    pub low: Money,
    pub high: Money,
}

impl Default for NiThresholds {
    fn default() -> Self {
        NiThresholds {
            low: dec!(7522),
            high: dec!(50695),
        }
    }
}

/// Self-employed contribution rates (no employer share).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NiRates {
    pub ni_low: Rate,
    pub health_low: Rate,
    pub ni_high: Rate,
    pub health_high: Rate,
}

impl Default for NiRates {
    fn default() -> Self {
        NiRates {
            ni_low: dec!(0.0104),
            health_low: dec!(0.0323),
            ni_high: dec!(0.07),
            health_high: dec!(0.0516),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NationalInsuranceSettings {
    pub monthly_thresholds: NiThresholds,
    pub rates: NiRates,
}

/// Every rate and cap the calculators read.
///
/// Loaded once with the state document and validated with
/// [`RateSettings::validate`]; calculators assume a validated value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSettings {
    pub vat_rate: Rate,
    pub pension_rate: Rate,
    pub study_rate_deductible: Rate,
    pub study_cap_total: Money,
    pub ni: NationalInsuranceSettings,
    pub tax: IncomeTaxSettings,
}

impl Default for RateSettings {
    fn default() -> Self {
        RateSettings {
            vat_rate: dec!(0),
            pension_rate: dec!(0.165),
            study_rate_deductible: dec!(0.045),
            study_cap_total: dec!(20520),
            ni: NationalInsuranceSettings::default(),
            tax: IncomeTaxSettings::default(),
        }
    }
}

impl RateSettings {
    /// Check the invariants the calculators rely on.
    pub fn validate(&self) -> LedgerResult<()> {
        check_rate("vat_rate", self.vat_rate)?;
        check_rate("pension_rate", self.pension_rate)?;
        check_rate("study_rate_deductible", self.study_rate_deductible)?;
        check_non_negative("study_cap_total", self.study_cap_total)?;

        let ni = &self.ni;
        check_non_negative("ni.monthly_thresholds.low", ni.monthly_thresholds.low)?;
        if ni.monthly_thresholds.high < ni.monthly_thresholds.low {
            return Err(invalid(
                "ni.monthly_thresholds.high",
                format!(
                    "High threshold ({}) is below low threshold ({})",
                    ni.monthly_thresholds.high, ni.monthly_thresholds.low
                ),
            ));
        }
        check_rate("ni.rates.ni_low", ni.rates.ni_low)?;
        check_rate("ni.rates.health_low", ni.rates.health_low)?;
        check_rate("ni.rates.ni_high", ni.rates.ni_high)?;
        check_rate("ni.rates.health_high", ni.rates.health_high)?;

        let tax = &self.tax;
        check_non_negative("tax.surtax_threshold", tax.surtax_threshold)?;
        check_rate("tax.surtax_rate", tax.surtax_rate)?;
        check_non_negative("tax.credit_points", tax.credit_points)?;
        check_non_negative("tax.credit_point_value", tax.credit_point_value)?;
        validate_brackets(&tax.brackets)
    }
}

/// Brackets must start at zero, be contiguous, and only the last may be open.
fn validate_brackets(brackets: &[TaxBracket]) -> LedgerResult<()> {
    let first = brackets
        .first()
        .ok_or_else(|| invalid("tax.brackets", "At least one bracket is required".into()))?;
    if first.min != Decimal::ZERO {
        return Err(invalid(
            "tax.brackets[0].min",
            format!("First bracket must start at 0, got {}", first.min),
        ));
    }

    let last_index = brackets.len() - 1;
    for (i, bracket) in brackets.iter().enumerate() {
        check_rate(&format!("tax.brackets[{}].rate", i), bracket.rate)?;
        match bracket.max {
            Some(max) => {
                if max <= bracket.min {
                    return Err(invalid(
                        &format!("tax.brackets[{}].max", i),
                        format!("max ({}) must exceed min ({})", max, bracket.min),
                    ));
                }
                if i == last_index {
                    return Err(invalid(
                        &format!("tax.brackets[{}].max", i),
                        "Top bracket must be unbounded (max = null)".into(),
                    ));
                }
                let next_min = brackets[i + 1].min;
                if next_min != max {
                    return Err(invalid(
                        &format!("tax.brackets[{}].min", i + 1),
                        format!("Bracket must start at previous max {}, got {}", max, next_min),
                    ));
                }
            }
            None if i != last_index => {
                return Err(invalid(
                    &format!("tax.brackets[{}].max", i),
                    "Only the top bracket may be unbounded".into(),
                ));
            }
            None => {}
        }
    }
    Ok(())
}

fn check_rate(field: &str, rate: Rate) -> LedgerResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(invalid(field, format!("Rate {} must be within [0, 1]", rate)));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: Decimal) -> LedgerResult<()> {
    if value < Decimal::ZERO {
        return Err(invalid(field, format!("Cannot be negative, got {}", value)));
    }
    Ok(())
}

fn invalid(field: &str, reason: String) -> LedgerError {
    LedgerError::InvalidSettings {
        field: field.to_string(),
        reason,
    }
}

// ---------------------------------------------------------------------------
// Profile and presentation settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessProfile {
    pub name: String,
    pub name_en: String,
    pub dealer_id: String,
    pub address: String,
    pub contact: String,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        BusinessProfile {
            name: "My Business".into(),
            name_en: "My Business".into(),
            dealer_id: "XXXXXXXXX".into(),
            address: "Address, City".into(),
            contact: "email@example.com".into(),
        }
    }
}

/// Document numbering counters for receipts, invoices and expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberingCounters {
    pub year: i32,
    pub next_receipt: u32,
    pub next_invoice: u32,
    pub next_expense: u32,
}

impl Default for NumberingCounters {
    fn default() -> Self {
        NumberingCounters {
            year: 2025,
            next_receipt: 1,
            next_invoice: 1,
            next_expense: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Strategy shown by default when presenting suggestions.
    pub mode: DepositMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assumed_monthly_income: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub locale: String,
    pub timezone: String,
    pub currency: String,
    pub business: BusinessProfile,
    pub rates: RateSettings,
    pub invoice_numbering: NumberingCounters,
    pub forecast: ForecastSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            locale: "he-IL".into(),
            timezone: "Asia/Jerusalem".into(),
            currency: "ILS".into(),
            business: BusinessProfile::default(),
            rates: RateSettings::default(),
            invoice_numbering: NumberingCounters::default(),
            forecast: ForecastSettings::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
