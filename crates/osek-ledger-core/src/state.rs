use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::clock::{ClockSource, FixedClock};
use crate::error::LedgerError;
use crate::settings::Settings;
use crate::types::{Money, MAX_AMOUNT, MONTHS_IN_YEAR};
use crate::LedgerResult;

/// Earliest and latest years accepted by simulation control.
pub const MIN_SIMULATION_YEAR: i32 = 2020;
pub const MAX_SIMULATION_YEAR: i32 = 2030;

// ---------------------------------------------------------------------------
// Monthly ledger
// ---------------------------------------------------------------------------

/// Accumulated figures for one calendar month.
///
/// Every field only grows: updates add to the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyRecord {
    pub income: Money,
    pub expenses: Money,
    pub pension: Money,
    pub study: Money,
    pub ni_paid: Money,
    pub tax_paid: Money,
}

impl MonthlyRecord {
    pub fn get(&self, field: LedgerField) -> Money {
        match field {
            LedgerField::Income => self.income,
            LedgerField::Expenses => self.expenses,
            LedgerField::Pension => self.pension,
            LedgerField::Study => self.study,
            LedgerField::NiPaid => self.ni_paid,
            LedgerField::TaxPaid => self.tax_paid,
        }
    }

    fn slot(&mut self, field: LedgerField) -> &mut Money {
        match field {
            LedgerField::Income => &mut self.income,
            LedgerField::Expenses => &mut self.expenses,
            LedgerField::Pension => &mut self.pension,
            LedgerField::Study => &mut self.study,
            LedgerField::NiPaid => &mut self.ni_paid,
            LedgerField::TaxPaid => &mut self.tax_paid,
        }
    }

    /// Net income for the month (may be negative).
    pub fn net_income(&self) -> Money {
        self.income - self.expenses
    }
}

/// A field of [`MonthlyRecord`] that ledger updates may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerField {
    Income,
    Expenses,
    Pension,
    Study,
    NiPaid,
    TaxPaid,
}

impl LedgerField {
    pub const ALL: [LedgerField; 6] = [
        LedgerField::Income,
        LedgerField::Expenses,
        LedgerField::Pension,
        LedgerField::Study,
        LedgerField::NiPaid,
        LedgerField::TaxPaid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerField::Income => "income",
            LedgerField::Expenses => "expenses",
            LedgerField::Pension => "pension",
            LedgerField::Study => "study",
            LedgerField::NiPaid => "ni_paid",
            LedgerField::TaxPaid => "tax_paid",
        }
    }
}

impl FromStr for LedgerField {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(LedgerField::Income),
            "expenses" => Ok(LedgerField::Expenses),
            "pension" => Ok(LedgerField::Pension),
            "study" => Ok(LedgerField::Study),
            "ni_paid" => Ok(LedgerField::NiPaid),
            "tax_paid" => Ok(LedgerField::TaxPaid),
            other => Err(LedgerError::InvalidInput {
                field: other.to_string(),
                reason: "Unknown ledger field".into(),
            }),
        }
    }
}

/// A single amount to add to a ledger field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerUpdate {
    pub field: LedgerField,
    pub amount: Money,
}

/// Before/after view of one applied update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedUpdate {
    pub field: LedgerField,
    pub previous: Money,
    pub added: Money,
    pub current: Money,
}

/// Parse a user-supplied amount, tolerating currency symbols and thousands separators.
///
/// Magnitudes above [`MAX_AMOUNT`] are rejected.
pub fn parse_amount(raw: &str) -> LedgerResult<Money> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '₪' | '$' | ',') && !c.is_whitespace())
        .collect();
    let amount = Decimal::from_str(&cleaned).map_err(|_| LedgerError::InvalidInput {
        field: "amount".into(),
        reason: format!("'{}' is not a valid amount", raw),
    })?;
    if amount.abs() > MAX_AMOUNT {
        return Err(LedgerError::InvalidInput {
            field: "amount".into(),
            reason: format!("{} exceeds the maximum of {}", amount, MAX_AMOUNT),
        });
    }
    Ok(amount)
}

/// Parse `key=value` pairs such as `income=1000 expenses=200`.
pub fn parse_ledger_updates(text: &str) -> LedgerResult<Vec<LedgerUpdate>> {
    let mut updates = Vec::new();
    for token in text.split_whitespace() {
        let (key, value) = token.split_once('=').ok_or_else(|| LedgerError::InvalidInput {
            field: token.to_string(),
            reason: "Expected key=value".into(),
        })?;
        let field: LedgerField = key.parse()?;
        let amount = parse_amount(value)?;
        if amount < Decimal::ZERO {
            return Err(LedgerError::InvalidInput {
                field: field.as_str().into(),
                reason: format!("Amount cannot be negative, got {}", amount),
            });
        }
        updates.push(LedgerUpdate { field, amount });
    }
    if updates.is_empty() {
        return Err(LedgerError::InvalidInput {
            field: "updates".into(),
            reason: "No key=value pairs given, e.g. income=1000 expenses=200".into(),
        });
    }
    Ok(updates)
}

// ---------------------------------------------------------------------------
// Annual state document
// ---------------------------------------------------------------------------

/// Simulated "now", overriding the wall clock when both fields are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Simulation {
    pub current_month: Option<u32>,
    pub current_year: Option<i32>,
}

impl Simulation {
    pub fn is_active(&self) -> bool {
        self.current_month.is_some()
    }
}

/// Year-level figures entered directly rather than accumulated per month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordedTotals {
    /// Annual NI already paid, entered by hand. `None` = use monthly `ni_paid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ni_paid_manually: Option<Money>,
}

/// The whole bookkeeping document for one tax year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualState {
    pub year: i32,
    /// Bumped on every save; used for optimistic concurrency by stores.
    #[serde(default)]
    pub revision: u64,
    /// Keyed "1".."12".
    pub months: BTreeMap<String, MonthlyRecord>,
    #[serde(default)]
    pub totals: RecordedTotals,
    #[serde(default)]
    pub simulation: Simulation,
    #[serde(default)]
    pub settings: Settings,
}

impl AnnualState {
    pub fn new(year: i32) -> Self {
        let months = (1..=MONTHS_IN_YEAR)
            .map(|m| (m.to_string(), MonthlyRecord::default()))
            .collect();
        let mut settings = Settings::default();
        settings.invoice_numbering.year = year;
        AnnualState {
            year,
            revision: 0,
            months,
            totals: RecordedTotals::default(),
            simulation: Simulation::default(),
            settings,
        }
    }

    /// Fill in missing months and check amounts, simulation and settings; run once after loading.
    pub fn validate(&mut self) -> LedgerResult<()> {
        for key in self.months.keys() {
            let month: u32 = key.parse().map_err(|_| LedgerError::InvalidInput {
                field: "months".into(),
                reason: format!("Month key '{}' is not a number", key),
            })?;
            check_month(month)?;
        }
        for m in 1..=MONTHS_IN_YEAR {
            self.months.entry(m.to_string()).or_default();
        }
        for (key, record) in &self.months {
            for field in LedgerField::ALL {
                check_amount(&format!("months.{}.{}", key, field.as_str()), record.get(field))?;
            }
        }
        if let Some(amount) = self.totals.ni_paid_manually {
            check_amount("totals.ni_paid_manually", amount)?;
        }
        if let Some(month) = self.simulation.current_month {
            check_month(month)?;
        }
        if let Some(year) = self.simulation.current_year {
            check_simulation_year(year)?;
        }
        self.settings.rates.validate()
    }

    pub fn month(&self, month: u32) -> LedgerResult<&MonthlyRecord> {
        check_month(month)?;
        self.months
            .get(&month.to_string())
            .ok_or(LedgerError::InvalidMonth(month))
    }

    /// Records in calendar order, treating missing months as zero.
    pub fn records(&self) -> Vec<MonthlyRecord> {
        (1..=MONTHS_IN_YEAR)
            .map(|m| self.months.get(&m.to_string()).cloned().unwrap_or_default())
            .collect()
    }

    /// Add every update onto the month's record.
    pub fn apply_update(
        &mut self,
        month: u32,
        updates: &[LedgerUpdate],
    ) -> LedgerResult<Vec<AppliedUpdate>> {
        check_month(month)?;
        for u in updates {
            if u.amount < Decimal::ZERO {
                return Err(LedgerError::InvalidInput {
                    field: u.field.as_str().into(),
                    reason: format!("Amount cannot be negative, got {}", u.amount),
                });
            }
        }

        let record = self.months.entry(month.to_string()).or_default();
        let mut updated = record.clone();
        let mut applied = Vec::with_capacity(updates.len());
        for u in updates {
            let slot = updated.slot(u.field);
            let previous = *slot;
            let current = previous
                .checked_add(u.amount)
                .filter(|total| *total <= MAX_AMOUNT)
                .ok_or_else(|| LedgerError::InvalidInput {
                    field: u.field.as_str().into(),
                    reason: format!(
                        "Adding {} to {} exceeds the maximum of {}",
                        u.amount, previous, MAX_AMOUNT
                    ),
                })?;
            *slot = current;
            applied.push(AppliedUpdate {
                field: u.field,
                previous,
                added: u.amount,
                current,
            });
        }
        *record = updated;
        log::info!("Applied {} ledger update(s) to month {}", updates.len(), month);
        Ok(applied)
    }

    /// Record pension and/or study-fund deposits for the month.
    pub fn record_deposit(
        &mut self,
        month: u32,
        pension: Option<Money>,
        study: Option<Money>,
    ) -> LedgerResult<Vec<AppliedUpdate>> {
        let updates: Vec<LedgerUpdate> = [
            (LedgerField::Pension, pension),
            (LedgerField::Study, study),
        ]
        .into_iter()
        .filter_map(|(field, amount)| amount.map(|amount| LedgerUpdate { field, amount }))
        .collect();
        if updates.is_empty() {
            return Err(LedgerError::InvalidInput {
                field: "deposit".into(),
                reason: "Provide a pension and/or study amount".into(),
            });
        }
        self.apply_update(month, &updates)
    }

    pub fn set_ni_paid_manually(&mut self, amount: Money) -> LedgerResult<()> {
        check_amount("ni_paid_manually", amount)?;
        self.totals.ni_paid_manually = Some(amount);
        Ok(())
    }

    /// NI paid this year: the manual figure when set, else the monthly sum.
    pub fn ni_paid(&self) -> Money {
        match self.totals.ni_paid_manually {
            Some(amount) => amount,
            None => self.records().iter().map(|r| r.ni_paid).sum(),
        }
    }

    // -- Simulation ----------------------------------------------------------

    /// The simulated clock when active, otherwise `real`.
    pub fn clock<'a>(&self, real: &'a dyn ClockSource) -> Box<dyn ClockSource + 'a> {
        match self.simulation.current_month {
            Some(month) => Box::new(FixedClock::new(
                month,
                self.simulation
                    .current_year
                    .unwrap_or_else(|| real.current_year()),
            )),
            None => Box::new(real),
        }
    }

    pub fn set_simulation(&mut self, month: u32, year: i32) -> LedgerResult<FixedClock> {
        check_month(month)?;
        check_simulation_year(year)?;
        self.simulation.current_month = Some(month);
        self.simulation.current_year = Some(year);
        self.year = year;
        log::info!("Simulation set to {}/{}", month, year);
        Ok(FixedClock::new(month, year))
    }

    /// Move the simulation forward one month, starting from `real` when inactive.
    ///
    /// Fails without changing anything when the next month falls outside
    /// the simulation year range.
    pub fn advance_simulation(&mut self, real: &dyn ClockSource) -> LedgerResult<FixedClock> {
        let current = self.clock(real);
        let (mut month, mut year) = (current.current_month(), current.current_year());
        month += 1;
        if month > MONTHS_IN_YEAR {
            month = 1;
            year += 1;
        }
        check_simulation_year(year)?;
        self.simulation.current_month = Some(month);
        self.simulation.current_year = Some(year);
        self.year = year;
        log::info!("Simulation advanced to {}/{}", month, year);
        Ok(FixedClock::new(month, year))
    }

    pub fn clear_simulation(&mut self) -> LedgerResult<()> {
        if !self.simulation.is_active() {
            return Err(LedgerError::SimulationInactive);
        }
        self.simulation = Simulation::default();
        Ok(())
    }
}

fn check_month(month: u32) -> LedgerResult<()> {
    if !(1..=MONTHS_IN_YEAR).contains(&month) {
        return Err(LedgerError::InvalidMonth(month));
    }
    Ok(())
}

fn check_simulation_year(year: i32) -> LedgerResult<()> {
    if !(MIN_SIMULATION_YEAR..=MAX_SIMULATION_YEAR).contains(&year) {
        return Err(LedgerError::InvalidYear(year));
    }
    Ok(())
}

fn check_amount(field: &str, amount: Money) -> LedgerResult<()> {
    if amount < Decimal::ZERO || amount > MAX_AMOUNT {
        return Err(LedgerError::InvalidInput {
            field: field.into(),
            reason: format!("{} is outside 0..={}", amount, MAX_AMOUNT),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
