use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::state::MonthlyRecord;
use crate::types::{Money, MONTHS_IN_YEAR};

/// Year-to-date sums over the monthly ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YtdTotals {
    pub income_ytd: Money,
    pub expenses_ytd: Money,
    pub pension_total: Money,
    pub study_total: Money,
    pub ni_paid_total: Money,
    pub tax_paid_total: Money,
    pub net_income_ytd: Money,
    /// Months from the current one to December inclusive. Not clamped:
    /// zero or negative when `current_month > 12`.
    pub months_left: i32,
}

/// Sum every supplied month, regardless of `current_month`.
///
/// Future months that already hold data (e.g. while simulating) are
/// included; `current_month` only drives `months_left`. Sums saturate
/// instead of overflowing.
pub fn calculate_ytd_totals(months: &[MonthlyRecord], current_month: u32) -> YtdTotals {
    let mut income_ytd = Decimal::ZERO;
    let mut expenses_ytd = Decimal::ZERO;
    let mut pension_total = Decimal::ZERO;
    let mut study_total = Decimal::ZERO;
    let mut ni_paid_total = Decimal::ZERO;
    let mut tax_paid_total = Decimal::ZERO;

    for m in months {
        income_ytd = income_ytd.saturating_add(m.income);
        expenses_ytd = expenses_ytd.saturating_add(m.expenses);
        pension_total = pension_total.saturating_add(m.pension);
        study_total = study_total.saturating_add(m.study);
        ni_paid_total = ni_paid_total.saturating_add(m.ni_paid);
        tax_paid_total = tax_paid_total.saturating_add(m.tax_paid);
    }

    YtdTotals {
        income_ytd,
        expenses_ytd,
        pension_total,
        study_total,
        ni_paid_total,
        tax_paid_total,
        net_income_ytd: income_ytd.saturating_sub(expenses_ytd),
        months_left: months_left(current_month),
    }
}

/// `12 - current_month + 1`, inclusive of the current month.
pub fn months_left(current_month: u32) -> i32 {
    let current = i32::try_from(current_month).unwrap_or(i32::MAX);
    (MONTHS_IN_YEAR as i32 + 1).saturating_sub(current)
}
