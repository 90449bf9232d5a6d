use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::deposits::caps::ContributionCaps;
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionDeductibility {
    pub total: Money,
    pub deductible: Money,
    pub non_deductible: Money,
}

/// Study-fund deposits split into three bands: deductible, tax-free but not
/// deductible (up to the absolute cap), and fully taxable beyond both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyFundDeductibility {
    pub total: Money,
    pub deductible: Money,
    pub non_deductible_tax_free: Money,
    pub taxable: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductibleAnalysis {
    pub pension: PensionDeductibility,
    pub study: StudyFundDeductibility,
}

pub fn calculate_deductible_analysis(
    pension_total: Money,
    study_total: Money,
    caps: &ContributionCaps,
) -> DeductibleAnalysis {
    let pension = PensionDeductibility {
        total: pension_total,
        deductible: pension_total.min(caps.pension_cap),
        non_deductible: (pension_total - caps.pension_cap).max(Decimal::ZERO),
    };

    let deductible = study_total.min(caps.study_deductible_cap);
    let above_deductible = (study_total - caps.study_deductible_cap).max(Decimal::ZERO);
    let max_tax_free_allowed =
        (caps.study_total_cap - caps.study_deductible_cap).max(Decimal::ZERO);
    let non_deductible_tax_free = above_deductible.min(max_tax_free_allowed);
    let study = StudyFundDeductibility {
        total: study_total,
        deductible,
        non_deductible_tax_free,
        taxable: (above_deductible - non_deductible_tax_free).max(Decimal::ZERO),
    };

    DeductibleAnalysis { pension, study }
}
