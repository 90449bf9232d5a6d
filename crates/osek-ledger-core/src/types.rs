use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Number of calendar months in the tax year.
pub const MONTHS_IN_YEAR: u32 = 12;

/// [`MONTHS_IN_YEAR`] as a Decimal, for annualizing and de-annualizing.
pub const TWELVE: Decimal = dec!(12);

/// Largest amount a single ledger field may hold.
pub const MAX_AMOUNT: Money = dec!(1000000000000);

/// Deposit strategy used when spreading remaining headroom over the year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositMode {
    /// Even spread of the remaining room over the months left.
    #[default]
    Balanced,
    /// Entire remaining room in the next deposit.
    Aggressive,
    /// Half of the balanced figure.
    Conservative,
}

impl DepositMode {
    pub const ALL: [DepositMode; 3] = [
        DepositMode::Balanced,
        DepositMode::Aggressive,
        DepositMode::Conservative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DepositMode::Balanced => "balanced",
            DepositMode::Aggressive => "aggressive",
            DepositMode::Conservative => "conservative",
        }
    }
}

impl std::fmt::Display for DepositMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DepositMode {
    type Err = crate::LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balanced" => Ok(DepositMode::Balanced),
            "aggressive" => Ok(DepositMode::Aggressive),
            "conservative" => Ok(DepositMode::Conservative),
            other => Err(crate::LedgerError::InvalidInput {
                field: "mode".into(),
                reason: format!(
                    "Unknown deposit mode '{}', expected balanced, aggressive or conservative",
                    other
                ),
            }),
        }
    }
}

/// Divide, yielding zero when the denominator is not positive.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator > Decimal::ZERO {
        numerator / denominator
    } else {
        Decimal::ZERO
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_safe_div_zero_denominator() {
        assert_eq!(safe_div(dec!(100), dec!(0)), dec!(0));
        assert_eq!(safe_div(dec!(100), dec!(-4)), dec!(0));
        assert_eq!(safe_div(dec!(100), dec!(4)), dec!(25));
    }

    #[test]
    fn test_deposit_mode_parse() {
        assert_eq!("Aggressive".parse::<DepositMode>().unwrap(), DepositMode::Aggressive);
        assert_eq!(" balanced ".parse::<DepositMode>().unwrap(), DepositMode::Balanced);
        assert!("yolo".parse::<DepositMode>().is_err());
    }

    #[test]
    fn test_deposit_mode_serde_snake_case() {
        let json = serde_json::to_string(&DepositMode::Conservative).unwrap();
        assert_eq!(json, "\"conservative\"");
    }
}
