use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::time::Instant;

use osek_ledger_core::tax::income_tax::calculate_income_tax;
use osek_ledger_core::tax::national_insurance::calculate_national_insurance;
use osek_ledger_core::with_metadata;

use crate::commands::{parse_money, Context};

/// Arguments for a standalone income-tax calculation
#[derive(Args)]
pub struct IncomeTaxArgs {
    /// Annual taxable income
    #[arg(long, value_parser = parse_money, allow_hyphen_values = true)]
    pub income: Decimal,
}

pub fn run_income_tax(
    ctx: &Context,
    args: IncomeTaxArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let state = ctx.load()?;
    let settings = &state.settings.rates.tax;

    let result = calculate_income_tax(args.income, settings);
    let mut warnings = Vec::new();
    if args.income < Decimal::ZERO {
        warnings.push(format!("Income {} is negative; no tax is due", args.income));
    }

    let output = with_metadata(
        "Progressive income tax with surtax, less credit points",
        &json!({
            "annual_income": args.income.to_string(),
            "surtax_threshold": settings.surtax_threshold.to_string(),
            "credit_points": settings.credit_points.to_string(),
            "credit_point_value": settings.credit_point_value.to_string(),
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

/// Arguments for a standalone national insurance calculation
#[derive(Args)]
pub struct NationalInsuranceArgs {
    /// Monthly income
    #[arg(long, value_parser = parse_money, allow_hyphen_values = true)]
    pub income: Decimal,
}

pub fn run_national_insurance(
    ctx: &Context,
    args: NationalInsuranceArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let state = ctx.load()?;
    let settings = &state.settings.rates.ni;

    let result = calculate_national_insurance(args.income, settings);
    let mut warnings = Vec::new();
    if args.income > settings.monthly_thresholds.high {
        warnings.push(format!(
            "Income above the {} monthly ceiling carries no further contribution",
            settings.monthly_thresholds.high
        ));
    }

    let output = with_metadata(
        "Two-band self-employed national insurance and health tax on monthly income",
        &json!({
            "monthly_income": args.income.to_string(),
            "low_threshold": settings.monthly_thresholds.low.to_string(),
            "high_threshold": settings.monthly_thresholds.high.to_string(),
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn dec_of(value: &Value) -> Decimal {
        Decimal::from_str(value.as_str().unwrap()).unwrap()
    }

    #[test]
    fn test_income_tax_envelope() {
        let (_dir, ctx) = context(1, 2025);
        let out = run_income_tax(&ctx, IncomeTaxArgs { income: dec!(120000) }).unwrap();
        assert_eq!(dec_of(&out["result"]["net_tax"]), dec!(7135.2));
        assert_eq!(out["warnings"], json!([]));
    }

    #[test]
    fn test_negative_income_warns() {
        let (_dir, ctx) = context(1, 2025);
        let out = run_income_tax(&ctx, IncomeTaxArgs { income: dec!(-500) }).unwrap();
        assert_eq!(dec_of(&out["result"]["net_tax"]), dec!(0));
        assert_eq!(out["warnings"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_national_insurance_above_ceiling() {
        let (_dir, ctx) = context(1, 2025);
        let args = NationalInsuranceArgs {
            income: dec!(60000),
        };
        let out = run_national_insurance(&ctx, args).unwrap();
        assert_eq!(out["warnings"].as_array().unwrap().len(), 1);

        let capped = calculate_national_insurance(dec!(50695), &Default::default());
        assert_eq!(dec_of(&out["result"]["total_amount"]), capped.total_amount);
    }
}
