use clap::Args;
use serde_json::{json, Value};

use osek_ledger_core::analysis::full::{analyze, run_full_analysis};
use osek_ledger_core::analysis::projection::{december_top_up, project_month, project_year_end};
use osek_ledger_core::DepositMode;

use crate::commands::Context;

pub fn run_analyze(ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let state = ctx.load()?;
    let output = analyze(&state, ctx.clock.as_ref());
    Ok(serde_json::to_value(output)?)
}

/// Arguments for the next-month deposit recommendation
#[derive(Args)]
pub struct RecommendArgs {
    /// Strategy: balanced, aggressive or conservative (defaults to the configured mode)
    #[arg(long)]
    pub mode: Option<DepositMode>,
}

pub fn run_recommend(
    ctx: &Context,
    args: RecommendArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let state = ctx.load()?;
    let (month, _) = ctx.now(&state);
    let mode = args.mode.unwrap_or(state.settings.forecast.mode);

    let analysis = run_full_analysis(&state, month);
    let suggestion = analysis.suggestions.for_mode(mode);

    Ok(json!({
        "mode": mode.as_str(),
        "current_month": month,
        "months_left": analysis.totals.months_left,
        "pension": suggestion.pension,
        "study_deductible": suggestion.study_deductible,
        "study_total": suggestion.study_total,
        "total": suggestion.total(),
        "remaining": analysis.remaining,
    }))
}

/// Arguments for the single-month tax estimate
#[derive(Args)]
pub struct MonthlyArgs {
    /// Month to estimate (1-12); defaults to the current month
    #[arg(long)]
    pub month: Option<u32>,
}

pub fn run_monthly(ctx: &Context, args: MonthlyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let state = ctx.load()?;
    let (current, year) = ctx.now(&state);
    let projection = project_month(&state, args.month.unwrap_or(current), year)?;
    Ok(serde_json::to_value(projection)?)
}

pub fn run_projection(ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let state = ctx.load()?;
    let (month, _) = ctx.now(&state);
    Ok(serde_json::to_value(project_year_end(&state, month))?)
}

pub fn run_optimizer(ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let state = ctx.load()?;
    let (month, _) = ctx.now(&state);
    Ok(serde_json::to_value(december_top_up(&state, month))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use osek_ledger_core::state::parse_ledger_updates;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn dec_at(value: &Value, key: &str) -> Decimal {
        Decimal::from_str(value[key].as_str().unwrap()).unwrap()
    }

    fn seed(ctx: &Context, month: u32, text: &str) {
        let mut state = ctx.load().unwrap();
        state
            .apply_update(month, &parse_ledger_updates(text).unwrap())
            .unwrap();
        ctx.store.save(&mut state).unwrap();
    }

    #[test]
    fn test_analyze_envelope() {
        let (_dir, ctx) = context(6, 2025);
        seed(&ctx, 1, "income=60000");
        let out = run_analyze(&ctx).unwrap();
        assert_eq!(out["assumptions"]["current_month"], json!(6));
        assert_eq!(out["result"]["totals"]["months_left"], json!(7));
        assert!(out["metadata"]["version"].is_string());
    }

    #[test]
    fn test_recommend_defaults_to_configured_mode() {
        let (_dir, ctx) = context(11, 2025);
        seed(&ctx, 1, "income=120000");

        let out = run_recommend(&ctx, RecommendArgs { mode: None }).unwrap();
        assert_eq!(out["mode"], json!("balanced"));
        assert_eq!(out["months_left"], json!(2));
        assert_eq!(dec_at(&out, "pension"), dec!(9900));

        let aggressive = RecommendArgs {
            mode: Some(DepositMode::Aggressive),
        };
        let out = run_recommend(&ctx, aggressive).unwrap();
        assert_eq!(dec_at(&out, "pension"), dec!(19800));
    }

    #[test]
    fn test_monthly_uses_given_month() {
        let (_dir, ctx) = context(4, 2025);
        seed(&ctx, 2, "income=10000");
        let out = run_monthly(&ctx, MonthlyArgs { month: Some(2) }).unwrap();
        assert_eq!(out["month"], json!(2));
        assert_eq!(dec_at(&out, "annualized_taxable_income"), dec!(120000));

        assert!(run_monthly(&ctx, MonthlyArgs { month: Some(13) }).is_err());
    }

    #[test]
    fn test_optimizer_outside_december() {
        let (_dir, ctx) = context(7, 2025);
        let out = run_optimizer(&ctx).unwrap();
        assert_eq!(out["status"], json!("unavailable"));
        assert_eq!(out["current_month"], json!(7));
    }

    #[test]
    fn test_projection_reads_store() {
        let (_dir, ctx) = context(3, 2025);
        seed(&ctx, 1, "income=9000");
        let out = run_projection(&ctx).unwrap();
        assert_eq!(dec_at(&out, "average_monthly_income"), dec!(3000));
        assert_eq!(out["months_left"], json!(10));
    }
}
