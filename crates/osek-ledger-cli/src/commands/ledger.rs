use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::fs;

use osek_ledger_core::state::{parse_ledger_updates, AnnualState};

use crate::commands::{parse_money, Context};

/// Arguments for adding amounts to a month
#[derive(Args)]
pub struct UpdateArgs {
    /// key=value pairs, e.g. income=1000 expenses=200 (fields: income, expenses,
    /// pension, study, ni_paid, tax_paid)
    #[arg(required = true)]
    pub pairs: Vec<String>,

    /// Month to update (1-12); defaults to the current month
    #[arg(long)]
    pub month: Option<u32>,
}

pub fn run_update(ctx: &Context, args: UpdateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut state = ctx.load()?;
    let month = args.month.unwrap_or_else(|| ctx.now(&state).0);
    let updates = parse_ledger_updates(&args.pairs.join(" "))?;

    let applied = state.apply_update(month, &updates)?;
    ctx.store.save(&mut state)?;

    Ok(json!({
        "year": state.year,
        "month": month,
        "applied": applied,
        "revision": state.revision,
    }))
}

/// Arguments for recording pension / study-fund deposits
#[derive(Args)]
pub struct DepositArgs {
    /// Pension deposit amount
    #[arg(long, value_parser = parse_money)]
    pub pension: Option<Decimal>,

    /// Study-fund deposit amount
    #[arg(long, value_parser = parse_money)]
    pub study: Option<Decimal>,

    /// Month of the deposit (1-12); defaults to the current month
    #[arg(long)]
    pub month: Option<u32>,
}

pub fn run_deposit(ctx: &Context, args: DepositArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut state = ctx.load()?;
    let month = args.month.unwrap_or_else(|| ctx.now(&state).0);

    let applied = state.record_deposit(month, args.pension, args.study)?;
    ctx.store.save(&mut state)?;

    Ok(json!({
        "year": state.year,
        "month": month,
        "applied": applied,
        "revision": state.revision,
    }))
}

/// Arguments for recording the national insurance already paid this year
#[derive(Args)]
pub struct SetNiArgs {
    /// Annual amount paid so far
    #[arg(value_parser = parse_money)]
    pub amount: Decimal,
}

pub fn run_set_ni(ctx: &Context, args: SetNiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut state = ctx.load()?;
    let previous = state.totals.ni_paid_manually;
    state.set_ni_paid_manually(args.amount)?;
    ctx.store.save(&mut state)?;

    Ok(json!({
        "previous": previous,
        "ni_paid_manually": args.amount,
        "revision": state.revision,
    }))
}

/// Arguments for creating a fresh ledger
#[derive(Args)]
pub struct InitArgs {
    /// Tax year; defaults to the current year
    #[arg(long)]
    pub year: Option<i32>,

    /// Overwrite an existing state file
    #[arg(long)]
    pub force: bool,
}

pub fn run_init(ctx: &Context, args: InitArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let path = ctx.store.path();
    if ctx.store.exists() {
        if !args.force {
            return Err(format!(
                "State file '{}' already exists (use --force to overwrite)",
                path.display()
            )
            .into());
        }
        fs::remove_file(path)
            .map_err(|e| format!("Failed to remove '{}': {}", path.display(), e))?;
    }

    let year = args.year.unwrap_or_else(|| ctx.clock.current_year());
    let mut state = AnnualState::new(year);
    ctx.store.save(&mut state)?;

    Ok(json!({
        "path": path.display().to_string(),
        "year": state.year,
        "revision": state.revision,
    }))
}
