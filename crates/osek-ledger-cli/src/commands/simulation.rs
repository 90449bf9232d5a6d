use clap::Args;
use serde_json::{json, Value};

use osek_ledger_core::state::AnnualState;

use crate::commands::Context;

/// Arguments for pinning the ledger to a simulated month
#[derive(Args)]
pub struct SetMonthArgs {
    /// Month (1-12), or "off" to return to the real clock
    pub month: String,

    /// Year (2020-2030); defaults to the ledger year
    pub year: Option<i32>,
}

pub fn run_set_month(
    ctx: &Context,
    args: SetMonthArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut state = ctx.load()?;

    if args.month.eq_ignore_ascii_case("off") {
        state.clear_simulation()?;
        ctx.store.save(&mut state)?;
        return Ok(describe(ctx, &state));
    }

    let month: u32 = args
        .month
        .parse()
        .map_err(|_| format!("'{}' is not a month; use 1-12 or off", args.month))?;
    let year = args.year.unwrap_or(state.year);
    state.set_simulation(month, year)?;
    ctx.store.save(&mut state)?;
    Ok(describe(ctx, &state))
}

pub fn run_next_month(ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let mut state = ctx.load()?;
    state.advance_simulation(ctx.clock.as_ref())?;
    ctx.store.save(&mut state)?;
    Ok(describe(ctx, &state))
}

fn describe(ctx: &Context, state: &AnnualState) -> Value {
    let (month, year) = ctx.now(state);
    json!({
        "simulated": state.simulation.is_active(),
        "current_month": month,
        "current_year": year,
        "ledger_year": state.year,
        "revision": state.revision,
    })
}
