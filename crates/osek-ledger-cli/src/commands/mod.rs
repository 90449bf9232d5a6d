pub mod analysis;
pub mod ledger;
pub mod settings;
pub mod simulation;
pub mod tax;

use rust_decimal::Decimal;

use osek_ledger_core::clock::ClockSource;
use osek_ledger_core::state::{parse_amount, AnnualState};

use crate::store::StateStore;

/// What every command handler needs: where the ledger lives and what time it is.
pub struct Context {
    pub store: StateStore,
    pub clock: Box<dyn ClockSource>,
}

impl Context {
    pub fn new(store: StateStore, clock: Box<dyn ClockSource>) -> Self {
        Context { store, clock }
    }

    pub fn load(&self) -> Result<AnnualState, Box<dyn std::error::Error>> {
        self.store.load_or_default(self.clock.current_year())
    }

    /// Current month and year, honouring an active simulation.
    pub fn now(&self, state: &AnnualState) -> (u32, i32) {
        let clock = state.clock(self.clock.as_ref());
        (clock.current_month(), clock.current_year())
    }
}

/// clap value parser for amounts such as `₪1,200` or `350.5`.
pub fn parse_money(raw: &str) -> Result<Decimal, String> {
    parse_amount(raw).map_err(|e| e.to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use osek_ledger_core::clock::FixedClock;
    use tempfile::TempDir;

    /// A context over a fresh temp directory, pinned to `month`/`year`.
    pub fn context(month: u32, year: i32) -> (TempDir, Context) {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        let ctx = Context::new(store, Box::new(FixedClock::new(month, year)));
        (dir, ctx)
    }
}
