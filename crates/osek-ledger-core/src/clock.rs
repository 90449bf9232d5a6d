use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

/// Source of "what month is it" for every component that needs it.
///
/// Calculators never read wall-clock time themselves; callers resolve a
/// clock (real or simulated) and pass plain month/year integers down.
pub trait ClockSource {
    /// Calendar month, 1..=12.
    fn current_month(&self) -> u32;
    fn current_year(&self) -> i32;
}

/// Wall-clock time in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealClock;

impl ClockSource for RealClock {
    fn current_month(&self) -> u32 {
        Local::now().month()
    }

    fn current_year(&self) -> i32 {
        Local::now().year()
    }
}

/// A pinned month and year, used for simulation and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedClock {
    pub month: u32,
    pub year: i32,
}

impl FixedClock {
    pub fn new(month: u32, year: i32) -> Self {
        FixedClock { month, year }
    }
}

impl ClockSource for FixedClock {
    fn current_month(&self) -> u32 {
        self.month
    }

    fn current_year(&self) -> i32 {
        self.year
    }
}

impl<C: ClockSource + ?Sized> ClockSource for &C {
    fn current_month(&self) -> u32 {
        (**self).current_month()
    }

    fn current_year(&self) -> i32 {
        (**self).current_year()
    }
}
