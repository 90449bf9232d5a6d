pub mod clock;
pub mod error;
pub mod settings;
pub mod state;
pub mod types;

#[cfg(feature = "tax")]
pub mod tax;

#[cfg(feature = "deposits")]
pub mod deposits;

#[cfg(feature = "analysis")]
pub mod analysis;

pub use error::LedgerError;
pub use types::*;

/// Standard result type for all ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
