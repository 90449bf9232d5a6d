pub mod full;

#[cfg(feature = "projection")]
pub mod projection;
