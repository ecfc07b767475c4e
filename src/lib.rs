//! Microgrid simulator with a tamper-evident record chain.

#[cfg(feature = "api")]
pub mod api;
/// Hash-linked ledger, digest function, and chain validation.
pub mod chain;
pub mod config;
pub mod io;
/// Solar, load, battery, and engine modules.
pub mod sim;
pub mod weather;
