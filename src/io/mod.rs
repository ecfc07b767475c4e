//! File output for chain data.

pub mod export;
