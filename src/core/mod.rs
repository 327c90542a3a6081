//! Core business logic abstractions

pub mod config;
pub mod conversion;
pub mod currency;
pub mod log;

// Re-export main types for cleaner imports
pub use conversion::{ConversionRequest, ConversionResult, InputError};
pub use currency::{CurrencyTable, FetchError, RateProvider};
