//! Currency table and exchange rate abstractions

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

/// Exchange rates of every known currency relative to a single base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyTable {
    base: String,
    rates: BTreeMap<String, f64>,
    as_of: Option<NaiveDate>,
}

impl CurrencyTable {
    pub fn new(base: &str, rates: BTreeMap<String, f64>) -> Self {
        CurrencyTable {
            base: base.to_uppercase(),
            rates,
            as_of: None,
        }
    }

    pub fn with_date(mut self, as_of: Option<NaiveDate>) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn as_of(&self) -> Option<NaiveDate> {
        self.as_of
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    /// Rate such that 1 unit of the base equals `rate` units of `code`.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Iterates codes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Why a rate provider could not produce a table.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    /// Connection failure, timeout or non-2xx status.
    #[error("Error during HTTP request: {0}")]
    Transport(String),
    /// The response did not carry a rate mapping.
    #[error("Unexpected response format. Unable to retrieve exchange rates.")]
    Malformed(String),
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the latest rates of all currencies relative to `base`.
    async fn latest_rates(&self, base: &str) -> Result<CurrencyTable, FetchError>;
}
