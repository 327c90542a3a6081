use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::core::currency::{CurrencyTable, FetchError, RateProvider};

/// Rate provider backed by the exchangerate-api.com `latest/{base}` endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("xurrency/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: Option<String>,
    date: Option<String>,
    rates: Option<BTreeMap<String, f64>>,
}

fn parse_date(date: Option<&str>) -> Option<NaiveDate> {
    let date = date?;
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!(date, error = %e, "Ignoring unparseable rate date");
            None
        }
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(name = "LatestRatesFetch", skip(self), fields(base = %base))]
    async fn latest_rates(&self, base: &str) -> Result<CurrencyTable, FetchError> {
        let url = format!("{}/latest/{}", self.base_url, base);
        debug!("Requesting latest rates from {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, "Rate request failed");
            FetchError::Transport(e.to_string())
        })?;

        debug!(status = %response.status(), "Received rate response");

        let response = response.error_for_status().map_err(|e| {
            warn!(error = %e, "Rate request returned an error status");
            FetchError::Transport(e.to_string())
        })?;

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let data: LatestRatesResponse = serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, response = %text, "Failed to parse rate response");
            FetchError::Malformed(format!("Failed to parse JSON response for {base}: {e}"))
        })?;

        let rates = data.rates.ok_or_else(|| {
            warn!(response = %text, "Rate response has no rates");
            FetchError::Malformed(format!("No rates found in response for {base}"))
        })?;

        let table_base = data.base.as_deref().unwrap_or(base);
        let table = CurrencyTable::new(table_base, rates).with_date(parse_date(data.date.as_deref()));
        if table.is_empty() {
            warn!(response = %text, "Rate response has an empty rate map");
            return Err(FetchError::Malformed(format!(
                "Empty rates in response for {base}"
            )));
        }
        debug!(currencies = table.len(), as_of = ?table.as_of(), "Parsed rate table");
        Ok(table)
    }
}
