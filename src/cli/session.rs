//! Interactive conversion session: fetch the currency list, ask for the pair
//! and amount, fetch the pair's rate and print the converted amount.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use thiserror::Error;
use tracing::{debug, info};

use super::ui::{StyleType, new_spinner, style_text};
use crate::core::conversion::{ConversionRequest, ConversionResult, InputError, format_number};
use crate::core::currency::{CurrencyTable, FetchError, RateProvider};

/// Every way a session can end without a conversion.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unable to retrieve the list of currencies. Exiting.")]
    ListUnavailable { reason: FetchError },
    #[error(transparent)]
    InvalidInput(#[from] InputError),
    #[error("Unable to retrieve exchange rate for {base} to {target}.")]
    RateUnavailable {
        base: String,
        target: String,
        reason: Option<FetchError>,
    },
    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Answers supplied up front, e.g. from command line flags. A supplied answer
/// skips its prompt.
#[derive(Debug, Clone, Default)]
pub struct PresetAnswers {
    pub base: Option<String>,
    pub target: Option<String>,
    pub amount: Option<String>,
}

pub struct ConversionSession<'a, R, W> {
    provider: &'a dyn RateProvider,
    reference_currency: &'a str,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> ConversionSession<'a, R, W> {
    pub fn new(
        provider: &'a dyn RateProvider,
        reference_currency: &'a str,
        input: R,
        output: W,
    ) -> Self {
        ConversionSession {
            provider,
            reference_currency,
            input,
            output,
        }
    }

    /// Runs the session once. Session failures are reported on the output and
    /// yield `Ok(None)`; only console I/O failures are returned as errors.
    pub async fn run(&mut self, preset: &PresetAnswers) -> Result<Option<ConversionResult>> {
        self.print_welcome().context("Failed to write to console")?;

        match self.convert(preset).await {
            Ok(result) => {
                self.print_summary(&result)
                    .context("Failed to write to console")?;
                Ok(Some(result))
            }
            Err(SessionError::Io(e)) => Err(e).context("Console I/O failed"),
            Err(e) => {
                info!(error = %e, "Session ended without a conversion");
                self.report(&e).context("Failed to write to console")?;
                Ok(None)
            }
        }
    }

    async fn convert(&mut self, preset: &PresetAnswers) -> Result<ConversionResult, SessionError> {
        let table = self
            .fetch(self.reference_currency)
            .await
            .map_err(|reason| SessionError::ListUnavailable { reason })?;
        debug!(currencies = table.len(), "Currency list fetched");

        self.display_currency_list(&table)?;

        let base = self.ask(preset.base.as_deref(), "Enter the code of the base currency: ")?;
        let target = self.ask(
            preset.target.as_deref(),
            "Enter the code of the target currency: ",
        )?;
        let amount = self.ask(preset.amount.as_deref(), "Enter the amount: ")?;

        let request = ConversionRequest::validate(&base, &target, &amount, &table)?;
        debug!(?request, "Input validated");

        let rates = self.fetch(&request.base).await.map_err(|reason| {
            SessionError::RateUnavailable {
                base: request.base.clone(),
                target: request.target.clone(),
                reason: Some(reason),
            }
        })?;

        let rate = rates
            .rate(&request.target)
            .ok_or_else(|| SessionError::RateUnavailable {
                base: request.base.clone(),
                target: request.target.clone(),
                reason: None,
            })?;
        debug!(rate, "Rate fetched");

        Ok(request.apply(rate))
    }

    async fn fetch(&self, base: &str) -> Result<CurrencyTable, FetchError> {
        let spinner = new_spinner(format!("Fetching exchange rates for {base}..."));
        let result = self.provider.latest_rates(base).await;
        spinner.finish_and_clear();
        result
    }

    fn ask(&mut self, preset: Option<&str>, prompt: &str) -> Result<String, SessionError> {
        if let Some(answer) = preset {
            debug!(prompt, answer, "Using preset answer");
            return Ok(answer.to_string());
        }

        write!(self.output, "\n{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!(prompt, "End of input");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn print_welcome(&mut self) -> std::io::Result<()> {
        writeln!(
            self.output,
            "{}\n",
            style_text("Welcome to the Currency Converter App!", StyleType::Title)
        )?;
        writeln!(
            self.output,
            "This app allows you to convert an amount from one currency to another.\n"
        )
    }

    fn display_currency_list(&mut self, table: &CurrencyTable) -> std::io::Result<()> {
        writeln!(self.output, "Available currencies:")?;
        for (code, rate) in table.iter() {
            writeln!(self.output, "{code}: {}", format_number(rate))?;
        }
        Ok(())
    }

    fn print_summary(&mut self, result: &ConversionResult) -> std::io::Result<()> {
        writeln!(
            self.output,
            "\n{}",
            style_text("Conversion Summary:", StyleType::Title)
        )?;
        writeln!(self.output, "\n{result}\n")
    }

    fn report(&mut self, error: &SessionError) -> std::io::Result<()> {
        match error {
            SessionError::ListUnavailable { reason } => {
                writeln!(self.output, "{reason}")?;
                writeln!(self.output, "\n{}", style_text(&error.to_string(), StyleType::Error))
            }
            SessionError::InvalidInput(_) => {
                writeln!(self.output, "\n{}", style_text(&error.to_string(), StyleType::Error))
            }
            SessionError::RateUnavailable { reason, .. } => {
                if let Some(reason) = reason {
                    writeln!(self.output, "{reason}")?;
                }
                writeln!(self.output, "{}", style_text(&error.to_string(), StyleType::Error))
            }
            SessionError::Io(_) => Ok(()),
        }
    }
}
