use anyhow::Result;
use std::io::Write;
use tracing::info;

use super::ui::{StyleType, header_cell, new_spinner, new_styled_table, number_cell, style_text};
use crate::core::conversion::{format_number, normalize_code};
use crate::core::currency::{CurrencyTable, RateProvider};

/// Renders a rate table with one row per currency.
pub fn render_rate_table(table: &CurrencyTable) -> comfy_table::Table {
    let mut rendered = new_styled_table();
    rendered.set_header(vec![
        header_cell("Currency"),
        header_cell(&format!("Units per 1 {}", table.base())),
    ]);
    for (code, rate) in table.iter() {
        rendered.add_row(vec![
            comfy_table::Cell::new(code),
            number_cell(format_number(rate)),
        ]);
    }
    rendered
}

/// Fetches and prints the latest rates relative to `base`. A failed fetch is
/// reported on `output` and is not an error.
pub async fn display_rates<W: Write>(
    provider: &dyn RateProvider,
    base: &str,
    mut output: W,
) -> Result<()> {
    let base = normalize_code(base);
    let spinner = new_spinner(format!("Fetching exchange rates for {base}..."));
    let fetched = provider.latest_rates(&base).await;
    spinner.finish_and_clear();

    let table = match fetched {
        Ok(table) => table,
        Err(e) => {
            info!(error = %e, "Rate list unavailable");
            writeln!(output, "{e}")?;
            writeln!(
                output,
                "\n{}",
                style_text(
                    "Unable to retrieve the list of currencies. Exiting.",
                    StyleType::Error
                )
            )?;
            return Ok(());
        }
    };

    let title = format!("Exchange rates for {}", table.base());
    writeln!(output, "{}", style_text(&title, StyleType::Title))?;
    if let Some(as_of) = table.as_of() {
        writeln!(
            output,
            "{}",
            style_text(&format!("As of {}", as_of.format("%Y-%m-%d")), StyleType::Subtle)
        )?;
    }
    writeln!(output, "{}", render_rate_table(&table))?;
    Ok(())
}
