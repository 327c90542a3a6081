//! Conversion request validation and result formatting

use crate::core::currency::CurrencyTable;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("Invalid input. Please enter a numeric value.")]
    NotNumeric(String),
    #[error("Invalid amount. Please enter a non-negative value.")]
    OutOfRange(f64),
    #[error("Invalid currency code. Please enter a valid currency code.")]
    UnknownCurrency(String),
}

/// Normalises a currency code as typed by the user.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Parses a user supplied amount. Only finite, non-negative values are accepted.
pub fn parse_amount(raw: &str) -> Result<f64, InputError> {
    let trimmed = raw.trim();
    let amount: f64 = trimmed
        .parse()
        .map_err(|_| InputError::NotNumeric(trimmed.to_string()))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(InputError::OutOfRange(amount));
    }
    Ok(amount)
}

/// Formats a number in its shortest round-trip form. Plain values keep a
/// fractional part (`9.0`); very small or large values use an exponent with a
/// sign and at least two digits (`3.93e-05`, `1e+16`).
pub fn format_number(value: f64) -> String {
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub base: String,
    pub target: String,
    pub amount: f64,
}

impl ConversionRequest {
    /// Builds a request from raw answers, checking the amount first and then
    /// that both codes are present in `table`.
    pub fn validate(
        base: &str,
        target: &str,
        amount: &str,
        table: &CurrencyTable,
    ) -> Result<Self, InputError> {
        let amount = parse_amount(amount)?;
        let base = normalize_code(base);
        let target = normalize_code(target);

        for code in [&base, &target] {
            if !table.contains(code) {
                return Err(InputError::UnknownCurrency(code.clone()));
            }
        }

        Ok(ConversionRequest {
            base,
            target,
            amount,
        })
    }

    pub fn apply(&self, rate: f64) -> ConversionResult {
        ConversionResult {
            amount: self.amount,
            base: self.base.clone(),
            target: self.target.clone(),
            rate,
            converted: self.amount * rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub amount: f64,
    pub base: String,
    pub target: String,
    pub rate: f64,
    pub converted: f64,
}

impl Display for ConversionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} is equivalent to {} {} at an exchange rate of {}",
            format_number(self.amount),
            self.base,
            format_number(self.converted),
            self.target,
            format_number(self.rate)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn table() -> CurrencyTable {
        CurrencyTable::new(
            "USD",
            BTreeMap::from([("USD".to_string(), 1.0), ("EUR".to_string(), 0.9)]),
        )
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("10"), Ok(10.0));
        assert_eq!(parse_amount("  2.5\n"), Ok(2.5));
        assert_eq!(parse_amount("1e3"), Ok(1000.0));
        assert_eq!(parse_amount("0"), Ok(0.0));
        assert_eq!(
            parse_amount("abc"),
            Err(InputError::NotNumeric("abc".to_string()))
        );
        assert!(matches!(parse_amount(""), Err(InputError::NotNumeric(_))));
        assert_eq!(parse_amount("-5"), Err(InputError::OutOfRange(-5.0)));
        assert!(matches!(parse_amount("inf"), Err(InputError::OutOfRange(_))));
        assert!(matches!(parse_amount("NaN"), Err(InputError::OutOfRange(_))));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10.0");
        assert_eq!(format_number(9.0), "9.0");
        assert_eq!(format_number(0.9), "0.9");
        assert_eq!(format_number(83.2145), "83.2145");
        assert_eq!(format_number(0.0001), "0.0001");
        assert_eq!(format_number(3.93e-5), "3.93e-05");
        assert_eq!(format_number(1e16), "1e+16");
        assert_eq!(format_number(2.5e16), "2.5e+16");
        assert_eq!(format_number(1.5e-120), "1.5e-120");
        assert_eq!(format_number(1e15), "1000000000000000.0");
    }

    #[test]
    fn test_validate_normalises_codes() {
        let request = ConversionRequest::validate(" usd", "eur ", "10", &table()).unwrap();
        assert_eq!(request.base, "USD");
        assert_eq!(request.target, "EUR");
        assert_eq!(request.amount, 10.0);
    }

    #[test]
    fn test_validate_checks_amount_before_codes() {
        let err = ConversionRequest::validate("ZZZ", "EUR", "abc", &table()).unwrap_err();
        assert!(matches!(err, InputError::NotNumeric(_)));
    }

    #[test]
    fn test_validate_rejects_unknown_codes() {
        let err = ConversionRequest::validate("USD", "ZZZ", "10", &table()).unwrap_err();
        assert_eq!(err, InputError::UnknownCurrency("ZZZ".to_string()));
        let err = ConversionRequest::validate("XXX", "EUR", "10", &table()).unwrap_err();
        assert_eq!(err, InputError::UnknownCurrency("XXX".to_string()));
    }

    #[test]
    fn test_apply_multiplies_exactly() {
        let request = ConversionRequest::validate("USD", "EUR", "12.34", &table()).unwrap();
        let result = request.apply(0.917);
        assert_eq!(result.converted, 12.34 * 0.917);
        assert_eq!(result.rate, 0.917);
    }

    #[test]
    fn test_summary_line_with_tiny_rate() {
        let table = CurrencyTable::new(
            "VND",
            BTreeMap::from([("VND".to_string(), 1.0), ("USD".to_string(), 3.93e-5)]),
        );
        let request = ConversionRequest::validate("VND", "USD", "100000", &table).unwrap();
        let line = request.apply(3.93e-5).to_string();
        assert!(line.starts_with("100000.0 VND is equivalent to "));
        assert!(line.ends_with(" USD at an exchange rate of 3.93e-05"));
    }

    #[test]
    fn test_summary_line() {
        let request = ConversionRequest::validate("USD", "EUR", "10", &table()).unwrap();
        assert_eq!(
            request.apply(0.9).to_string(),
            "10.0 USD is equivalent to 9.0 EUR at an exchange rate of 0.9"
        );
    }
}
