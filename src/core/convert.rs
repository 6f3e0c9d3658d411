//! Amount parsing and conversion

use crate::core::currency::CurrencyCode;
use crate::core::rates::RateTable;

/// Parses user-entered amount text. Empty, negative and non-finite input is
/// rejected.
pub fn parse_amount(text: &str) -> Option<f64> {
    let amount: f64 = text.trim().parse().ok()?;
    if amount.is_finite() && amount >= 0.0 {
        Some(amount)
    } else {
        None
    }
}

/// Converts `amount` of the table's base currency into `target`.
///
/// Returns `None` when the table has no factor for `target`.
pub fn convert(amount: f64, target: &str, table: &RateTable) -> Option<f64> {
    table.rate(target).map(|rate| amount * rate)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    Converted {
        amount: f64,
        base: CurrencyCode,
        target: CurrencyCode,
        rate: f64,
        value: f64,
    },
    InvalidAmount,
    /// The current rate table has no factor for the target.
    RateUnavailable {
        base: CurrencyCode,
        target: CurrencyCode,
    },
    /// No rate table is loaded, either still loading or failed.
    Unavailable,
}

impl Conversion {
    pub fn value(&self) -> Option<f64> {
        match self {
            Conversion::Converted { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<String> {
        match self {
            Conversion::Converted {
                amount,
                base,
                target,
                value,
                ..
            } => Some(format!("{amount} {base} = {value:.2} {target}")),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd_table() -> RateTable {
        RateTable::new(
            CurrencyCode::Usd,
            [("EUR".to_string(), 0.9), ("GBP".to_string(), 0.8)],
        )
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("10"), Some(10.0));
        assert_eq!(parse_amount(" 2.5 "), Some(2.5));
        assert_eq!(parse_amount("0"), Some(0.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("-3"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_convert_known_target() {
        let value = convert(10.0, "EUR", &usd_table()).unwrap();
        assert_eq!(format!("{value:.2}"), "9.00");
    }

    #[test]
    fn test_convert_is_linear() {
        let table = usd_table();
        for x in [0.0, 0.01, 1.0, 7.25, 1234.5] {
            let single = convert(x, "GBP", &table).unwrap();
            let double = convert(2.0 * x, "GBP", &table).unwrap();
            assert!((double - 2.0 * single).abs() < 1e-9);
        }
    }

    #[test]
    fn test_convert_missing_target_is_none() {
        assert_eq!(convert(10.0, "XYZ", &usd_table()), None);
        assert_eq!(convert(10.0, "JPY", &usd_table()), None);
    }

    #[test]
    fn test_summary_format() {
        let conversion = Conversion::Converted {
            amount: 10.0,
            base: CurrencyCode::Usd,
            target: CurrencyCode::Eur,
            rate: 0.9,
            value: 9.0,
        };
        assert_eq!(conversion.summary().unwrap(), "10 USD = 9.00 EUR");
        assert_eq!(Conversion::Unavailable.summary(), None);
        assert_eq!(Conversion::InvalidAmount.value(), None);
    }
}
