//! Brazilian number formatting, independent of the process locale.
//!
//! The conventions are hardcoded (`.` thousands separator, `,` decimal
//! separator, `R$` prefix) so the output never depends on which locales the
//! host has installed.

/// Format a value as Brazilian currency: `1234.5` becomes `"R$ 1.234,50"`.
///
/// Always two decimal places. Negative values carry the sign before the
/// symbol: `"-R$ 1.234,50"`.
pub fn currency_brl(value: f64) -> String {
    // Work in rounded cents so the two-decimal contract holds exactly.
    let cents = (value.abs() * 100.0).round() as u64;
    let negative = value < 0.0 && cents > 0;

    let units = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if negative {
        format!("-R$ {},{:02}", grouped, fraction)
    } else {
        format!("R$ {},{:02}", grouped, fraction)
    }
}

/// Format a percentage with two decimals: `12.345` becomes `"12.35 %"`.
pub fn percent(value: f64) -> String {
    format!("{:.2} %", value)
}

/// Render an optional growth figure; undefined growth shows as `"n/d"`.
pub fn growth_label(growth: Option<f64>) -> String {
    match growth {
        Some(value) => percent(value),
        None => "n/d".to_string(),
    }
}

/// Legend entry combining a label with its currency value,
/// e.g. `"Renda Fixa: R$ 1.234,50"`.
pub fn legend_label(label: &str, value: f64) -> String {
    format!("{}: {}", label, currency_brl(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_brl_thousands_and_decimal_separators() {
        assert_eq!(currency_brl(1234.5), "R$ 1.234,50");
        assert_eq!(currency_brl(1_234_567.89), "R$ 1.234.567,89");
    }

    #[test]
    fn test_currency_brl_zero() {
        assert_eq!(currency_brl(0.0), "R$ 0,00");
    }

    #[test]
    fn test_currency_brl_negative_sign_before_symbol() {
        assert_eq!(currency_brl(-1234.5), "-R$ 1.234,50");
        assert_eq!(currency_brl(-0.5), "-R$ 0,50");
    }

    #[test]
    fn test_currency_brl_sub_unit_values_keep_two_decimals() {
        assert_eq!(currency_brl(0.05), "R$ 0,05");
        assert_eq!(currency_brl(0.5), "R$ 0,50");
    }

    #[test]
    fn test_currency_brl_rounds_to_cents() {
        assert_eq!(currency_brl(10.005), "R$ 10,01");
        assert_eq!(currency_brl(999.999), "R$ 1.000,00");
    }

    #[test]
    fn test_currency_brl_negative_rounding_to_zero_drops_sign() {
        // -0.001 rounds to zero cents; "-R$ 0,00" would be misleading.
        assert_eq!(currency_brl(-0.001), "R$ 0,00");
    }

    #[test]
    fn test_percent_two_decimals() {
        assert_eq!(percent(12.345), "12.35 %");
        assert_eq!(percent(0.0), "0.00 %");
        assert_eq!(percent(-3.2), "-3.20 %");
    }

    #[test]
    fn test_growth_label_undefined_growth() {
        assert_eq!(growth_label(Some(42.0)), "42.00 %");
        assert_eq!(growth_label(None), "n/d");
    }

    #[test]
    fn test_legend_label() {
        assert_eq!(legend_label("Renda Fixa", 1234.5), "Renda Fixa: R$ 1.234,50");
    }
}
