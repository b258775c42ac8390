//! Fiat display conversion for native-asset prices
//!
//! Read-only and idempotent. A missing or broken rate must never block
//! catalog rendering, so every failure path degrades to the fixed
//! fallback text.

use crate::{constants::FIAT_FALLBACK_DISPLAY, types::RateQuote};

/// Converts a native-asset price into a fiat display string
///
/// Accepts the market rate in either upstream shape. Returns the fixed
/// fallback `"0.00"` when the rate is missing, non-finite or non-positive,
/// or when the price does not parse to a positive number. Output uses
/// fixed formatting rules (two fractional digits, `,` thousands grouping)
/// so it is deterministic regardless of the viewer's locale.
pub fn to_fiat_display(price_native: &str, rate: Option<RateQuote>) -> String {
    let rate_usd = match rate {
        Some(quote) => quote.value(),
        None => return FIAT_FALLBACK_DISPLAY.to_string(),
    };
    if !rate_usd.is_finite() || rate_usd <= 0.0 {
        return FIAT_FALLBACK_DISPLAY.to_string();
    }

    let price: f64 = match price_native.parse() {
        Ok(p) => p,
        Err(_) => return FIAT_FALLBACK_DISPLAY.to_string(),
    };
    if !price.is_finite() || price <= 0.0 {
        return FIAT_FALLBACK_DISPLAY.to_string();
    }

    format_grouped(price * rate_usd)
}

/// Formats an amount with two fractional digits and thousands grouping
fn format_grouped(amount: f64) -> String {
    let fixed = format!("{:.2}", amount);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (fixed.as_str(), "00"),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    format!("{}.{}", grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplies_and_groups() {
        assert_eq!(to_fiat_display("2.0", Some(RateQuote::Bare(1500.0))), "3,000.00");
        assert_eq!(to_fiat_display("1", Some(RateQuote::Bare(999.5))), "999.50");
        assert_eq!(
            to_fiat_display("1234567.5", Some(RateQuote::Bare(1.0))),
            "1,234,567.50"
        );
    }

    #[test]
    fn both_quote_shapes_are_equivalent() {
        let bare = to_fiat_display("2.0", Some(RateQuote::Bare(1500.0)));
        let keyed = to_fiat_display("2.0", Some(RateQuote::Keyed { price: 1500.0 }));
        assert_eq!(bare, keyed);
    }

    #[test]
    fn missing_rate_falls_back() {
        assert_eq!(to_fiat_display("2.0", None), "0.00");
    }

    #[test]
    fn broken_rate_falls_back() {
        assert_eq!(to_fiat_display("2.0", Some(RateQuote::Bare(0.0))), "0.00");
        assert_eq!(to_fiat_display("2.0", Some(RateQuote::Bare(-3.0))), "0.00");
        assert_eq!(to_fiat_display("2.0", Some(RateQuote::Bare(f64::NAN))), "0.00");
        assert_eq!(
            to_fiat_display("2.0", Some(RateQuote::Bare(f64::INFINITY))),
            "0.00"
        );
    }

    #[test]
    fn non_positive_price_falls_back() {
        assert_eq!(to_fiat_display("0", Some(RateQuote::Bare(1500.0))), "0.00");
        assert_eq!(to_fiat_display("junk", Some(RateQuote::Bare(1500.0))), "0.00");
    }
}
