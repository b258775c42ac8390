//! Course record normalization and exact native-amount conversion
//!
//! Converts raw ledger records into display-ready view models. Price
//! conversion is integer-only: a smallest-unit amount converted to its
//! decimal form and back must yield the same integer, or a later payment
//! would be rejected or overpaid.

use crate::{
    constants::{NATIVE_DECIMALS, WEI_PER_NATIVE},
    error::NormalizeError,
    types::{CourseView, RawCourseRecord},
};

/// Normalizes one raw ledger record into a display-ready view model
///
/// Pure transform, safe to call any number of times on the same input.
/// A negative count or unparseable price is a data-integrity fault of the
/// ledger and surfaces as an error instead of being clamped.
pub fn normalize(raw: &RawCourseRecord) -> Result<CourseView, NormalizeError> {
    let price_wei: u128 =
        raw.price_wei
            .parse()
            .map_err(|_| NormalizeError::InvalidPrice {
                id: raw.id.clone(),
                value: raw.price_wei.clone(),
            })?;

    if raw.student_count < 0 {
        return Err(NormalizeError::NegativeCount {
            id: raw.id.clone(),
            value: raw.student_count,
        });
    }

    Ok(CourseView {
        id: raw.id.clone(),
        name: raw.name.clone(),
        description: raw.description.clone(),
        price_native: wei_to_native(price_wei),
        is_active: raw.is_active,
        student_count: raw.student_count as u64,
    })
}

/// Converts a smallest-unit amount to whole-unit decimal text
///
/// Full precision, trailing zeros trimmed: `1500000000000000000` becomes
/// `"1.5"`, `1` becomes `"0.000000000000000001"`.
pub fn wei_to_native(wei: u128) -> String {
    let whole = wei / WEI_PER_NATIVE;
    let frac = wei % WEI_PER_NATIVE;

    if frac == 0 {
        return whole.to_string();
    }

    let frac_digits = format!("{:0width$}", frac, width = NATIVE_DECIMALS as usize);
    let frac_trimmed = frac_digits.trim_end_matches('0');
    format!("{}.{}", whole, frac_trimmed)
}

/// Converts whole-unit decimal text back to the smallest-unit amount
///
/// Exact inverse of [`wei_to_native`]. Rejects signs, empty parts, more
/// than 18 fractional digits, non-digit characters and overflow.
pub fn native_to_wei(amount: &str) -> Result<u128, NormalizeError> {
    let malformed = || NormalizeError::MalformedAmount(amount.to_string());

    let (whole_part, frac_part) = match amount.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (amount, ""),
    };

    if whole_part.is_empty() && frac_part.is_empty() {
        return Err(malformed());
    }
    if frac_part.len() > NATIVE_DECIMALS as usize {
        return Err(malformed());
    }
    if !whole_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(malformed());
    }

    let whole: u128 = if whole_part.is_empty() {
        0
    } else {
        whole_part.parse().map_err(|_| malformed())?
    };

    let frac: u128 = if frac_part.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac_part, width = NATIVE_DECIMALS as usize);
        padded.parse().map_err(|_| malformed())?
    };

    whole
        .checked_mul(WEI_PER_NATIVE)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, price_wei: &str, student_count: i64) -> RawCourseRecord {
        RawCourseRecord {
            id: id.to_string(),
            name: format!("Course {}", id),
            description: "A course".to_string(),
            price_wei: price_wei.to_string(),
            is_active: true,
            student_count,
        }
    }

    #[test]
    fn converts_wei_to_decimal_text() {
        assert_eq!(wei_to_native(0), "0");
        assert_eq!(wei_to_native(WEI_PER_NATIVE), "1");
        assert_eq!(wei_to_native(WEI_PER_NATIVE / 2), "0.5");
        assert_eq!(wei_to_native(1), "0.000000000000000001");
        assert_eq!(wei_to_native(1_500_000_000_000_000_000), "1.5");
        assert_eq!(
            wei_to_native(WEI_PER_NATIVE + 1),
            "1.000000000000000001"
        );
    }

    #[test]
    fn round_trip_is_exact() {
        let cases: &[u128] = &[
            0,
            1,
            999,
            WEI_PER_NATIVE - 1,
            WEI_PER_NATIVE,
            WEI_PER_NATIVE + 1,
            1_500_000_000_000_000_000,
            u128::MAX / WEI_PER_NATIVE * WEI_PER_NATIVE,
            u128::MAX,
        ];
        for &wei in cases {
            assert_eq!(native_to_wei(&wei_to_native(wei)).unwrap(), wei);
        }
    }

    #[test]
    fn parses_common_decimal_forms() {
        assert_eq!(native_to_wei("1").unwrap(), WEI_PER_NATIVE);
        assert_eq!(native_to_wei("1.0").unwrap(), WEI_PER_NATIVE);
        assert_eq!(native_to_wei("2.0").unwrap(), 2 * WEI_PER_NATIVE);
        assert_eq!(native_to_wei("0.5").unwrap(), WEI_PER_NATIVE / 2);
        assert_eq!(native_to_wei(".5").unwrap(), WEI_PER_NATIVE / 2);
    }

    #[test]
    fn rejects_malformed_amounts() {
        for bad in ["", ".", "-1", "+1", "1.2.3", "abc", "1e18", "1.1234567890123456789"] {
            assert!(native_to_wei(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn normalizes_a_valid_record() {
        let view = normalize(&raw("7", "1500000000000000000", 42)).unwrap();
        assert_eq!(view.id, "7");
        assert_eq!(view.price_native, "1.5");
        assert_eq!(view.student_count, 42);
        assert!(view.is_active);
    }

    #[test]
    fn negative_count_is_a_fault() {
        let err = normalize(&raw("7", "0", -3)).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::NegativeCount {
                id: "7".to_string(),
                value: -3
            }
        );
    }

    #[test]
    fn junk_price_is_a_fault() {
        for bad in ["", "-1", "1.5", "lots"] {
            assert!(normalize(&raw("7", bad, 0)).is_err(), "accepted {:?}", bad);
        }
    }
}
