//! Conversion between integer cents and decimal dollar strings.
//!
//! Prices are persisted as integer cents and only ever rendered as dollar
//! strings at the edge. Conversions must be exact for every amount with at
//! most two decimal places, so the codec rounds once after multiplying by
//! 100 and never formats through floating point division.

use crate::Error;

/// Alias for the integer type used to store prices as cents.
pub type Cents = i64;

/// Convert a dollar string such as `"12.34"` into cents.
///
/// This is the lenient conversion used when reading free-form input:
/// anything that does not parse as a number (including the empty string)
/// is treated as zero.
pub fn to_cents(dollars: &str) -> Cents {
    dollars
        .trim()
        .parse::<f64>()
        .map(|amount| (amount * 100.0).round() as Cents)
        .unwrap_or(0)
}

/// Render an optional amount of cents as a dollar string with exactly two
/// decimal places, e.g. `Some(1234)` becomes `"12.34"`.
///
/// `None` renders as the empty string so optional prices can be placed
/// straight into form fields.
pub fn to_dollars(cents: Option<Cents>) -> String {
    match cents {
        None => String::new(),
        Some(cents) => {
            let sign = if cents < 0 { "-" } else { "" };
            let cents = cents.abs();
            format!("{sign}{}.{:02}", cents / 100, cents % 100)
        }
    }
}

/// Parse a price entered into a form.
///
/// Unlike [to_cents], this is the strict parse used for validation: the
/// input must be one or more digits, optionally followed by a decimal
/// point and one or two more digits.
///
/// # Errors
///
/// Returns [Error::InvalidPrice] if the input does not have that shape.
pub fn parse_price(input: &str) -> Result<Cents, Error> {
    let invalid = || Error::InvalidPrice(input.to_string());

    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (input, None),
    };

    if whole.is_empty() || !whole.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid());
    }

    let mut cents: Cents = whole.parse().map_err(|_| invalid())?;
    cents = cents.checked_mul(100).ok_or_else(invalid)?;

    if let Some(fraction) = fraction {
        if fraction.is_empty()
            || fraction.len() > 2
            || !fraction.bytes().all(|byte| byte.is_ascii_digit())
        {
            return Err(invalid());
        }

        let mut fraction_cents: Cents = fraction.parse().map_err(|_| invalid())?;

        if fraction.len() == 1 {
            fraction_cents *= 10;
        }

        cents += fraction_cents;
    }

    Ok(cents)
}

/// The price of a purchase divided by the number of times it has been worn,
/// rounded to the nearest cent.
///
/// An unworn item costs its full price per wear.
pub fn cost_per_wear(price: Cents, wears: usize) -> Cents {
    if wears == 0 {
        price
    } else {
        (price as f64 / wears as f64).round() as Cents
    }
}

#[cfg(test)]
mod codec_tests {
    use crate::price::{to_cents, to_dollars};

    #[test]
    fn to_cents_parses_two_decimal_amounts_exactly() {
        // 4.35 is one of the classic cases where naive float conversion
        // lands on 434.
        assert_eq!(to_cents("4.35"), 435);
        assert_eq!(to_cents("12.34"), 1234);
        assert_eq!(to_cents("0.01"), 1);
    }

    #[test]
    fn to_cents_treats_unparsable_input_as_zero() {
        assert_eq!(to_cents(""), 0);
        assert_eq!(to_cents("abc"), 0);
        assert_eq!(to_cents("12.3.4"), 0);
    }

    #[test]
    fn to_dollars_renders_two_decimal_places() {
        assert_eq!(to_dollars(Some(1234)), "12.34");
        assert_eq!(to_dollars(Some(100)), "1.00");
        assert_eq!(to_dollars(Some(5)), "0.05");
        assert_eq!(to_dollars(Some(0)), "0.00");
    }

    #[test]
    fn to_dollars_renders_none_as_empty_string() {
        assert_eq!(to_dollars(None), "");
    }

    #[test]
    fn cents_survive_a_round_trip_through_dollars() {
        for cents in [0, 1, 9, 10, 99, 100, 435, 1234, 999_999] {
            assert_eq!(to_cents(&to_dollars(Some(cents))), cents);
        }
    }
}
