//! Numeric sanitizing and display helpers.
//!
//! Form state arrives half-edited: empty strings, NaN from a cleared
//! numeric input, negative values typed by accident. Everything entering
//! the engine passes through here and degrades to zero instead of failing.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::debug;

/// Upper bound for any monetary amount accepted by the engine.
/// Keeps products like `stake × odds` far away from `Decimal` overflow.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Upper bound for decimal odds.
pub const MAX_ODDS: Decimal = dec!(1000000);

/// Upper bound for a boost percentage.
pub const MAX_BOOST_PCT: Decimal = dec!(1000);

/// Decimal places used when presenting money.
pub const MONEY_DP: u32 = 2;

// ---------------------------------------------------------------------------
// Sanitizing
// ---------------------------------------------------------------------------

/// Clamp a non-negative quantity into `[0, max]`.
pub fn clamp_non_negative(value: Decimal, max: Decimal) -> Decimal {
    if value.is_sign_negative() {
        debug!(%value, "Negative input clamped to zero");
        Decimal::ZERO
    } else if value > max {
        debug!(%value, %max, "Input above ceiling clamped");
        max
    } else {
        value
    }
}

/// Sanitize a monetary amount (stake, cashout, stored field).
pub fn sanitize_amount(value: Decimal) -> Decimal {
    clamp_non_negative(value, MAX_AMOUNT)
}

/// Sanitize decimal odds. Values ≤ 1 are kept as-is (they are degenerate
/// but meaningful to the caller); only negatives and overflow are clamped.
pub fn sanitize_odds(value: Decimal) -> Decimal {
    clamp_non_negative(value, MAX_ODDS)
}

/// Sanitize a boost percentage.
pub fn sanitize_percentage(value: Decimal) -> Decimal {
    clamp_non_negative(value, MAX_BOOST_PCT)
}

/// Convert a float coming from a form widget into a sanitized amount.
/// NaN and infinities become zero.
pub fn amount_from_f64(value: f64) -> Decimal {
    if !value.is_finite() {
        debug!(value, "Non-finite input clamped to zero");
        return Decimal::ZERO;
    }
    Decimal::from_f64(value)
        .map(sanitize_amount)
        .unwrap_or(Decimal::ZERO)
}

/// Parse a numeric form field. Accepts `,` as decimal separator and
/// surrounding whitespace; anything unparsable (including `"NaN"`) is zero.
pub fn parse_amount(raw: &str) -> Decimal {
    let cleaned = raw.trim().replace(',', ".");
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }
    match Decimal::from_str(&cleaned) {
        Ok(d) => sanitize_amount(d),
        Err(_) => {
            debug!(raw, "Unparsable numeric field treated as zero");
            Decimal::ZERO
        }
    }
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

/// `numerator / denominator`, or zero when the denominator is not positive.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
    }
}

/// `profit / cost × 100`, or zero when there is no cost or the result does
/// not fit in a `Decimal`.
pub fn percent_of(profit: Decimal, cost: Decimal) -> Decimal {
    safe_div(profit, cost)
        .checked_mul(dec!(100))
        .unwrap_or_else(|| {
            debug!(%profit, %cost, "Percentage out of range treated as zero");
            Decimal::ZERO
        })
}

// ---------------------------------------------------------------------------
// Rounding & display
// ---------------------------------------------------------------------------

/// Round to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Format money with a currency symbol and a leading sign for negatives,
/// e.g. `-$12.50`.
pub fn format_money(value: Decimal, symbol: &str) -> String {
    let rounded = round_money(value);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{symbol}{:.2}", rounded.abs())
    } else {
        format!("{symbol}{:.2}", rounded.abs())
    }
}

/// Format a signed profit figure, always carrying its sign: `+$3.00`.
pub fn format_profit(value: Decimal, symbol: &str) -> String {
    let rounded = round_money(value);
    if rounded > Decimal::ZERO {
        format!("+{}", format_money(rounded, symbol))
    } else {
        format_money(rounded, symbol)
    }
}

/// Format a percentage to two decimals: `12.35%`.
pub fn format_percent(value: Decimal) -> String {
    let rounded = round_money(value);
    let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
    format!("{rounded:.2}%")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_clamped() {
        assert_eq!(sanitize_amount(dec!(-5)), Decimal::ZERO);
        assert_eq!(sanitize_amount(dec!(12.5)), dec!(12.5));
    }

    #[test]
    fn test_amount_ceiling() {
        assert_eq!(sanitize_amount(dec!(1000000000000000)), MAX_AMOUNT);
        assert_eq!(sanitize_odds(dec!(50000000)), MAX_ODDS);
        assert_eq!(sanitize_percentage(dec!(5000)), MAX_BOOST_PCT);
    }

    #[test]
    fn test_non_finite_floats() {
        assert_eq!(amount_from_f64(f64::NAN), Decimal::ZERO);
        assert_eq!(amount_from_f64(f64::INFINITY), Decimal::ZERO);
        assert_eq!(amount_from_f64(-3.0), Decimal::ZERO);
        assert_eq!(amount_from_f64(25.0), dec!(25));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 10,50 "), dec!(10.50));
        assert_eq!(parse_amount("7.25"), dec!(7.25));
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("NaN"), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("-4"), Decimal::ZERO);
    }

    #[test]
    fn test_safe_div_guards() {
        assert_eq!(safe_div(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(safe_div(dec!(10), dec!(-2)), Decimal::ZERO);
        assert_eq!(safe_div(dec!(10), dec!(4)), dec!(2.5));
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec!(30), dec!(50)), dec!(60));
        assert_eq!(percent_of(dec!(30), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_percent_of_near_zero_cost_does_not_overflow() {
        // The quotient still fits, the ×100 does not.
        let profit = MAX_AMOUNT;
        let cost = dec!(0.000000000000001);
        assert_eq!(percent_of(profit, cost), Decimal::ZERO);
        assert_eq!(percent_of(dec!(1), dec!(0.0001)), dec!(1000000));
    }

    #[test]
    fn test_round_money_midpoint() {
        assert_eq!(round_money(dec!(2.345)), dec!(2.35));
        assert_eq!(round_money(dec!(-2.345)), dec!(-2.35));
    }

    #[test]
    fn test_format_money_and_profit() {
        assert_eq!(format_money(dec!(12.5), "$"), "$12.50");
        assert_eq!(format_money(dec!(-12.5), "$"), "-$12.50");
        assert_eq!(format_money(dec!(-0.001), "$"), "$0.00");
        assert_eq!(format_profit(dec!(3), "€"), "+€3.00");
        assert_eq!(format_profit(dec!(-3), "€"), "-€3.00");
        assert_eq!(format_profit(Decimal::ZERO, "€"), "€0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(12.345)), "12.35%");
        assert_eq!(format_percent(Decimal::ZERO), "0.00%");
        assert_eq!(format_percent(dec!(-0.001)), "0.00%");
    }
}
