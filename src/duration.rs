//! Parsing of `delay` query values.
//!
//! Accepts the duration syntax clients already send to this endpoint: a
//! possibly signed sequence of decimal numbers, each with an optional fraction
//! and a mandatory unit, e.g. `300ms`, `-1.5h` or `2h45m`. Valid units are
//! `ns`, `us` (or `µs`/`μs`), `ms`, `s`, `m`, `h`. A bare `0` is accepted.
//!
//! Negative durations parse successfully and saturate to [`Duration::ZERO`],
//! so a negative delay means "do not wait".

use std::time::Duration;
use thiserror::Error;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Largest representable magnitude, matching a signed 64-bit nanosecond count.
const MAX_NANOS: u128 = i64::MAX as u128;

/// Fraction digits beyond this precision cannot change the nanosecond result.
const MAX_FRACTION_DIGITS: u32 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("invalid duration {0:?}")]
    Invalid(String),
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parse a duration string.
///
/// # Errors
///
/// Returns [`DurationParseError`] when the input is empty, has a number
/// without a unit, uses an unknown unit or overflows.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let invalid = || DurationParseError::Invalid(input.to_string());

    let mut rest = input;
    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('-') {
        negative = true;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        // Integer part.
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, after_int) = rest.split_at(int_len);
        let mut whole: u128 = 0;
        for d in int_digits.bytes() {
            whole = whole
                .checked_mul(10)
                .and_then(|v| v.checked_add(u128::from(d - b'0')))
                .filter(|v| *v <= MAX_NANOS)
                .ok_or_else(invalid)?;
        }
        rest = after_int;

        // Fraction part.
        let mut frac: u128 = 0;
        let mut frac_scale: u128 = 1;
        let mut frac_len = 0;
        if let Some(after_dot) = rest.strip_prefix('.') {
            frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            for (i, d) in after_dot.bytes().take(frac_len).enumerate() {
                if (i as u32) < MAX_FRACTION_DIGITS {
                    frac = frac * 10 + u128::from(d - b'0');
                    frac_scale *= 10;
                }
            }
            rest = &after_dot[frac_len..];
        }
        if int_len == 0 && frac_len == 0 {
            return Err(invalid());
        }

        // Unit.
        let unit_len = rest
            .char_indices()
            .find(|(_, c)| *c == '.' || c.is_ascii_digit())
            .map_or(rest.len(), |(i, _)| i);
        if unit_len == 0 {
            return Err(DurationParseError::MissingUnit(input.to_string()));
        }
        let (unit, after_unit) = rest.split_at(unit_len);
        let scale = unit_nanos(unit).ok_or_else(|| DurationParseError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;
        rest = after_unit;

        let part = whole
            .checked_mul(scale)
            .and_then(|v| v.checked_add(frac * scale / frac_scale))
            .ok_or_else(invalid)?;
        total = total
            .checked_add(part)
            .filter(|v| *v <= MAX_NANOS)
            .ok_or_else(invalid)?;
    }

    if negative {
        return Ok(Duration::ZERO);
    }
    let secs = (total / NANOS_PER_SEC) as u64;
    let nanos = (total % NANOS_PER_SEC) as u32;
    Ok(Duration::new(secs, nanos))
}
