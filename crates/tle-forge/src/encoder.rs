//! TLE Line Encoder
//!
//! Pure functions turning physical quantities into the fixed-width tokens of
//! TLE element lines, plus the modulo-10 line checksum.
//!
//! The plain `encode_*` functions are permissive: out-of-domain values are
//! clamped or come out garbled, and the forger's 68-column check is what
//! finally rejects them. The `try_encode_*` variants back
//! [`ValidationPolicy::Strict`](crate::ValidationPolicy) and reject those
//! values up front.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::{ForgeError, Result, LINE_DATA_WIDTH, LINE_WIDTH};

/// Token for a zero value in an assumed-decimal scientific field
pub const ZERO_SCIENTIFIC: &str = " 00000-0";

/// Magnitudes below this are written as zero
const ZERO_THRESHOLD: f64 = 1e-99;

/// Largest exponent magnitude a single exponent digit can carry
const MAX_EXPONENT: i32 = 9;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Calculate the TLE checksum digit of `line`
///
/// Digits count their value, `-` counts 1, everything else counts 0.
pub fn encode_checksum(line: &str) -> u8 {
    let sum: u32 = line
        .chars()
        .map(|c| match c {
            '-' => 1,
            c => c.to_digit(10).unwrap_or(0),
        })
        .sum();
    (sum % 10) as u8
}

/// Append the checksum digit of `line` to it
pub fn append_checksum(line: &str) -> String {
    format!("{}{}", line, encode_checksum(line))
}

/// Check that a finished 69-column element line ends in its own checksum
pub fn checksum_matches(line: &str) -> bool {
    match line.as_bytes().last() {
        Some(&last) if line.len() == LINE_WIDTH && last.is_ascii_digit() => {
            encode_checksum(&line[..LINE_DATA_WIDTH]) == last - b'0'
        }
        _ => false,
    }
}

/// Normalized pieces of an assumed-decimal scientific field
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scientific {
    negative: bool,
    mantissa: u32,
    exponent: i32,
    /// Normalization or carry ran into the exponent limit
    clamped: bool,
}

impl Scientific {
    fn from_value(value: f64) -> Self {
        let mut magnitude = value.abs();
        let mut exponent = 0;

        if magnitude >= 1.0 {
            while magnitude >= 10.0 && exponent < MAX_EXPONENT {
                magnitude /= 10.0;
                exponent += 1;
            }
        } else {
            while magnitude < 1.0 && exponent > -MAX_EXPONENT {
                magnitude *= 10.0;
                exponent -= 1;
            }
        }
        let mut clamped = !(1.0..10.0).contains(&magnitude);

        let mut mantissa = (magnitude * 10_000.0).round_ties_even() as u32;
        if mantissa >= 100_000 {
            // 9.99996 rounds to 100000: carry into the exponent
            mantissa /= 10;
            exponent += 1;
            if exponent > MAX_EXPONENT {
                exponent = MAX_EXPONENT;
                clamped = true;
            }
        }

        Self {
            negative: value < 0.0,
            mantissa,
            exponent,
            clamped,
        }
    }

    fn token(&self) -> String {
        format!(
            "{}{:05}{}{}",
            if self.negative { '-' } else { ' ' },
            self.mantissa,
            if self.exponent < 0 { '-' } else { '+' },
            self.exponent.abs()
        )
    }
}

/// Encode `value` as an 8-column assumed-decimal scientific field
///
/// Layout is sign, 5-digit mantissa, exponent sign, exponent digit:
/// `1.2345e-5` becomes `" 12345-5"`, zero becomes `" 00000-0"`. Exponents
/// are clamped to -9..=9, so magnitudes beyond that range come out wrong.
/// NaN and infinities come out as their `Display` text (`NaN`, `inf`), which
/// is never 8 columns wide.
pub fn encode_leading_zero_scientific(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.abs() < ZERO_THRESHOLD {
        return ZERO_SCIENTIFIC.to_string();
    }
    Scientific::from_value(value).token()
}

/// Strict form of [`encode_leading_zero_scientific`]
pub fn try_encode_leading_zero_scientific(field: &'static str, value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(ForgeError::NonFinite { field, value });
    }
    if value.abs() < ZERO_THRESHOLD {
        return Ok(ZERO_SCIENTIFIC.to_string());
    }

    let scientific = Scientific::from_value(value);
    if scientific.clamped {
        return Err(ForgeError::ExponentOutOfRange { field, value });
    }
    Ok(scientific.token())
}

/// Encode an eccentricity as 7 digits with the `0.` dropped
pub fn encode_eccentricity(value: f64) -> String {
    let formatted = format!("{value:.7}");
    formatted.get(2..).unwrap_or_default().to_string()
}

/// Strict form of [`encode_eccentricity`], accepting only `[0, 1)`
pub fn try_encode_eccentricity(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(ForgeError::NonFinite {
            field: "eccentricity",
            value,
        });
    }
    // values just under 1 can still round up to "1.0000000"
    let formatted = format!("{value:.7}");
    if !(0.0..1.0).contains(&value) || !formatted.starts_with("0.") {
        return Err(ForgeError::EccentricityOutOfRange(value));
    }
    Ok(formatted[2..].to_string())
}

/// Encode a signed fixed-point fraction without its leading zero
///
/// `0.0` becomes `"+.00000000"`, `-0.00012345` becomes `"-.00012345"`.
pub fn encode_signed_fraction(value: f64) -> String {
    let formatted = format!("{value:+.8}");
    match formatted.get(..1) {
        Some(sign) => format!("{}{}", sign, formatted.get(2..).unwrap_or_default()),
        None => formatted,
    }
}

/// Strict form of [`encode_signed_fraction`], accepting only `|value| < 1`
pub fn try_encode_signed_fraction(field: &'static str, value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(ForgeError::NonFinite { field, value });
    }
    let formatted = format!("{value:+.8}");
    if value.abs() >= 1.0 || formatted.get(1..2) != Some("0") {
        return Err(ForgeError::FractionOutOfRange { field, value });
    }
    Ok(encode_signed_fraction(value))
}

/// Encode an epoch as `YYDDD.DDDDDDDD` (14 columns)
///
/// Two-digit year, then the fractional day of year where Jan 1 00:00 UTC is
/// day 1.0.
pub fn encode_epoch(epoch: &DateTime<Utc>) -> String {
    let year = epoch.year().rem_euclid(100);
    let seconds =
        epoch.num_seconds_from_midnight() as f64 + epoch.nanosecond() as f64 * 1e-9;
    let day_of_year = epoch.ordinal() as f64 + seconds / SECONDS_PER_DAY;
    format!("{year:02}{day_of_year:012.8}")
}
