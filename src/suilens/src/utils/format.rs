use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

/// Shown in place of an address the ledger did not report.
pub const UNKNOWN_ADDRESS: &str = "Unknown";

const SHORT_ADDRESS_MAX: usize = 12;
const ADDRESS_PREFIX_LEN: usize = 6;
const ADDRESS_SUFFIX_LEN: usize = 4;

/// 1 SUI = 10^9 MIST
const MIST_PER_UNIT: f64 = 1_000_000_000.0;
const MIN_FRACTION_DIGITS: usize = 2;
const MAX_FRACTION_DIGITS: usize = 6;

/// Shortens long identifiers to `0x1234…abcd`.
pub fn format_address(address: Option<&str>) -> String {
    let Some(address) = address.filter(|a| !a.is_empty()) else {
        return UNKNOWN_ADDRESS.to_string();
    };

    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= SHORT_ADDRESS_MAX {
        return address.to_string();
    }

    let prefix: String = chars[..ADDRESS_PREFIX_LEN].iter().collect();
    let suffix: String = chars[chars.len() - ADDRESS_SUFFIX_LEN..].iter().collect();
    format!("{prefix}…{suffix}")
}

/// Parses a decimal integer amount as reported by the ledger.
pub fn parse_amount(raw: &str) -> Option<BigInt> {
    raw.trim().parse().ok()
}

/// Renders the magnitude of a 9-decimal fixed-point amount with `en-US` grouping and
/// 2 to 6 fractional digits. The sign is dropped; callers decide how to show direction.
///
/// The scaled value goes through `f64`, so magnitudes beyond 2^53 MIST lose precision
/// in the trailing digits.
pub fn format_amount(raw: &BigInt) -> String {
    let scaled = raw.abs().to_f64().unwrap_or(f64::INFINITY) / MIST_PER_UNIT;
    format_decimal(scaled)
}

/// Like [`format_amount`] with a `+` for positive amounts and `-` otherwise.
pub fn format_signed_amount(raw: &BigInt) -> String {
    let sign = if raw.is_positive() { '+' } else { '-' };
    format!("{sign}{}", format_amount(raw))
}

fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return "∞".to_string();
    }

    let fixed = format!("{value:.prec$}", prec = MAX_FRACTION_DIGITS);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut fraction = frac_part.trim_end_matches('0').to_string();
    while fraction.len() < MIN_FRACTION_DIGITS {
        fraction.push('0');
    }

    format!("{}.{fraction}", group_thousands(int_part))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
