use crate::errors::{EngineError, EngineResult};

/// Converts owner input in percent into basis points.
///
/// Accepts an optional integer part and up to any number of fractional
/// digits; the value is rounded half-up to two decimals. An empty string is
/// 0%. Signs, exponents and other characters are rejected with
/// [`EngineError::InvalidPercentage`]. Values that do not fit 16 bits (above
/// 655.35%) fail with [`EngineError::InvalidShare`].
pub fn percent_to_bps(text: &str) -> EngineResult<u16> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let invalid = || EngineError::InvalidPercentage {
        value: text.to_string(),
    };

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return Err(invalid());
    }

    let mut bps: u64 = 0;
    for digit in whole.bytes() {
        bps = bps
            .saturating_mul(10)
            .saturating_add(u64::from(digit - b'0'));
    }
    bps = bps.saturating_mul(100);

    let mut fraction_digits = fraction.bytes().map(|b| u64::from(b - b'0'));
    let tenths = fraction_digits.next().unwrap_or(0);
    let hundredths = fraction_digits.next().unwrap_or(0);
    let round_up = fraction_digits.next().is_some_and(|digit| digit >= 5);
    bps = bps
        .saturating_add(tenths * 10 + hundredths)
        .saturating_add(u64::from(round_up));

    u16::try_from(bps).map_err(|_| EngineError::InvalidShare {
        index: 0,
        value: i64::try_from(bps).unwrap_or(i64::MAX),
    })
}

/// Converts a vector of percent strings, reporting the failing position.
pub fn percents_to_bps<S: AsRef<str>>(values: &[S]) -> EngineResult<Vec<u16>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            percent_to_bps(value.as_ref()).map_err(|err| match err {
                EngineError::InvalidShare { value, .. } => EngineError::InvalidShare { index, value },
                other => other,
            })
        })
        .collect()
}
