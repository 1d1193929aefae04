//! Keypad digit entry, decoded as HHMMSS from the right

use crate::error::TimerError;

/// Longest duration the keypad can express: 99h59m59s
pub const MAX_DURATION_MS: u64 = (99 * 3600 + 59 * 60 + 59) * 1000;

/// Accumulates raw keypad digits and folds them into a duration.
///
/// The buffer is read right to left: the last two digits are seconds, the
/// two before that minutes, and everything else hours. Groups are not
/// normalized, so `"90"` is ninety seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigitEntry {
    buffer: String,
}

impl DigitEntry {
    /// Create an empty entry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one digit and return the duration it now encodes, in milliseconds
    pub fn add_digit(&mut self, digit: u8) -> Result<u64, TimerError> {
        if digit > 9 {
            return Err(TimerError::InvalidDigit(digit));
        }
        self.buffer.push(char::from(b'0' + digit));
        Ok(self.duration_ms())
    }

    /// Duration encoded by the current buffer, in milliseconds
    pub fn duration_ms(&self) -> u64 {
        decode_hhmmss(&self.buffer)
    }

    /// Digits typed so far
    pub fn digits(&self) -> &str {
        &self.buffer
    }

    /// Forget every typed digit
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// No digit typed since the last clear
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Decode a digit string as HHMMSS read from the right, saturating at 99:59:59.
///
/// Works on the string groups rather than a parsed integer so an arbitrarily
/// long buffer cannot overflow.
pub fn decode_hhmmss(digits: &str) -> u64 {
    let split = digits.len().saturating_sub(2);
    let (rest, secs) = digits.split_at(split);
    let split = rest.len().saturating_sub(2);
    let (hours, mins) = rest.split_at(split);

    let hours = hours.trim_start_matches('0');
    if hours.len() > 2 {
        return MAX_DURATION_MS;
    }

    let total_secs = group(hours) * 3600 + group(mins) * 60 + group(secs);
    (total_secs * 1000).min(MAX_DURATION_MS)
}

// At most two digits by construction
fn group(digits: &str) -> u64 {
    digits
        .bytes()
        .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'))
}
