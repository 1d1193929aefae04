//! Property tests for keypad decoding and display formatting

use proptest::prelude::*;

use countdown_pad::state::{
    digit_entry::{DigitEntry, MAX_DURATION_MS},
    timer_state::{display_fields, progress},
};

/// Reference decoding on integers, for buffers short enough not to overflow
fn reference(digits: &str) -> u64 {
    let n: u64 = digits.parse().unwrap_or(0);
    let (secs, rest) = (n % 100, n / 100);
    let (mins, hours) = (rest % 100, rest / 100);
    if hours > 99 {
        return MAX_DURATION_MS;
    }
    ((hours * 3600 + mins * 60 + secs) * 1000).min(MAX_DURATION_MS)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn entry_matches_hhmmss_decoding(digits in proptest::collection::vec(0u8..10, 1..12)) {
        let mut entry = DigitEntry::new();
        let mut last = 0;
        for d in &digits {
            last = entry.add_digit(*d).unwrap();
        }
        let text: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
        prop_assert_eq!(last, reference(&text));
        prop_assert!(last <= MAX_DURATION_MS);
    }

    #[test]
    fn long_entries_saturate(digits in proptest::collection::vec(0u8..10, 0..64)) {
        let mut entry = DigitEntry::new();
        entry.add_digit(1).unwrap();
        for d in &digits {
            entry.add_digit(*d).unwrap();
        }
        if digits.len() >= 6 {
            prop_assert_eq!(entry.duration_ms(), MAX_DURATION_MS);
        }
        prop_assert!(entry.duration_ms() <= MAX_DURATION_MS);
    }

    #[test]
    fn zeros_stay_zero(n in 1usize..50) {
        let mut entry = DigitEntry::new();
        for _ in 0..n {
            prop_assert_eq!(entry.add_digit(0).unwrap(), 0);
        }
    }

    #[test]
    fn display_round_trips(ms in 0u64..=MAX_DURATION_MS + 999) {
        let (h, m, s) = display_fields(ms);
        prop_assert!(h.len() >= 2 && m.len() == 2 && s.len() == 2);
        let h: u64 = h.parse().unwrap();
        let m: u64 = m.parse().unwrap();
        let s: u64 = s.parse().unwrap();
        prop_assert_eq!(h * 3600 + m * 60 + s, ms / 1000);
    }

    #[test]
    fn progress_stays_in_range(remaining in 0u64..1_000_000, duration in 0u64..1_000_000) {
        let p = progress(remaining.min(duration), duration);
        prop_assert!((0.0..=100.0).contains(&p));
    }
}
