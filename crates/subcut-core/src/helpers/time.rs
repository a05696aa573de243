// crates/subcut-core/src/helpers/time.rs
//
// Shared timestamp utilities used by the session, the tracker, and any
// front end that needs human-readable time strings.
//
// Two tiers, on purpose:
//   - `parse_timestamp` is LENIENT — best-effort numeric conversion so a
//     half-typed value never crashes a keystroke handler.
//   - `is_valid_timestamp` is STRICT — exact `HH:MM:SS,mmm` pattern, used to
//     gate commit and save.
// The gap between the two is what lets an input field show a transiently
// invalid value while typing and still refuse to persist it.

/// Format a time offset in seconds as an SRT display timestamp `HH:MM:SS,mmm`.
///
/// Milliseconds are rounded to nearest (not truncated), and the carry is
/// propagated, so `1.9996` renders as `00:00:02,000` rather than the
/// 13-character `00:00:01,1000`.
///
/// Negative or non-finite input is a caller bug.
///
/// ```
/// use subcut_core::helpers::time::format_timestamp;
/// assert_eq!(format_timestamp(0.0),      "00:00:00,000");
/// assert_eq!(format_timestamp(2.5),      "00:00:02,500");
/// assert_eq!(format_timestamp(3661.042), "01:01:01,042");
/// ```
pub fn format_timestamp(seconds: f64) -> String {
    debug_assert!(
        seconds.is_finite() && seconds >= 0.0,
        "format_timestamp: caller must guard non-finite/negative input ({seconds})",
    );
    let total_ms = (seconds * 1000.0).round() as u64;
    let h  = total_ms / 3_600_000;
    let m  = (total_ms % 3_600_000) / 60_000;
    let s  = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

/// Lenient parse of a display timestamp back to seconds.
///
/// Accepts anything of the shape `H:M:S,mmm` — missing leading zeros,
/// surrounding whitespace, and fractional pieces are all tolerated. Returns
/// `None` (never panics) when the string doesn't decompose, so callers can
/// defer to validation instead of failing on every keystroke.
///
/// ```
/// use subcut_core::helpers::time::parse_timestamp;
/// assert_eq!(parse_timestamp("00:00:02,500"), Some(2.5));
/// assert_eq!(parse_timestamp("0:1:5,500"),   Some(65.5));
/// assert_eq!(parse_timestamp("garbage"),     None);
/// ```
pub fn parse_timestamp(s: &str) -> Option<f64> {
    let (clock, millis) = s.split_once(',')?;

    let mut parts = clock.split(':');
    let h: f64 = parts.next()?.trim().parse().ok()?;
    let m: f64 = parts.next()?.trim().parse().ok()?;
    let sec: f64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None; // more than H:M:S
    }
    let ms: f64 = millis.trim().parse().ok()?;

    if h < 0.0 || m < 0.0 || sec < 0.0 || ms < 0.0 {
        return None;
    }
    Some(h * 3600.0 + m * 60.0 + sec + ms / 1000.0)
}

/// Strict format check: exactly `\d{2}:\d{2}:\d{2},\d{3}`.
///
/// A missing leading zero, a wrong separator, or a trailing character all
/// fail — this is the gate for blur-commit and save, deliberately stricter
/// than `parse_timestamp`.
pub fn is_valid_timestamp(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 12
        && b[2] == b':'
        && b[5] == b':'
        && b[8] == b','
        && [0, 1, 3, 4, 6, 7, 9, 10, 11]
            .iter()
            .all(|&i| b[i].is_ascii_digit())
}

/// Compact `MM:SS` readout for the playback clock next to the waveform.
/// Minutes run past 59 unclamped (`90:05` at an hour and a half).
pub fn format_clock(seconds: f64) -> String {
    let m = (seconds / 60.0) as u64;
    let s = (seconds % 60.0) as u64;
    format!("{m:02}:{s:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_within_a_millisecond() {
        // Spot the range up to just under 100 hours.
        for &x in &[0.0, 0.001, 0.999, 1.0, 59.999, 60.0, 3599.5, 3600.0, 86399.123, 359999.999] {
            let back = parse_timestamp(&format_timestamp(x)).unwrap();
            assert!((back - x).abs() < 0.001, "{x} -> {back}");
        }
    }

    #[test]
    fn formatted_output_is_always_strictly_valid() {
        for &x in &[0.0, 0.0004, 1.9996, 59.9999, 3600.0, 359999.999] {
            let disp = format_timestamp(x);
            assert!(is_valid_timestamp(&disp), "{x} -> {disp}");
        }
    }

    #[test]
    fn millisecond_rounding_carries() {
        // 1.9996 s rounds to 2000 ms — must carry into the seconds field.
        assert_eq!(format_timestamp(1.9996), "00:00:02,000");
        // Truncation would give 041; rounding gives 042.
        assert_eq!(format_timestamp(1.0419), "00:00:01,042");
    }

    #[test]
    fn lenient_parse_tolerates_sloppy_input() {
        assert_eq!(parse_timestamp(" 00:00:01,000 "), Some(1.0));
        assert_eq!(parse_timestamp("0:0:1,000"), Some(1.0));
        let sloppy = parse_timestamp("1:2:3,45").unwrap();
        assert!((sloppy - 3723.045).abs() < 1e-9);
    }

    #[test]
    fn lenient_parse_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("00:00:01"), None); // no millis part
        assert_eq!(parse_timestamp("00:01,000"), None); // only M:S
        assert_eq!(parse_timestamp("a:b:c,d"), None);
        assert_eq!(parse_timestamp("00:00:-1,000"), None);
        assert_eq!(parse_timestamp("00:00:00:00,000"), None);
    }

    #[test]
    fn strict_validation_requires_exact_shape() {
        assert!(is_valid_timestamp("00:00:00,000"));
        assert!(is_valid_timestamp("99:59:59,999"));
        assert!(!is_valid_timestamp("0:00:00,000"));   // missing leading zero
        assert!(!is_valid_timestamp("00:00:00.000"));  // wrong separator
        assert!(!is_valid_timestamp("00:00:00,00"));   // short millis
        assert!(!is_valid_timestamp("00:00:00,0000")); // long millis
        assert!(!is_valid_timestamp(" 00:00:00,000")); // padding
        assert!(!is_valid_timestamp(""));
    }

    #[test]
    fn clock_readout() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(65.4), "01:05");
        assert_eq!(format_clock(5400.0), "90:00");
    }
}
