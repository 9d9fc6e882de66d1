//! Share expiry arithmetic.

/// Expiry used when the caller gives neither days nor hours.
pub const DEFAULT_EXPIRY_DAYS: u64 = 7;

const SECONDS_PER_HOUR: u64 = 3600;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Convert a days/hours expiry into whole seconds.
///
/// `hours`, when present, wins and `days` is ignored. No upper bound is
/// applied here; the server decides what it accepts.
///
/// ```
/// use clawshare::expiry::compute_expiry_seconds;
///
/// assert_eq!(compute_expiry_seconds(7, None), 604_800);
/// assert_eq!(compute_expiry_seconds(1, Some(2)), 7_200);
/// ```
pub fn compute_expiry_seconds(days: u64, hours: Option<u64>) -> u64 {
    match hours {
        Some(hours) => hours.saturating_mul(SECONDS_PER_HOUR),
        None => days.saturating_mul(SECONDS_PER_DAY),
    }
}
