//! Wall-clock helpers in whole seconds since the Unix epoch

use chrono::Utc;

/// Current time in seconds
#[inline]
#[must_use]
pub fn now_secs() -> i64 {
    Utc::now().timestamp()
}

/// Current time plus `secs`
#[inline]
#[must_use]
pub fn now_plus(secs: i64) -> i64 {
    now_secs().saturating_add(secs)
}

/// Current time minus `secs`
#[inline]
#[must_use]
pub fn now_minus(secs: i64) -> i64 {
    now_secs().saturating_sub(secs)
}
