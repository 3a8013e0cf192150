//! Popularity and recency signals, plus the squash that makes them
//! commensurate with textual similarity.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Raw popularity: `ln(1 + stars)`.
pub fn stars_score(stars: u64) -> f64 {
    (stars as f64).ln_1p()
}

/// Map any non-negative value into `[0, 1)` with `ln(1+x) / (1 + ln(1+x))`.
/// Non-positive and NaN inputs map to 0.
pub fn log_squash(x: f64) -> f64 {
    if !(x > 0.0) {
        return 0.0;
    }
    if x.is_infinite() {
        return 1.0;
    }
    let l = x.ln_1p();
    l / (1.0 + l)
}

/// Clamp-then-squash normalizer: values in `(0, 1]` pass through, values at
/// or below zero become 0, values above 1 go through [`log_squash`].
pub fn normalize_signal(x: f64) -> f64 {
    if !(x > 0.0) {
        0.0
    } else if x <= 1.0 {
        x.min(1.0)
    } else {
        log_squash(x)
    }
}

/// Normalized popularity sub-score, monotone in `stars`.
///
/// The raw value is always squashed, so a single star lands at ~0.35 and
/// the score never dips as the count grows.
pub fn popularity_score(stars: u64) -> f64 {
    log_squash(stars_score(stars))
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 (`Z` or a numeric offset), and naive
/// `YYYY-MM-DD[T| ]HH:MM:SS[.fff]` or `YYYY-MM-DD`, which are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Whole days elapsed between `updated_at` and `now`, never negative.
pub fn days_since(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - updated_at).num_days().max(0)
}

/// `1 / (1 + days_since)`, or 0.0 when the timestamp is absent or unparsable.
pub fn recency_score(updated_at: Option<&str>, now: DateTime<Utc>) -> f64 {
    let Some(raw) = updated_at else {
        return 0.0;
    };
    match parse_timestamp(raw) {
        Some(dt) => 1.0 / (1.0 + days_since(dt, now) as f64),
        None => {
            tracing::debug!("Unparsable updated_at timestamp: {raw:?}");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_stars_score_is_log1p() {
        assert_eq!(stars_score(0), 0.0);
        assert!((stars_score(1) - 2f64.ln()).abs() < 1e-12);
        assert!((stars_score(9) - 10f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_signal_branches() {
        assert_eq!(normalize_signal(-3.0), 0.0);
        assert_eq!(normalize_signal(0.0), 0.0);
        assert_eq!(normalize_signal(f64::NAN), 0.0);
        assert_eq!(normalize_signal(0.25), 0.25);
        assert_eq!(normalize_signal(1.0), 1.0);

        let expected = 3f64.ln() / (1.0 + 3f64.ln());
        assert!((normalize_signal(2.0) - expected).abs() < 1e-12);
        assert!(normalize_signal(1e12) < 1.0);
    }

    #[test]
    fn test_log_squash_approaches_but_never_reaches_one() {
        let mut last = 0.0;
        for x in [0.5, 1.0, 10.0, 1e3, 1e6, 1e12] {
            let y = log_squash(x);
            assert!(y > last);
            assert!(y < 1.0);
            last = y;
        }
    }

    #[test]
    fn test_popularity_is_monotone_in_stars() {
        let mut last = popularity_score(0);
        assert_eq!(last, 0.0);
        for stars in (1..6000).chain([10_000, 100_000, 1_000_000, u64::MAX]) {
            let score = popularity_score(stars);
            assert!(score >= last, "popularity dipped at {stars} stars");
            assert!(score < 1.0);
            last = score;
        }
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_timestamp("2024-01-02T03:04:05Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T03:04:05+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T05:04:05+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T03:04:05"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02 03:04:05"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-02"),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
        assert!(parse_timestamp("2024-01-02T03:04:05.250Z").is_some());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-45T00:00:00Z"), None);
    }

    #[test]
    fn test_recency_same_day_is_one() {
        let earlier_today = (now() - Duration::hours(3)).to_rfc3339();
        assert_eq!(recency_score(Some(&earlier_today), now()), 1.0);
    }

    #[test]
    fn test_recency_decays_with_whole_days() {
        let ten_days = (now() - Duration::days(10) - Duration::hours(5)).to_rfc3339();
        assert!((recency_score(Some(&ten_days), now()) - 1.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_future_timestamps_are_clamped() {
        let future = (now() + Duration::days(30)).to_rfc3339();
        assert_eq!(recency_score(Some(&future), now()), 1.0);
    }

    #[test]
    fn test_unparsable_and_missing_score_zero() {
        assert_eq!(recency_score(None, now()), 0.0);
        assert_eq!(recency_score(Some("not a date"), now()), 0.0);
        assert_eq!(recency_score(Some(""), now()), 0.0);
    }

    #[test]
    fn test_very_old_is_small_but_positive() {
        let old = recency_score(Some("1970-01-01T00:00:00Z"), now());
        assert!(old > 0.0);
        assert!(old < 1e-4);
        // Parse failure is exactly 0, an old but valid timestamp is not
        assert_ne!(old, recency_score(Some("garbage"), now()));
    }
}
