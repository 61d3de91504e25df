//! Pure history aggregation
//!
//! All functions take an already-ordered slice (oldest first, as returned
//! by the history store) and never touch I/O or the clock.

use crate::entities::Observation;

/// One weekly summary bucket.
///
/// Buckets are positional: the first seven records form "W1", the next
/// seven "W2", and so on. A trailing chunk shorter than seven records
/// still produces a bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyBucket {
    /// Positional label, "W1", "W2", ...
    pub label: String,
    /// Sum of precipitation over the bucket
    pub precipitation_total: f64,
    /// Arithmetic mean of humidity over the bucket
    pub humidity_mean: f64,
}

/// The most recent seven observations, oldest first.
///
/// Returns the whole slice when fewer than seven are available.
#[must_use]
pub fn daily(series: &[Observation]) -> &[Observation] {
    let start = series.len().saturating_sub(7);
    &series[start..]
}

/// The first thirty observations, oldest first.
#[must_use]
pub fn monthly(series: &[Observation]) -> &[Observation] {
    let end = series.len().min(30);
    &series[..end]
}

/// Positional weekly buckets over the full series.
///
/// An empty series yields no buckets.
#[must_use]
pub fn weekly(series: &[Observation]) -> Vec<WeeklyBucket> {
    series
        .chunks(7)
        .enumerate()
        .map(|(i, chunk)| {
            let precipitation_total: f64 = chunk.iter().map(|o| o.precipitation).sum();
            let humidity_sum: f64 = chunk.iter().map(|o| o.humidity).sum();
            #[allow(clippy::cast_precision_loss)]
            let humidity_mean = humidity_sum / chunk.len() as f64;
            WeeklyBucket {
                label: format!("W{}", i + 1),
                precipitation_total,
                humidity_mean,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn series(points: &[(f64, f64)]) -> Vec<Observation> {
        let base = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        points
            .iter()
            .enumerate()
            .map(|(i, &(precipitation, humidity))| {
                #[allow(clippy::cast_possible_wrap)]
                let date = base + Duration::days(i as i64);
                Observation::new("Miami", date, at, 80.0, humidity, precipitation)
            })
            .collect()
    }

    #[test]
    fn daily_returns_last_seven() {
        let s = series(&[(0.0, 50.0); 10]);
        let view = daily(&s);
        assert_eq!(view.len(), 7);
        assert_eq!(view[0].date, s[3].date);
        assert_eq!(view[6].date, s[9].date);
    }

    #[test]
    fn daily_short_series_returned_whole() {
        let s = series(&[(0.0, 50.0); 3]);
        assert_eq!(daily(&s).len(), 3);
    }

    #[test]
    fn daily_empty_is_empty() {
        assert!(daily(&[]).is_empty());
    }

    #[test]
    fn monthly_returns_first_thirty() {
        let s = series(&[(0.0, 50.0); 35]);
        let view = monthly(&s);
        assert_eq!(view.len(), 30);
        assert_eq!(view[0].date, s[0].date);
        assert_eq!(view[29].date, s[29].date);
    }

    #[test]
    fn monthly_short_series_returned_whole() {
        let s = series(&[(0.0, 50.0); 12]);
        assert_eq!(monthly(&s).len(), 12);
    }

    #[test]
    fn weekly_two_full_buckets() {
        let mut points = vec![(1.0, 50.0); 7];
        points.extend(vec![(2.0, 80.0); 7]);
        let s = series(&points);

        let buckets = weekly(&s);
        assert_eq!(buckets.len(), 2);

        assert_eq!(buckets[0].label, "W1");
        assert!((buckets[0].precipitation_total - 7.0).abs() < 1e-9);
        assert!((buckets[0].humidity_mean - 50.0).abs() < 1e-9);

        assert_eq!(buckets[1].label, "W2");
        assert!((buckets[1].precipitation_total - 14.0).abs() < 1e-9);
        assert!((buckets[1].humidity_mean - 80.0).abs() < 1e-9);
    }

    #[test]
    fn weekly_partial_trailing_bucket() {
        let s = series(&[(1.0, 60.0); 9]);
        let buckets = weekly(&s);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[1].label, "W2");
        assert!((buckets[1].precipitation_total - 2.0).abs() < 1e-9);
        assert!((buckets[1].humidity_mean - 60.0).abs() < 1e-9);
    }

    #[test]
    fn weekly_empty_series() {
        assert!(weekly(&[]).is_empty());
    }
}
