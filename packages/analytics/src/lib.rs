#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summary statistics over a loaded fire store.
//!
//! [`compute_statistics`] walks the store once and buckets records by
//! status and by the calendar day of their detection and extinguish times.
//! [`causes::compute_cause_statistics`] joins records against the auxiliary
//! cause table and reports coverage.

pub mod causes;

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use fire_map_analytics_models::{DayCounts, FireStatistics};
use fire_map_fire_models::FireStatus;
use fire_map_store::FireStore;

/// Calendar dates that count as "today" and "yesterday".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub today: NaiveDate,
    pub yesterday: NaiveDate,
}

impl DayWindow {
    /// Today is the date of `now` in `tz`. Yesterday is the date of
    /// `now - 24h` in `tz`, which is not always the day before today across
    /// an offset change.
    #[must_use]
    pub fn at<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> Self {
        Self {
            today: now.with_timezone(tz).date_naive(),
            yesterday: (now - TimeDelta::hours(24)).with_timezone(tz).date_naive(),
        }
    }

    /// Adds the event at `at_ms` to the matching bucket. If an offset change
    /// ever makes `yesterday` equal `today`, the event counts as today only.
    fn count<Tz: TimeZone>(&self, counts: &mut DayCounts, at_ms: Option<i64>, tz: &Tz) {
        let Some(date) = at_ms
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.with_timezone(tz).date_naive())
        else {
            return;
        };
        if date == self.today {
            counts.today += 1;
        } else if date == self.yesterday {
            counts.yesterday += 1;
        }
    }
}

/// Aggregates every record in `store`.
///
/// Day buckets compare calendar dates in `tz`, so two timestamps a few hours
/// apart land on different days when they straddle local midnight.
#[must_use]
pub fn compute_statistics<Tz: TimeZone>(
    store: &FireStore,
    now: DateTime<Utc>,
    tz: &Tz,
) -> FireStatistics {
    let window = DayWindow::at(now, tz);
    let mut stats = FireStatistics::default();

    for record in store.records() {
        stats.total += 1;
        stats.total_area_hectares += record.area_hectares;
        stats.by_status.record(record.status);

        if record.status == FireStatus::Extinguished {
            stats.extinguished += 1;
        } else {
            stats.active += 1;
        }

        window.count(&mut stats.detected, record.detected_at_ms, tz);
        window.count(&mut stats.extinguished_on, record.extinguished_at_ms, tz);
    }

    log::debug!(
        "Statistics: {} fires, {} active, {} extinguished",
        stats.total,
        stats.active,
        stats.extinguished
    );
    stats
}

#[cfg(test)]
mod tests {
    use chrono_tz::America::Moncton;
    use fire_map_fire_models::{FeedOrigin, FireRecord, LatLng};

    use super::*;

    fn ms(rfc3339: &str) -> i64 {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .timestamp_millis()
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-07-15T15:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn store(entries: &[(&str, &str, FeedOrigin, f64)]) -> FireStore {
        let mut store = FireStore::new();
        for &(id, status, origin, area) in entries {
            let mut record = FireRecord::new(id, status, LatLng::new(46.0, -66.0), origin);
            record.area_hectares = area;
            store.insert(record);
        }
        store
    }

    #[test]
    fn totals_and_status_buckets() {
        let store = store(&[
            ("A", "Out of Control", FeedOrigin::Active, 10.0),
            ("B", "Contained", FeedOrigin::Active, 2.5),
            ("C", "Extinguished", FeedOrigin::Extinguished, 1.0),
            ("D", "Being Patrolled", FeedOrigin::Extinguished, 0.5),
            ("E", "smouldering", FeedOrigin::Active, 0.0),
        ]);
        let stats = compute_statistics(&store, now(), &Moncton);

        assert_eq!(stats.total, 5);
        assert!((stats.total_area_hectares - 14.0).abs() < 1e-9);
        assert_eq!(stats.by_status.out_of_control, 1);
        assert_eq!(stats.by_status.contained, 1);
        assert_eq!(stats.by_status.extinguished, 1);
        assert_eq!(stats.by_status.being_patrolled, 1);
        assert_eq!(stats.by_status.other, 1);
        assert_eq!(stats.by_status.total(), stats.total);
        assert_eq!(stats.extinguished, 1);
        assert_eq!(stats.active, 4);
        assert_eq!(stats.active + stats.extinguished, stats.total);
    }

    #[test]
    fn empty_store() {
        let stats = compute_statistics(&FireStore::new(), now(), &Moncton);
        assert_eq!(stats, FireStatistics::default());
    }

    #[test]
    fn day_buckets_follow_local_calendar() {
        // Local time in Moncton is UTC-3 in July, so now is 12:00 ADT on
        // 2024-07-15.
        let mut store = FireStore::new();
        for (id, detected) in [
            // 00:30 ADT on the 15th: today.
            ("today", "2024-07-15T03:30:00Z"),
            // 23:30 ADT on the 14th: one hour earlier, but yesterday.
            ("late", "2024-07-15T02:30:00Z"),
            // 12:00 ADT on the 14th: yesterday.
            ("noon", "2024-07-14T15:00:00Z"),
            // 23:00 ADT on the 13th: older than yesterday.
            ("older", "2024-07-14T02:00:00Z"),
        ] {
            let mut record =
                FireRecord::new(id, "Contained", LatLng::new(46.0, -66.0), FeedOrigin::Active);
            record.detected_at_ms = Some(ms(detected));
            store.insert(record);
        }

        let stats = compute_statistics(&store, now(), &Moncton);
        assert_eq!(stats.detected, DayCounts { today: 1, yesterday: 2 });
        assert_eq!(stats.extinguished_on, DayCounts::default());
    }

    #[test]
    fn same_instant_differs_by_zone() {
        let mut record = FireRecord::new(
            "X",
            "Extinguished",
            LatLng::new(46.0, -66.0),
            FeedOrigin::Extinguished,
        );
        // 01:00 UTC on the 15th is 22:00 ADT on the 14th.
        record.extinguished_at_ms = Some(ms("2024-07-15T01:00:00Z"));
        let mut store = FireStore::new();
        store.insert(record);

        let local = compute_statistics(&store, now(), &Moncton);
        assert_eq!(local.extinguished_on, DayCounts { today: 0, yesterday: 1 });

        let utc = compute_statistics(&store, now(), &Utc);
        assert_eq!(utc.extinguished_on, DayCounts { today: 1, yesterday: 0 });
    }

    #[test]
    fn yesterday_is_now_minus_24_hours() {
        let window = DayWindow::at(now(), &Moncton);
        assert_eq!(window.today, NaiveDate::from_ymd_opt(2024, 7, 15).unwrap());
        assert_eq!(window.yesterday, NaiveDate::from_ymd_opt(2024, 7, 14).unwrap());
    }

    #[test]
    fn yesterday_skips_a_day_after_spring_forward() {
        // Clocks moved from AST to ADT on 2024-03-10. 00:30 ADT on the 11th
        // minus 24 hours is 23:30 AST on the 9th.
        let now = DateTime::parse_from_rfc3339("2024-03-11T03:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let window = DayWindow::at(now, &Moncton);
        assert_eq!(window.today, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(window.yesterday, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());

        let mut store = FireStore::new();
        for (id, detected) in [
            // 01:00 ADT on the 11th.
            ("today", "2024-03-11T04:00:00Z"),
            // 12:00 ADT on the 10th: neither bucket.
            ("skipped", "2024-03-10T15:00:00Z"),
            // 22:00 AST on the 9th.
            ("yesterday", "2024-03-10T02:00:00Z"),
        ] {
            let mut record =
                FireRecord::new(id, "Contained", LatLng::new(46.0, -66.0), FeedOrigin::Active);
            record.detected_at_ms = Some(ms(detected));
            store.insert(record);
        }

        let stats = compute_statistics(&store, now, &Moncton);
        assert_eq!(stats.detected, DayCounts { today: 1, yesterday: 1 });
    }
}
