use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use futures::future::join_all;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{api::push::PushMessage, app_state::AppState, models::Booking};

/// Today's lookahead window, already rendered into the store's string
/// encoding of civil date and time.
#[derive(Debug, Clone)]
pub struct ReminderWindow {
    pub date: String,
    pub from: String,
    pub until: String,
}

impl ReminderWindow {
    /// Window starting at `now` (clinic-local) and spanning `lookahead`
    /// forward.
    pub fn at(now: DateTime<Tz>, lookahead: Duration) -> Self {
        let end = now + lookahead;
        Self {
            date: now.format("%Y-%m-%d").to_string(),
            from: now.format("%H:%M").to_string(),
            until: end.format("%H:%M").to_string(),
        }
    }

    /// Lexicographic containment test. Sound only because both sides are
    /// zero-padded `HH:MM` strings.
    pub fn contains(&self, start_time: &str) -> bool {
        self.from.as_str() <= start_time && start_time <= self.until.as_str()
    }
}

enum ReminderStatus {
    Sent,
    SkippedMissingDoctor,
    SkippedNoToken,
}

#[derive(Debug, Default)]
pub struct ScanReport {
    pub matched: usize,
    pub sent: usize,
    pub skipped: usize,
}

/// One scheduler tick: read the clock, build the window, scan it.
pub async fn scan_once(state: &AppState) -> Result<ScanReport> {
    let now = Utc::now().with_timezone(&state.config.clinic_tz);
    let lookahead = Duration::minutes(state.config.reminder_lookahead_mins);
    scan_window(state, &ReminderWindow::at(now, lookahead)).await
}

/// Query the day's bookings, keep the ones starting inside the window and
/// fan out one reminder per booking. Every dispatch is attempted before a
/// failure is reported, so one bad send never cancels its siblings.
pub async fn scan_window(state: &AppState, window: &ReminderWindow) -> Result<ScanReport> {
    let scan_id = Uuid::new_v4();
    let bookings = state
        .store
        .bookings_on(&window.date)
        .await
        .context("Failed to query bookings")?;

    let due: Vec<Booking> = bookings
        .into_iter()
        .filter(|booking| window.contains(&booking.start_time))
        .collect();
    info!(
        "[scan {scan_id}] {} booking(s) start within {}-{} on {}",
        due.len(),
        window.from,
        window.until,
        window.date
    );

    let results = join_all(due.iter().map(|booking| remind(state, booking))).await;

    let mut report = ScanReport {
        matched: due.len(),
        ..Default::default()
    };
    let mut first_failure = None;
    for (booking, result) in due.iter().zip(results) {
        match result {
            Ok(ReminderStatus::Sent) => report.sent += 1,
            Ok(_) => report.skipped += 1,
            Err(err) => {
                error!(
                    "[scan {scan_id}] Reminder for booking {} failed: {err:#}",
                    booking.id
                );
                first_failure.get_or_insert(err);
            }
        }
    }

    if let Some(err) = first_failure {
        return Err(err.context("One or more reminder dispatches failed"));
    }
    Ok(report)
}

async fn remind(state: &AppState, booking: &Booking) -> Result<ReminderStatus> {
    let Some(doctor) = state.store.doctor(&booking.doctor_id).await? else {
        warn!(
            "Booking {} references unknown doctor {}, skipping reminder",
            booking.id, booking.doctor_id
        );
        return Ok(ReminderStatus::SkippedMissingDoctor);
    };

    let Some(token) = doctor.push_token else {
        warn!(
            "Doctor {} has no push token, skipping reminder for booking {}",
            booking.doctor_id, booking.id
        );
        return Ok(ReminderStatus::SkippedNoToken);
    };

    state
        .push
        .send(PushMessage {
            token,
            title: "Appointment Reminder".into(),
            body: format!(
                "Upcoming appointment with {} at {}",
                booking.patient_name, booking.start_time
            ),
            sound: None,
            data: None,
        })
        .await?;

    info!(
        "Reminded doctor {} about booking {}",
        booking.doctor_id, booking.id
    );
    Ok(ReminderStatus::Sent)
}

/// Background loop driving `scan_once` at the configured cadence. A failed
/// scan is logged; the next tick starts from fresh state. Overlapping ticks
/// are not coordinated, so a booking sitting in two consecutive windows is
/// reminded twice.
pub async fn run(state: AppState) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(
        state.config.reminder_interval_secs,
    ));
    loop {
        interval.tick().await;
        match scan_once(&state).await {
            Ok(report) => info!(
                "Reminder scan complete: {} matched, {} sent, {} skipped",
                report.matched, report.sent, report.skipped
            ),
            Err(err) => error!("Reminder scan failed: {err:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;

    use super::*;
    use crate::testutil::{FakeStore, RecordingPush, booking, doctor, test_state};

    fn window_at(hour: u32, min: u32) -> ReminderWindow {
        let now = Tz::Africa__Johannesburg
            .with_ymd_and_hms(2024, 6, 1, hour, min, 0)
            .unwrap();
        ReminderWindow::at(now, Duration::minutes(15))
    }

    #[test]
    fn window_strings_are_zero_padded() {
        let window = window_at(9, 5);
        assert_eq!(window.date, "2024-06-01");
        assert_eq!(window.from, "09:05");
        assert_eq!(window.until, "09:20");
    }

    #[test]
    fn containment_is_lexicographic_on_padded_times() {
        let window = window_at(9, 5);
        assert!(window.contains("09:05"));
        assert!(window.contains("09:15"));
        assert!(!window.contains("08:55"));
        assert!("09:05" < "10:00");
    }

    #[test]
    fn fifteen_minute_window_keeps_ten_oclock_start() {
        let window = window_at(9, 50);
        assert!(window.contains("10:00"));
        assert!(!window.contains("10:10"));
    }

    #[tokio::test]
    async fn scan_reminds_each_due_booking_once() {
        let mut store = FakeStore::default();
        store.bookings.push(booking("b1", "d1", "2024-06-01", "10:00"));
        store.bookings.push(booking("b2", "d1", "2024-06-01", "12:00"));
        store.bookings.push(booking("b3", "d1", "2024-06-02", "10:00"));
        store.doctors.insert("d1".into(), doctor("d1", Some("tok-1")));
        let push = Arc::new(RecordingPush::default());
        let state = test_state(store, push.clone());

        let report = scan_window(&state, &window_at(9, 50)).await.unwrap();

        assert_eq!(report.matched, 1);
        assert_eq!(report.sent, 1);
        assert_eq!(report.skipped, 0);
        let sent = push.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].token, "tok-1");
        assert_eq!(sent[0].title, "Appointment Reminder");
        assert!(sent[0].body.contains("Jane Mokoena"));
    }

    #[tokio::test]
    async fn missing_doctor_and_missing_token_are_soft_skips() {
        let mut store = FakeStore::default();
        store.bookings.push(booking("b1", "ghost", "2024-06-01", "09:55"));
        store.bookings.push(booking("b2", "d2", "2024-06-01", "10:00"));
        store.doctors.insert("d2".into(), doctor("d2", None));
        let push = Arc::new(RecordingPush::default());
        let state = test_state(store, push.clone());

        let report = scan_window(&state, &window_at(9, 50)).await.unwrap();

        assert_eq!(report.matched, 2);
        assert_eq!(report.sent, 0);
        assert_eq!(report.skipped, 2);
        assert!(push.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_dispatch_fails_scan_after_all_attempts() {
        let mut store = FakeStore::default();
        store.bookings.push(booking("b1", "d1", "2024-06-01", "09:55"));
        store.bookings.push(booking("b2", "d2", "2024-06-01", "10:00"));
        store.doctors.insert("d1".into(), doctor("d1", Some("tok-bad")));
        store.doctors.insert("d2".into(), doctor("d2", Some("tok-ok")));
        let push = Arc::new(RecordingPush {
            failing_tokens: vec!["tok-bad".into()],
            ..Default::default()
        });
        let state = test_state(store, push.clone());

        let result = scan_window(&state, &window_at(9, 50)).await;

        assert!(result.is_err());
        assert_eq!(*push.attempts.lock().unwrap(), 2);
        let sent = push.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].token, "tok-ok");
    }

    #[tokio::test]
    async fn overlapping_scans_double_notify() {
        let mut store = FakeStore::default();
        store.bookings.push(booking("b1", "d1", "2024-06-01", "10:00"));
        store.doctors.insert("d1".into(), doctor("d1", Some("tok-1")));
        let push = Arc::new(RecordingPush::default());
        let state = test_state(store, push.clone());

        scan_window(&state, &window_at(9, 50)).await.unwrap();
        scan_window(&state, &window_at(9, 55)).await.unwrap();

        assert_eq!(push.sent.lock().unwrap().len(), 2);
    }
}
