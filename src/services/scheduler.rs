//! Daily run scheduling.
//!
//! The cadence math is a pure function over timestamps; the loop sleeps in
//! one-minute probes so a suspended host picks the schedule back up within
//! a minute of waking.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::time::sleep;
use tracing::{error, info};

use crate::domain::models::ScheduleConfig;

/// First instant at `hour:minute` UTC strictly after `now`.
pub fn next_run_after(now: DateTime<Utc>, hour: u32, minute: u32) -> DateTime<Utc> {
    let today = now
        .date_naive()
        .and_hms_opt(hour, minute, 0)
        .expect("schedule time validated at config load");
    let candidate = Utc.from_utc_datetime(&today);
    if candidate > now {
        candidate
    } else {
        candidate + chrono::Duration::days(1)
    }
}

/// Invokes a job once per day at the configured UTC time.
///
/// A failing run is logged and never stops the loop.
pub struct DailyScheduler {
    config: ScheduleConfig,
}

impl DailyScheduler {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    pub async fn run<F, Fut, T>(&self, mut job: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        info!(
            hour = self.config.hour,
            minute = self.config.minute,
            "scheduler started, running daily"
        );

        loop {
            let next = next_run_after(Utc::now(), self.config.hour, self.config.minute);
            info!(next_run = %next, "waiting for next scheduled run");

            loop {
                let now = Utc::now();
                if now >= next {
                    break;
                }
                let remaining = (next - now).to_std().unwrap_or(Duration::ZERO);
                sleep(remaining.min(Duration::from_secs(60))).await;
            }

            info!("scheduled run starting");
            match job().await {
                Ok(_) => info!("scheduled run finished"),
                Err(err) => error!(error = %err, "scheduled run failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(2025, 3, 10)
                .unwrap()
                .and_hms_opt(h, m, s)
                .unwrap(),
        )
    }

    #[test]
    fn target_later_today_runs_today() {
        let next = next_run_after(at(8, 0, 0), 12, 30);
        assert_eq!(next, at(12, 30, 0));
    }

    #[test]
    fn target_already_passed_runs_tomorrow() {
        let next = next_run_after(at(13, 0, 0), 12, 30);
        assert_eq!(next, at(12, 30, 0) + chrono::Duration::days(1));
    }

    #[test]
    fn exact_target_instant_runs_tomorrow() {
        let next = next_run_after(at(12, 30, 0), 12, 30);
        assert_eq!(next, at(12, 30, 0) + chrono::Duration::days(1));
    }
}
