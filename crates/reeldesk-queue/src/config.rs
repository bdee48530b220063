//! Scheduler configuration.
//!
//! Defaults match the editorial posting policy; every knob can be
//! overridden through the environment.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Timelike, Utc};

use reeldesk_models::Platform;

/// A daily window during which no computed slot may land, as UTC hours
/// `[start, end)`. Windows may wrap midnight (e.g. 23-2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl QuietWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour: start_hour % 24,
            end_hour: end_hour % 24,
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            (self.start_hour..self.end_hour).contains(&hour)
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }

    /// The earliest instant at or after `slot` that clears this window.
    pub fn end_after(&self, slot: DateTime<Utc>) -> DateTime<Utc> {
        let same_day = match slot.date_naive().and_hms_opt(self.end_hour, 0, 0) {
            Some(naive) => naive.and_utc(),
            None => return slot,
        };
        if same_day > slot {
            same_day
        } else {
            same_day + Duration::days(1)
        }
    }
}

/// Posting-queue scheduling policy.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Global spacing override; per-platform defaults apply when unset
    pub min_interval_override: Option<Duration>,
    /// Lead time before a platform's first post
    pub first_post_lead: Duration,
    /// Daily no-post windows for computed slots
    pub quiet_windows: Vec<QuietWindow>,
    /// Pending entries to keep queued per platform
    pub buffer_target: usize,
    /// Courtesy pause between consecutive publish calls
    pub inter_post_delay: StdDuration,
    /// Log instead of calling the publish collaborator
    pub dry_run: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_interval_override: None,
            first_post_lead: Duration::hours(1),
            quiet_windows: vec![QuietWindow::new(23, 2), QuietWindow::new(2, 6)],
            buffer_target: 5,
            inter_post_delay: StdDuration::from_secs(2),
            dry_run: false,
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_interval_override: env_i64("SCHEDULER_MIN_INTERVAL_HOURS").map(Duration::hours),
            first_post_lead: env_i64("SCHEDULER_FIRST_POST_LEAD_HOURS")
                .map(Duration::hours)
                .unwrap_or(defaults.first_post_lead),
            quiet_windows: std::env::var("SCHEDULER_QUIET_HOURS")
                .ok()
                .map(|raw| parse_quiet_windows(&raw))
                .unwrap_or(defaults.quiet_windows),
            buffer_target: env_i64("SCHEDULER_BUFFER_TARGET")
                .map(|n| n.max(0) as usize)
                .unwrap_or(defaults.buffer_target),
            inter_post_delay: env_i64("SCHEDULER_INTER_POST_DELAY_MS")
                .map(|ms| StdDuration::from_millis(ms.max(0) as u64))
                .unwrap_or(defaults.inter_post_delay),
            dry_run: std::env::var("SCHEDULER_DRY_RUN")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.dry_run),
        }
    }

    /// Minimum spacing between two posts on `platform`.
    pub fn min_interval(&self, platform: Platform) -> Duration {
        self.min_interval_override.unwrap_or_else(|| {
            Duration::from_std(platform.default_min_interval()).unwrap_or_else(|_| Duration::hours(6))
        })
    }

    /// Push a computed slot past any quiet window it lands in.
    ///
    /// Only allocator-computed slots go through this; explicit
    /// caller-supplied times are taken verbatim.
    pub fn apply_quiet_hours(&self, slot: DateTime<Utc>) -> DateTime<Utc> {
        shift_past_quiet_hours(&self.quiet_windows, slot)
    }
}

/// Push `slot` past every quiet window it lands in.
///
/// Windows can cascade (23-2 feeding into 2-6), so this iterates until
/// the slot clears all of them.
pub fn shift_past_quiet_hours(windows: &[QuietWindow], mut slot: DateTime<Utc>) -> DateTime<Utc> {
    for _ in 0..=windows.len() {
        match windows.iter().find(|w| w.contains(slot.hour())) {
            Some(window) => slot = window.end_after(slot),
            None => break,
        }
    }
    slot
}

fn env_i64(key: &str) -> Option<i64> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Parse "23-2,2-6" into quiet windows, skipping malformed pieces.
fn parse_quiet_windows(raw: &str) -> Vec<QuietWindow> {
    raw.split(',')
        .filter_map(|piece| {
            let (start, end) = piece.trim().split_once('-')?;
            Some(QuietWindow::new(start.parse().ok()?, end.parse().ok()?))
        })
        .collect()
}
