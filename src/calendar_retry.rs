use std::time::Duration;

use crate::{CALENDAR_MAX_RETRIES, CALENDAR_RETRY_STEP};

/// Attempt counter for the calendar list fetch. Attempt `n` failing schedules
/// a retry after `(n + 1)` steps until the retry budget is spent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CalendarRetry {
    attempt: u32,
}

impl CalendarRetry {
    pub(crate) fn attempt(&self) -> u32 {
        self.attempt
    }

    pub(crate) fn on_failure(&mut self) -> Option<Duration> {
        if self.attempt >= CALENDAR_MAX_RETRIES {
            return None;
        }
        self.attempt += 1;
        Some(CALENDAR_RETRY_STEP * self.attempt)
    }
}
