//! Viewpoint timestamps.
//!
//! The API takes two encodings of "now": a Zulu instant for auth and
//! mutation calls, and a local instant with a `±HH:MM` suffix for reads.
//! Reads of permits also take a validity window of thirty days.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Days, Duration, TimeZone, Utc};
use chrono_tz::Tz;

const ZULU_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Length of the permit validity window.
pub const VALIDITY_WINDOW_DAYS: u64 = 30;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Formats viewpoints against an injected clock and a fixed timezone.
#[derive(Clone)]
pub struct Timestamps {
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl fmt::Debug for Timestamps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timestamps")
            .field("timezone", &self.timezone)
            .finish_non_exhaustive()
    }
}

impl Timestamps {
    pub fn new(clock: Arc<dyn Clock>, timezone: Tz) -> Self {
        Self { clock, timezone }
    }

    pub fn system(timezone: Tz) -> Self {
        Self::new(Arc::new(SystemClock), timezone)
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// `YYYY-MM-DDTHH:MM:SS.sssZ`
    pub fn now_utc_zulu(&self) -> String {
        format_zulu(self.clock.now())
    }

    /// `YYYY-MM-DDTHH:MM:SS.sss±HH:MM` in the configured timezone.
    pub fn now_with_offset(&self) -> String {
        format_offset(&self.local_now())
    }

    /// `<now>/<now + 30 days>`, both in the configured timezone.
    pub fn validity_window(&self) -> String {
        let start = self.local_now();
        let end = add_days_local(start, VALIDITY_WINDOW_DAYS);
        format!("{}/{}", format_offset(&start), format_offset(&end))
    }

    fn local_now(&self) -> DateTime<Tz> {
        self.clock.now().with_timezone(&self.timezone)
    }
}

fn format_zulu(instant: DateTime<Utc>) -> String {
    instant.format(ZULU_FORMAT).to_string()
}

fn format_offset<T>(instant: &DateTime<T>) -> String
where
    T: TimeZone,
    T::Offset: fmt::Display,
{
    instant.format(OFFSET_FORMAT).to_string()
}

// Calendar-day arithmetic keeps the wall clock across DST changes; the
// offset of the end point is recomputed for its own date.
fn add_days_local(start: DateTime<Tz>, days: u64) -> DateTime<Tz> {
    start
        .checked_add_days(Days::new(days))
        .unwrap_or_else(|| start + Duration::days(days as i64))
}
