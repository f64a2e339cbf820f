use chrono::{Local, NaiveDate};

/// Clock abstracts access to the current date so period state stays
/// deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns today's date in the device's local time zone.
    fn today(&self) -> NaiveDate;
}

/// Reads the date from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
