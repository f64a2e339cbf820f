use chrono::NaiveDate;

use crate::time::Clock;

use super::{
    date_range_for_period, format_period_label, navigate_period, DateRange, Direction, PeriodType,
};

/// Period picker state owned by a single screen.
///
/// The derived [`DateRange`] is recomputed on every mutation, so `range()`
/// always matches the current period type and reference date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSelection {
    period_type: PeriodType,
    reference_date: NaiveDate,
    range: DateRange,
}

impl PeriodSelection {
    pub fn new(period_type: PeriodType, reference_date: NaiveDate) -> Self {
        Self {
            period_type,
            reference_date,
            range: date_range_for_period(reference_date, period_type),
        }
    }

    /// Selection of the period containing today.
    pub fn starting_today(period_type: PeriodType, clock: &dyn Clock) -> Self {
        Self::new(period_type, clock.today())
    }

    pub fn period_type(&self) -> PeriodType {
        self.period_type
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn label(&self) -> String {
        format_period_label(self.reference_date, self.period_type)
    }

    pub fn set_period_type(&mut self, period_type: PeriodType) {
        if self.period_type != period_type {
            self.period_type = period_type;
            self.recompute();
        }
    }

    pub fn set_reference_date(&mut self, reference_date: NaiveDate) {
        if self.reference_date != reference_date {
            self.reference_date = reference_date;
            self.recompute();
        }
    }

    /// Steps to the adjacent period and returns the new range.
    pub fn navigate(&mut self, direction: Direction) -> DateRange {
        self.reference_date = navigate_period(self.reference_date, self.period_type, direction);
        self.recompute();
        self.range
    }

    pub fn reset_to_today(&mut self, clock: &dyn Clock) {
        self.set_reference_date(clock.today());
    }

    /// Whether the selected period contains today.
    pub fn is_current(&self, clock: &dyn Clock) -> bool {
        self.range.contains(clock.today())
    }

    fn recompute(&mut self) {
        self.range = date_range_for_period(self.reference_date, self.period_type);
        tracing::debug!(
            period = self.period_type.as_str(),
            range = %self.range,
            "period selection changed"
        );
    }
}

impl Default for PeriodSelection {
    /// Month view of the current date, the initial state of both the home and
    /// analytics screens.
    fn default() -> Self {
        Self::starting_today(PeriodType::Month, &crate::time::SystemClock)
    }
}
