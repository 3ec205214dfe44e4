use chrono::{Datelike, Days, NaiveDate, Utc};
use std::fmt;

/// The calendar week a fixtures request covers: Sunday of the current week
/// through the following Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl WeekWindow {
    pub fn containing(today: NaiveDate) -> Self {
        let since_sunday = u64::from(today.weekday().num_days_from_sunday());
        let date_from = today - Days::new(since_sunday);
        WeekWindow {
            date_from,
            date_to: date_from + Days::new(7),
        }
    }

    /// Window for today's UTC date.
    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    pub fn date_from_param(&self) -> String {
        self.date_from.format("%Y-%m-%d").to_string()
    }

    pub fn date_to_param(&self) -> String {
        self.date_to.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.date_from_param(), self.date_to_param())
    }
}
