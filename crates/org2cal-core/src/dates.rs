//! The set of calendar dates selected for export.

use std::collections::BTreeSet;

use chrono::NaiveDate;

/// Calendar dates whose clock entries should be exported.
///
/// Only membership matters, so the order in which dates were added has no
/// effect on the output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateSet {
    dates: BTreeSet<NaiveDate>,
}

impl DateSet {
    /// Every date from `start` to `end`, inclusive.
    ///
    /// Empty when `start` is after `end`.
    pub fn from_range(start: NaiveDate, end: NaiveDate) -> Self {
        start.iter_days().take_while(|d| *d <= end).collect()
    }

    /// A set holding exactly one date.
    pub fn single(date: NaiveDate) -> Self {
        std::iter::once(date).collect()
    }

    /// Whether `date` is selected.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Earliest and latest selected dates, if any.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }
}

impl FromIterator<NaiveDate> for DateSet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}
