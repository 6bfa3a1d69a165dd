//! Holiday calendars: dates on which no open time is counted.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A named closed date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    #[serde(default)]
    pub name: String,
    pub date: NaiveDate,
}

impl Holiday {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
        }
    }
}

/// Set of fully closed calendar dates.
///
/// Deserializes from a list whose items are either `"YYYY-MM-DD"` strings or
/// `{ "name": ..., "date": "YYYY-MM-DD" }` records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<HolidayEntry>", into = "Vec<NaiveDate>")]
pub struct HolidaySet {
    dates: BTreeSet<NaiveDate>,
}

impl HolidaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the date was not already present.
    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of holidays in `from..=to`.
    pub fn count_between(&self, from: NaiveDate, to: NaiveDate) -> usize {
        if to < from {
            return 0;
        }
        self.dates.range(from..=to).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<Holiday> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = Holiday>>(iter: I) -> Self {
        iter.into_iter().map(|h| h.date).collect()
    }
}

impl Extend<NaiveDate> for HolidaySet {
    fn extend<I: IntoIterator<Item = NaiveDate>>(&mut self, iter: I) {
        self.dates.extend(iter);
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HolidayEntry {
    Date(NaiveDate),
    Record(Holiday),
}

impl From<Vec<HolidayEntry>> for HolidaySet {
    fn from(entries: Vec<HolidayEntry>) -> Self {
        entries
            .into_iter()
            .map(|entry| match entry {
                HolidayEntry::Date(date) => date,
                HolidayEntry::Record(holiday) => holiday.date,
            })
            .collect()
    }
}

impl From<HolidaySet> for Vec<NaiveDate> {
    fn from(set: HolidaySet) -> Self {
        set.dates.into_iter().collect()
    }
}
