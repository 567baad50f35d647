use std::fmt::{Debug, Formatter};

use chrono::{DateTime, Local, TimeDelta};
use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

#[derive(Copy, Clone, Eq, PartialEq, Serialize)]
#[must_use]
pub struct Interval {
    /// Inclusive.
    pub start: DateTime<Local>,

    /// Inclusive.
    pub end: DateTime<Local>,
}

impl Debug for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..={:?}", self.start, self.end)
    }
}

impl Interval {
    pub const fn new(start: DateTime<Local>, end: DateTime<Local>) -> Self {
        Self { start, end }
    }

    /// Smallest interval covering all the timestamps, in any order.
    ///
    /// Returns [`None`] when there are no timestamps.
    pub fn spanning(timestamps: impl IntoIterator<Item = DateTime<Local>>) -> Option<Self> {
        match timestamps.into_iter().minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(timestamp) => Some(Self::new(timestamp, timestamp)),
            MinMaxResult::MinMax(start, end) => Some(Self::new(start, end)),
        }
    }

    #[must_use]
    pub fn duration(self) -> TimeDelta {
        self.end - self.start
    }
}
