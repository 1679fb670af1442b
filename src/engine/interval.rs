// src/engine/interval.rs
use std::fmt;
use std::ops::RangeInclusive;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::error::{KempnerResult, KempnerError};

/// Inclusive, 1-indexed range of integers handed to one worker.
///
/// `start > end` only happens for the leading intervals of a partition
/// with more tasks than integers; such an interval is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: u64,
    pub end: u64,
}

impl Interval {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of integers in the interval
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn contains(&self, i: u64) -> bool {
        self.start <= i && i <= self.end
    }

    /// Ascending iterator over the integers of the interval
    pub fn iter(&self) -> RangeInclusive<u64> {
        self.start..=self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

/// Ordered, disjoint intervals whose union is exactly `[1, n]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    pub fn into_vec(self) -> Vec<Interval> {
        self.intervals
    }

    /// Total count of integers covered by all intervals
    pub fn covered(&self) -> u64 {
        self.intervals.iter().map(Interval::len).sum()
    }

    /// Upper bound of the last interval, i.e. `n`
    pub fn upper_bound(&self) -> Option<u64> {
        self.intervals.last().map(|interval| interval.end)
    }
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, interval) in self.intervals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", interval)?;
        }
        write!(f, "]")
    }
}

impl IntoIterator for IntervalSet {
    type Item = Interval;
    type IntoIter = std::vec::IntoIter<Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.into_iter()
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

/// Split `[1, n]` into `ntasks` contiguous intervals of `n / ntasks`
/// integers each; the last interval absorbs the remainder.
///
/// With `ntasks > n` the batch size is zero, so every interval but the
/// last is empty and the last one is `(1, n)`.
pub fn partition(n: u64, ntasks: u64) -> KempnerResult<IntervalSet> {
    if n < 1 {
        return Err(KempnerError::InvalidConfiguration(format!("n must be at least 1, got {}", n)));
    }
    if ntasks < 1 {
        return Err(KempnerError::InvalidConfiguration(format!("ntasks must be at least 1, got {}", ntasks)));
    }

    let count = usize::try_from(ntasks)
        .map_err(|_| KempnerError::InvalidConfiguration(format!("ntasks {} does not fit in memory", ntasks)))?;

    let mut intervals: Vec<Interval> = Vec::new();
    intervals.try_reserve_exact(count)
        .map_err(|e| KempnerError::InvalidConfiguration(format!("cannot allocate {} intervals: {}", ntasks, e)))?;

    let size = n / ntasks;
    intervals.extend((0..ntasks).map(|i| Interval::new(i * size + 1, (i + 1) * size)));

    if let Some(last) = intervals.last_mut() {
        if n > last.end {
            last.end = n;
        }
    }

    if ntasks > n {
        debug!("Partition of {} integers into {} tasks leaves {} empty intervals", n, ntasks, ntasks - 1);
    }
    debug!("Partitioned [1, {}] into {} intervals of size {}", n, ntasks, size);

    Ok(IntervalSet { intervals })
}
