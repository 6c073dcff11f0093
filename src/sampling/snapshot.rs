//! Immutable point-in-time copies of a reservoir

use crate::statistics;
use crate::traits::Sample;

/// A frozen copy of a reservoir's state at the moment
/// [`snapshot`](Sample::snapshot) was called.
///
/// The snapshot owns its value array, so it stays valid and unchanged while
/// the source reservoir keeps absorbing updates, resizes its storage, or is
/// dropped. It implements the read half of [`Sample`];
/// [`update`](Sample::update) and [`clear`](Sample::clear) panic.
///
/// # Example
///
/// ```
/// use streamsample::prelude::*;
///
/// let sample = UniformSample::new(100).unwrap();
/// for i in 0..100 {
///     sample.update(i);
/// }
///
/// let snapshot = sample.snapshot();
/// sample.update(1_000_000);
///
/// // The snapshot still describes the first 100 observations.
/// assert_eq!(snapshot.count(), 100);
/// assert_eq!(snapshot.max(), 99);
/// ```
#[derive(Clone, Debug)]
pub struct SampleSnapshot {
    count: i64,
    values: Vec<i64>,
}

impl SampleSnapshot {
    pub(crate) fn new(count: i64, values: Vec<i64>) -> Self {
        Self { count, values }
    }
}

impl Sample for SampleSnapshot {
    /// Snapshots are immutable.
    ///
    /// # Panics
    ///
    /// Always.
    fn update(&self, _value: i64) {
        panic!("update called on a SampleSnapshot");
    }

    /// Snapshots are immutable.
    ///
    /// # Panics
    ///
    /// Always.
    fn clear(&self) {
        panic!("clear called on a SampleSnapshot");
    }

    fn count(&self) -> i64 {
        self.count
    }

    fn size(&self) -> usize {
        self.values.len()
    }

    fn values(&self) -> Vec<i64> {
        self.values.clone()
    }

    fn snapshot(&self) -> SampleSnapshot {
        self.clone()
    }

    fn min(&self) -> i64 {
        statistics::min(&self.values)
    }

    fn max(&self) -> i64 {
        statistics::max(&self.values)
    }

    fn sum(&self) -> i64 {
        statistics::sum(&self.values)
    }

    fn mean(&self) -> f64 {
        statistics::mean(&self.values)
    }

    fn variance(&self) -> f64 {
        statistics::variance(&self.values)
    }

    fn std_dev(&self) -> f64 {
        statistics::std_dev(&self.values)
    }

    fn percentile(&self, q: f64) -> f64 {
        statistics::percentile(&self.values, q)
    }

    fn percentiles(&self, qs: &[f64]) -> Vec<f64> {
        statistics::percentiles(&self.values, qs)
    }
}
