//! Uniform reservoir sampling (Algorithm R)

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::sampling::{resize, SampleSnapshot};
use crate::statistics;
use crate::traits::{ConfigError, Sample};

/// A uniform reservoir sampler over a stream of `i64` observations.
///
/// Maintains a bounded sample in which every observation seen so far has
/// equal probability of being retained (Vitter's Algorithm R): the first `k`
/// observations fill the reservoir, after which observation `n` replaces a
/// random slot with probability `k/n`.
///
/// The sampler is internally synchronized: share it across threads behind an
/// `Arc` and call [`update`](Sample::update) from all of them. Reads go
/// through [`snapshot`](Sample::snapshot) or the statistical accessors, all
/// of which observe a consistent state.
///
/// The [`auto_sized`](UniformSample::auto_sized) variant re-fits its backing
/// capacity at every snapshot to the update rate observed since the previous
/// one, so reservoirs on quiet streams release most of their memory between
/// scrapes.
///
/// # Example
///
/// ```
/// use streamsample::prelude::*;
///
/// let sample = UniformSample::new(100).unwrap();
/// for i in 0..10_000 {
///     sample.update(i);
/// }
///
/// assert_eq!(sample.count(), 10_000);
/// assert_eq!(sample.size(), 100);
///
/// let snapshot = sample.snapshot();
/// println!("p99 = {}", snapshot.percentile(0.99));
/// ```
#[derive(Debug)]
pub struct UniformSample {
    reservoir_max: usize,
    auto_sized: bool,
    inner: Mutex<UniformInner>,
}

#[derive(Debug)]
struct UniformInner {
    values: Vec<i64>,
    capacity: usize,
    count: i64,
    updates_since_snapshot: u64,
    rng: StdRng,
}

impl UniformSample {
    /// Create a fixed-size reservoir retaining at most `reservoir_max`
    /// observations, allocated up front.
    pub fn new(reservoir_max: usize) -> Result<Self, ConfigError> {
        Self::build(reservoir_max, false, StdRng::from_entropy())
    }

    /// Like [`new`](Self::new), with a deterministic seed for the slot RNG.
    pub fn with_seed(reservoir_max: usize, seed: u64) -> Result<Self, ConfigError> {
        Self::build(reservoir_max, false, StdRng::seed_from_u64(seed))
    }

    /// Create an auto-sized reservoir whose backing capacity adapts to the
    /// update rate between snapshots, capped at `reservoir_max`.
    pub fn auto_sized(reservoir_max: usize) -> Result<Self, ConfigError> {
        Self::build(reservoir_max, true, StdRng::from_entropy())
    }

    /// Like [`auto_sized`](Self::auto_sized), with a deterministic seed.
    pub fn auto_sized_with_seed(reservoir_max: usize, seed: u64) -> Result<Self, ConfigError> {
        Self::build(reservoir_max, true, StdRng::seed_from_u64(seed))
    }

    /// The configured maximum number of retained samples.
    pub fn reservoir_max(&self) -> usize {
        self.reservoir_max
    }

    /// Current backing capacity. Equal to
    /// [`reservoir_max`](Self::reservoir_max) for fixed-size reservoirs.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity
    }

    fn build(reservoir_max: usize, auto_sized: bool, rng: StdRng) -> Result<Self, ConfigError> {
        if reservoir_max == 0 {
            return Err(ConfigError::ZeroReservoirSize);
        }
        Ok(Self {
            reservoir_max,
            auto_sized,
            inner: Mutex::new(UniformInner {
                values: Vec::with_capacity(reservoir_max),
                capacity: reservoir_max,
                count: 0,
                updates_since_snapshot: 0,
                rng,
            }),
        })
    }
}

impl Sample for UniformSample {
    fn update(&self, value: i64) {
        self.inner.lock().record(value);
    }

    fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.values = Vec::with_capacity(self.reservoir_max);
        inner.capacity = self.reservoir_max;
        inner.count = 0;
        inner.updates_since_snapshot = 0;
    }

    fn count(&self) -> i64 {
        self.inner.lock().count
    }

    fn size(&self) -> usize {
        self.inner.lock().values.len()
    }

    fn values(&self) -> Vec<i64> {
        self.inner.lock().values.clone()
    }

    fn snapshot(&self) -> SampleSnapshot {
        let mut inner = self.inner.lock();
        let snapshot = SampleSnapshot::new(inner.count, inner.values.clone());
        if self.auto_sized {
            inner.refit_capacity(self.reservoir_max);
        }
        inner.updates_since_snapshot = 0;
        snapshot
    }

    fn min(&self) -> i64 {
        statistics::min(&self.inner.lock().values)
    }

    fn max(&self) -> i64 {
        statistics::max(&self.inner.lock().values)
    }

    fn sum(&self) -> i64 {
        statistics::sum(&self.inner.lock().values)
    }

    fn mean(&self) -> f64 {
        statistics::mean(&self.inner.lock().values)
    }

    fn variance(&self) -> f64 {
        statistics::variance(&self.inner.lock().values)
    }

    fn std_dev(&self) -> f64 {
        statistics::std_dev(&self.inner.lock().values)
    }

    fn percentile(&self, q: f64) -> f64 {
        statistics::percentile(&self.inner.lock().values, q)
    }

    fn percentiles(&self, qs: &[f64]) -> Vec<f64> {
        statistics::percentiles(&self.inner.lock().values, qs)
    }
}

impl UniformInner {
    fn record(&mut self, value: i64) {
        self.count += 1;
        self.updates_since_snapshot += 1;
        if self.values.len() < self.capacity {
            self.values.push(value);
        } else {
            let slot = self.rng.gen_range(0..self.count);
            if (slot as usize) < self.capacity {
                self.values[slot as usize] = value;
            }
        }
    }

    /// Apply one step of the auto-resize schedule at a snapshot boundary.
    fn refit_capacity(&mut self, reservoir_max: usize) {
        let next = resize::next_capacity(self.capacity, self.updates_since_snapshot, reservoir_max);
        if next == self.capacity {
            return;
        }
        if self.values.len() > next {
            // Keep a uniformly chosen subset so the retained set remains a
            // valid Algorithm R sample of the stream.
            for i in 0..next {
                let j = self.rng.gen_range(i..self.values.len());
                self.values.swap(i, j);
            }
            self.values.truncate(next);
        }
        let mut values = Vec::with_capacity(next);
        values.append(&mut self.values);
        self.values = values;
        self.capacity = next;
    }
}
