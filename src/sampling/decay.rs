//! Forward-decaying reservoir sampling
//!
//! Priority sampling under the forward decay model of Cormode, Shkapenyuk,
//! Srivastava and Vitter (2009): each observation gets weight
//! `exp(alpha * t)` for `t` seconds since a landmark, its priority is that
//! weight divided by a uniform draw from (0, 1), and the reservoir keeps the
//! top-priority observations. Recent observations therefore dominate the
//! sample, with `alpha` controlling how quickly old ones fade.
//!
//! Priorities grow without bound as wall time advances, so once per hour the
//! landmark moves forward and every retained priority is scaled by
//! `exp(-alpha * dt)` in place. The scaling is uniform and positive, which
//! keeps the heap ordering and the sampling distribution intact while
//! keeping the exponents bounded.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::distributions::Open01;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::sampling::heap::PriorityHeap;
use crate::sampling::{resize, SampleSnapshot};
use crate::statistics;
use crate::traits::{ConfigError, Sample};

/// Interval between landmark rescales.
///
/// Weights are computed from seconds since the landmark, so within one
/// period the largest exponent is `alpha * 3600`, comfortably inside `f64`
/// range for practical decay rates.
pub(crate) const RESCALE_PERIOD: Duration = Duration::from_secs(60 * 60);

/// An exponentially decaying reservoir sampler over a stream of `i64`
/// observations.
///
/// Where [`UniformSample`](crate::sampling::UniformSample) represents the
/// whole stream, this reservoir represents roughly the recent past: the
/// probability that an observation is retained decays exponentially with its
/// age. Cormode et al. suggest `alpha = 0.015` for a bias toward the last
/// five minutes.
///
/// Like the uniform reservoir it is internally synchronized, supports fixed
/// and [`auto_sized`](ExpDecaySample::auto_sized) capacity, and produces
/// immutable snapshots.
///
/// # Example
///
/// ```
/// use streamsample::prelude::*;
///
/// let sample = ExpDecaySample::new(1028, 0.015).unwrap();
/// for i in 0..100 {
///     sample.update(i);
/// }
///
/// assert_eq!(sample.count(), 100);
/// assert_eq!(sample.size(), 100);
/// ```
#[derive(Debug)]
pub struct ExpDecaySample {
    reservoir_max: usize,
    auto_sized: bool,
    alpha: f64,
    inner: Mutex<DecayInner>,
}

#[derive(Debug)]
struct DecayInner {
    heap: PriorityHeap,
    count: i64,
    updates_since_snapshot: u64,
    landmark: Instant,
    next_rescale: Instant,
    rng: StdRng,
}

impl ExpDecaySample {
    /// Create a fixed-size decaying reservoir retaining at most
    /// `reservoir_max` observations with decay rate `alpha`.
    pub fn new(reservoir_max: usize, alpha: f64) -> Result<Self, ConfigError> {
        Self::build(reservoir_max, alpha, false, StdRng::from_entropy())
    }

    /// Like [`new`](Self::new), with a deterministic seed for the priority RNG.
    pub fn with_seed(reservoir_max: usize, alpha: f64, seed: u64) -> Result<Self, ConfigError> {
        Self::build(reservoir_max, alpha, false, StdRng::seed_from_u64(seed))
    }

    /// Create an auto-sized decaying reservoir whose backing capacity adapts
    /// to the update rate between snapshots, capped at `reservoir_max`.
    pub fn auto_sized(reservoir_max: usize, alpha: f64) -> Result<Self, ConfigError> {
        Self::build(reservoir_max, alpha, true, StdRng::from_entropy())
    }

    /// Like [`auto_sized`](Self::auto_sized), with a deterministic seed.
    pub fn auto_sized_with_seed(
        reservoir_max: usize,
        alpha: f64,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::build(reservoir_max, alpha, true, StdRng::seed_from_u64(seed))
    }

    /// Record one observation as of `time`.
    ///
    /// [`update`](Sample::update) is this with `Instant::now()`. Passing
    /// explicit instants exists for replaying recorded streams and for
    /// deterministic tests; instants must be non-decreasing across calls on
    /// the same reservoir.
    pub fn update_at(&self, time: Instant, value: i64) {
        self.inner.lock().record_at(self.alpha, time, value);
    }

    /// The configured decay rate.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The configured maximum number of retained samples.
    pub fn reservoir_max(&self) -> usize {
        self.reservoir_max
    }

    /// Current backing capacity. Equal to
    /// [`reservoir_max`](Self::reservoir_max) for fixed-size reservoirs.
    pub fn capacity(&self) -> usize {
        self.inner.lock().heap.capacity()
    }

    fn build(
        reservoir_max: usize,
        alpha: f64,
        auto_sized: bool,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        if reservoir_max == 0 {
            return Err(ConfigError::ZeroReservoirSize);
        }
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(ConfigError::NonPositiveAlpha { alpha });
        }
        let landmark = Instant::now();
        Ok(Self {
            reservoir_max,
            auto_sized,
            alpha,
            inner: Mutex::new(DecayInner {
                heap: PriorityHeap::with_capacity(reservoir_max),
                count: 0,
                updates_since_snapshot: 0,
                landmark,
                next_rescale: landmark + RESCALE_PERIOD,
                rng,
            }),
        })
    }
}

impl Sample for ExpDecaySample {
    fn update(&self, value: i64) {
        self.update_at(Instant::now(), value);
    }

    fn clear(&self) {
        let landmark = Instant::now();
        let mut inner = self.inner.lock();
        inner.heap.clear();
        inner.heap.set_capacity(self.reservoir_max);
        inner.count = 0;
        inner.updates_since_snapshot = 0;
        inner.landmark = landmark;
        inner.next_rescale = landmark + RESCALE_PERIOD;
    }

    fn count(&self) -> i64 {
        self.inner.lock().count
    }

    fn size(&self) -> usize {
        self.inner.lock().heap.len()
    }

    fn values(&self) -> Vec<i64> {
        self.inner.lock().heap.values()
    }

    fn snapshot(&self) -> SampleSnapshot {
        let mut inner = self.inner.lock();
        // The snapshot copies values only; priorities stay private to the
        // reservoir.
        let snapshot = SampleSnapshot::new(inner.count, inner.heap.values());
        if self.auto_sized {
            inner.refit_capacity(self.reservoir_max);
        }
        inner.updates_since_snapshot = 0;
        snapshot
    }

    fn min(&self) -> i64 {
        statistics::min(&self.inner.lock().heap.values())
    }

    fn max(&self) -> i64 {
        statistics::max(&self.inner.lock().heap.values())
    }

    fn sum(&self) -> i64 {
        statistics::sum(&self.inner.lock().heap.values())
    }

    fn mean(&self) -> f64 {
        statistics::mean(&self.inner.lock().heap.values())
    }

    fn variance(&self) -> f64 {
        statistics::variance(&self.inner.lock().heap.values())
    }

    fn std_dev(&self) -> f64 {
        statistics::std_dev(&self.inner.lock().heap.values())
    }

    fn percentile(&self, q: f64) -> f64 {
        statistics::percentile(&self.inner.lock().heap.values(), q)
    }

    fn percentiles(&self, qs: &[f64]) -> Vec<f64> {
        statistics::percentiles(&self.inner.lock().heap.values(), qs)
    }
}

impl DecayInner {
    fn record_at(&mut self, alpha: f64, time: Instant, value: i64) {
        if time >= self.next_rescale {
            self.rescale(alpha, time);
        }
        self.count += 1;
        self.updates_since_snapshot += 1;
        let priority = self.priority(alpha, time);
        if !self.heap.is_full() {
            self.heap.push(priority, value);
        } else if self.heap.peek().map_or(false, |min| priority > min.priority) {
            self.heap.pop();
            self.heap.push(priority, value);
        }
    }

    /// Forward-decay priority of an observation at `time`.
    ///
    /// Elapsed time is measured in seconds since the landmark; nanoseconds
    /// would push `exp` to +inf well inside a rescale period and freeze the
    /// reservoir contents. The uniform draw comes from the open interval
    /// (0, 1), so the priority is always finite and strictly positive.
    fn priority(&mut self, alpha: f64, time: Instant) -> f64 {
        let elapsed = time.saturating_duration_since(self.landmark).as_secs_f64();
        let weight = (alpha * elapsed).exp();
        let u: f64 = self.rng.sample(Open01);
        weight / u
    }

    /// Move the landmark to `now`, scaling every retained priority by
    /// `exp(-alpha * dt)` in place. Uniform positive scaling preserves both
    /// the heap ordering and the forward-decay distribution.
    fn rescale(&mut self, alpha: f64, now: Instant) {
        let elapsed = now.saturating_duration_since(self.landmark).as_secs_f64();
        let factor = (-alpha * elapsed).exp();
        self.heap.rescale(|p| p * factor);
        self.landmark = now;
        self.next_rescale = now + RESCALE_PERIOD;
    }

    /// Apply one step of the auto-resize schedule at a snapshot boundary.
    fn refit_capacity(&mut self, reservoir_max: usize) {
        let next =
            resize::next_capacity(self.heap.capacity(), self.updates_since_snapshot, reservoir_max);
        if next == self.heap.capacity() {
            return;
        }
        // When shrinking, evict lowest priorities first: the survivors are
        // exactly what priority sampling would have retained at the smaller
        // capacity.
        while self.heap.len() > next {
            self.heap.pop();
        }
        self.heap.set_capacity(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_validation() {
        assert_eq!(
            ExpDecaySample::new(0, 0.015).unwrap_err(),
            ConfigError::ZeroReservoirSize
        );
        for bad_alpha in [0.0, -0.015, f64::NAN, f64::INFINITY] {
            let err = ExpDecaySample::new(100, bad_alpha).unwrap_err();
            assert!(
                matches!(err, ConfigError::NonPositiveAlpha { .. }),
                "alpha {} accepted",
                bad_alpha
            );
        }
    }

    #[test]
    fn test_short_stream_retains_everything() {
        for sample in [
            ExpDecaySample::with_seed(100, 0.99, 1).unwrap(),
            ExpDecaySample::auto_sized_with_seed(100, 0.99, 1).unwrap(),
        ] {
            for i in 0..10 {
                sample.update(i);
            }

            assert_eq!(sample.count(), 10);
            assert_eq!(sample.size(), 10);
            let values = sample.values();
            assert_eq!(values.len(), 10);
            for v in values {
                assert!((0..10).contains(&v), "out of range [0, 10): {}", v);
            }
        }
    }

    #[test]
    fn test_underfilled_reservoir() {
        for sample in [
            ExpDecaySample::with_seed(1000, 0.01, 1).unwrap(),
            ExpDecaySample::auto_sized_with_seed(1000, 0.01, 1).unwrap(),
        ] {
            for i in 0..100 {
                sample.update(i);
            }

            assert_eq!(sample.count(), 100);
            assert_eq!(sample.size(), 100);
            assert_eq!(sample.values().len(), 100);
        }
    }

    #[test]
    fn test_long_stream_saturates_reservoir() {
        for sample in [
            ExpDecaySample::with_seed(100, 0.99, 1).unwrap(),
            ExpDecaySample::auto_sized_with_seed(100, 0.99, 1).unwrap(),
        ] {
            for i in 0..1000 {
                sample.update(i);
            }

            assert_eq!(sample.count(), 1000);
            assert_eq!(sample.size(), 100);
            let values = sample.values();
            assert_eq!(values.len(), 100);
            for v in values {
                assert!((0..1000).contains(&v), "out of range [0, 1000): {}", v);
            }
        }
    }

    #[test]
    fn test_rescale_keeps_priorities_positive() {
        for sample in [
            ExpDecaySample::with_seed(2, 0.001, 1).unwrap(),
            ExpDecaySample::auto_sized_with_seed(2, 0.001, 1).unwrap(),
        ] {
            let start = Instant::now();
            sample.update_at(start, 1);
            // Crossing the rescale boundary scales the first observation's
            // priority by exp(-3.6); it must stay strictly positive.
            sample.update_at(start + RESCALE_PERIOD + Duration::from_micros(1), 1);

            let inner = sample.inner.lock();
            assert_eq!(inner.heap.len(), 2);
            for entry in inner.heap.iter() {
                assert!(
                    entry.priority > 0.0 && entry.priority.is_finite(),
                    "bad priority after rescale: {}",
                    entry.priority
                );
            }
        }
    }

    #[test]
    fn test_pause_does_not_freeze_the_sample() {
        // 100 tens, a pause, then 100 twenties into a reservoir of 100: the
        // retained mix should stay near half and half, so the mean lands
        // close to 15. Seconds-based weights keep the two batches almost
        // equally weighted across the 1 ms pause; nanosecond-based weights
        // would blow up exp() and freeze the sample at all tens.
        for sample in [
            ExpDecaySample::with_seed(100, 0.99, 1).unwrap(),
            ExpDecaySample::auto_sized_with_seed(100, 0.99, 1).unwrap(),
        ] {
            for _ in 0..100 {
                sample.update(10);
            }
            std::thread::sleep(Duration::from_millis(1));
            for _ in 0..100 {
                sample.update(20);
            }

            let mean = sample.mean();
            assert!(
                (14.0..=16.0).contains(&mean),
                "mean out of range [14, 16]: {}",
                mean
            );
        }
    }

    #[test]
    fn test_clear_restores_initial_state() {
        let sample = ExpDecaySample::auto_sized_with_seed(100, 0.015, 1).unwrap();
        for i in 0..10 {
            sample.update(i);
        }
        let _ = sample.snapshot();
        assert_eq!(sample.capacity(), 50);

        sample.clear();

        assert_eq!(sample.count(), 0);
        assert_eq!(sample.size(), 0);
        assert_eq!(sample.capacity(), 100);
        assert!(sample.values().is_empty());
    }

    #[test]
    fn test_auto_sized_capacity_schedule() {
        // (updates, retained, capacity, snapshot size) per snapshot.
        let steps: [(usize, usize, usize, usize); 21] = [
            (1, 1, 50, 1),
            (1, 2, 25, 2),
            (1, 3, 12, 3),
            (1, 4, 8, 4),
            (1, 5, 8, 5),
            (1, 6, 8, 6),
            (1, 7, 8, 7),
            (1, 8, 8, 8),
            (1, 8, 8, 8),
            (2, 8, 8, 8),
            (4, 8, 8, 8),
            (8, 8, 8, 8),
            (15, 8, 8, 8),
            (16, 8, 16, 8),
            (31, 16, 16, 16),
            (32, 16, 32, 16),
            (80, 32, 64, 32),
            (160, 64, 100, 64),
            (1000, 100, 100, 100),
            (50, 100, 100, 100),
            (49, 50, 50, 100),
        ];

        let sample = ExpDecaySample::auto_sized_with_seed(100, 0.01, 1).unwrap();
        let mut count = 0i64;
        for (i, &(updates, retained, capacity, snapshot_size)) in steps.iter().enumerate() {
            for _ in 0..updates {
                sample.update(1);
            }
            count += updates as i64;
            let snapshot = sample.snapshot();

            assert_eq!(snapshot.size(), snapshot_size, "snapshot size at step {}", i);
            assert_eq!(sample.size(), retained, "retained at step {}", i);
            assert_eq!(sample.capacity(), capacity, "capacity at step {}", i);
            assert_eq!(snapshot.count(), count, "snapshot count at step {}", i);
            assert_eq!(sample.count(), count, "count at step {}", i);
        }
    }

    #[test]
    fn test_fixed_size_capacity_never_moves() {
        let sample = ExpDecaySample::with_seed(100, 0.01, 1).unwrap();

        sample.update(1);
        let snapshot = sample.snapshot();
        assert_eq!(snapshot.size(), 1);
        assert_eq!(sample.capacity(), 100);

        for _ in 0..1000 {
            sample.update(1);
        }
        let snapshot = sample.snapshot();
        assert_eq!(snapshot.size(), 100);
        assert_eq!(sample.size(), 100);
        assert_eq!(sample.capacity(), 100);
    }
}
