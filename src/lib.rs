//! # Streamsample
//!
//! Bounded-memory reservoir samplers for metrics pipelines.
//!
//! A reservoir sampler ingests an unbounded stream of integer observations
//! and retains a representative subset of fixed maximum size, from which
//! quantiles, mean, variance, and extrema can be computed at any moment.
//! This crate provides the two classic regimes:
//!
//! - **Uniform** ([`UniformSample`](sampling::UniformSample)): every
//!   observation seen so far has equal probability of being in the sample
//!   (Vitter's Algorithm R).
//! - **Forward-decaying** ([`ExpDecaySample`](sampling::ExpDecaySample)):
//!   recent observations are exponentially favored over old ones
//!   (Cormode/Shkapenyuk/Srivastava/Vitter 2009), the usual choice for
//!   latency distributions of long-running services.
//!
//! Both regimes come in a fixed-capacity flavor and an auto-sized flavor
//! that adapts its backing storage to the observed update rate, and both are
//! safe to update from many threads at once.
//!
//! ## Quick start
//!
//! ```rust
//! use streamsample::prelude::*;
//!
//! let sample = UniformSample::new(1028).unwrap();
//!
//! // The hot path: record observations as they happen.
//! for i in 0..100_000 {
//!     sample.update(i);
//! }
//!
//! // The read path: freeze a snapshot, then compute statistics from it.
//! let snapshot = sample.snapshot();
//! assert_eq!(snapshot.count(), 100_000);
//! assert_eq!(snapshot.size(), 1028);
//! println!("median: {}", snapshot.percentile(0.5));
//! println!("p99:    {}", snapshot.percentile(0.99));
//! ```
//!
//! ## Snapshots
//!
//! Reads go through [`Sample::snapshot`](traits::Sample::snapshot), which
//! copies the retained values under the reservoir's lock and returns an
//! immutable [`SampleSnapshot`](sampling::SampleSnapshot). Updates that land
//! after the snapshot are invisible to it, so exporters can take their time
//! without holding anything up.
//!
//! ## Determinism
//!
//! Every sampler takes an optional seed (`with_seed` constructors) so tests
//! can pin the sampling decisions; production constructors seed from OS
//! entropy.

pub mod sampling;
pub mod statistics;
pub mod traits;

pub mod prelude {
    //! The working set: `use streamsample::prelude::*;`
    pub use crate::sampling::{ExpDecaySample, SampleSnapshot, UniformSample};
    pub use crate::traits::{ConfigError, Sample};
}

pub use sampling::{ExpDecaySample, SampleSnapshot, UniformSample};
pub use traits::{ConfigError, Sample};
