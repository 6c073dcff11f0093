//! Reservoir sampling over unbounded observation streams
//!
//! Two sampling regimes, each with a fixed-capacity and an auto-sized
//! variant:
//!
//! - [`UniformSample`]: Vitter's Algorithm R; every observation seen so far
//!   is retained with equal probability. Use it when the sample should
//!   describe the whole stream.
//! - [`ExpDecaySample`]: forward-decaying priority sampling (Cormode et al.
//!   2009); recent observations are exponentially more likely to be
//!   retained. Use it when the sample should describe the recent past, as
//!   latency instruments usually want.
//!
//! Both are internally synchronized and hand out immutable
//! [`SampleSnapshot`]s for reading, so a scrape never blocks writers for
//! longer than one value copy.
//!
//! # Example
//!
//! ```
//! use streamsample::prelude::*;
//!
//! let latencies = ExpDecaySample::new(1028, 0.015).unwrap();
//! for i in 0..500 {
//!     latencies.update(i);
//! }
//!
//! let snapshot = latencies.snapshot();
//! assert_eq!(snapshot.count(), 500);
//! assert_eq!(snapshot.size(), 500);
//! ```

mod decay;
mod heap;
mod resize;
mod snapshot;
mod uniform;

pub use decay::ExpDecaySample;
pub use heap::{PriorityHeap, WeightedValue};
pub use snapshot::SampleSnapshot;
pub use uniform::UniformSample;
