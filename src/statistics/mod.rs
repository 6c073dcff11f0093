//! Descriptive statistics over a sampled window
//!
//! Pure functions computing summary statistics of an integer slice,
//! typically the retained values of a reservoir or a snapshot taken from
//! one. Everything here is allocation-light and side-effect free; the
//! percentile functions sort a private copy so callers keep their ordering.
//!
//! # Example
//!
//! ```
//! use streamsample::statistics;
//!
//! let window = [12i64, 7, 9, 30, 22];
//!
//! assert_eq!(statistics::min(&window), 7);
//! assert_eq!(statistics::max(&window), 30);
//! assert_eq!(statistics::mean(&window), 16.0);
//! assert_eq!(statistics::percentile(&window, 0.5), 12.0);
//! ```

mod descriptive;

pub use descriptive::{max, mean, min, percentile, percentiles, std_dev, sum, variance};
