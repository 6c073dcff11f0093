//! Capacity schedule for the auto-sized reservoirs
//!
//! Auto-sized reservoirs re-fit their backing capacity at every snapshot,
//! using the number of updates observed since the previous snapshot as the
//! demand signal. A busy reservoir doubles toward its configured maximum; a
//! quiet one halves toward a small floor, releasing memory between scrapes.
//! Fixed-size reservoirs never consult this schedule.

/// Smallest capacity an auto-sized reservoir shrinks to.
pub(crate) const MIN_AUTO_CAPACITY: usize = 8;

/// Next backing capacity for an auto-sized reservoir at a snapshot boundary.
///
/// `updates` is the number of observations recorded since the previous
/// snapshot. Capacity doubles once when the window saw at least twice the
/// current capacity, halves once when it saw fewer than half, and is
/// otherwise unchanged. The result stays within
/// `[min(MIN_AUTO_CAPACITY, reservoir_max), reservoir_max]`.
pub(crate) fn next_capacity(current: usize, updates: u64, reservoir_max: usize) -> usize {
    if current < reservoir_max && updates >= 2 * current as u64 {
        return (current * 2).min(reservoir_max);
    }
    let floor = MIN_AUTO_CAPACITY.min(reservoir_max);
    if current > floor && updates < (current / 2) as u64 {
        return (current / 2).max(floor);
    }
    current
}
