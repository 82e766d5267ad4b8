//! Time sources

/// Host clock
///
/// The bridge needs two views of time: a free-running millisecond tick for
/// event deltas and wake deadlines, and wall-clock seconds for absolute
/// timestamps.
pub trait Clock {
    /// Milliseconds since boot, wrapping at `u32::MAX`
    fn ticks_ms(&self) -> u32;

    /// Seconds since 1970-01-01 (UTC)
    fn unix_time_secs(&self) -> u32;
}
