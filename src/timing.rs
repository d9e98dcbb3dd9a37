//! Elapsed-time gates driven by the simulation tick.
//!
//! Periodic behaviour is expressed as accumulated `dt` checked inside the
//! update loop instead of timers or background tasks.

/// Fires once every `period` seconds of accumulated simulation time.
///
/// # Examples
/// ```
/// use warden::timing::Interval;
/// let mut every_half = Interval::new(0.5);
/// assert!(!every_half.tick(0.3));
/// assert!(every_half.tick(0.3));
/// assert!(!every_half.tick(0.1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    period: f32,
    elapsed: f32,
}

impl Interval {
    /// Creates a gate with the given period in seconds.
    #[must_use]
    pub const fn new(period: f32) -> Self {
        Self {
            period,
            elapsed: 0.0,
        }
    }

    /// Advances by `dt` and reports whether the period elapsed.
    ///
    /// A non-positive period fires on every tick. Long frames fire once and
    /// keep only the remainder.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.period <= 0.0 {
            return true;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed < self.period {
            return false;
        }
        self.elapsed %= self.period;
        true
    }

    /// Forgets accumulated time.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Configured period in seconds.
    #[must_use]
    pub const fn period(&self) -> f32 {
        self.period
    }
}

/// One-shot countdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delay {
    remaining: f32,
}

impl Delay {
    /// Creates a countdown of `seconds`.
    #[must_use]
    pub const fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// Advances by `dt`; returns `true` once the delay has fully elapsed.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt.max(0.0);
        self.is_done()
    }

    /// Whether the countdown reached zero.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.remaining <= 0.0
    }
}
