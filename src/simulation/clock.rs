//! Fixed-period accumulators driving the decay and gravity passes

/// Passes owed after feeding an accumulator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Due {
    /// Passes to run now
    pub passes: u32,
    /// Passes discarded by the catch-up bound
    pub dropped: u32,
}

/// Wall-time accumulator with a fixed period
///
/// A pass is owed while the accumulated time strictly exceeds the period.
/// Stalls are caught up pass by pass unless a bound is given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accumulator {
    period: f32,
    elapsed: f32,
}

impl Accumulator {
    pub fn new(period: f32) -> Self {
        Self { period, elapsed: 0.0 }
    }

    /// Time accumulated towards the next pass
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Add `dt` and consume as many whole periods as are owed
    ///
    /// A period is owed while the remainder would still exceed it, so the
    /// remainder always lands in `(0, period]`. With `cap = Some(n)` at most
    /// `n` passes are returned and the rest of the backlog is discarded.
    pub fn accumulate(&mut self, dt: f32, cap: Option<u32>) -> Due {
        self.elapsed += dt;
        if self.elapsed <= self.period {
            return Due::default();
        }

        let elapsed = f64::from(self.elapsed);
        let period = f64::from(self.period);
        // Saturating cast: a backlog past u32::MAX passes is clamped
        let owed = ((elapsed / period).ceil() - 1.0).max(0.0) as u32;
        let remainder = elapsed - f64::from(owed) * period;
        self.elapsed = remainder.clamp(0.0, period) as f32;

        let passes = cap.map_or(owed, |max| owed.min(max));
        Due {
            passes,
            dropped: owed - passes,
        }
    }
}
