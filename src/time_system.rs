//! Simulation clock.
//!
//! Time advances in fixed ticks driven by the host. All timers in the
//! simulation (path refresh, fire cooldown, hit flash, death) are absolute
//! timestamps or countdowns measured against this clock.

/// Global simulation clock (in seconds)
#[derive(Debug, Clone)]
pub struct GameClock {
    /// Current simulation time in seconds (not real time)
    pub time: f32,
    /// Number of ticks advanced so far
    pub ticks: u64,
}

impl GameClock {
    pub fn new() -> Self {
        Self { time: 0.0, ticks: 0 }
    }

    /// Advance by one tick of `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        debug_assert!(dt >= 0.0, "Cannot go backwards in time: dt = {}", dt);
        self.time += dt.max(0.0);
        self.ticks += 1;
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}
