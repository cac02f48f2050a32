//! Blocking delay abstraction
//!
//! The display protocol needs short pauses between command bytes, a
//! millisecond-scale reset pulse, and a polling interval for the busy
//! line. All of them block the calling thread; there is no async path.

/// Blocking delay provider
pub trait DelayUs {
    /// Block for at least `us` microseconds
    fn delay_us(&mut self, us: u32);

    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1_000);
        }
    }
}
