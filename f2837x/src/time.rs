//! Time operations.

/// CPU clock frequency in MHz (SYSCLK).
pub const SYSCLK_MHZ: u32 = 200;

/// A busy-wait delay source.
///
/// The delay is injected into code that needs to pace register writes (such
/// as an interrupt service routine toggling LEDs), so host-side tests can
/// substitute a zero-cost implementation and still assert ordering.
pub trait Delay {
    /// Waits at least `us` microseconds.
    fn delay_us(&mut self, us: u32);
}

/// Spins for at least `us` microseconds, assuming one loop iteration per
/// CPU cycle at [`SYSCLK_MHZ`].
pub fn busy_wait_us(us: u32) {
    let cycles = u64::from(us) * u64::from(SYSCLK_MHZ);
    for _ in 0..cycles {
        core::hint::spin_loop();
    }
}
