//! System control operations.
//!
//! Only the pieces of the system control block that a minimal bring-up
//! needs: stopping the watchdog and ungating peripheral clocks. For more
//! information, please see the [TMS320F2837xD Technical Reference Manual
//! (SPRUHM8)], chapter "System Control and Interrupts".
//!
//! [TMS320F2837xD Technical Reference Manual (SPRUHM8)]: https://www.ti.com/lit/ug/spruhm8i/spruhm8i.pdf

use crate::mmio::RegisterFile;

/// Watchdog control register.
const WDCR: u32 = 0x7029;

/// WDCR value: watchdog disabled, mandatory check bits.
const WDCR_DISABLE: u16 = 0x0068;

/// Base address of the CPU system registers.
const CPUSYS_BASE: u32 = 0x5d300;

/// Peripheral clock gate register 7 (SCI).
const PCLKCR7: u32 = CPUSYS_BASE + 0x30;

/// PCLKCR7 SCI-A clock enable bit.
const PCLKCR7_SCI_A: u32 = 1;

/// Disables the watchdog timer.
pub fn disable_watchdog<B: RegisterFile>(bus: &mut B) {
    bus.protected(|bus| {
        bus.write16(WDCR, WDCR_DISABLE);
    });
}

/// Ungates the SCI-A peripheral clock.
pub fn enable_sci_a_clock<B: RegisterFile>(bus: &mut B) {
    bus.protected(|bus| {
        let reg = bus.read32(PCLKCR7);
        bus.write32(PCLKCR7, reg | PCLKCR7_SCI_A);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Sim;

    #[test]
    fn watchdog_disable_value() {
        let mut sim = Sim::new();

        disable_watchdog(&mut sim);

        assert_eq!(sim.reg16(WDCR), 0x0068);
    }

    #[test]
    fn sci_clock_gate() {
        let mut sim = Sim::new();

        enable_sci_a_clock(&mut sim);

        assert_eq!(sim.reg32(PCLKCR7), 1);
    }
}
