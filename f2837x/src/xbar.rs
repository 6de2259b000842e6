//! Input X-BAR operations.
//!
//! The interrupt subsystem does not watch GPIO pins directly: it watches the
//! output lines of the Input X-BAR, a routing matrix with 16 slots. Each
//! `INPUTxSELECT` register holds the number of the GPIO pin feeding that
//! slot. For more information, please see the [TMS320F2837xD Technical
//! Reference Manual (SPRUHM8)], chapter "Crossbar (X-BAR)".
//!
//! [TMS320F2837xD Technical Reference Manual (SPRUHM8)]: https://www.ti.com/lit/ug/spruhm8i/spruhm8i.pdf

use crate::gpio::Pin;
use crate::mmio::RegisterFile;
use crate::{Error, Result};

/// Base address of the INPUTxSELECT registers.
const INPUT_SELECT_BASE: u32 = 0x7900;

/// Number of Input X-BAR slots.
const NSLOTS: usize = 16;

/// Represents an Input X-BAR slot (INPUT1 to INPUT16).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InputSlot(pub(crate) usize);

impl TryFrom<usize> for InputSlot {
    type Error = Error;

    fn try_from(slot: usize) -> Result<InputSlot> {
        if slot < 1 || slot > NSLOTS {
            return Err(Error::InvalidInputSlot(slot));
        }
        Ok(InputSlot(slot))
    }
}

impl InputSlot {
    /// Address of the slot's INPUTxSELECT register.
    pub(crate) fn select_addr(self) -> u32 {
        INPUT_SELECT_BASE + (self.0 - 1) as u32
    }
}

/// Routes a GPIO pin into an Input X-BAR slot.
pub fn set_input<B: RegisterFile>(bus: &mut B, slot: InputSlot, pin: Pin) {
    bus.protected(|bus| {
        bus.write16(slot.select_addr(), pin.number() as u16);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Sim;

    #[test]
    fn slot_out_of_range() {
        assert!(InputSlot::try_from(1).is_ok());
        assert!(InputSlot::try_from(16).is_ok());
        assert_eq!(InputSlot::try_from(0), Err(Error::InvalidInputSlot(0)));
        assert_eq!(InputSlot::try_from(17), Err(Error::InvalidInputSlot(17)));
    }

    #[test]
    fn route_pin_into_slot() {
        let mut sim = Sim::new();
        let pin = Pin::try_from(2).unwrap();

        set_input(&mut sim, InputSlot::try_from(14).unwrap(), pin);

        // INPUT14SELECT.
        assert_eq!(sim.reg16(0x790d), 2);
    }
}
