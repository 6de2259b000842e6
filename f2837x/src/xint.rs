//! External interrupt (XINT) operations.
//!
//! The five XINT lines watch Input X-BAR slots, not GPIO pins: XINT1 to
//! XINT5 are hard-wired to INPUT4, INPUT5, INPUT6, INPUT13 and INPUT14. Each
//! line has a control register selecting edge polarity and an enable bit.
//! For more information, please see the [TMS320F2837xD Technical Reference
//! Manual (SPRUHM8)], chapter "External Interrupts".
//!
//! [TMS320F2837xD Technical Reference Manual (SPRUHM8)]: https://www.ti.com/lit/ug/spruhm8i/spruhm8i.pdf

use crate::mmio::RegisterFile;
use crate::pie::Interrupt;
use crate::xbar::InputSlot;

/// Base address of the XINTxCR registers.
const XINT_CR_BASE: u32 = 0x7070;

/// XINTxCR enable bit.
const CR_ENABLE: u16 = 1;

/// Bit position of the XINTxCR polarity field.
const CR_POLARITY_SHIFT: u16 = 2;

/// Represents an external interrupt line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Line {
    /// XINT1.
    Xint1,

    /// XINT2.
    Xint2,

    /// XINT3.
    Xint3,

    /// XINT4.
    Xint4,

    /// XINT5.
    Xint5,
}

impl Line {
    /// All external interrupt lines.
    pub(crate) const ALL: [Line; 5] = [
        Line::Xint1,
        Line::Xint2,
        Line::Xint3,
        Line::Xint4,
        Line::Xint5,
    ];

    /// Address of the line's control register.
    pub(crate) fn cr_addr(self) -> u32 {
        let index = match self {
            Line::Xint1 => 0,
            Line::Xint2 => 1,
            Line::Xint3 => 2,
            Line::Xint4 => 3,
            Line::Xint5 => 4,
        };
        XINT_CR_BASE + index
    }
}

impl From<Line> for InputSlot {
    fn from(line: Line) -> InputSlot {
        match line {
            Line::Xint1 => InputSlot(4),
            Line::Xint2 => InputSlot(5),
            Line::Xint3 => InputSlot(6),
            Line::Xint4 => InputSlot(13),
            Line::Xint5 => InputSlot(14),
        }
    }
}

impl From<Line> for Interrupt {
    fn from(line: Line) -> Interrupt {
        match line {
            Line::Xint1 => Interrupt::Xint1,
            Line::Xint2 => Interrupt::Xint2,
            Line::Xint3 => Interrupt::Xint3,
            Line::Xint4 => Interrupt::Xint4,
            Line::Xint5 => Interrupt::Xint5,
        }
    }
}

/// Edge polarity of an external interrupt line.
#[derive(Debug, Copy, Clone)]
pub enum Polarity {
    /// Trigger on falling edges.
    FallingEdge,

    /// Trigger on rising edges.
    RisingEdge,

    /// Trigger on both edges.
    BothEdges,
}

impl From<Polarity> for u16 {
    fn from(pol: Polarity) -> u16 {
        match pol {
            Polarity::FallingEdge => 0b00,
            Polarity::RisingEdge => 0b01,
            Polarity::BothEdges => 0b11,
        }
    }
}

/// Selects the edge polarity of an external interrupt line.
pub fn set_polarity<B: RegisterFile>(bus: &mut B, line: Line, pol: Polarity) {
    let addr = line.cr_addr();
    let pol = u16::from(pol);

    bus.protected(|bus| {
        let reg = bus.read16(addr) & !(0b11 << CR_POLARITY_SHIFT);
        bus.write16(addr, reg | (pol << CR_POLARITY_SHIFT));
    });
}

/// Enables an external interrupt line.
pub fn enable<B: RegisterFile>(bus: &mut B, line: Line) {
    let addr = line.cr_addr();

    bus.protected(|bus| {
        let reg = bus.read16(addr);
        bus.write16(addr, reg | CR_ENABLE);
    });
}

/// Disables an external interrupt line.
pub fn disable<B: RegisterFile>(bus: &mut B, line: Line) {
    let addr = line.cr_addr();

    bus.protected(|bus| {
        let reg = bus.read16(addr);
        bus.write16(addr, reg & !CR_ENABLE);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Sim;

    #[test]
    fn polarity_field() {
        let mut sim = Sim::new();

        set_polarity(&mut sim, Line::Xint5, Polarity::RisingEdge);
        assert_eq!(sim.reg16(0x7074), 0b01 << 2);

        set_polarity(&mut sim, Line::Xint5, Polarity::FallingEdge);
        assert_eq!(sim.reg16(0x7074), 0);

        set_polarity(&mut sim, Line::Xint5, Polarity::BothEdges);
        assert_eq!(sim.reg16(0x7074), 0b11 << 2);
    }

    #[test]
    fn enable_preserves_polarity() {
        let mut sim = Sim::new();

        set_polarity(&mut sim, Line::Xint1, Polarity::RisingEdge);
        enable(&mut sim, Line::Xint1);
        assert_eq!(sim.reg16(0x7070), (0b01 << 2) | 1);

        disable(&mut sim, Line::Xint1);
        assert_eq!(sim.reg16(0x7070), 0b01 << 2);
    }

    #[test]
    fn xbar_slots() {
        let slots: [usize; 5] = [4, 5, 6, 13, 14];
        for (line, slot) in Line::ALL.into_iter().zip(slots) {
            assert_eq!(InputSlot::from(line), InputSlot::try_from(slot).unwrap());
        }
    }
}
