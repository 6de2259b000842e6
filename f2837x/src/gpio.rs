//! GPIO operations.
//!
//! Every pin belongs to a 32-pin port (A to F). Configuration registers live
//! in one block per port starting at `0x7c00` and are EALLOW-protected; data
//! registers live in a second block starting at `0x7f00` and are freely
//! writable. For more information, please see the [TMS320F2837xD Technical
//! Reference Manual (SPRUHM8)], chapter "General-Purpose Input/Output".
//!
//! [TMS320F2837xD Technical Reference Manual (SPRUHM8)]: https://www.ti.com/lit/ug/spruhm8i/spruhm8i.pdf

use crate::mmio::RegisterFile;
use crate::{Error, Result};

/// Base address of the GPIO configuration registers (GPACTRL).
const GPIO_CTRL_BASE: u32 = 0x7c00;

/// Size of one port's configuration block in words.
const GPIO_CTRL_STRIDE: u32 = 0x40;

/// Base address of the GPIO data registers (GPADAT).
const GPIO_DATA_BASE: u32 = 0x7f00;

/// Size of one port's data block in words.
const GPIO_DATA_STRIDE: u32 = 0x8;

/// GPxCTRL offset (qualification sampling period).
const GPCTRL: u32 = 0x00;

/// GPxQSEL1 offset (qualification type, pins 0-15).
const GPQSEL1: u32 = 0x02;

/// GPxQSEL2 offset (qualification type, pins 16-31).
const GPQSEL2: u32 = 0x04;

/// GPxMUX1 offset (peripheral mux, pins 0-15).
const GPMUX1: u32 = 0x06;

/// GPxMUX2 offset (peripheral mux, pins 16-31).
const GPMUX2: u32 = 0x08;

/// GPxDIR offset (direction).
const GPDIR: u32 = 0x0a;

/// GPxPUD offset (pull-up disable).
const GPPUD: u32 = 0x0c;

/// GPxODR offset (open-drain enable).
const GPODR: u32 = 0x12;

/// GPxGMUX1 offset (mux group select, pins 0-15).
const GPGMUX1: u32 = 0x20;

/// GPxGMUX2 offset (mux group select, pins 16-31).
const GPGMUX2: u32 = 0x22;

/// GPxDAT offset.
const GPDAT: u32 = 0x0;

/// GPxSET offset.
const GPSET: u32 = 0x2;

/// GPxCLEAR offset.
const GPCLEAR: u32 = 0x4;

/// GPxTOGGLE offset.
const GPTOGGLE: u32 = 0x6;

/// Number of GPIO pins.
const NPINS: usize = 169;

/// Number of multiplexer positions per pin (GMUX and MUX combined).
const NMUXES: u8 = 16;

/// Represents a GPIO pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pin(usize);

impl TryFrom<usize> for Pin {
    type Error = Error;

    fn try_from(pin: usize) -> Result<Pin> {
        if pin >= NPINS {
            return Err(Error::InvalidGpioPin(pin));
        }
        Ok(Pin(pin))
    }
}

impl Pin {
    /// Returns the pin number.
    pub fn number(self) -> usize {
        self.0
    }

    /// Port index (A = 0).
    fn port(self) -> u32 {
        (self.0 / 32) as u32
    }

    /// Bit position within the port.
    fn bit(self) -> u32 {
        (self.0 % 32) as u32
    }

    /// Base address of the pin's configuration block.
    fn ctrl_base(self) -> u32 {
        GPIO_CTRL_BASE + self.port() * GPIO_CTRL_STRIDE
    }

    /// Base address of the pin's data block.
    fn data_base(self) -> u32 {
        GPIO_DATA_BASE + self.port() * GPIO_DATA_STRIDE
    }
}

/// Peripheral multiplexer position. Position 0 is the plain GPIO function;
/// the remaining 15 select peripheral signals.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Mux(u8);

impl Mux {
    /// The plain GPIO function.
    pub const GPIO: Mux = Mux(0);
}

impl TryFrom<u8> for Mux {
    type Error = Error;

    fn try_from(mux: u8) -> Result<Mux> {
        if mux >= NMUXES {
            return Err(Error::InvalidMux(mux));
        }
        Ok(Mux(mux))
    }
}

/// Pin direction.
#[derive(Debug, Copy, Clone)]
pub enum Direction {
    /// Input pin.
    Input,

    /// Output pin.
    Output,
}

/// Pull-up state of a pin.
#[derive(Debug, Copy, Clone)]
pub enum Pull {
    /// The internal pull-up is disconnected.
    Disabled,

    /// The internal pull-up is connected.
    Up,
}

/// Input qualification applied before a pin transition is recognized.
#[derive(Debug, Copy, Clone)]
pub enum Qualification {
    /// Synchronize to SYSCLK only.
    Sync,

    /// Qualify with 3 consecutive samples.
    Samples3,

    /// Qualify with 6 consecutive samples.
    Samples6,

    /// No synchronization or qualification.
    Async,
}

impl From<Qualification> for u32 {
    fn from(qual: Qualification) -> u32 {
        match qual {
            Qualification::Sync => 0b00,
            Qualification::Samples3 => 0b01,
            Qualification::Samples6 => 0b10,
            Qualification::Async => 0b11,
        }
    }
}

/// Pin level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Level {
    /// Low level.
    Low,

    /// High level.
    High,
}

/// Resets every port to its power-on configuration: plain GPIO function,
/// input direction, push-pull, pull-ups disconnected, synchronous
/// qualification with the minimum sampling period.
pub fn init<B: RegisterFile>(bus: &mut B) {
    bus.protected(|bus| {
        for port in 0..(NPINS as u32).div_ceil(32) {
            let base = GPIO_CTRL_BASE + port * GPIO_CTRL_STRIDE;

            bus.write32(base + GPCTRL, 0);
            bus.write32(base + GPQSEL1, 0);
            bus.write32(base + GPQSEL2, 0);
            bus.write32(base + GPMUX1, 0);
            bus.write32(base + GPMUX2, 0);
            bus.write32(base + GPGMUX1, 0);
            bus.write32(base + GPGMUX2, 0);
            bus.write32(base + GPDIR, 0);
            bus.write32(base + GPODR, 0);
            bus.write32(base + GPPUD, 0xffff_ffff);
        }
    });
}

/// Selects the multiplexer position of a GPIO pin.
pub fn set_mux<B: RegisterFile>(bus: &mut B, pin: Pin, mux: Mux) {
    let base = pin.ctrl_base();
    let (gmux_off, mux_off) = if pin.bit() < 16 {
        (GPGMUX1, GPMUX1)
    } else {
        (GPGMUX2, GPMUX2)
    };
    let shift = (pin.bit() % 16) * 2;
    let mask = 0b11 << shift;
    let mux = u32::from(mux.0);

    bus.protected(|bus| {
        // Park the pin on mux 0 while GMUX changes, so it never passes
        // through an unintended peripheral position.
        let mux_reg = bus.read32(base + mux_off) & !mask;
        bus.write32(base + mux_off, mux_reg);

        let gmux_reg = bus.read32(base + gmux_off) & !mask;
        bus.write32(base + gmux_off, gmux_reg | ((mux >> 2) << shift));

        bus.write32(base + mux_off, mux_reg | ((mux & 0b11) << shift));
    });
}

/// Configures a GPIO pin as input or output.
pub fn set_direction<B: RegisterFile>(bus: &mut B, pin: Pin, dir: Direction) {
    let addr = pin.ctrl_base() + GPDIR;
    let mask = 1 << pin.bit();

    bus.protected(|bus| {
        let reg = bus.read32(addr);
        let reg = match dir {
            Direction::Input => reg & !mask,
            Direction::Output => reg | mask,
        };
        bus.write32(addr, reg);
    });
}

/// Configures the pull-up of a GPIO pin. The GPxPUD registers store the
/// inverted state: a set bit disconnects the pull-up.
pub fn set_pull<B: RegisterFile>(bus: &mut B, pin: Pin, pull: Pull) {
    let addr = pin.ctrl_base() + GPPUD;
    let mask = 1 << pin.bit();

    bus.protected(|bus| {
        let reg = bus.read32(addr);
        let reg = match pull {
            Pull::Up => reg & !mask,
            Pull::Disabled => reg | mask,
        };
        bus.write32(addr, reg);
    });
}

/// Configures a GPIO output as open-drain or push-pull.
pub fn set_open_drain<B: RegisterFile>(bus: &mut B, pin: Pin, od: bool) {
    let addr = pin.ctrl_base() + GPODR;
    let mask = 1 << pin.bit();

    bus.protected(|bus| {
        let reg = bus.read32(addr);
        let reg = if od { reg | mask } else { reg & !mask };
        bus.write32(addr, reg);
    });
}

/// Selects the input qualification of a GPIO pin.
pub fn set_qualification<B: RegisterFile>(
    bus: &mut B,
    pin: Pin,
    qual: Qualification,
) {
    let addr = if pin.bit() < 16 {
        pin.ctrl_base() + GPQSEL1
    } else {
        pin.ctrl_base() + GPQSEL2
    };
    let shift = (pin.bit() % 16) * 2;
    let qual = u32::from(qual);

    bus.protected(|bus| {
        let reg = bus.read32(addr) & !(0b11 << shift);
        bus.write32(addr, reg | (qual << shift));
    });
}

/// Sets the qualification sampling period of the 8-pin group that contains
/// `pin`. The window is `2 * period` SYSCLK cycles per sample.
pub fn set_sample_period<B: RegisterFile>(bus: &mut B, pin: Pin, period: u8) {
    let addr = pin.ctrl_base() + GPCTRL;
    let shift = (pin.bit() / 8) * 8;

    bus.protected(|bus| {
        let reg = bus.read32(addr) & !(0xff << shift);
        bus.write32(addr, reg | (u32::from(period) << shift));
    });
}

/// Drives a GPIO pin high.
pub fn set<B: RegisterFile>(bus: &mut B, pin: Pin) {
    bus.write32(pin.data_base() + GPSET, 1 << pin.bit());
}

/// Drives a GPIO pin low.
pub fn clear<B: RegisterFile>(bus: &mut B, pin: Pin) {
    bus.write32(pin.data_base() + GPCLEAR, 1 << pin.bit());
}

/// Inverts the output of a GPIO pin.
pub fn toggle<B: RegisterFile>(bus: &mut B, pin: Pin) {
    bus.write32(pin.data_base() + GPTOGGLE, 1 << pin.bit());
}

/// Returns the level of a GPIO pin.
pub fn read_level<B: RegisterFile>(bus: &mut B, pin: Pin) -> Level {
    let reg = bus.read32(pin.data_base() + GPDAT);
    if reg & (1 << pin.bit()) == 0 {
        Level::Low
    } else {
        Level::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Sim;

    #[test]
    fn pin_out_of_range() {
        assert!(Pin::try_from(168).is_ok());
        assert_eq!(Pin::try_from(169), Err(Error::InvalidGpioPin(169)));
    }

    #[test]
    fn mux_out_of_range() {
        assert!(Mux::try_from(15).is_ok());
        assert_eq!(Mux::try_from(16), Err(Error::InvalidMux(16)));
    }

    #[test]
    fn init_resets_ports() {
        let mut sim = Sim::new();
        sim.poke32(0x7c46, 0xdead_beef);

        init(&mut sim);

        // GPBMUX1 back to GPIO, GPAPUD pull-ups disconnected.
        assert_eq!(sim.reg32(0x7c46), 0);
        assert_eq!(sim.reg32(0x7c0c), 0xffff_ffff);
    }

    #[test]
    fn direction_output() {
        let mut sim = Sim::new();
        let pin = Pin::try_from(31).unwrap();

        set_direction(&mut sim, pin, Direction::Output);

        // GPADIR, bit 31.
        assert_eq!(sim.reg32(0x7c0a), 1 << 31);

        set_direction(&mut sim, pin, Direction::Input);
        assert_eq!(sim.reg32(0x7c0a), 0);
    }

    #[test]
    fn mux_upper_half_of_port_b() {
        let mut sim = Sim::new();
        let pin = Pin::try_from(50).unwrap();

        set_mux(&mut sim, pin, Mux::try_from(0b0110).unwrap());

        // GPIO50 is port B bit 18: GPBGMUX2/GPBMUX2, field at bit 4.
        assert_eq!(sim.reg32(0x7c62), 0b01 << 4);
        assert_eq!(sim.reg32(0x7c48), 0b10 << 4);
    }

    #[test]
    fn qualification_window() {
        let mut sim = Sim::new();
        let pin = Pin::try_from(2).unwrap();

        set_qualification(&mut sim, pin, Qualification::Samples6);
        set_sample_period(&mut sim, pin, 0xff);

        // GPAQSEL1 field at bit 4, GPACTRL byte 0.
        assert_eq!(sim.reg32(0x7c02), 0b10 << 4);
        assert_eq!(sim.reg32(0x7c00), 0xff);
    }

    #[test]
    fn toggle_hits_the_port_toggle_register() {
        let mut sim = Sim::new();

        toggle(&mut sim, Pin::try_from(31).unwrap());
        toggle(&mut sim, Pin::try_from(34).unwrap());

        // GPATOGGLE and GPBTOGGLE are write-1 registers.
        assert_eq!(sim.reg32(0x7f06), 1 << 31);
        assert_eq!(sim.reg32(0x7f0e), 1 << 2);
    }

    #[test]
    fn read_level_follows_dat() {
        let mut sim = Sim::new();
        let pin = Pin::try_from(2).unwrap();

        assert_eq!(read_level(&mut sim, pin), Level::Low);

        sim.poke32(0x7f00, 1 << 2);
        assert_eq!(read_level(&mut sim, pin), Level::High);
    }
}
