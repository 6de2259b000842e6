//! f2837x simplifies writing small bare-metal programs for TMS320F2837x
//! MCUs (TI C2000 family).
//!
//! The crate covers the device blocks needed by external-interrupt style
//! programs: GPIO, the Input X-BAR, the external interrupt lines (XINT) and
//! the Peripheral Interrupt Expansion block (PIE), plus a minimal SCI
//! transmitter for diagnostics.
//!
//! Every driver operates through the [`mmio::RegisterFile`] trait instead of
//! fixed addresses. On the device the implementation is [`mmio::Mmio`],
//! which performs volatile accesses at the real register locations. On a
//! host, [`sim::Sim`] provides the same interface over an in-memory register
//! store, so bring-up sequences and interrupt service logic can be exercised
//! without hardware.
//!
//! For register details, please see the [TMS320F2837xD Technical Reference
//! Manual (SPRUHM8)].
//!
//! [TMS320F2837xD Technical Reference Manual (SPRUHM8)]: https://www.ti.com/lit/ug/spruhm8i/spruhm8i.pdf

#![no_std]

use core::fmt;

pub mod gpio;
pub mod mmio;
pub mod pie;
pub mod print;
pub mod sci;
pub mod sim;
pub mod sysctl;
pub mod time;
pub mod xbar;
pub mod xint;

/// An interrupt service routine, as installed into a PIE vector slot.
pub type Isr = unsafe extern "C" fn();

/// f2837x error.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid GPIO pin.
    InvalidGpioPin(usize),

    /// Invalid pin multiplexer index.
    InvalidMux(u8),

    /// Invalid Input X-BAR slot.
    InvalidInputSlot(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidGpioPin(pin) => write!(f, "invalid GPIO pin: {pin}"),
            Error::InvalidMux(mux) => {
                write!(f, "invalid pin multiplexer index: {mux}")
            }
            Error::InvalidInputSlot(slot) => {
                write!(f, "invalid Input X-BAR slot: {slot}")
            }
        }
    }
}

/// f2837x result.
pub type Result<T> = core::result::Result<T, Error>;
