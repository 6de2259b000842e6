//! Register access.
//!
//! The C28x core reaches its peripherals through memory mapped registers,
//! through EALLOW-protected memory mapped registers and through a handful of
//! core registers (`IER`, `IFR`, `ST1`) that only dedicated instructions can
//! touch. [`RegisterFile`] models all three paths so that drivers do not
//! care which one a given operation ends up on, and so that a host-side
//! implementation can stand in for the device (see [`crate::sim`]).

use crate::time;
use crate::Isr;

/// Access to the device register file.
///
/// Addresses are 16-bit word addresses, as used throughout the TMS320F2837x
/// reference manual.
pub trait RegisterFile {
    /// Reads a 16-bit register.
    fn read16(&mut self, addr: u32) -> u16;

    /// Writes a 16-bit register.
    fn write16(&mut self, addr: u32, value: u16);

    /// Reads a 32-bit register.
    fn read32(&mut self, addr: u32) -> u32;

    /// Writes a 32-bit register.
    fn write32(&mut self, addr: u32, value: u32);

    /// Enters the protected-register write bracket (EALLOW).
    fn eallow(&mut self);

    /// Leaves the protected-register write bracket (EDIS).
    fn edis(&mut self);

    /// Installs `isr` into the PIE vector slot `index`.
    fn install_vector(&mut self, index: usize, isr: Isr);

    /// Reads the CPU interrupt enable register (IER).
    fn read_ier(&mut self) -> u16;

    /// Writes the CPU interrupt enable register (IER).
    fn write_ier(&mut self, mask: u16);

    /// Clears all CPU interrupt flags (IFR).
    fn clear_ifr(&mut self);

    /// Globally disables maskable interrupts (sets INTM).
    fn disable_interrupts(&mut self);

    /// Globally enables maskable interrupts (clears INTM).
    fn enable_interrupts(&mut self);

    /// Enables real-time debug events (clears DBGM).
    fn enable_debug_events(&mut self);

    /// Runs `f` inside a protected-register write bracket. Protected
    /// configuration registers are only writable between [`eallow`] and
    /// [`edis`]; this keeps the bracket scoped to `f`.
    ///
    /// [`eallow`]: RegisterFile::eallow
    /// [`edis`]: RegisterFile::edis
    fn protected<F>(&mut self, f: F)
    where
        Self: Sized,
        F: FnOnce(&mut Self),
    {
        self.eallow();
        f(self);
        self.edis();
    }
}

/// The device register file.
///
/// Accesses go straight to the memory mapped registers, so this type is only
/// meaningful on the device itself. Host builds compile it (the instruction
/// wrappers become no-ops) but must not call it.
pub struct Mmio;

impl RegisterFile for Mmio {
    fn read16(&mut self, addr: u32) -> u16 {
        unsafe { core::ptr::read_volatile(addr as usize as *const u16) }
    }

    fn write16(&mut self, addr: u32, value: u16) {
        unsafe { core::ptr::write_volatile(addr as usize as *mut u16, value) }
    }

    fn read32(&mut self, addr: u32) -> u32 {
        unsafe { core::ptr::read_volatile(addr as usize as *const u32) }
    }

    fn write32(&mut self, addr: u32, value: u32) {
        unsafe { core::ptr::write_volatile(addr as usize as *mut u32, value) }
    }

    fn eallow(&mut self) {
        insn::eallow();
    }

    fn edis(&mut self) {
        insn::edis();
    }

    fn install_vector(&mut self, index: usize, isr: Isr) {
        let addr = crate::pie::VECT_BASE + 2 * index as u32;
        self.write32(addr, isr as usize as u32);
    }

    fn read_ier(&mut self) -> u16 {
        insn::read_ier()
    }

    fn write_ier(&mut self, mask: u16) {
        insn::write_ier(mask);
    }

    fn clear_ifr(&mut self) {
        insn::clear_ifr();
    }

    fn disable_interrupts(&mut self) {
        insn::dint();
    }

    fn enable_interrupts(&mut self) {
        insn::eint();
    }

    fn enable_debug_events(&mut self) {
        insn::ertm();
    }
}

impl time::Delay for Mmio {
    fn delay_us(&mut self, us: u32) {
        time::busy_wait_us(us);
    }
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "none")] {
        /// C28x instruction wrappers.
        mod insn {
            use core::arch::asm;

            pub fn eallow() {
                unsafe { asm!("eallow") };
            }

            pub fn edis() {
                unsafe { asm!("edis") };
            }

            pub fn read_ier() -> u16 {
                let ier: u16;
                unsafe { asm!("mov {ier}, IER", ier = out(reg) ier) };
                ier
            }

            pub fn write_ier(mask: u16) {
                unsafe { asm!("mov IER, {mask}", mask = in(reg) mask) };
            }

            pub fn clear_ifr() {
                unsafe { asm!("and IFR, #0x0000") };
            }

            pub fn dint() {
                unsafe { asm!("setc INTM") };
            }

            pub fn eint() {
                unsafe { asm!("clrc INTM") };
            }

            pub fn ertm() {
                unsafe { asm!("clrc DBGM") };
            }
        }
    } else {
        /// Host builds have no C28x instructions. [`crate::sim::Sim`] models
        /// the bracket and core interrupt state instead; these stubs only
        /// keep [`super::Mmio`] compilable.
        mod insn {
            pub fn eallow() {}

            pub fn edis() {}

            pub fn read_ier() -> u16 {
                0
            }

            pub fn write_ier(_mask: u16) {}

            pub fn clear_ifr() {}

            pub fn dint() {}

            pub fn eint() {}

            pub fn ertm() {}
        }
    }
}
