//! Host-side register file simulator.
//!
//! [`Sim`] implements [`RegisterFile`] (and [`Delay`]) over an in-memory
//! register store, so bring-up sequences and interrupt service logic run on
//! a development host exactly as written for the device. On top of the
//! plain store it models the hardware behavior the drivers rely on:
//!
//! - EALLOW-protected ranges reject writes outside a bracket (the
//!   simulator panics, which turns a missing bracket into a test failure).
//! - `PIEACK` is a write-1-to-clear register whose bits are raised when a
//!   group is dispatched.
//! - [`Sim::edge`] walks the pin to X-BAR slot to XINT line to PIE chain
//!   and reports which installed handler, if any, the edge would run.
//!
//! Every mutation is recorded in an event log so tests can assert ordering,
//! not just final state.

use crate::mmio::RegisterFile;
use crate::pie;
use crate::time::Delay;
use crate::xbar::InputSlot;
use crate::xint::Line;
use crate::Isr;

/// Capacity of the sparse register store.
const NREGS: usize = 256;

/// Capacity of the event log.
const NEVENTS: usize = 512;

/// A recorded register file mutation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    /// 16-bit register write.
    Write16 {
        /// Word address.
        addr: u32,
        /// Written value.
        value: u16,
    },

    /// 32-bit register write.
    Write32 {
        /// Word address.
        addr: u32,
        /// Written value.
        value: u32,
    },

    /// Vector table slot assignment.
    Vector {
        /// Slot index.
        index: usize,
    },

    /// Protected bracket entered.
    Eallow,

    /// Protected bracket left.
    Edis,

    /// CPU IER write.
    WriteIer {
        /// New IER value.
        mask: u16,
    },

    /// CPU IFR cleared.
    ClearIfr,

    /// Global interrupt disable (INTM set).
    DisableInterrupts,

    /// Global interrupt enable (INTM cleared).
    EnableInterrupts,

    /// Real-time debug events enabled (DBGM cleared).
    EnableDebugEvents,

    /// Busy-wait delay.
    DelayUs {
        /// Requested duration.
        us: u32,
    },
}

/// A signal transition on a GPIO pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Edge {
    /// Low to high.
    Rising,

    /// High to low.
    Falling,
}

/// Simulated register file.
pub struct Sim {
    /// Sparse register store as (address, value) pairs.
    regs: [(u32, u32); NREGS],

    /// Number of used store entries.
    nregs: usize,

    /// PIE vector table.
    vectors: [Option<Isr>; pie::NVECTORS],

    /// Event log.
    events: [Option<Event>; NEVENTS],

    /// Number of recorded events.
    nevents: usize,

    /// Protected bracket nesting depth.
    eallow: usize,

    /// CPU interrupt enable register.
    ier: u16,

    /// Global interrupt enable (inverse of INTM).
    interrupts_enabled: bool,

    /// PIEACK bits currently raised.
    ack: u16,
}

impl Sim {
    /// Creates a simulator with an all-zeroes register file.
    pub fn new() -> Sim {
        Sim {
            regs: [(0, 0); NREGS],
            nregs: 0,
            vectors: [None; pie::NVECTORS],
            events: [None; NEVENTS],
            nevents: 0,
            eallow: 0,
            ier: 0,
            interrupts_enabled: false,
            ack: 0,
        }
    }

    /// Returns the recorded events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = Event> + '_ {
        self.events[..self.nevents].iter().flatten().copied()
    }

    /// Drops all recorded events.
    pub fn clear_events(&mut self) {
        self.events = [None; NEVENTS];
        self.nevents = 0;
    }

    /// Returns the value of a 16-bit register without recording an event.
    pub fn reg16(&self, addr: u32) -> u16 {
        self.load(addr) as u16
    }

    /// Returns the value of a 32-bit register without recording an event.
    pub fn reg32(&self, addr: u32) -> u32 {
        self.load(addr)
    }

    /// Sets a 16-bit register directly: no event, no write protection.
    pub fn poke16(&mut self, addr: u32, value: u16) {
        self.store(addr, value.into());
    }

    /// Sets a 32-bit register directly: no event, no write protection.
    pub fn poke32(&mut self, addr: u32, value: u32) {
        self.store(addr, value);
    }

    /// Returns the handler installed in vector table slot `index`.
    pub fn vector(&self, index: usize) -> Option<Isr> {
        self.vectors[index]
    }

    /// Returns the CPU IER value.
    pub fn ier(&self) -> u16 {
        self.ier
    }

    /// Returns true if maskable interrupts are globally enabled.
    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled
    }

    /// Applies an edge to a GPIO pin and returns the handler the PIE would
    /// dispatch, if any.
    ///
    /// The edge is matched against the X-BAR routing and the polarity of
    /// every enabled XINT line. A match latches the channel flag in its
    /// `PIEIFRx` register even when nothing is dispatched; dispatch then
    /// requires the channel's `PIEIER` bit, the group's `IER` bit, `ENPIE`,
    /// global interrupts and no outstanding acknowledge for the group.
    /// Dispatching raises the group's `PIEACK` bit, blocking the group until
    /// it is acknowledged.
    pub fn edge(&mut self, pin: crate::gpio::Pin, edge: Edge) -> Option<Isr> {
        for line in Line::ALL {
            let slot = InputSlot::from(line);
            if self.load(slot.select_addr()) as usize != pin.number() {
                continue;
            }

            let cr = self.load(line.cr_addr()) as u16;
            if cr & 1 == 0 {
                continue;
            }

            // Polarity field: 0b00/0b10 falling, 0b01 rising, 0b11 both.
            let pol = (cr >> 2) & 0b11;
            let matches = match edge {
                Edge::Falling => pol == 0b00 || pol == 0b10 || pol == 0b11,
                Edge::Rising => pol == 0b01 || pol == 0b11,
            };
            if !matches {
                continue;
            }

            let int = pie::Interrupt::from(line);

            // Latch the channel flag. It stays latched until software
            // clears it, whether or not a dispatch happens now.
            let ifr_addr = int.group().ifr_addr();
            let ifr = self.load(ifr_addr) as u16;
            self.store(ifr_addr, (ifr | int.channel_mask()).into());

            return self.dispatch(int);
        }

        None
    }

    /// Checks the dispatch conditions for `int` and returns its handler if
    /// the PIE would interrupt the CPU now.
    fn dispatch(&mut self, int: pie::Interrupt) -> Option<Isr> {
        let group = int.group();

        if self.ack & group.mask() != 0 {
            return None;
        }
        if !self.interrupts_enabled || self.ier & group.mask() == 0 {
            return None;
        }
        if self.load(pie::PIECTRL) as u16 & pie::CTRL_ENPIE == 0 {
            return None;
        }
        if self.load(group.ier_addr()) as u16 & int.channel_mask() == 0 {
            return None;
        }

        self.ack |= group.mask();
        self.vectors[int.vector()]
    }

    /// Returns the stored value of `addr`, zero if never written.
    fn load(&self, addr: u32) -> u32 {
        self.regs[..self.nregs]
            .iter()
            .find(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }

    /// Stores `value` at `addr`.
    fn store(&mut self, addr: u32, value: u32) {
        for (a, v) in &mut self.regs[..self.nregs] {
            if *a == addr {
                *v = value;
                return;
            }
        }

        assert!(self.nregs < NREGS, "register store full");
        self.regs[self.nregs] = (addr, value);
        self.nregs += 1;
    }

    /// Records an event.
    fn record(&mut self, event: Event) {
        assert!(self.nevents < NEVENTS, "event log full");
        self.events[self.nevents] = Some(event);
        self.nevents += 1;
    }

    /// Panics if `addr` is EALLOW-protected and no bracket is open.
    fn check_protected(&self, addr: u32) {
        if self.eallow == 0 && is_protected(addr) {
            panic!("protected register write outside an EALLOW bracket: {addr:#x}");
        }
    }
}

impl Default for Sim {
    fn default() -> Sim {
        Sim::new()
    }
}

/// Returns true if the register at `addr` is EALLOW-protected: the GPIO
/// configuration blocks, the Input X-BAR, the XINT control registers, the
/// watchdog and the CPU system registers.
fn is_protected(addr: u32) -> bool {
    matches!(
        addr,
        0x7c00..=0x7d7f
            | 0x7900..=0x791f
            | 0x7070..=0x7077
            | 0x7022..=0x702f
            | 0x5d300..=0x5d3ff
    )
}

impl RegisterFile for Sim {
    fn read16(&mut self, addr: u32) -> u16 {
        if addr == pie::PIEACK {
            return self.ack;
        }
        self.load(addr) as u16
    }

    fn write16(&mut self, addr: u32, value: u16) {
        self.check_protected(addr);
        self.record(Event::Write16 { addr, value });

        // PIEACK bits clear on write-1.
        if addr == pie::PIEACK {
            self.ack &= !value;
            return;
        }

        self.store(addr, value.into());
    }

    fn read32(&mut self, addr: u32) -> u32 {
        self.load(addr)
    }

    fn write32(&mut self, addr: u32, value: u32) {
        self.check_protected(addr);
        self.record(Event::Write32 { addr, value });
        self.store(addr, value);
    }

    fn eallow(&mut self) {
        self.record(Event::Eallow);
        self.eallow += 1;
    }

    fn edis(&mut self) {
        self.record(Event::Edis);
        assert!(self.eallow > 0, "EDIS without a matching EALLOW");
        self.eallow -= 1;
    }

    fn install_vector(&mut self, index: usize, isr: Isr) {
        assert!(
            self.eallow > 0,
            "vector table write outside an EALLOW bracket"
        );
        self.record(Event::Vector { index });
        self.vectors[index] = Some(isr);
    }

    fn read_ier(&mut self) -> u16 {
        self.ier
    }

    fn write_ier(&mut self, mask: u16) {
        self.record(Event::WriteIer { mask });
        self.ier = mask;
    }

    fn clear_ifr(&mut self) {
        self.record(Event::ClearIfr);
    }

    fn disable_interrupts(&mut self) {
        self.record(Event::DisableInterrupts);
        self.interrupts_enabled = false;
    }

    fn enable_interrupts(&mut self) {
        self.record(Event::EnableInterrupts);
        self.interrupts_enabled = true;
    }

    fn enable_debug_events(&mut self) {
        self.record(Event::EnableDebugEvents);
    }
}

impl Delay for Sim {
    fn delay_us(&mut self, us: u32) {
        self.record(Event::DelayUs { us });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::Pin;
    use crate::mmio::RegisterFile;
    use crate::{pie, xbar, xint};

    unsafe extern "C" fn nop_isr() {}

    /// Routes GPIO2 to XINT5 (falling edge) and opens every gate up to the
    /// CPU.
    fn armed_sim() -> Sim {
        let mut sim = Sim::new();
        let pin = Pin::try_from(2).unwrap();

        xbar::set_input(&mut sim, xint::Line::Xint5.into(), pin);
        xint::set_polarity(&mut sim, xint::Line::Xint5, xint::Polarity::FallingEdge);
        xint::enable(&mut sim, xint::Line::Xint5);

        pie::install(&mut sim, pie::Interrupt::Xint5, nop_isr);
        pie::enable_controller(&mut sim);
        pie::enable(&mut sim, pie::Interrupt::Xint5);

        sim.write_ier(pie::Interrupt::Xint5.group().mask());
        sim.enable_interrupts();

        sim
    }

    #[test]
    fn falling_edge_dispatches() {
        let mut sim = armed_sim();
        let pin = Pin::try_from(2).unwrap();

        let isr = sim.edge(pin, Edge::Falling);
        assert_eq!(isr, Some(nop_isr as crate::Isr));
    }

    #[test]
    fn rising_edge_is_ignored() {
        let mut sim = armed_sim();
        let pin = Pin::try_from(2).unwrap();

        assert_eq!(sim.edge(pin, Edge::Rising), None);
        assert!(!pie::flag_pending(&mut sim, pie::Interrupt::Xint5));
    }

    #[test]
    fn unrouted_pin_is_ignored() {
        let mut sim = armed_sim();
        let pin = Pin::try_from(3).unwrap();

        assert_eq!(sim.edge(pin, Edge::Falling), None);
    }

    #[test]
    fn group_blocked_until_acknowledge() {
        let mut sim = armed_sim();
        let pin = Pin::try_from(2).unwrap();

        assert!(sim.edge(pin, Edge::Falling).is_some());

        // A second edge latches the flag but does not dispatch while the
        // acknowledge is outstanding.
        assert_eq!(sim.edge(pin, Edge::Falling), None);
        assert!(pie::flag_pending(&mut sim, pie::Interrupt::Xint5));

        pie::acknowledge(&mut sim, pie::Interrupt::Xint5.group());
        assert!(sim.edge(pin, Edge::Falling).is_some());
    }

    #[test]
    fn disabled_line_latches_nothing() {
        let mut sim = armed_sim();
        let pin = Pin::try_from(2).unwrap();

        xint::disable(&mut sim, xint::Line::Xint5);
        assert_eq!(sim.edge(pin, Edge::Falling), None);
        assert!(!pie::flag_pending(&mut sim, pie::Interrupt::Xint5));
    }

    #[test]
    fn masked_group_latches_the_flag() {
        let mut sim = armed_sim();
        let pin = Pin::try_from(2).unwrap();

        sim.write_ier(0);
        assert_eq!(sim.edge(pin, Edge::Falling), None);
        assert!(pie::flag_pending(&mut sim, pie::Interrupt::Xint5));
    }

    #[test]
    #[should_panic(expected = "EALLOW")]
    fn protected_write_outside_bracket() {
        let mut sim = Sim::new();

        // GPADIR without a bracket.
        sim.write32(0x7c0a, 1);
    }
}
