//! Driver for the Peripheral Interrupt Expansion (PIE) block.
//!
//! The PIE is a two-level interrupt controller: every peripheral source is a
//! channel (1-8) inside a group (1-12); a group is recognized by the CPU
//! when its channel bit is set in `PIEIERx`, its flag bit in `PIEIFRx`, its
//! group bit in the CPU `IER` and global interrupts are on. Servicing a
//! source requires both a channel-level flag clear and a group-level
//! acknowledge through `PIEACK` before the group can interrupt again. For
//! more information, please see the [TMS320F2837xD Technical Reference
//! Manual (SPRUHM8)], chapter "Peripheral Interrupt Expansion".
//!
//! [TMS320F2837xD Technical Reference Manual (SPRUHM8)]: https://www.ti.com/lit/ug/spruhm8i/spruhm8i.pdf

use crate::mmio::RegisterFile;
use crate::Isr;

/// Address of the PIECTRL register.
pub(crate) const PIECTRL: u32 = 0xce0;

/// Address of the PIEACK register.
pub(crate) const PIEACK: u32 = 0xce1;

/// Base address of the PIEIERx/PIEIFRx register pairs.
const PIEIER_BASE: u32 = 0xce2;

/// PIECTRL enable bit (ENPIE).
pub(crate) const CTRL_ENPIE: u16 = 1;

/// Base address of the PIE vector table.
pub(crate) const VECT_BASE: u32 = 0xd00;

/// Number of vector table slots (CPU vectors plus 12 groups of 8 channels).
pub(crate) const NVECTORS: usize = 128;

/// Index of the first PIE group vector. The slots below it hold the CPU
/// reset and core interrupt vectors.
const GROUP_VECT_OFFSET: usize = 32;

/// Number of PIE groups.
const NGROUPS: usize = 12;

/// Represents a PIE group.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Group(usize);

impl Group {
    /// Group index (group 1 = 0).
    fn index(self) -> usize {
        self.0 - 1
    }

    /// Bit mask of the group, shared by the CPU `IER` register and `PIEACK`.
    pub fn mask(self) -> u16 {
        1 << self.index()
    }

    /// Address of the group's PIEIER register.
    pub(crate) fn ier_addr(self) -> u32 {
        PIEIER_BASE + 2 * self.index() as u32
    }

    /// Address of the group's PIEIFR register.
    pub(crate) fn ifr_addr(self) -> u32 {
        self.ier_addr() + 1
    }
}

/// PIE interrupt sources.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Interrupt {
    /// External interrupt 1.
    Xint1,

    /// External interrupt 2.
    Xint2,

    /// CPU timer 0.
    Timer0,

    /// Low-power mode wake-up.
    Wake,

    /// SCI-A receive.
    SciaRx,

    /// SCI-A transmit.
    SciaTx,

    /// External interrupt 3.
    Xint3,

    /// External interrupt 4.
    Xint4,

    /// External interrupt 5.
    Xint5,
}

impl Interrupt {
    /// The group the source belongs to.
    pub fn group(self) -> Group {
        match self {
            Interrupt::Xint1 => Group(1),
            Interrupt::Xint2 => Group(1),
            Interrupt::Timer0 => Group(1),
            Interrupt::Wake => Group(1),
            Interrupt::SciaRx => Group(9),
            Interrupt::SciaTx => Group(9),
            Interrupt::Xint3 => Group(12),
            Interrupt::Xint4 => Group(12),
            Interrupt::Xint5 => Group(12),
        }
    }

    /// The channel inside the group (1-8).
    fn channel(self) -> usize {
        match self {
            Interrupt::Xint1 => 4,
            Interrupt::Xint2 => 5,
            Interrupt::Timer0 => 7,
            Interrupt::Wake => 8,
            Interrupt::SciaRx => 1,
            Interrupt::SciaTx => 2,
            Interrupt::Xint3 => 1,
            Interrupt::Xint4 => 2,
            Interrupt::Xint5 => 3,
        }
    }

    /// Bit mask of the channel inside the group's PIEIER/PIEIFR registers.
    pub(crate) fn channel_mask(self) -> u16 {
        1 << (self.channel() - 1)
    }

    /// Index of the source's vector table slot.
    pub fn vector(self) -> usize {
        GROUP_VECT_OFFSET + self.group().index() * 8 + (self.channel() - 1)
    }
}

/// Disables the PIE block and clears every group enable and flag register.
pub fn init<B: RegisterFile>(bus: &mut B) {
    bus.write16(PIECTRL, 0);

    for group in 1..=NGROUPS {
        let group = Group(group);
        bus.write16(group.ier_addr(), 0);
        bus.write16(group.ifr_addr(), 0);
    }

    // Drop any acknowledge bit left over from before the reset.
    bus.write16(PIEACK, 0xfff);
}

/// Fills every vector table slot with `default`.
pub fn reset_vectors<B: RegisterFile>(bus: &mut B, default: Isr) {
    bus.protected(|bus| {
        for index in 0..NVECTORS {
            bus.install_vector(index, default);
        }
    });
}

/// Installs `isr` as the handler of `int`.
pub fn install<B: RegisterFile>(bus: &mut B, int: Interrupt, isr: Isr) {
    bus.protected(|bus| {
        bus.install_vector(int.vector(), isr);
    });
}

/// Enables vector fetching from the PIE table (ENPIE).
pub fn enable_controller<B: RegisterFile>(bus: &mut B) {
    let reg = bus.read16(PIECTRL);
    bus.write16(PIECTRL, reg | CTRL_ENPIE);
}

/// Enables `int` in its group's PIEIER register.
pub fn enable<B: RegisterFile>(bus: &mut B, int: Interrupt) {
    let addr = int.group().ier_addr();
    let reg = bus.read16(addr);
    bus.write16(addr, reg | int.channel_mask());
}

/// Disables `int` in its group's PIEIER register.
pub fn disable<B: RegisterFile>(bus: &mut B, int: Interrupt) {
    let addr = int.group().ier_addr();
    let reg = bus.read16(addr);
    bus.write16(addr, reg & !int.channel_mask());
}

/// Clears the pending flag of `int`. A service routine must do this before
/// returning, otherwise the next edge on the line is not recognized.
pub fn clear_flag<B: RegisterFile>(bus: &mut B, int: Interrupt) {
    let addr = int.group().ifr_addr();
    let reg = bus.read16(addr);
    bus.write16(addr, reg & !int.channel_mask());
}

/// Returns true if the pending flag of `int` is set.
pub fn flag_pending<B: RegisterFile>(bus: &mut B, int: Interrupt) -> bool {
    bus.read16(int.group().ifr_addr()) & int.channel_mask() != 0
}

/// Acknowledges a PIE group, allowing it to interrupt the CPU again.
pub fn acknowledge<B: RegisterFile>(bus: &mut B, group: Group) {
    bus.write16(PIEACK, group.mask());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Sim;

    unsafe extern "C" fn nop_isr() {}

    #[test]
    fn xint5_is_group_12_channel_3() {
        let int = Interrupt::Xint5;
        assert_eq!(int.group().mask(), 0x800);
        assert_eq!(int.channel_mask(), 1 << 2);

        // Vector slot 122, i.e. table address 0xdf4.
        assert_eq!(int.vector(), 122);
    }

    #[test]
    fn init_clears_groups() {
        let mut sim = Sim::new();
        sim.poke16(Group(12).ier_addr(), 0xff);
        sim.poke16(Group(12).ifr_addr(), 0xff);

        init(&mut sim);

        assert_eq!(sim.reg16(Group(12).ier_addr()), 0);
        assert_eq!(sim.reg16(Group(12).ifr_addr()), 0);
        assert_eq!(sim.reg16(PIECTRL), 0);
    }

    #[test]
    fn install_fills_the_vector_slot() {
        let mut sim = Sim::new();

        reset_vectors(&mut sim, nop_isr);
        install(&mut sim, Interrupt::Xint5, nop_isr);

        assert_eq!(sim.vector(0), Some(nop_isr as Isr));
        assert_eq!(sim.vector(Interrupt::Xint5.vector()), Some(nop_isr as Isr));
    }

    #[test]
    fn flag_clear_leaves_other_channels() {
        let mut sim = Sim::new();
        sim.poke16(Group(12).ifr_addr(), 0b101);

        assert!(flag_pending(&mut sim, Interrupt::Xint5));
        clear_flag(&mut sim, Interrupt::Xint5);

        assert!(!flag_pending(&mut sim, Interrupt::Xint5));
        assert!(flag_pending(&mut sim, Interrupt::Xint3));
    }

    #[test]
    fn enable_sets_the_channel_bit() {
        let mut sim = Sim::new();

        enable(&mut sim, Interrupt::Xint5);
        assert_eq!(sim.reg16(Group(12).ier_addr()), 1 << 2);

        disable(&mut sim, Interrupt::Xint5);
        assert_eq!(sim.reg16(Group(12).ier_addr()), 0);
    }
}
