//! SCI-A transmitter.
//!
//! Just enough of the Serial Communications Interface to push diagnostics
//! out of the device: 8 data bits, one stop bit, no parity, polled
//! transmission. For more information, please see the [TMS320F2837xD
//! Technical Reference Manual (SPRUHM8)], chapter "Serial Communications
//! Interface".
//!
//! [TMS320F2837xD Technical Reference Manual (SPRUHM8)]: https://www.ti.com/lit/ug/spruhm8i/spruhm8i.pdf

use crate::mmio::RegisterFile;

/// Base address of the SCI-A registers.
const SCIA_BASE: u32 = 0x7200;

/// Communications control register.
const SCICCR: u32 = SCIA_BASE;

/// Control register 1.
const SCICTL1: u32 = SCIA_BASE + 0x1;

/// Baud divisor, high byte.
const SCIHBAUD: u32 = SCIA_BASE + 0x2;

/// Baud divisor, low byte.
const SCILBAUD: u32 = SCIA_BASE + 0x3;

/// Control register 2.
const SCICTL2: u32 = SCIA_BASE + 0x4;

/// Transmit buffer.
const SCITXBUF: u32 = SCIA_BASE + 0x9;

/// SCICCR: one stop bit, no parity, 8 data bits.
const CCR_8N1: u16 = 0x0007;

/// SCICTL1: TX and RX enabled, software reset asserted.
const CTL1_TXRX_ENABLE: u16 = 0x0003;

/// SCICTL1 software reset release bit.
const CTL1_SWRESET: u16 = 1 << 5;

/// SCICTL2 TXRDY bit.
const CTL2_TXRDY: u16 = 1 << 7;

/// Configures SCI-A for 8N1 transmission at `baud` given the low-speed
/// peripheral clock `lspclk` in Hz.
pub fn init<B: RegisterFile>(bus: &mut B, lspclk: u32, baud: u32) {
    bus.write16(SCICCR, CCR_8N1);

    // Program the baud divisor with the module held in reset.
    bus.write16(SCICTL1, CTL1_TXRX_ENABLE);
    let brr = lspclk / (8 * baud) - 1;
    bus.write16(SCIHBAUD, (brr >> 8) as u16 & 0xff);
    bus.write16(SCILBAUD, brr as u16 & 0xff);

    bus.write16(SCICTL1, CTL1_TXRX_ENABLE | CTL1_SWRESET);
}

/// Sends a byte, blocking until the transmit buffer is free.
pub fn send_byte<B: RegisterFile>(bus: &mut B, byte: u8) {
    while bus.read16(SCICTL2) & CTL2_TXRDY == 0 {}
    bus.write16(SCITXBUF, byte.into());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Sim;

    #[test]
    fn baud_divisor() {
        let mut sim = Sim::new();

        // 50 MHz LSPCLK at 115200 baud: BRR = 53.
        init(&mut sim, 50_000_000, 115_200);

        assert_eq!(sim.reg16(SCIHBAUD), 0);
        assert_eq!(sim.reg16(SCILBAUD), 53);
        assert_eq!(sim.reg16(SCICCR), CCR_8N1);
        assert_eq!(sim.reg16(SCICTL1), CTL1_TXRX_ENABLE | CTL1_SWRESET);
    }

    #[test]
    fn send_waits_for_txrdy() {
        let mut sim = Sim::new();
        sim.poke16(SCICTL2, CTL2_TXRDY);

        send_byte(&mut sim, b'x');

        assert_eq!(sim.reg16(SCITXBUF), u16::from(b'x'));
    }
}
