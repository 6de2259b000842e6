//! SCI writer and print macros.

use core::fmt;

use crate::mmio::Mmio;
use crate::sci;

/// Implements a writer on top of SCI-A. Device only: it goes through
/// [`Mmio`].
pub struct SciWriter;

impl fmt::Write for SciWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            if b == b'\n' {
                sci::send_byte(&mut Mmio, b'\r');
            }
            sci::send_byte(&mut Mmio, b);
        }

        Ok(())
    }
}

/// Print to the SCI.
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        let _ = core::fmt::Write::write_fmt(
            &mut $crate::print::SciWriter,
            core::format_args!($($arg)*),
        );
    };
}

/// Print to the SCI, with a newline.
#[macro_export]
macro_rules! println {
    () => {
        $crate::println!("");
    };

    ($($arg:tt)*) => {
        let _ = core::fmt::Write::write_fmt(
            &mut $crate::print::SciWriter,
            core::format_args!("{}\n", core::format_args!($($arg)*)),
        );
    };
}
