//! Macros that generate low-level boilerplate code.
//!
//! The attributes target bare-metal TMS320F2837x programs: the decorated
//! functions become the `extern "C"` symbols the C28x boot flow and the PIE
//! vector table expect, while the user keeps writing ordinary safe Rust.

use proc_macro::TokenStream;

use quote::{format_ident, quote};
use syn::{parse_macro_input, ItemFn};

/// Generates the boilerplate required to call the provided function on boot.
///
/// The C28x boot ROM jumps to the compiler runtime entry (`c_int00`), which
/// calls `main` after setting up the stack and static data. This attribute
/// exposes the decorated function as that `main`, parks the CPU if it ever
/// returns, and emits a panic handler that reports over SCI-A before
/// halting.
#[proc_macro_attribute]
pub fn entrypoint(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item_fn = parse_macro_input!(item as ItemFn);

    let fname = &item_fn.sig.ident;

    let tokens = quote! {
        #[no_mangle]
        extern "C" fn main() -> ! {
            #fname();

            loop {
                core::hint::spin_loop();
            }
        }

        #[panic_handler]
        fn panic(info: &core::panic::PanicInfo) -> ! {
            let _ = core::fmt::Write::write_fmt(
                &mut f2837x::print::SciWriter,
                core::format_args!("\n\n!!! PANIC !!!\n\n{}\n", info),
            );

            loop {}
        }

        #item_fn
    };

    tokens.into()
}

/// Generates the boilerplate required to install the provided function into
/// a PIE vector slot.
///
/// The function keeps its name but becomes a `#[no_mangle]` `unsafe extern
/// "C" fn()`, i.e. a value of [`f2837x::Isr`] accepted by `pie::install`;
/// the original body moves into an inner function so it stays ordinary safe
/// Rust.
///
/// [`f2837x::Isr`]: ../f2837x/type.Isr.html
#[proc_macro_attribute]
pub fn interrupt_handler(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(item as ItemFn);

    let fname = item_fn.sig.ident.clone();
    let inner = format_ident!("_f2837x_rust_{}", fname);
    item_fn.sig.ident = inner.clone();

    let tokens = quote! {
        #[no_mangle]
        unsafe extern "C" fn #fname() {
            #inner()
        }

        #item_fn
    };

    tokens.into()
}
