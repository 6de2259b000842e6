//! External interrupt toggling two LEDs.
//!
//! On the device, `main` brings up the peripherals and parks in the idle
//! loop; every falling edge on the button pin runs the XINT5 service
//! routine. On a host, the same bring-up and service logic run against
//! [`f2837x::sim::Sim`] and the resulting register timeline is printed.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod device {
    use f2837x::mmio::Mmio;
    use f2837x::{println, sci};
    use f2837x_macros::{entrypoint, interrupt_handler};

    use xint_led::app;

    /// Low-speed peripheral clock feeding the SCI baud generator.
    const LSPCLK_HZ: u32 = 50_000_000;

    /// SCI-A baud rate.
    const BAUD: u32 = 115_200;

    /// Device main function.
    #[entrypoint]
    fn device_main() {
        let mut bus = Mmio;

        sci::init(&mut bus, LSPCLK_HZ, BAUD);
        println!("xint_led");

        app::bring_up(&mut bus, unimplemented_isr, xint5_isr);

        loop {
            core::hint::spin_loop();
        }
    }

    /// XINT5 service routine.
    #[interrupt_handler]
    fn xint5_isr() {
        app::toggle_leds(&mut Mmio);
    }

    /// Default handler for the remaining vector slots.
    #[interrupt_handler]
    fn unimplemented_isr() {
        unimplemented!();
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    use f2837x::sim::{Edge, Sim};

    unsafe extern "C" fn unimplemented_isr() {
        unimplemented!();
    }

    unsafe extern "C" fn xint5_isr() {}

    let mut sim = Sim::new();
    xint_led::app::bring_up(&mut sim, unimplemented_isr, xint5_isr);
    sim.clear_events();

    println!("pressing the button (falling edge on GPIO2)...");
    match sim.edge(xint_led::app::button(), Edge::Falling) {
        Some(_) => xint_led::app::toggle_leds(&mut sim),
        None => println!("no interrupt dispatched"),
    }

    for event in sim.events() {
        println!("{event:?}");
    }
}
