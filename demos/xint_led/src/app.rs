//! Pin assignment, bring-up sequence and the interrupt service logic.
//!
//! Everything here is generic over the register file so the exact same code
//! drives the device through [`f2837x::mmio::Mmio`] and the simulator in
//! tests.

use f2837x::gpio::{self, Direction, Mux, Pin, Pull, Qualification};
use f2837x::mmio::RegisterFile;
use f2837x::pie::{self, Interrupt};
use f2837x::time::Delay;
use f2837x::xbar;
use f2837x::xint::{self, Line, Polarity};
use f2837x::{sysctl, Isr};

/// The blue LED is connected to GPIO31.
const GPIO_BLUE_LED: usize = 31;

/// The red LED is connected to GPIO34.
const GPIO_RED_LED: usize = 34;

/// The button is connected to GPIO2.
const GPIO_BUTTON: usize = 2;

/// The button interrupt line.
const BUTTON_LINE: Line = Line::Xint5;

/// The button PIE source.
const BUTTON_INT: Interrupt = Interrupt::Xint5;

/// Qualification sampling period of the button pin, the widest available
/// window.
const BUTTON_SAMPLE_PERIOD: u8 = 0xff;

/// Time between LED toggles.
const TOGGLE_DELAY_US: u32 = 500_000;

/// Returns the blue LED pin.
pub fn blue_led() -> Pin {
    Pin::try_from(GPIO_BLUE_LED).unwrap()
}

/// Returns the red LED pin.
pub fn red_led() -> Pin {
    Pin::try_from(GPIO_RED_LED).unwrap()
}

/// Returns the button pin.
pub fn button() -> Pin {
    Pin::try_from(GPIO_BUTTON).unwrap()
}

/// Configures the LED pins for push-pull output drive and the button as a
/// qualified open-drain input with pull-up.
pub fn configure_pins<B: RegisterFile>(bus: &mut B) {
    for pin in [blue_led(), red_led()] {
        gpio::set_mux(bus, pin, Mux::GPIO);
        gpio::set_direction(bus, pin, Direction::Output);
        gpio::set_pull(bus, pin, Pull::Disabled);
        gpio::set_open_drain(bus, pin, false);
        gpio::set_qualification(bus, pin, Qualification::Async);
    }

    let button = button();
    gpio::set_mux(bus, button, Mux::GPIO);
    gpio::set_direction(bus, button, Direction::Input);
    gpio::set_open_drain(bus, button, true);
    gpio::set_pull(bus, button, Pull::Up);
    gpio::set_qualification(bus, button, Qualification::Samples6);
    gpio::set_sample_period(bus, button, BUTTON_SAMPLE_PERIOD);
}

/// Routes the button pin into the X-BAR slot feeding XINT5.
pub fn route_button<B: RegisterFile>(bus: &mut B) {
    xbar::set_input(bus, BUTTON_LINE.into(), button());
}

/// Configures XINT5 to trigger on falling edges and enables the line.
pub fn configure_button_interrupt<B: RegisterFile>(bus: &mut B) {
    xint::set_polarity(bus, BUTTON_LINE, Polarity::FallingEdge);
    xint::enable(bus, BUTTON_LINE);
}

/// One-time power-on bring-up. `default` fills the vector table before
/// `isr` is installed as the XINT5 handler.
pub fn bring_up<B: RegisterFile>(bus: &mut B, default: Isr, isr: Isr) {
    sysctl::disable_watchdog(bus);
    sysctl::enable_sci_a_clock(bus);
    gpio::init(bus);

    // Run the rest of the configuration with maskable interrupts off.
    bus.disable_interrupts();

    pie::init(bus);
    bus.write_ier(0);
    bus.clear_ifr();

    pie::reset_vectors(bus, default);
    pie::install(bus, BUTTON_INT, isr);
    pie::enable_controller(bus);

    configure_pins(bus);
    route_button(bus);
    configure_button_interrupt(bus);

    // Enable XINT5 at both levels: its channel in PIE group 12 and the
    // group's bit in the CPU IER.
    pie::enable(bus, BUTTON_INT);
    let ier = bus.read_ier();
    bus.write_ier(ier | BUTTON_INT.group().mask());

    bus.enable_interrupts();
    bus.enable_debug_events();
}

/// The XINT5 service sequence.
///
/// The channel flag is dropped first so the next edge is recognized once
/// this service completes; the group acknowledge at the end is what lets
/// PIE group 12 interrupt the CPU again. The two busy-waits run inside the
/// handler on purpose (this is the tutorial's behavior): all lower and
/// equal priority interrupts stay blocked for a full second.
pub fn toggle_leds<B: RegisterFile + Delay>(bus: &mut B) {
    pie::clear_flag(bus, BUTTON_INT);

    gpio::toggle(bus, blue_led());
    bus.delay_us(TOGGLE_DELAY_US);

    gpio::toggle(bus, red_led());
    bus.delay_us(TOGGLE_DELAY_US);

    pie::acknowledge(bus, BUTTON_INT.group());
}
