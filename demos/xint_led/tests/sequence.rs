//! Simulation of the button-to-LED interrupt path.

use f2837x::pie;
use f2837x::sim::{Edge, Event, Sim};
use f2837x::Isr;

use xint_led::app;

unsafe extern "C" fn xint5_isr() {}

unsafe extern "C" fn unimplemented_isr() {
    unimplemented!();
}

/// Brings up a simulated device with the demo's configuration.
fn brought_up() -> Sim {
    let mut sim = Sim::new();
    app::bring_up(&mut sim, unimplemented_isr, xint5_isr);
    sim.clear_events();
    sim
}

#[test]
fn bring_up_installs_and_unmasks_xint5() {
    let mut sim = brought_up();

    // XINT5 is PIE group 12 channel 3, vector slot 122.
    assert_eq!(
        sim.vector(pie::Interrupt::Xint5.vector()),
        Some(xint5_isr as Isr)
    );
    assert_eq!(sim.ier() & 0x800, 0x800);
    assert!(sim.interrupts_enabled());

    // The whole chain is armed: a button press reaches the handler.
    assert_eq!(
        sim.edge(app::button(), Edge::Falling),
        Some(xint5_isr as Isr)
    );
}

#[test]
fn service_sequence_toggles_blue_then_red() {
    let mut sim = brought_up();

    assert!(sim.edge(app::button(), Edge::Falling).is_some());
    sim.clear_events();

    app::toggle_leds(&mut sim);

    let events: Vec<Event> = sim.events().collect();
    assert_eq!(
        events,
        [
            // Channel flag clear (PIEIFR12).
            Event::Write16 {
                addr: 0xcf9,
                value: 0,
            },
            // Blue LED: GPATOGGLE bit 31.
            Event::Write32 {
                addr: 0x7f06,
                value: 1 << 31,
            },
            Event::DelayUs { us: 500_000 },
            // Red LED: GPBTOGGLE bit 2.
            Event::Write32 {
                addr: 0x7f0e,
                value: 1 << 2,
            },
            Event::DelayUs { us: 500_000 },
            // Group 12 acknowledge.
            Event::Write16 {
                addr: 0xce1,
                value: 0x800,
            },
        ]
    );

    // The pending flag is gone before the handler returns.
    assert!(!pie::flag_pending(&mut sim, pie::Interrupt::Xint5));
}

#[test]
fn second_press_after_acknowledge_triggers_exactly_once() {
    let mut sim = brought_up();

    assert!(sim.edge(app::button(), Edge::Falling).is_some());
    app::toggle_leds(&mut sim);

    assert!(sim.edge(app::button(), Edge::Falling).is_some());
    app::toggle_leds(&mut sim);

    // Two full service sequences: two toggles of each LED register.
    let blue_toggles = sim
        .events()
        .filter(|&e| matches!(e, Event::Write32 { addr: 0x7f06, .. }))
        .count();
    assert_eq!(blue_toggles, 2);
}

#[test]
fn no_toggles_without_an_edge() {
    let sim = brought_up();
    assert_eq!(sim.events().count(), 0);
}

#[test]
fn rising_edge_does_not_trigger() {
    let mut sim = brought_up();

    assert_eq!(sim.edge(app::button(), Edge::Rising), None);
    assert!(!pie::flag_pending(&mut sim, pie::Interrupt::Xint5));
    assert_eq!(sim.events().count(), 0);
}

#[test]
fn press_during_service_is_latched_until_acknowledge() {
    let mut sim = brought_up();

    assert!(sim.edge(app::button(), Edge::Falling).is_some());

    // The handler has not acknowledged yet: the second press latches the
    // flag but does not redispatch.
    assert_eq!(sim.edge(app::button(), Edge::Falling), None);
    assert!(pie::flag_pending(&mut sim, pie::Interrupt::Xint5));

    app::toggle_leds(&mut sim);
    assert!(sim.edge(app::button(), Edge::Falling).is_some());
}
