//! Button-triggered LED toggling over an external interrupt.
//!
//! A push button on GPIO2 is routed through the Input X-BAR to XINT5. Each
//! falling edge toggles the blue LED, waits 500 ms, toggles the red LED,
//! waits another 500 ms and acknowledges PIE group 12. The wiring matches
//! the F28379D LaunchPad: the blue LED on GPIO31 and the red LED on GPIO34.

#![no_std]

pub mod app;
