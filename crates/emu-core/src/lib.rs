//! Core traits and types shared by the 6502 instruction core.
//!
//! The CPU never owns memory. Everything it touches goes through a [`Bus`],
//! and everything it exposes for inspection goes through [`Observable`].

mod bus;
mod observable;

pub use bus::{Bus, SimpleBus};
pub use observable::{Observable, Value};
