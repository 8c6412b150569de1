//! Actuator output drivers and one-shot hardware initialisation.

pub mod actuator;
pub mod hw_init;
