//! Application core: control-loop orchestration, zero direct I/O.
//!
//! The loop ties the lighting and thermal controllers to the sensors,
//! actuators and record store.  All interaction with hardware and storage
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
