//! Enclosure controller firmware library.
//!
//! Exposes the control loop, its controllers and the record store for
//! the binary and for integration testing.  All ESP-IDF-specific code is
//! guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod records;
pub mod schedule;

pub mod adapters;
pub mod drivers;
pub mod sensors;

#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
mod pins;

pub use error::Error;
