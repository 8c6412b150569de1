//! GPIO / peripheral pin assignments for the enclosure controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Actuators (relay / MOSFET drivers, active HIGH)
// ---------------------------------------------------------------------------

/// Grow-light relay.
pub const LIGHTS_GPIO: i32 = 4;
/// Circulation fan.
pub const FAN_GPIO: i32 = 5;
/// Left Peltier cooler.
pub const COOLING_LEFT_GPIO: i32 = 6;
/// Right Peltier cooler.
pub const COOLING_RIGHT_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Label of the FAT data partition in the partition table.
pub const STORAGE_PARTITION: &str = "storage";
/// Files the FAT driver may keep open at once.
pub const STORAGE_MAX_FILES: i32 = 4;
