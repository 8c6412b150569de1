//! One-shot hardware initialization.
//!
//! Mounts the storage medium and claims the actuator GPIOs.  Called once
//! from `main()` before the control loop starts.  On the host the mount
//! is a plain directory and the outputs are [`SimPin`]s.

use std::path::Path;

#[cfg(target_os = "espidf")]
use log::info;

use super::actuator::ActuatorBank;
#[cfg(not(target_os = "espidf"))]
use super::actuator::SimPin;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    StorageMountFailed(i32),
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::StorageMountFailed(rc) => write!(f, "storage mount failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

// ── Storage ───────────────────────────────────────────────────

/// Mount the FAT data partition at `root`.
#[cfg(target_os = "espidf")]
pub fn mount_storage(root: &Path) -> Result<(), HwInitError> {
    use std::ffi::CString;

    use esp_idf_svc::sys::*;

    use crate::pins;

    let base = root
        .to_str()
        .and_then(|s| CString::new(s).ok())
        .ok_or(HwInitError::StorageMountFailed(ESP_ERR_INVALID_ARG as i32))?;
    let label = CString::new(pins::STORAGE_PARTITION)
        .map_err(|_| HwInitError::StorageMountFailed(ESP_ERR_INVALID_ARG as i32))?;
    let mount_cfg = esp_vfs_fat_mount_config_t {
        format_if_mount_failed: true,
        max_files: pins::STORAGE_MAX_FILES,
        allocation_unit_size: 0,
        ..Default::default()
    };
    let mut wl_handle: wl_handle_t = -1;

    // SAFETY: called once from main() before the loop; the strings and
    // config outlive the call and the VFS copies what it keeps.
    let ret = unsafe {
        esp_vfs_fat_spiflash_mount_rw_wl(base.as_ptr(), label.as_ptr(), &mount_cfg, &mut wl_handle)
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::StorageMountFailed(ret));
    }
    info!("hw_init: FAT partition '{}' mounted at {}", pins::STORAGE_PARTITION, root.display());
    Ok(())
}

/// Create the storage directory if needed.
#[cfg(not(target_os = "espidf"))]
pub fn mount_storage(root: &Path) -> Result<(), HwInitError> {
    std::fs::create_dir_all(root)
        .map_err(|e| HwInitError::StorageMountFailed(e.raw_os_error().unwrap_or(-1)))?;
    log::info!("hw_init(sim): storage directory {}", root.display());
    Ok(())
}

// ── Actuator outputs ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub type OutputDriver = esp_idf_svc::hal::gpio::PinDriver<
    'static,
    esp_idf_svc::hal::gpio::AnyOutputPin,
    esp_idf_svc::hal::gpio::Output,
>;

#[cfg(not(target_os = "espidf"))]
pub type OutputDriver = SimPin;

/// Claim the four actuator GPIOs as push-pull outputs, all driven low.
#[cfg(target_os = "espidf")]
pub fn init_actuators() -> Result<ActuatorBank<OutputDriver>, HwInitError> {
    use esp_idf_svc::hal::gpio::{AnyOutputPin, PinDriver};

    use crate::pins;

    let output = |gpio: i32| -> Result<OutputDriver, HwInitError> {
        // SAFETY: each actuator GPIO is claimed exactly once, here, and
        // no other driver references these pin numbers.
        let pin = unsafe { AnyOutputPin::new(gpio) };
        PinDriver::output(pin).map_err(|e| HwInitError::GpioConfigFailed(e.code()))
    };

    let bank = ActuatorBank::new(
        output(pins::LIGHTS_GPIO)?,
        output(pins::FAN_GPIO)?,
        output(pins::COOLING_LEFT_GPIO)?,
        output(pins::COOLING_RIGHT_GPIO)?,
    );
    info!("hw_init: actuator outputs configured");
    Ok(bank)
}

#[cfg(not(target_os = "espidf"))]
pub fn init_actuators() -> Result<ActuatorBank<OutputDriver>, HwInitError> {
    log::info!("hw_init(sim): actuator outputs simulated");
    Ok(ActuatorBank::new(
        SimPin::default(),
        SimPin::default(),
        SimPin::default(),
        SimPin::default(),
    ))
}
