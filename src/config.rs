//! System configuration parameters
//!
//! [`ControllerConfig`] is the persisted part: it is loaded once at startup
//! from the configuration record (or defaulted and written if absent) and
//! then owned by the control loop.  [`LoopSettings`] holds the runtime
//! knobs that never touch the SD card.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::schedule::TimeOfDay;

/// Highest goal temperature the configuration record can hold (`99.9` °C),
/// in centidegrees.
pub const MAX_GOAL_CENTI: i32 = 9_990;

/// Widest accepted deadband half-width (`99.9` °C), in centidegrees.
pub const MAX_MARGIN_CENTI: u32 = 9_990;

const DEFAULT_LIGHTS_ON: TimeOfDay = TimeOfDay::at(8, 20);
const DEFAULT_LIGHTS_OFF: TimeOfDay = TimeOfDay::at(20, 20);

/// Thermal regulation: the deadband is `[goal - margin, goal + margin]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThermalConfig {
    /// Setpoint in centidegrees Celsius (2000 = 20.00 °C).
    pub goal_centi: i32,
    /// Half-width of the deadband in centidegrees.
    pub margin_centi: u32,
}

impl ThermalConfig {
    /// At or above this the cooler switches on.
    pub fn upper_centi(&self) -> i32 {
        self.goal_centi.saturating_add(self.signed_margin())
    }

    /// At or below this the cooler switches off.
    pub fn lower_centi(&self) -> i32 {
        self.goal_centi.saturating_sub(self.signed_margin())
    }

    /// Margin as a signed offset, saturated at `i32::MAX`.
    pub fn signed_margin(&self) -> i32 {
        i32::try_from(self.margin_centi).unwrap_or(i32::MAX)
    }
}

/// Lighting window.  `lights_on > lights_off` means the window crosses midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub lights_on: TimeOfDay,
    pub lights_off: TimeOfDay,
}

/// Core controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub thermal: ThermalConfig,
    pub schedule: ScheduleConfig,
    /// Telemetry append interval (minutes).
    pub log_interval_min: u16,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            thermal: ThermalConfig {
                goal_centi: 2000, // 20 °C
                margin_centi: 100, // ±1 °C
            },
            schedule: ScheduleConfig {
                lights_on: DEFAULT_LIGHTS_ON,
                lights_off: DEFAULT_LIGHTS_OFF,
            },
            log_interval_min: 1,
        }
    }
}

impl ControllerConfig {
    /// Seconds of elapsed control ticks between telemetry appends.
    pub fn telemetry_period_secs(&self) -> u32 {
        60 * u32::from(self.log_interval_min)
    }

    /// Range-check every field.
    ///
    /// An identical on/off time is *not* rejected here: it is a runtime
    /// condition reported by the lighting controller on every tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=MAX_GOAL_CENTI).contains(&self.thermal.goal_centi) {
            return Err(ConfigError::ValidationFailed(
                "goal temperature must be 0.0–99.9 °C",
            ));
        }
        if self.thermal.margin_centi == 0 {
            return Err(ConfigError::ValidationFailed(
                "temperature margin must be non-zero",
            ));
        }
        if self.thermal.margin_centi > MAX_MARGIN_CENTI {
            return Err(ConfigError::ValidationFailed(
                "temperature margin must be at most 99.9 °C",
            ));
        }
        if !(1..=999).contains(&self.log_interval_min) {
            return Err(ConfigError::ValidationFailed(
                "log interval must be 1–999 minutes",
            ));
        }
        Ok(())
    }
}

/// Runtime parameters that are not persisted.
#[derive(Debug, Clone)]
pub struct LoopSettings {
    /// Control loop period (one tick).
    pub tick_period: Duration,
    /// Attempts at writing the storage readiness marker before giving up.
    pub probe_attempts: u32,
    /// Pause between readiness attempts.
    pub probe_retry_delay: Duration,
    /// Directory the record files live in.
    pub storage_root: PathBuf,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            probe_attempts: 4,
            probe_retry_delay: Duration::from_millis(50),
            #[cfg(target_os = "espidf")]
            storage_root: PathBuf::from("/sdcard"),
            #[cfg(not(target_os = "espidf"))]
            storage_root: PathBuf::from("sdcard"),
        }
    }
}

impl LoopSettings {
    /// Defaults, with the storage root overridable through
    /// `ENCLOSURE_STORAGE_ROOT` on the host.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        #[cfg(not(target_os = "espidf"))]
        if let Some(root) = std::env::var_os("ENCLOSURE_STORAGE_ROOT") {
            settings.storage_root = PathBuf::from(root);
        }
        settings
    }
}
