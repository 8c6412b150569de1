//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one line
//! to the logger (UART / USB-CDC on the device, stderr on the host).
//! This is the controller's human-readable status stream.

use log::{debug, info, warn};

use crate::app::events::{AppEvent, StatusLine};
use crate::app::ports::EventSink;
use crate::config::ThermalConfig;
use crate::control::thermal::Transition;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// `2153` → `"21.53"`.
fn centi(v: i32) -> String {
    let sign = if v < 0 { "-" } else { "" };
    format!("{sign}{}.{:02}", v.unsigned_abs() / 100, v.unsigned_abs() % 100)
}

fn temperature(v: Option<i32>) -> String {
    v.map_or_else(|| "--.--".to_owned(), centi)
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("START | control loop running"),
            AppEvent::ConfigLoaded { config, source } => {
                info!(
                    "CONFIG | {:?} | goal={}\u{00b0}C \u{00b1}{} | lights {}-{} | log every {} min",
                    source,
                    centi(config.thermal.goal_centi),
                    centi(config.thermal.signed_margin()),
                    config.schedule.lights_on,
                    config.schedule.lights_off,
                    config.log_interval_min,
                );
            }
            AppEvent::BootstrapDegraded { kind, source } => {
                warn!("START | {} record unavailable: {} (continuing)", kind, source);
            }
            AppEvent::ConfigLoadFailed(e) => warn!("CONFIG | load failed: {} (defaults in force)", e),
            AppEvent::ScheduleInvalid(e) => warn!("LIGHTS | {}", e),
            AppEvent::Cooling {
                transition,
                state,
                goal_centi,
                margin_centi,
                measured_centi,
            } => {
                let band = ThermalConfig {
                    goal_centi: *goal_centi,
                    margin_centi: *margin_centi,
                };
                match transition {
                    Some(Transition::SwitchedOn) => info!(
                        "COOLER | switched on: {}\u{00b0}C >= {}\u{00b0}C",
                        temperature(*measured_centi),
                        centi(band.upper_centi()),
                    ),
                    Some(Transition::SwitchedOff) => info!(
                        "COOLER | switched off: {}\u{00b0}C <= {}\u{00b0}C",
                        temperature(*measured_centi),
                        centi(band.lower_centi()),
                    ),
                    None => debug!("COOLER | {} at {}\u{00b0}C", state, temperature(*measured_centi)),
                }
            }
            AppEvent::Status(StatusLine {
                timestamp,
                lights,
                fan,
                cooling,
                temperature_centi,
            }) => {
                info!(
                    "STATUS | {} | lights={} fan={} cooler={} | T={}\u{00b0}C",
                    timestamp,
                    lights,
                    fan,
                    cooling,
                    temperature(*temperature_centi),
                );
            }
            AppEvent::TelemetryAppended(ts) => info!("LOG | telemetry appended at {}", ts),
            AppEvent::TelemetryFailed(e) => warn!("LOG | telemetry append failed: {}", e),
        }
    }
}
