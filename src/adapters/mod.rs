//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements         | Connects to                  |
//! |---------------|--------------------|------------------------------|
//! | `fs_storage`  | StoragePort        | FAT mount / host directory   |
//! | `mem_storage` | StoragePort        | In-memory map (tests, sim)   |
//! | `hardware`    | SensorPort         | Sensor drivers / simulation  |
//! |               | ActuatorPort       | GPIO output bank             |
//! |               | LinkPort           | Station count                |
//! | `log_sink`    | EventSink          | Serial log output            |
//! | `time`        | ClockPort          | System wall clock            |

pub mod fs_storage;
pub mod hardware;
pub mod log_sink;
pub mod mem_storage;
pub mod time;
