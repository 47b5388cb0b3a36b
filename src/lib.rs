//! AquaSpec Sensor Firmware Library
//!
//! Serial provisioning protocol, tank registry and periodic cloud telemetry
//! for an ESP32 aquarium sensor. Hardware access goes through the traits in
//! [`hal`]; ESP-IDF implementations are in `esp`, in-memory ones in [`sim`].

pub mod config;
pub mod device;
pub mod device_loop;
#[cfg(target_os = "espidf")]
pub mod esp;
pub mod hal;
pub mod network;
pub mod protocol;
pub mod sensors;
pub mod sim;
pub mod telemetry;

pub use config::{DeviceConfig, MAX_TANKS};
pub use device::{
    Credentials, DevicePhase, DeviceState, ProvisioningStore, TankDescriptor, TankRegistry,
};
pub use device_loop::DeviceLoop;
pub use hal::{HttpTransport, KeyValueStore, Radio, SensorBank, SensorReading, SerialLink};
pub use network::{ConnectOutcome, NetworkConnector};
pub use protocol::{
    Command, CommandDispatcher, CommandParser, DispatchOutcome, Rejection, SerialChannel,
};
pub use telemetry::{ReadingPayload, TelemetryUploader, UploadReport};
