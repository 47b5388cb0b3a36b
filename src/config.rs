use core::time::Duration;
use serde::{Deserialize, Serialize};

/// Maximum number of tank descriptors the registry holds
pub const MAX_TANKS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Name announced to the paired controller
    pub device_name: heapless::String<32>,

    /// Baud rate of the controller serial link
    pub serial_baud: u32,

    /// Longest accepted command line (bytes, excluding terminator)
    pub max_line_len: usize,

    /// NVS namespace holding the provisioning credentials
    pub storage_namespace: heapless::String<15>,

    /// Path appended to the backend base URL for readings
    pub readings_path: heapless::String<64>,

    /// Number of link status polls before a connect attempt fails
    pub connect_max_attempts: u32,

    /// Delay between link status polls (ms)
    pub connect_poll_interval_ms: u64,

    /// Interval between telemetry uploads (seconds)
    pub upload_interval_secs: u64,

    /// Idle delay at the end of each loop iteration (ms)
    pub loop_idle_ms: u64,

    /// Timeout for a single HTTP request (seconds)
    pub http_timeout_secs: u64,
}

impl DeviceConfig {
    pub fn connect_poll_interval(&self) -> Duration {
        Duration::from_millis(self.connect_poll_interval_ms)
    }

    pub fn upload_interval(&self) -> Duration {
        Duration::from_secs(self.upload_interval_secs)
    }

    pub fn loop_idle(&self) -> Duration {
        Duration::from_millis(self.loop_idle_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        let mut device_name = heapless::String::new();
        let mut storage_namespace = heapless::String::new();
        let mut readings_path = heapless::String::new();
        let _ = device_name.push_str("AquaSpec-Device");
        let _ = storage_namespace.push_str("credentials");
        let _ = readings_path.push_str("/rest/v1/sensor_readings");

        Self {
            device_name,
            serial_baud: 115200,
            max_line_len: 512, // backend keys are long JWTs
            storage_namespace,
            readings_path,
            connect_max_attempts: 20,
            connect_poll_interval_ms: 1000,
            upload_interval_secs: 30,
            loop_idle_ms: 100,
            http_timeout_secs: 10,
        }
    }
}
