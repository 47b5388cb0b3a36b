use crate::config::DeviceConfig;
use crate::device::DeviceState;
use crate::hal::{HttpTransport, Radio, SensorBank, SensorError, SensorReading, TransportError};
use crate::network::NetworkConnector;
use core::time::Duration;
use log::{debug, info, warn};
use serde::Serialize;
use std::time::Instant;

/// JSON body of one `sensor_readings` row
#[derive(Debug, Clone, Serialize)]
pub struct ReadingPayload<'a> {
    pub device_uid: &'a str,
    pub tank_id: &'a str,
    pub temperature: f32,
    pub ph: f32,
    pub tds: f32,
    /// Unix seconds from network time, 0 while unsynchronised
    pub recorded_at: u64,
}

/// Result of one upload attempt. Nothing is retried or queued.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadReport {
    Sent {
        status: u16,
        reading: SensorReading,
    },
    Rejected {
        status: u16,
    },
    TransportFailed(TransportError),
    SensorFailed(SensorError),
}

impl UploadReport {
    /// Status line for the controller
    pub fn status_line(&self) -> String {
        match self {
            UploadReport::Sent { reading, .. } => format!(
                "Reading sent: T={:.2} pH={:.2} TDS={:.2}",
                reading.temperature, reading.ph, reading.tds
            ),
            UploadReport::Rejected { status } => {
                format!("Cloud rejected reading: HTTP {}", status)
            }
            UploadReport::TransportFailed(_) => "Error sending reading to cloud".to_string(),
            UploadReport::SensorFailed(_) => "Sensor read failed".to_string(),
        }
    }
}

/// Periodic at-most-once upload of sensor readings
pub struct TelemetryUploader<H: HttpTransport, X: SensorBank> {
    http: H,
    sensors: X,
    interval: Duration,
    readings_path: String,
    last_attempt: Option<Instant>,
}

impl<H: HttpTransport, X: SensorBank> TelemetryUploader<H, X> {
    pub fn new(http: H, sensors: X, config: &DeviceConfig) -> Self {
        Self {
            http,
            sensors,
            interval: config.upload_interval(),
            readings_path: config.readings_path.as_str().to_string(),
            last_attempt: None,
        }
    }

    /// Upload one reading if the link is up, a tank is selected and the
    /// cadence has elapsed. The first eligible tick uploads immediately.
    pub fn tick<R: Radio>(
        &mut self,
        now: Instant,
        state: &DeviceState,
        network: &NetworkConnector<R>,
    ) -> Option<UploadReport> {
        let tank_id = state.tanks.selected()?;
        if !network.is_connected() {
            return None;
        }
        if let Some(last) = self.last_attempt {
            if now.duration_since(last) < self.interval {
                return None;
            }
        }
        self.last_attempt = Some(now);

        if !state.tanks.contains_id(tank_id) {
            warn!("Uploading for tank '{}' which is not in the registry", tank_id);
        }

        let reading = match self.sensors.sample() {
            Ok(reading) => reading,
            Err(e) => {
                warn!("❌ Sensor sample failed: {}", e);
                return Some(UploadReport::SensorFailed(e));
            }
        };

        let payload = ReadingPayload {
            device_uid: &state.credentials.device_uid,
            tank_id,
            temperature: reading.temperature,
            ph: reading.ph,
            tds: reading.tds,
            recorded_at: network.network_time().unwrap_or(0),
        };

        let credentials = &state.credentials;
        Some(self.send(
            &credentials.backend_url,
            &credentials.backend_key,
            &payload,
            reading,
        ))
    }

    fn send(
        &mut self,
        base_url: &str,
        api_key: &str,
        payload: &ReadingPayload,
        reading: SensorReading,
    ) -> UploadReport {
        let body = match serde_json::to_vec(payload) {
            Ok(body) => body,
            Err(e) => {
                warn!("❌ Telemetry encode failed: {}", e);
                return UploadReport::TransportFailed(TransportError::Encode);
            }
        };

        let url = readings_url(base_url, &self.readings_path);
        let bearer = format!("Bearer {}", api_key);
        let headers = [
            ("Content-Type", "application/json"),
            ("apikey", api_key),
            ("Authorization", bearer.as_str()),
        ];

        debug!("📤 POST {} ({} bytes)", url, body.len());
        match self.http.post(&url, &headers, &body) {
            Ok(status) if (200..300).contains(&status) => {
                info!("✅ Backend response: {}", status);
                UploadReport::Sent { status, reading }
            }
            Ok(status) => {
                warn!("❌ Backend rejected reading: {}", status);
                UploadReport::Rejected { status }
            }
            Err(e) => {
                warn!("❌ Error sending to backend: {}", e);
                UploadReport::TransportFailed(e)
            }
        }
    }

    pub fn http(&self) -> &H {
        &self.http
    }
}

fn readings_url(base_url: &str, path: &str) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    format!("{}{}", base, path)
}
