//! Collaborator traits
//!
//! The protocol core talks to storage, the radio, the HTTP stack, the sensors
//! and the controller link only through these traits. The ESP-IDF backed
//! implementations live in `esp`, in-memory ones in `sim`.

use std::net::Ipv4Addr;

/// Non-volatile string storage scoped to a single namespace
pub trait KeyValueStore {
    /// Read a string value, `Ok(None)` when the key was never written
    fn get_str(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a string value
    fn set_str(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key, succeeding if it was already absent
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Wireless station driver
pub trait Radio {
    /// Apply credentials and start associating. Does not wait for the link.
    fn begin(&mut self, ssid: &str, secret: &str) -> Result<(), RadioError>;

    /// True once the station is associated and has an address
    fn is_connected(&self) -> bool;

    fn ip_address(&self) -> Option<Ipv4Addr>;

    /// Network-synchronised wall clock in Unix seconds, `None` until synced
    fn network_time(&self) -> Option<u64>;
}

/// Blocking HTTP client
pub trait HttpTransport {
    /// POST `body` to `url` and return the response status code
    fn post(&mut self, url: &str, headers: &[(&str, &str)], body: &[u8])
        -> Result<u16, TransportError>;
}

/// One sample of every water-quality probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Degrees Celsius
    pub temperature: f32,
    pub ph: f32,
    /// Total dissolved solids (ppm)
    pub tds: f32,
}

pub trait SensorBank {
    fn sample(&mut self) -> Result<SensorReading, SensorError>;
}

/// Byte-oriented link to the paired controller
pub trait SerialLink {
    /// Non-blocking read of a single byte
    fn read_byte(&mut self) -> Result<Option<u8>, LinkError>;

    /// Write `line` followed by the line terminator
    fn write_line(&mut self, line: &str) -> Result<(), LinkError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    ReadFailed,
    WriteFailed,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            StorageError::ReadFailed => write!(f, "Storage read failed"),
            StorageError::WriteFailed => write!(f, "Storage write failed"),
        }
    }
}

impl std::error::Error for StorageError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    SsidTooLong,
    SecretTooLong,
    /// Driver error code
    Driver(i32),
}

impl std::fmt::Display for RadioError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RadioError::SsidTooLong => write!(f, "SSID too long (max 32 chars)"),
            RadioError::SecretTooLong => write!(f, "Password too long (max 64 chars)"),
            RadioError::Driver(code) => write!(f, "WiFi driver error {}", code),
        }
    }
}

impl std::error::Error for RadioError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    Encode,
    InvalidUrl,
    Connect,
    Io,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TransportError::Encode => write!(f, "Payload encode failed"),
            TransportError::InvalidUrl => write!(f, "Invalid URL"),
            TransportError::Connect => write!(f, "Connection failed"),
            TransportError::Io => write!(f, "HTTP I/O error"),
        }
    }
}

impl std::error::Error for TransportError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    AdcError,
}

impl std::fmt::Display for SensorError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SensorError::AdcError => write!(f, "ADC read failed"),
        }
    }
}

impl std::error::Error for SensorError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    ReadFailed,
    WriteFailed,
}

impl std::fmt::Display for LinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LinkError::ReadFailed => write!(f, "Serial read error"),
            LinkError::WriteFailed => write!(f, "Serial write error"),
        }
    }
}

impl std::error::Error for LinkError {}
