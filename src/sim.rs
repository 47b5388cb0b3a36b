//! In-memory collaborators for the host simulator and tests

use crate::hal::{
    HttpTransport, KeyValueStore, LinkError, Radio, RadioError, SensorBank, SensorError,
    SensorReading, SerialLink, StorageError, TransportError,
};
use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::net::Ipv4Addr;

/// Key/value store backed by a map. Cloning copies the stored contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
    fail_writes_after: Option<usize>,
    fail_reads: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write after the first `n` fail
    pub fn fail_writes_after(&mut self, n: usize) {
        self.fail_writes_after = Some(n);
    }

    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_str(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::ReadFailed);
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set_str(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes_after.is_some_and(|limit| self.writes >= limit) {
            return Err(StorageError::WriteFailed);
        }
        self.writes += 1;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Radio whose link comes up after a fixed number of status checks
#[derive(Debug)]
pub struct SimRadio {
    connect_after: Option<u32>,
    reject_begin: bool,
    begun: bool,
    checks: Cell<u32>,
    connected: Cell<bool>,
    last_ssid: Option<String>,
}

impl SimRadio {
    /// Unix time reported once the link is up
    pub const NETWORK_TIME: u64 = 1_700_000_000;

    pub fn connecting_after(checks: u32) -> Self {
        Self {
            connect_after: Some(checks),
            reject_begin: false,
            begun: false,
            checks: Cell::new(0),
            connected: Cell::new(false),
            last_ssid: None,
        }
    }

    pub fn never_connecting() -> Self {
        Self {
            connect_after: None,
            ..Self::connecting_after(0)
        }
    }

    pub fn rejecting_begin() -> Self {
        Self {
            reject_begin: true,
            ..Self::never_connecting()
        }
    }

    /// Link already up, as after a previous successful attempt
    pub fn connected() -> Self {
        let radio = Self::connecting_after(0);
        radio.connected.set(true);
        radio
    }

    pub fn last_ssid(&self) -> Option<String> {
        self.last_ssid.clone()
    }

    /// Status checks made since the last `begin`
    pub fn status_checks(&self) -> u32 {
        self.checks.get()
    }
}

impl Radio for SimRadio {
    fn begin(&mut self, ssid: &str, _secret: &str) -> Result<(), RadioError> {
        if self.reject_begin {
            return Err(RadioError::Driver(-1));
        }
        self.last_ssid = Some(ssid.to_string());
        self.begun = true;
        self.checks.set(0);
        self.connected.set(false);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        if self.connected.get() {
            return true;
        }
        if !self.begun {
            return false;
        }

        let checks = self.checks.get() + 1;
        self.checks.set(checks);
        if self.connect_after.is_some_and(|after| checks >= after) {
            self.connected.set(true);
        }
        self.connected.get()
    }

    fn ip_address(&self) -> Option<Ipv4Addr> {
        self.connected.get().then(|| Ipv4Addr::new(192, 168, 4, 2))
    }

    fn network_time(&self) -> Option<u64> {
        self.connected.get().then_some(Self::NETWORK_TIME)
    }
}

/// One captured POST
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn has_header(&self, name: &str, value: &str) -> bool {
        self.headers.iter().any(|(n, v)| n == name && v == value)
    }
}

/// HTTP transport that records requests and answers with a fixed result
#[derive(Debug)]
pub struct RecordingTransport {
    response: Result<u16, TransportError>,
    requests: Vec<RecordedRequest>,
}

impl RecordingTransport {
    pub fn responding(status: u16) -> Self {
        Self {
            response: Ok(status),
            requests: Vec::new(),
        }
    }

    pub fn failing(error: TransportError) -> Self {
        Self {
            response: Err(error),
            requests: Vec::new(),
        }
    }

    pub fn requests(&self) -> &[RecordedRequest] {
        &self.requests
    }
}

impl HttpTransport for RecordingTransport {
    fn post(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<u16, TransportError> {
        log::info!("📤 POST {} {}", url, String::from_utf8_lossy(body));
        self.requests.push(RecordedRequest {
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            body: body.to_vec(),
        });
        self.response
    }
}

/// Sensor bank returning the same reading every time
#[derive(Debug, Clone, Copy)]
pub struct FixedSensors {
    reading: Result<SensorReading, SensorError>,
}

impl FixedSensors {
    pub fn new(reading: SensorReading) -> Self {
        Self {
            reading: Ok(reading),
        }
    }

    pub fn failing() -> Self {
        Self {
            reading: Err(SensorError::AdcError),
        }
    }
}

impl SensorBank for FixedSensors {
    fn sample(&mut self) -> Result<SensorReading, SensorError> {
        self.reading
    }
}

/// Serial link fed from a byte queue, capturing written lines
#[derive(Debug, Default)]
pub struct BufferLink {
    input: VecDeque<u8>,
    written: Vec<String>,
}

impl BufferLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, text: &str) {
        self.input.extend(text.bytes());
    }

    pub fn written(&self) -> &[String] {
        &self.written
    }

    pub fn take_written(&mut self) -> Vec<String> {
        std::mem::take(&mut self.written)
    }
}

impl SerialLink for BufferLink {
    fn read_byte(&mut self) -> Result<Option<u8>, LinkError> {
        Ok(self.input.pop_front())
    }

    fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
        self.written.push(line.to_string());
        Ok(())
    }
}
