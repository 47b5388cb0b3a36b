use aquaspec_firmware::sim::{BufferLink, FixedSensors, MemoryStore, RecordingTransport, SimRadio};
use aquaspec_firmware::{DeviceConfig, DeviceLoop, DevicePhase, SensorReading};
use std::time::{Duration, Instant};

type Device = DeviceLoop<BufferLink, MemoryStore, SimRadio, RecordingTransport, FixedSensors>;

const PROVISION: &str = "PROVISION:reef|pw|AQ-1|https://b.supabase.co|anon\n";

const READING: SensorReading = SensorReading {
    temperature: 24.0,
    ph: 8.1,
    tds: 250.0,
};

fn device_with(kv: MemoryStore, radio: SimRadio, sensors: FixedSensors) -> Device {
    DeviceLoop::new(
        DeviceConfig::default(),
        BufferLink::new(),
        kv,
        radio,
        RecordingTransport::responding(201),
        sensors,
    )
}

fn device(radio: SimRadio) -> Device {
    device_with(MemoryStore::new(), radio, FixedSensors::new(READING))
}

fn feed(device: &mut Device, text: &str) {
    device.channel_mut().link_mut().feed(text);
}

fn take_output(device: &mut Device) -> Vec<String> {
    device.channel_mut().link_mut().take_written()
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn provision_connect_select_and_upload() {
    let mut device = device(SimRadio::connecting_after(1));
    let t0 = Instant::now();

    device.boot(t0);
    assert_eq!(take_output(&mut device), ["AquaSpec-Device ready to pair"]);
    assert_eq!(device.phase(), DevicePhase::Unprovisioned);

    feed(&mut device, PROVISION);
    device.run_once(t0);
    assert_eq!(
        take_output(&mut device),
        ["WiFi and backend credentials received. Connecting..."]
    );
    assert!(device.network().is_connecting());

    device.run_once(t0 + ms(1000));
    assert_eq!(take_output(&mut device), ["WiFi connected successfully!"]);
    assert_eq!(device.phase(), DevicePhase::Connected);

    feed(&mut device, "SET_TANKS:Reef|Nano\nSET_TANK_IDS:t1|t2\nSELECT_TANK:t2\n");
    device.run_once(t0 + ms(1100));
    device.run_once(t0 + ms(1200));
    device.run_once(t0 + ms(1300));
    assert_eq!(
        take_output(&mut device),
        [
            "Tank names set: 2",
            "Tank IDs set: 2",
            "Selected tank: t2",
            "Reading sent: T=24.00 pH=8.10 TDS=250.00",
        ]
    );

    let requests = device.uploader().http().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "https://b.supabase.co/rest/v1/sensor_readings");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["device_uid"], "AQ-1");
    assert_eq!(body["tank_id"], "t2");

    // cadence: nothing until 30 s after the previous attempt
    device.run_once(t0 + ms(20_000));
    assert!(take_output(&mut device).is_empty());
    device.run_once(t0 + ms(31_300));
    assert_eq!(take_output(&mut device).len(), 1);
    assert_eq!(device.uploader().http().requests().len(), 2);
}

#[test]
fn commands_are_served_while_connecting() {
    let mut device = device(SimRadio::never_connecting());
    let t0 = Instant::now();
    device.boot(t0);
    take_output(&mut device);

    feed(&mut device, PROVISION);
    device.run_once(t0);
    feed(&mut device, "SET_NAME:Living room\n");
    device.run_once(t0 + ms(500));
    assert!(device.network().is_connecting());

    let output = take_output(&mut device);
    assert_eq!(output.last().map(String::as_str), Some("Device name set: Living room"));

    for second in 1..=20 {
        device.run_once(t0 + Duration::from_secs(second));
    }
    assert_eq!(take_output(&mut device), ["WiFi connection failed!"]);
    assert!(!device.network().is_connecting());
    assert_eq!(device.phase(), DevicePhase::Provisioned);
}

#[test]
fn malformed_and_unknown_lines_produce_no_output() {
    let mut device = device(SimRadio::connecting_after(1));
    let t0 = Instant::now();

    feed(&mut device, "PROVISION:reef|pw\nHELLO\n");
    device.run_once(t0);
    device.run_once(t0 + ms(100));

    assert!(take_output(&mut device).is_empty());
    assert_eq!(device.phase(), DevicePhase::Unprovisioned);
    assert!(device.kv().is_empty());
}

#[test]
fn stored_credentials_reconnect_after_restart() {
    let mut first = device(SimRadio::never_connecting());
    let t0 = Instant::now();
    feed(&mut first, PROVISION);
    first.run_once(t0);
    assert_eq!(first.kv().len(), 5);

    let mut restarted = device_with(
        first.kv().clone(),
        SimRadio::connecting_after(1),
        FixedSensors::new(READING),
    );
    assert_eq!(restarted.state().credentials.device_uid, "AQ-1");
    assert_eq!(restarted.phase(), DevicePhase::Provisioned);

    restarted.boot(t0);
    assert!(restarted.network().is_connecting());
    assert_eq!(restarted.network().radio().last_ssid().as_deref(), Some("reef"));
}

#[test]
fn sensor_failure_is_reported_and_not_retried() {
    let mut device = device_with(
        MemoryStore::new(),
        SimRadio::connecting_after(1),
        FixedSensors::failing(),
    );
    let t0 = Instant::now();

    feed(&mut device, PROVISION);
    device.run_once(t0);
    device.run_once(t0 + ms(1000));
    feed(&mut device, "SELECT_TANK:unknown-tank\n");
    device.run_once(t0 + ms(1100));
    device.run_once(t0 + ms(1200));

    let output = take_output(&mut device);
    assert_eq!(
        &output[output.len() - 2..],
        ["Selected tank: unknown-tank", "Sensor read failed"]
    );
    assert!(device.uploader().http().requests().is_empty());
}

#[test]
fn refused_connection_start_is_reported() {
    let mut device = device(SimRadio::rejecting_begin());
    let t0 = Instant::now();

    feed(&mut device, PROVISION);
    device.run_once(t0);
    assert_eq!(
        take_output(&mut device),
        [
            "WiFi and backend credentials received. Connecting...",
            "WiFi connection failed!",
        ]
    );

    for second in 1..=25 {
        device.run_once(t0 + Duration::from_secs(second));
    }
    assert!(take_output(&mut device).is_empty());
    assert_eq!(device.phase(), DevicePhase::Provisioned);
}

#[test]
fn refused_reconnect_at_boot_is_reported() {
    let mut first = device(SimRadio::never_connecting());
    let t0 = Instant::now();
    feed(&mut first, PROVISION);
    first.run_once(t0);

    let mut restarted = device_with(
        first.kv().clone(),
        SimRadio::rejecting_begin(),
        FixedSensors::new(READING),
    );
    restarted.boot(t0);
    restarted.run_once(t0);
    assert_eq!(
        take_output(&mut restarted),
        ["AquaSpec-Device ready to pair", "WiFi connection failed!"]
    );
}
