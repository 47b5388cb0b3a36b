use crate::config::DeviceConfig;
use crate::device::{DevicePhase, DeviceState, ProvisioningStore};
use crate::hal::{HttpTransport, KeyValueStore, Radio, SensorBank, SerialLink};
use crate::network::{ConnectOutcome, NetworkConnector};
use crate::protocol::{CommandDispatcher, DispatchOutcome, SerialChannel};
use crate::telemetry::TelemetryUploader;
use core::time::Duration;
use log::{info, warn};
use std::time::Instant;

/// Single cooperative scheduling point of the firmware.
///
/// Each iteration handles at most one controller line, advances a pending
/// connection attempt and runs the telemetry check. Nothing in an iteration
/// sleeps except the HTTP request itself.
pub struct DeviceLoop<L, S, R, H, X>
where
    L: SerialLink,
    S: KeyValueStore,
    R: Radio,
    H: HttpTransport,
    X: SensorBank,
{
    config: DeviceConfig,
    channel: SerialChannel<L>,
    dispatcher: CommandDispatcher<S>,
    state: DeviceState,
    network: NetworkConnector<R>,
    uploader: TelemetryUploader<H, X>,
}

impl<L, S, R, H, X> DeviceLoop<L, S, R, H, X>
where
    L: SerialLink,
    S: KeyValueStore,
    R: Radio,
    H: HttpTransport,
    X: SensorBank,
{
    pub fn new(config: DeviceConfig, link: L, kv: S, radio: R, http: H, sensors: X) -> Self {
        let dispatcher = CommandDispatcher::new(ProvisioningStore::new(kv));
        let state = DeviceState::new(dispatcher.load_credentials());

        Self {
            channel: SerialChannel::new(link, config.max_line_len),
            network: NetworkConnector::new(radio, &config),
            uploader: TelemetryUploader::new(http, sensors, &config),
            dispatcher,
            state,
            config,
        }
    }

    /// Announce readiness and reconnect with stored credentials, if any
    pub fn boot(&mut self, now: Instant) {
        info!("Device '{}' booting", self.config.device_name);
        let banner = format!("{} ready to pair", self.config.device_name);
        self.emit(&banner);

        if self.state.credentials.is_provisioned() {
            info!("✅ Stored credentials found");
            // outcome, including a refused start, is reported by `run_once`
            let creds = &self.state.credentials;
            self.network.connect(&creds.ssid, &creds.password, now);
        } else {
            info!("No stored credentials, waiting for PROVISION");
        }
    }

    pub fn run_once(&mut self, now: Instant) {
        match self.channel.poll_line() {
            Ok(Some(line)) => self.handle_line(&line, now),
            Ok(None) => {}
            Err(e) => warn!("Serial input error: {}", e),
        }

        match self.network.poll(now) {
            Some(ConnectOutcome::Connected) => self.emit("WiFi connected successfully!"),
            Some(ConnectOutcome::Failed) => self.emit("WiFi connection failed!"),
            Some(ConnectOutcome::Pending) | None => {}
        }

        if let Some(report) = self.uploader.tick(now, &self.state, &self.network) {
            self.emit(&report.status_line());
        }
    }

    /// Run forever, sleeping `loop_idle` between iterations
    pub fn run(&mut self, mut sleep: impl FnMut(Duration)) -> ! {
        let idle = self.config.loop_idle();
        info!("Entering device loop...");
        loop {
            self.run_once(Instant::now());
            sleep(idle);
        }
    }

    fn handle_line(&mut self, line: &str, now: Instant) {
        info!("Received: {}", redact(line));
        let outcome = self
            .dispatcher
            .dispatch(line, &mut self.state, &mut self.network, now);

        if let DispatchOutcome::Ack(text) = outcome {
            self.emit(&text);
        }
    }

    fn emit(&mut self, line: &str) {
        if let Err(e) = self.channel.write_line(line) {
            warn!("Could not send '{}': {}", line, e);
        }
    }

    pub fn phase(&self) -> DevicePhase {
        self.state.phase(self.network.is_connected())
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn channel(&self) -> &SerialChannel<L> {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut SerialChannel<L> {
        &mut self.channel
    }

    /// Backing store of the persisted credentials
    pub fn kv(&self) -> &S {
        self.dispatcher.store().kv()
    }

    pub fn network(&self) -> &NetworkConnector<R> {
        &self.network
    }

    pub fn uploader(&self) -> &TelemetryUploader<H, X> {
        &self.uploader
    }
}

/// Keep provisioning secrets out of the log
fn redact(line: &str) -> &str {
    if line.starts_with(crate::protocol::PROVISION_PREFIX) {
        "PROVISION:<redacted>"
    } else {
        line
    }
}
