use crate::config::DeviceConfig;
use crate::hal::Radio;
use core::time::Duration;
use log::{info, warn};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Attempt started, link not up yet
    Pending,
    Connected,
    Failed,
}

#[derive(Debug, Clone, Copy)]
struct Attempt {
    polls: u32,
    next_poll: Instant,
}

/// Bounded, fixed-interval connection attempts.
///
/// `connect` only starts an attempt; `poll` checks the link once per poll
/// interval and gives up after the configured number of polls. No backoff and
/// no automatic retry. Every attempt, including one the radio refuses to
/// start, ends with exactly one terminal outcome from `poll`.
pub struct NetworkConnector<R: Radio> {
    radio: R,
    max_attempts: u32,
    poll_interval: Duration,
    attempt: Option<Attempt>,
    refused: bool,
}

impl<R: Radio> NetworkConnector<R> {
    pub fn new(radio: R, config: &DeviceConfig) -> Self {
        Self {
            radio,
            max_attempts: config.connect_max_attempts,
            poll_interval: config.connect_poll_interval(),
            attempt: None,
            refused: false,
        }
    }

    /// Start associating with `ssid`. Replaces any attempt in progress.
    pub fn connect(&mut self, ssid: &str, secret: &str, now: Instant) -> ConnectOutcome {
        info!("🌐 WiFi: Connecting to '{}'...", ssid);

        if let Err(e) = self.radio.begin(ssid, secret) {
            warn!("❌ WiFi: Could not start connection: {}", e);
            self.attempt = None;
            self.refused = true;
            return ConnectOutcome::Failed;
        }

        self.refused = false;
        self.attempt = Some(Attempt {
            polls: 0,
            next_poll: now + self.poll_interval,
        });
        ConnectOutcome::Pending
    }

    /// Advance the pending attempt. Returns the final outcome once, when the
    /// link comes up or the attempts are exhausted.
    pub fn poll(&mut self, now: Instant) -> Option<ConnectOutcome> {
        if core::mem::take(&mut self.refused) {
            return Some(ConnectOutcome::Failed);
        }

        let attempt = self.attempt.as_mut()?;
        if now < attempt.next_poll {
            return None;
        }

        attempt.polls += 1;
        attempt.next_poll += self.poll_interval;

        if self.radio.is_connected() {
            let polls = attempt.polls;
            self.attempt = None;
            info!("✅ WiFi: Connected after {} poll(s)", polls);
            if let Some(ip) = self.radio.ip_address() {
                info!("🌐 WiFi: IP address: {}", ip);
            }
            Some(ConnectOutcome::Connected)
        } else if attempt.polls >= self.max_attempts {
            self.attempt = None;
            warn!("❌ WiFi: Connection failed after {} polls", self.max_attempts);
            Some(ConnectOutcome::Failed)
        } else {
            None
        }
    }

    pub fn is_connecting(&self) -> bool {
        self.attempt.is_some()
    }

    pub fn is_connected(&self) -> bool {
        self.radio.is_connected()
    }

    pub fn network_time(&self) -> Option<u64> {
        self.radio.network_time()
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimRadio;

    fn connector(radio: SimRadio) -> NetworkConnector<SimRadio> {
        NetworkConnector::new(radio, &DeviceConfig::default())
    }

    #[test]
    fn connects_as_soon_as_link_reports_up() {
        let mut net = connector(SimRadio::connecting_after(3));
        let t0 = Instant::now();
        assert_eq!(net.connect("reef", "pw", t0), ConnectOutcome::Pending);
        assert_eq!(net.radio().last_ssid().as_deref(), Some("reef"));

        assert_eq!(net.poll(t0 + Duration::from_secs(1)), None);
        assert_eq!(net.poll(t0 + Duration::from_secs(2)), None);
        assert_eq!(
            net.poll(t0 + Duration::from_secs(3)),
            Some(ConnectOutcome::Connected)
        );
        assert!(!net.is_connecting());
        assert!(net.is_connected());
    }

    #[test]
    fn gives_up_after_configured_polls() {
        let mut net = connector(SimRadio::never_connecting());
        let t0 = Instant::now();
        net.connect("reef", "pw", t0);

        for second in 1..20 {
            assert_eq!(net.poll(t0 + Duration::from_secs(second)), None);
        }
        assert_eq!(
            net.poll(t0 + Duration::from_secs(20)),
            Some(ConnectOutcome::Failed)
        );
        assert_eq!(net.poll(t0 + Duration::from_secs(21)), None);
        assert!(!net.is_connected());
    }

    #[test]
    fn polls_are_rate_limited_by_interval() {
        let mut net = connector(SimRadio::never_connecting());
        let t0 = Instant::now();
        net.connect("reef", "pw", t0);

        // many loop iterations inside the first second count as no poll
        for ms in (0..1000).step_by(100) {
            assert_eq!(net.poll(t0 + Duration::from_millis(ms)), None);
        }
        assert_eq!(net.radio().status_checks(), 0);
    }

    #[test]
    fn radio_refusal_fails_immediately() {
        let mut net = connector(SimRadio::rejecting_begin());
        let t0 = Instant::now();
        assert_eq!(net.connect("reef", "pw", t0), ConnectOutcome::Failed);
        assert!(!net.is_connecting());

        // reported once by the next poll, without waiting for an interval
        assert_eq!(net.poll(t0), Some(ConnectOutcome::Failed));
        assert_eq!(net.poll(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn new_attempt_clears_unreported_refusal() {
        let mut net = connector(SimRadio::rejecting_begin());
        let t0 = Instant::now();
        net.connect("reef", "pw", t0);

        net.radio = SimRadio::never_connecting();
        assert_eq!(net.connect("reef", "pw", t0), ConnectOutcome::Pending);
        assert_eq!(net.poll(t0), None);
    }
}
