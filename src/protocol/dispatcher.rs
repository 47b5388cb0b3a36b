use super::{Command, CommandParser, DispatchOutcome, ParsedLine};
use crate::device::{Credentials, DeviceState, ProvisioningStore};
use crate::hal::{KeyValueStore, Radio};
use crate::network::NetworkConnector;
use log::{info, warn};
use std::time::Instant;

/// Protocol state machine: turns controller lines into state changes and
/// acknowledgement text
pub struct CommandDispatcher<S: KeyValueStore> {
    store: ProvisioningStore<S>,
}

impl<S: KeyValueStore> CommandDispatcher<S> {
    pub fn new(store: ProvisioningStore<S>) -> Self {
        Self { store }
    }

    /// Credentials persisted by a previous provisioning, all-empty if none
    pub fn load_credentials(&self) -> Credentials {
        self.store.load()
    }

    pub fn dispatch<R: Radio>(
        &mut self,
        line: &str,
        state: &mut DeviceState,
        network: &mut NetworkConnector<R>,
        now: Instant,
    ) -> DispatchOutcome {
        let command = match CommandParser::parse_line(line) {
            ParsedLine::Command(command) => command,
            ParsedLine::Rejected(reason) => {
                info!("Protocol: Rejected ({})", reason);
                return DispatchOutcome::Rejected(reason);
            }
            ParsedLine::Unrecognized => return DispatchOutcome::Ignored,
        };

        match command {
            Command::Provision(credentials) => {
                // storage failures are logged by the store and otherwise ignored
                let _ = self.store.save(&credentials);
                state.credentials = credentials;

                // a refused start surfaces from the next `NetworkConnector::poll`
                let creds = &state.credentials;
                network.connect(&creds.ssid, &creds.password, now);
                DispatchOutcome::Ack("WiFi and backend credentials received. Connecting...".into())
            }
            Command::SetTankNames(names) => {
                let count = state.tanks.set_names(names);
                info!("Protocol: {} tank name(s) set", count);
                DispatchOutcome::Ack(format!("Tank names set: {}", count))
            }
            Command::SetTankIds(ids) => {
                // reports the ids accepted, not the registry size
                let count = state.tanks.set_ids(ids);
                info!("Protocol: {} tank id(s) set", count);
                DispatchOutcome::Ack(format!("Tank IDs set: {}", count))
            }
            Command::SetName(name) => DispatchOutcome::Ack(format!("Device name set: {}", name)),
            Command::SelectTank(id) => {
                if !state.tanks.contains_id(&id) {
                    warn!("Protocol: Selected tank '{}' is not in the registry", id);
                }
                let ack = format!("Selected tank: {}", id);
                state.tanks.select(id);
                DispatchOutcome::Ack(ack)
            }
        }
    }

    pub fn store(&self) -> &ProvisioningStore<S> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceConfig;
    use crate::device::DevicePhase;
    use crate::protocol::Rejection;
    use crate::sim::{MemoryStore, SimRadio};

    struct Fixture {
        dispatcher: CommandDispatcher<MemoryStore>,
        state: DeviceState,
        network: NetworkConnector<SimRadio>,
        now: Instant,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dispatcher: CommandDispatcher::new(ProvisioningStore::new(MemoryStore::new())),
                state: DeviceState::default(),
                network: NetworkConnector::new(SimRadio::connecting_after(1), &DeviceConfig::default()),
                now: Instant::now(),
            }
        }

        fn send(&mut self, line: &str) -> DispatchOutcome {
            self.dispatcher
                .dispatch(line, &mut self.state, &mut self.network, self.now)
        }
    }

    #[test]
    fn provision_stores_persists_and_starts_connecting() {
        let mut fx = Fixture::new();
        let outcome = fx.send("PROVISION:reef|pw|AQ-1|https://b.co|key");
        assert_eq!(
            outcome,
            DispatchOutcome::Ack("WiFi and backend credentials received. Connecting...".into())
        );
        assert_eq!(fx.state.credentials.ssid, "reef");
        assert_eq!(fx.state.phase(false), DevicePhase::Provisioned);
        assert!(fx.network.is_connecting());
        assert_eq!(fx.network.radio().last_ssid().as_deref(), Some("reef"));

        let reloaded = ProvisioningStore::new(fx.dispatcher.store().kv().clone()).load();
        assert_eq!(reloaded, fx.state.credentials);
    }

    #[test]
    fn provision_survives_storage_failure() {
        let mut kv = MemoryStore::new();
        kv.fail_writes_after(2);
        let mut fx = Fixture::new();
        fx.dispatcher = CommandDispatcher::new(ProvisioningStore::new(kv));

        assert_eq!(
            fx.send("PROVISION:reef|pw|AQ-1|https://b.co|key"),
            DispatchOutcome::Ack("WiFi and backend credentials received. Connecting...".into())
        );
        assert_eq!(fx.state.credentials.device_uid, "AQ-1");
        assert!(fx.network.is_connecting());
        assert_eq!(fx.dispatcher.load_credentials(), Credentials::default());
        assert!(fx.dispatcher.store().kv().is_empty());
    }

    #[test]
    fn tank_ids_ack_counts_ids_not_tanks() {
        let mut fx = Fixture::new();
        fx.send("SET_TANKS:a|b|c");
        assert_eq!(
            fx.send("SET_TANK_IDS:1"),
            DispatchOutcome::Ack("Tank IDs set: 1".into())
        );
        assert_eq!(fx.state.tanks.len(), 3);
    }

    #[test]
    fn short_provision_changes_nothing() {
        let mut fx = Fixture::new();
        fx.send("PROVISION:reef|pw|AQ-1|https://b.co|key");
        let before = fx.state.credentials.clone();

        let outcome = fx.send("PROVISION:other|pw|AQ-2");
        assert_eq!(
            outcome,
            DispatchOutcome::Rejected(Rejection::FieldCount {
                expected: 5,
                found: 3
            })
        );
        assert_eq!(fx.state.credentials, before);
        assert_eq!(fx.dispatcher.load_credentials(), before);
    }

    #[test]
    fn unrecognized_lines_are_ignored() {
        let mut fx = Fixture::new();
        assert_eq!(fx.send("STATUS"), DispatchOutcome::Ignored);
        assert_eq!(fx.send(""), DispatchOutcome::Ignored);
        assert!(!fx.network.is_connecting());
    }

    #[test]
    fn tank_commands_acknowledge_counts() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.send("SET_TANKS:Reef|Nano|Quarantine"),
            DispatchOutcome::Ack("Tank names set: 3".into())
        );
        assert_eq!(
            fx.send("SET_TANK_IDS:1|2|3"),
            DispatchOutcome::Ack("Tank IDs set: 3".into())
        );
        assert_eq!(fx.state.tanks.tanks()[2].name, "Quarantine");
        assert_eq!(fx.state.tanks.tanks()[2].id, "3");
    }

    #[test]
    fn select_tank_overwrites_previous_selection() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.send("SELECT_TANK:x"),
            DispatchOutcome::Ack("Selected tank: x".into())
        );
        fx.send("SELECT_TANK:y");
        assert_eq!(fx.state.tanks.selected(), Some("y"));
    }

    #[test]
    fn set_name_is_acknowledged_but_not_stored() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.send("SET_NAME:Living room"),
            DispatchOutcome::Ack("Device name set: Living room".into())
        );
        assert!(fx.state.tanks.is_empty());
        assert_eq!(fx.state.credentials, Credentials::default());
    }
}
