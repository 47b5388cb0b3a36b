//! Device-wide runtime state
//!
//! Everything the controller can change lives in [`DeviceState`], owned by the
//! device loop and handed to the dispatcher, connector and uploader by
//! reference.

pub mod credentials;
pub mod tanks;

pub use credentials::{Credentials, ProvisioningStore};
pub use tanks::{TankDescriptor, TankRegistry};

/// Provisioning and connectivity phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevicePhase {
    Unprovisioned,
    Provisioned,
    Connected,
}

#[derive(Debug, Default)]
pub struct DeviceState {
    pub credentials: Credentials,
    pub tanks: TankRegistry,
}

impl DeviceState {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            tanks: TankRegistry::new(),
        }
    }

    /// Phase given the current link status. Tank selection does not affect
    /// the phase.
    pub fn phase(&self, link_up: bool) -> DevicePhase {
        if !self.credentials.is_provisioned() {
            DevicePhase::Unprovisioned
        } else if link_up {
            DevicePhase::Connected
        } else {
            DevicePhase::Provisioned
        }
    }
}
