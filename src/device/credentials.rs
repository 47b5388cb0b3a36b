use crate::hal::{KeyValueStore, StorageError};
use log::{info, warn};

const KEY_SSID: &str = "ssid";
const KEY_PASSWORD: &str = "password";
const KEY_DEVICE_UID: &str = "device_uid";
const KEY_BACKEND_URL: &str = "supabase_url";
const KEY_BACKEND_KEY: &str = "supabase_key";

const ALL_KEYS: [&str; 5] = [
    KEY_SSID,
    KEY_PASSWORD,
    KEY_DEVICE_UID,
    KEY_BACKEND_URL,
    KEY_BACKEND_KEY,
];

/// Network and backend credentials supplied by the controller.
///
/// Either every field is empty (unprovisioned) or every field holds the value
/// of the last accepted `PROVISION:` command.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub ssid: String,
    pub password: String,
    pub device_uid: String,
    pub backend_url: String,
    pub backend_key: String,
}

impl Credentials {
    pub fn is_provisioned(&self) -> bool {
        self.fields().iter().all(|field| !field.is_empty())
    }

    fn fields(&self) -> [&str; 5] {
        [
            self.ssid.as_str(),
            self.password.as_str(),
            self.device_uid.as_str(),
            self.backend_url.as_str(),
            self.backend_key.as_str(),
        ]
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .field("device_uid", &self.device_uid)
            .field("backend_url", &self.backend_url)
            .field("backend_key", &"<redacted>")
            .finish()
    }
}

/// Persists [`Credentials`] as five string entries of one storage namespace
pub struct ProvisioningStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> ProvisioningStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Write all five fields. On any failure every key is removed again so a
    /// later `load` reports unprovisioned instead of a mixed set.
    pub fn save(&mut self, credentials: &Credentials) -> Result<(), StorageError> {
        let result = ALL_KEYS
            .iter()
            .zip(credentials.fields())
            .try_for_each(|(key, value)| self.kv.set_str(key, value));

        match result {
            Ok(()) => {
                info!("💾 Credentials saved");
                Ok(())
            }
            Err(e) => {
                warn!("❌ Credentials save failed: {}", e);
                for key in ALL_KEYS {
                    let _ = self.kv.remove(key);
                }
                Err(e)
            }
        }
    }

    /// Read all five fields, or all-empty if any is missing or unreadable
    pub fn load(&self) -> Credentials {
        let mut values: [String; 5] = Default::default();

        for (slot, key) in values.iter_mut().zip(ALL_KEYS) {
            match self.kv.get_str(key) {
                Ok(Some(value)) if !value.is_empty() => *slot = value,
                Ok(_) => return Credentials::default(),
                Err(e) => {
                    warn!("Credentials load failed on '{}': {}", key, e);
                    return Credentials::default();
                }
            }
        }

        let [ssid, password, device_uid, backend_url, backend_key] = values;
        Credentials {
            ssid,
            password,
            device_uid,
            backend_url,
            backend_key,
        }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }
}
