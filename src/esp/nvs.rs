use crate::hal::{KeyValueStore, StorageError};
use anyhow::Result;
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
use log::info;

/// One NVS namespace on the default partition
pub struct NvsStore {
    nvs: EspNvs<NvsDefault>,
}

impl NvsStore {
    pub fn new(partition: EspDefaultNvsPartition, namespace: &str) -> Result<Self> {
        let nvs = EspNvs::new(partition, namespace, true)?;
        info!("✅ NVS: Namespace '{}' opened", namespace);
        Ok(Self { nvs })
    }
}

impl KeyValueStore for NvsStore {
    fn get_str(&self, key: &str) -> Result<Option<String>, StorageError> {
        let len = match self.nvs.str_len(key) {
            Ok(Some(len)) => len,
            Ok(None) => return Ok(None),
            Err(_) => return Err(StorageError::ReadFailed),
        };

        // the reported length includes the NUL terminator
        let mut buf = vec![0u8; len + 1];
        self.nvs
            .get_str(key, &mut buf)
            .map(|value| value.map(str::to_string))
            .map_err(|_| StorageError::ReadFailed)
    }

    fn set_str(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.nvs
            .set_str(key, value)
            .map_err(|_| StorageError::WriteFailed)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.nvs
            .remove(key)
            .map(|_| ())
            .map_err(|_| StorageError::WriteFailed)
    }
}
