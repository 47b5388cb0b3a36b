use crate::hal::{Radio, RadioError};
use anyhow::Result;
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sntp::{EspSntp, SyncStatus};
use esp_idf_svc::sys::EspError;
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};
use log::info;
use std::net::Ipv4Addr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Station-mode WiFi plus SNTP for the reading timestamps.
///
/// Unlike `BlockingWifi`, nothing here waits for the association; the
/// connector polls `is_connected` instead.
pub struct WifiRadio {
    wifi: Box<EspWifi<'static>>,
    sntp: EspSntp<'static>,
}

impl WifiRadio {
    pub fn new(modem: Modem, sysloop: EspSystemEventLoop, nvs: EspDefaultNvsPartition) -> Result<Self> {
        info!("🌐 WiFi: Creating EspWifi instance...");
        let wifi = EspWifi::new(modem, sysloop, Some(nvs))?;
        info!("✅ WiFi: EspWifi created");

        let sntp = EspSntp::new_default()?;
        info!("✅ SNTP: Started");

        Ok(Self {
            wifi: Box::new(wifi),
            sntp,
        })
    }
}

fn driver_error(e: EspError) -> RadioError {
    RadioError::Driver(e.code())
}

impl Radio for WifiRadio {
    fn begin(&mut self, ssid: &str, secret: &str) -> Result<(), RadioError> {
        let mut ssid_str = heapless::String::<32>::new();
        ssid_str
            .push_str(ssid)
            .map_err(|_| RadioError::SsidTooLong)?;

        let mut password_str = heapless::String::<64>::new();
        password_str
            .push_str(secret)
            .map_err(|_| RadioError::SecretTooLong)?;

        let wifi_configuration = Configuration::Client(ClientConfiguration {
            ssid: ssid_str,
            auth_method: AuthMethod::WPA2Personal,
            password: password_str,
            ..Default::default()
        });

        // Disconnect if currently connected
        if self.wifi.is_connected().unwrap_or(false) {
            info!("Disconnecting from current network...");
            let _ = self.wifi.disconnect();
        }

        self.wifi
            .set_configuration(&wifi_configuration)
            .map_err(driver_error)?;
        info!("✅ WiFi: Configuration set");

        if !self.wifi.is_started().map_err(driver_error)? {
            info!("🌐 WiFi: Starting...");
            self.wifi.start().map_err(driver_error)?;
            info!("✅ WiFi: Started");
        }

        self.wifi.connect().map_err(driver_error)?;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false) && self.wifi.sta_netif().is_up().unwrap_or(false)
    }

    fn ip_address(&self) -> Option<Ipv4Addr> {
        self.wifi.sta_netif().get_ip_info().ok().map(|ip_info| ip_info.ip)
    }

    fn network_time(&self) -> Option<u64> {
        if self.sntp.get_sync_status() != SyncStatus::Completed {
            return None;
        }
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|elapsed| elapsed.as_secs())
    }
}
