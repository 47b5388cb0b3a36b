use crate::hal::{SensorBank, SensorError, SensorReading};
use crate::sensors;
use anyhow::Result;
use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::adc::ADC1;
use esp_idf_hal::gpio::{Gpio34, Gpio36, Gpio39};

type Channel<'d, P> = AdcChannelDriver<'d, P, &'d AdcDriver<'d, ADC1>>;

/// Temperature, pH and TDS probes on ADC1 (GPIO36, GPIO39, GPIO34)
pub struct AdcSensorBank<'d> {
    adc: &'d AdcDriver<'d, ADC1>,
    temperature: Channel<'d, Gpio36>,
    ph: Channel<'d, Gpio39>,
    tds: Channel<'d, Gpio34>,
}

impl<'d> AdcSensorBank<'d> {
    pub fn new(
        adc: &'d AdcDriver<'d, ADC1>,
        temperature_pin: Gpio36,
        ph_pin: Gpio39,
        tds_pin: Gpio34,
    ) -> Result<Self> {
        let config = AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        };

        Ok(Self {
            adc,
            temperature: AdcChannelDriver::new(adc, temperature_pin, &config)?,
            ph: AdcChannelDriver::new(adc, ph_pin, &config)?,
            tds: AdcChannelDriver::new(adc, tds_pin, &config)?,
        })
    }
}

impl SensorBank for AdcSensorBank<'_> {
    fn sample(&mut self) -> Result<SensorReading, SensorError> {
        let temperature = self
            .adc
            .read_raw(&mut self.temperature)
            .map_err(|_| SensorError::AdcError)?;
        let ph = self
            .adc
            .read_raw(&mut self.ph)
            .map_err(|_| SensorError::AdcError)?;
        let tds = self
            .adc
            .read_raw(&mut self.tds)
            .map_err(|_| SensorError::AdcError)?;

        Ok(sensors::reading_from_raw(temperature, ph, tds))
    }
}
