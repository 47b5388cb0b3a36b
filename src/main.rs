use aquaspec_firmware::DeviceConfig;
use std::time::Instant;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use aquaspec_firmware::esp::{AdcSensorBank, EspHttpTransport, NvsStore, UartLink, WifiRadio};
    use aquaspec_firmware::DeviceLoop;
    use esp_idf_hal::adc::oneshot::AdcDriver;
    use esp_idf_hal::delay::FreeRtos;
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver};
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::sys;

    // Initialize ESP-IDF system services
    sys::link_patches();

    // Initialize logging
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!("AquaSpec aquarium sensor firmware");
    log::info!("Initializing...");

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;
    let config = DeviceConfig::default();

    log::info!("✅ ESP32 initialized with ESP-IDF");

    // UART2 carries the controller link; UART0 stays with the log console
    log::info!("Initializing UART2 for controller link...");
    let uart_config = UartConfig::new().baudrate(config.serial_baud.into());
    let mut uart = UartDriver::new(
        peripherals.uart2,
        peripherals.pins.gpio17, // TX
        peripherals.pins.gpio16, // RX
        Option::<esp_idf_hal::gpio::Gpio0>::None,
        Option::<esp_idf_hal::gpio::Gpio0>::None,
        &uart_config,
    )?;

    // Split UART into tx and rx drivers
    let (uart_tx, uart_rx) = uart.split();
    let link = UartLink::new(uart_tx, uart_rx);

    log::info!("✅ UART2 initialized ({} baud)", config.serial_baud);

    let store = NvsStore::new(nvs_partition.clone(), &config.storage_namespace)?;
    let radio = WifiRadio::new(peripherals.modem, sysloop, nvs_partition)?;
    let http = EspHttpTransport::new(config.http_timeout());

    log::info!("Initializing ADC probes...");
    log::info!("  Temperature: GPIO36 | pH: GPIO39 | TDS: GPIO34");
    let adc = AdcDriver::new(peripherals.adc1)?;
    let sensors = AdcSensorBank::new(
        &adc,
        peripherals.pins.gpio36,
        peripherals.pins.gpio39,
        peripherals.pins.gpio34,
    )?;
    log::info!("✅ ADC probes configured");

    let mut device = DeviceLoop::new(config, link, store, radio, http, sensors);
    device.boot(Instant::now());

    device.run(|idle| FreeRtos::delay_ms(idle.as_millis() as u32))
}

/// Host simulator: the controller link is stdin/stdout, the radio connects
/// after three polls and uploads are logged instead of sent.
#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use aquaspec_firmware::sensors::reading_from_raw;
    use aquaspec_firmware::sim::{FixedSensors, MemoryStore, RecordingTransport, SimRadio};
    use aquaspec_firmware::DeviceLoop;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("AquaSpec firmware host simulator");

    let config = DeviceConfig::default();
    let link = host::StdioLink::spawn()?;
    let sensors = FixedSensors::new(reading_from_raw(50, 512, 600));

    let mut device = DeviceLoop::new(
        config,
        link,
        MemoryStore::new(),
        SimRadio::connecting_after(3),
        RecordingTransport::responding(201),
        sensors,
    );
    device.boot(Instant::now());

    device.run(std::thread::sleep)
}

#[cfg(not(target_os = "espidf"))]
mod host {
    use aquaspec_firmware::hal::{LinkError, SerialLink};
    use std::io::{Read, Write};
    use std::sync::mpsc::{self, Receiver, TryRecvError};

    /// Controller link over the process's stdin/stdout
    pub struct StdioLink {
        input: Receiver<u8>,
    }

    impl StdioLink {
        pub fn spawn() -> anyhow::Result<Self> {
            let (tx, rx) = mpsc::channel();

            std::thread::Builder::new()
                .name("stdin".to_string())
                .spawn(move || {
                    for byte in std::io::stdin().lock().bytes() {
                        let Ok(byte) = byte else { break };
                        if tx.send(byte).is_err() {
                            break;
                        }
                    }
                    log::info!("stdin closed");
                })?;

            Ok(Self { input: rx })
        }
    }

    impl SerialLink for StdioLink {
        fn read_byte(&mut self) -> Result<Option<u8>, LinkError> {
            match self.input.try_recv() {
                Ok(byte) => Ok(Some(byte)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => Ok(None),
            }
        }

        fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", line).map_err(|_| LinkError::WriteFailed)?;
            stdout.flush().map_err(|_| LinkError::WriteFailed)
        }
    }
}
