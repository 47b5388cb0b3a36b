//! ESP-IDF implementations of the collaborator traits

pub mod adc;
pub mod http;
pub mod nvs;
pub mod uart;
pub mod wifi;

pub use adc::AdcSensorBank;
pub use http::EspHttpTransport;
pub use nvs::NvsStore;
pub use uart::UartLink;
pub use wifi::WifiRadio;
