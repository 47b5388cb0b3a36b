use crate::hal::{HttpTransport, TransportError};
use core::time::Duration;
use embedded_svc::http::client::Client;
use embedded_svc::io::{Read, Write};
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
use log::debug;

/// HTTPS client using the ESP-IDF certificate bundle. A new connection is
/// opened per request.
pub struct EspHttpTransport {
    timeout: Duration,
}

impl EspHttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl HttpTransport for EspHttpTransport {
    fn post(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<u16, TransportError> {
        let config = Configuration {
            timeout: Some(self.timeout),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        };

        let connection = EspHttpConnection::new(&config).map_err(|_| TransportError::Connect)?;
        let mut client = Client::wrap(connection);

        let content_length = body.len().to_string();
        let mut all_headers = headers.to_vec();
        all_headers.push(("Content-Length", content_length.as_str()));

        let mut request = client
            .post(url, &all_headers)
            .map_err(|_| TransportError::InvalidUrl)?;
        request.write_all(body).map_err(|_| TransportError::Io)?;
        request.flush().map_err(|_| TransportError::Io)?;

        let mut response = request.submit().map_err(|_| TransportError::Connect)?;
        let status = response.status();

        let mut buf = [0u8; 256];
        if let Ok(read) = response.read(&mut buf) {
            debug!("Backend response body: {}", String::from_utf8_lossy(&buf[..read]));
        }

        Ok(status)
    }
}
