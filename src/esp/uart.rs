use crate::hal::{LinkError, SerialLink};
use esp_idf_hal::delay::NON_BLOCK;
use esp_idf_hal::uart::{UartRxDriver, UartTxDriver};

/// Controller link over a UART (e.g. to a Bluetooth serial bridge)
pub struct UartLink<'d> {
    uart_tx: UartTxDriver<'d>,
    uart_rx: UartRxDriver<'d>,
}

impl<'d> UartLink<'d> {
    pub fn new(uart_tx: UartTxDriver<'d>, uart_rx: UartRxDriver<'d>) -> Self {
        Self { uart_tx, uart_rx }
    }
}

impl SerialLink for UartLink<'_> {
    fn read_byte(&mut self) -> Result<Option<u8>, LinkError> {
        let mut buf = [0u8; 1];
        match self.uart_rx.read(&mut buf, NON_BLOCK) {
            Ok(1) => Ok(Some(buf[0])),
            Ok(_) => Ok(None),
            Err(_) => Err(LinkError::ReadFailed),
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
        self.uart_tx
            .write(line.as_bytes())
            .map_err(|_| LinkError::WriteFailed)?;
        self.uart_tx
            .write(b"\r\n")
            .map_err(|_| LinkError::WriteFailed)?;
        Ok(())
    }
}
