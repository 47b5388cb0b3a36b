use crate::hal::{LinkError, SerialLink};
use log::warn;

/// Assembles controller bytes into lines.
///
/// Lines end with `\n` (a preceding `\r` is trimmed with the rest of the
/// surrounding whitespace). Lines longer than the limit are discarded whole.
pub struct SerialChannel<L: SerialLink> {
    link: L,
    line_buffer: String,
    max_line_len: usize,
    overflowed: bool,
}

impl<L: SerialLink> SerialChannel<L> {
    pub fn new(link: L, max_line_len: usize) -> Self {
        Self {
            link,
            line_buffer: String::new(),
            max_line_len,
            overflowed: false,
        }
    }

    /// Drain available bytes until a line completes or the link is empty.
    /// Returns the trimmed line; blank lines are skipped.
    pub fn poll_line(&mut self) -> Result<Option<String>, LinkError> {
        while let Some(byte) = self.link.read_byte()? {
            match byte {
                b'\n' => {
                    let overflowed = core::mem::replace(&mut self.overflowed, false);
                    let line = self.line_buffer.trim().to_string();
                    self.line_buffer.clear();

                    if overflowed {
                        warn!("Serial: Dropped line longer than {} bytes", self.max_line_len);
                    } else if !line.is_empty() {
                        return Ok(Some(line));
                    }
                }
                _ if self.overflowed => {}
                0x20..=0x7E | b'\r' | b'\t' => {
                    if self.line_buffer.len() < self.max_line_len {
                        self.line_buffer.push(byte as char);
                    } else {
                        self.overflowed = true;
                        self.line_buffer.clear();
                    }
                }
                _ => {
                    // Ignore other control and non-ASCII bytes
                }
            }
        }
        Ok(None)
    }

    pub fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
        self.link.write_line(line)
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }
}
