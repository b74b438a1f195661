//! Linear text printers
//!
//! One value per record; `separator` ends a record with either a newline
//! (human output) or a NUL byte (machine output). Structural calls are
//! accepted and ignored so renderers can drive any printer identically.

use std::io::{self, Write};

use super::Printer;

/// Text printer with a configurable record delimiter
pub struct TextPrinter<W> {
    out: W,
    delimiter: u8,
    prefix: Option<String>,
}

impl<W: Write> TextPrinter<W> {
    /// Newline-delimited text
    pub fn new(out: W) -> Self {
        Self {
            out,
            delimiter: b'\n',
            prefix: None,
        }
    }

    /// NUL-delimited text
    pub fn null_delimited(out: W) -> Self {
        Self {
            out,
            delimiter: b'\0',
            prefix: None,
        }
    }
}

impl<W: Write> Printer for TextPrinter<W> {
    fn begin_map(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn begin_list(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn end(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn map_key(&mut self, _key: &str) -> io::Result<()> {
        Ok(())
    }

    fn string(&mut self, value: &str) -> io::Result<()> {
        match &self.prefix {
            Some(prefix) => write!(self.out, "{}:{}", prefix, value),
            None => self.out.write_all(value.as_bytes()),
        }
    }

    fn integer(&mut self, value: i64) -> io::Result<()> {
        write!(self.out, "{}", value)
    }

    fn null(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn separator(&mut self) -> io::Result<()> {
        self.out.write_all(&[self.delimiter])
    }

    fn set_prefix(&mut self, prefix: &str) {
        self.prefix = Some(prefix.to_string());
    }

    fn is_text(&self) -> bool {
        true
    }
}
