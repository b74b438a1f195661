//! S-expression printer
//!
//! Lists render as `(a b)`, maps as plists `(:key value)`, absent values as
//! `nil`. Carries the same field set as the JSON printer.

use std::io::{self, Write};

use super::Printer;

/// S-expression implementation of [`Printer`]
pub struct SexpPrinter<W> {
    out: W,
    /// Token count per open container, for spacing
    stack: Vec<usize>,
}

impl<W: Write> SexpPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            stack: Vec::new(),
        }
    }

    fn space(&mut self) -> io::Result<()> {
        if let Some(top) = self.stack.last_mut() {
            if *top > 0 {
                self.out.write_all(b" ")?;
            }
            *top += 1;
        }
        Ok(())
    }
}

fn escaped(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

impl<W: Write> Printer for SexpPrinter<W> {
    fn begin_map(&mut self) -> io::Result<()> {
        self.space()?;
        self.stack.push(0);
        self.out.write_all(b"(")
    }

    fn begin_list(&mut self) -> io::Result<()> {
        self.space()?;
        self.stack.push(0);
        self.out.write_all(b"(")
    }

    fn end(&mut self) -> io::Result<()> {
        self.stack.pop();
        self.out.write_all(b")")
    }

    fn map_key(&mut self, key: &str) -> io::Result<()> {
        self.space()?;
        write!(self.out, ":{}", key)
    }

    fn string(&mut self, value: &str) -> io::Result<()> {
        self.space()?;
        self.out.write_all(escaped(value).as_bytes())
    }

    fn integer(&mut self, value: i64) -> io::Result<()> {
        self.space()?;
        write!(self.out, "{}", value)
    }

    fn null(&mut self) -> io::Result<()> {
        self.space()?;
        self.out.write_all(b"nil")
    }

    fn separator(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn set_prefix(&mut self, _prefix: &str) {}
}
