//! JSON printer
//!
//! Maintains an explicit container stack so sibling values are comma
//! separated and `map_key`/value pairs stay attached. String escaping is
//! delegated to serde_json.

use std::io::{self, Write};

use super::Printer;

struct Container {
    map: bool,
    count: usize,
}

/// JSON implementation of [`Printer`]
pub struct JsonPrinter<W> {
    out: W,
    stack: Vec<Container>,
    pending_key: bool,
}

impl<W: Write> JsonPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            stack: Vec::new(),
            pending_key: false,
        }
    }

    /// Position for a value: after a key nothing is needed, otherwise a
    /// comma when the container already has entries.
    fn begin_value(&mut self) -> io::Result<()> {
        if self.pending_key {
            self.pending_key = false;
            return Ok(());
        }
        if let Some(top) = self.stack.last_mut() {
            if top.count > 0 {
                self.out.write_all(b", ")?;
            }
            top.count += 1;
        }
        Ok(())
    }
}

fn escaped(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

impl<W: Write> Printer for JsonPrinter<W> {
    fn begin_map(&mut self) -> io::Result<()> {
        self.begin_value()?;
        self.stack.push(Container {
            map: true,
            count: 0,
        });
        self.out.write_all(b"{")
    }

    fn begin_list(&mut self) -> io::Result<()> {
        self.begin_value()?;
        self.stack.push(Container {
            map: false,
            count: 0,
        });
        self.out.write_all(b"[")
    }

    fn end(&mut self) -> io::Result<()> {
        match self.stack.pop() {
            Some(Container { map: true, .. }) => self.out.write_all(b"}"),
            Some(Container { map: false, .. }) => self.out.write_all(b"]"),
            None => Ok(()),
        }
    }

    fn map_key(&mut self, key: &str) -> io::Result<()> {
        if let Some(top) = self.stack.last_mut() {
            if top.count > 0 {
                self.out.write_all(b", ")?;
            }
            top.count += 1;
        }
        write!(self.out, "{}: ", escaped(key))?;
        self.pending_key = true;
        Ok(())
    }

    fn string(&mut self, value: &str) -> io::Result<()> {
        self.begin_value()?;
        self.out.write_all(escaped(value).as_bytes())
    }

    fn integer(&mut self, value: i64) -> io::Result<()> {
        self.begin_value()?;
        write!(self.out, "{}", value)
    }

    fn null(&mut self) -> io::Result<()> {
        self.begin_value()?;
        self.out.write_all(b"null")
    }

    fn separator(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn set_prefix(&mut self, _prefix: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn render(f: impl FnOnce(&mut JsonPrinter<&mut Vec<u8>>)) -> Value {
        let mut buf = Vec::new();
        let mut p = JsonPrinter::new(&mut buf);
        f(&mut p);
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn test_empty_list() {
        let v = render(|p| {
            p.begin_list().unwrap();
            p.end().unwrap();
        });
        assert_eq!(v, json!([]));
    }

    #[test]
    fn test_list_of_strings() {
        let v = render(|p| {
            p.begin_list().unwrap();
            p.string("a").unwrap();
            p.separator().unwrap();
            p.string("b").unwrap();
            p.separator().unwrap();
            p.end().unwrap();
        });
        assert_eq!(v, json!(["a", "b"]));
    }

    #[test]
    fn test_nested_map() {
        let v = render(|p| {
            p.begin_list().unwrap();
            p.begin_map().unwrap();
            p.map_key("id").unwrap();
            p.string("t1").unwrap();
            p.map_key("total").unwrap();
            p.integer(3).unwrap();
            p.map_key("query").unwrap();
            p.begin_list().unwrap();
            p.string("id:m1").unwrap();
            p.null().unwrap();
            p.end().unwrap();
            p.end().unwrap();
            p.end().unwrap();
        });
        assert_eq!(
            v,
            json!([{"id": "t1", "total": 3, "query": ["id:m1", null]}])
        );
    }

    #[test]
    fn test_string_escaping() {
        let v = render(|p| {
            p.begin_list().unwrap();
            p.string("a \"quoted\"\nvalue").unwrap();
            p.end().unwrap();
        });
        assert_eq!(v, json!(["a \"quoted\"\nvalue"]));
    }
}
