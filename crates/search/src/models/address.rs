//! Mailbox and address-group model with header-value parsing
//!
//! An address header holds a flat list of entries, each either a mailbox or
//! a named group of further entries (RFC 5322 group syntax). The tagged
//! variant keeps flattening a plain recursive traversal.

use std::iter::Peekable;
use std::str::Chars;

use serde::{Deserialize, Serialize};

/// A display name plus a required address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    /// Display name (e.g., "John Doe")
    pub name: Option<String>,
    /// Email address (e.g., "john@example.com")
    pub addr: String,
}

impl Mailbox {
    /// Create a mailbox with just the address
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            name: None,
            addr: addr.into(),
        }
    }

    /// Create a mailbox with a display name
    pub fn with_name(name: impl Into<String>, addr: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            addr: addr.into(),
        }
    }

    /// Compose the display string, quoting the name only when it contains
    /// characters that require quoting.
    ///
    /// Compare `John Doe <john@doe.com>` vs. `"Doe, John" <john@doe.com>`.
    pub fn name_addr(&self) -> String {
        match &self.name {
            Some(name) if needs_quoting(name) => {
                format!("\"{}\" <{}>", escape_name(name), self.addr)
            }
            Some(name) => format!("{} <{}>", name, self.addr),
            None => self.addr.clone(),
        }
    }
}

/// One entry of an address header value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Address {
    /// A single name/address pair
    Mailbox(Mailbox),
    /// A named collection of entries; may be empty
    Group {
        name: String,
        members: Vec<Address>,
    },
}

fn needs_quoting(name: &str) -> bool {
    name.chars()
        .any(|c| matches!(c, '(' | ')' | '<' | '>' | '[' | ']' | ':' | ';' | '@' | '\\' | ',' | '.' | '"'))
}

fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Parse a raw address-header value into mailboxes and groups.
///
/// Returns `None` when the value contains nothing parseable, which callers
/// treat as "this header contributes no addresses" rather than an error.
pub fn parse_address_list(value: &str) -> Option<Vec<Address>> {
    let mut chars = value.chars().peekable();
    let list = parse_list(&mut chars, false);
    if list.is_empty() { None } else { Some(list) }
}

/// Parse entries until end of input, or until `;` when inside a group.
fn parse_list(chars: &mut Peekable<Chars>, in_group: bool) -> Vec<Address> {
    let mut entries = Vec::new();
    let mut raw = String::new();
    let mut in_quotes = false;
    let mut in_angle = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' if in_quotes => {
                raw.push(c);
                if let Some(next) = chars.next() {
                    raw.push(next);
                }
            }
            '"' if !in_angle => {
                in_quotes = !in_quotes;
                raw.push(c);
            }
            '<' if !in_quotes => {
                in_angle = true;
                raw.push(c);
            }
            '>' if !in_quotes => {
                in_angle = false;
                raw.push(c);
            }
            ',' if !in_quotes && !in_angle => {
                flush_mailbox(&mut raw, &mut entries);
            }
            ':' if !in_quotes && !in_angle => {
                let name = unquote(raw.trim());
                raw.clear();
                let members = parse_list(chars, true);
                entries.push(Address::Group { name, members });
            }
            ';' if !in_quotes && !in_angle && in_group => {
                flush_mailbox(&mut raw, &mut entries);
                return entries;
            }
            _ => raw.push(c),
        }
    }

    flush_mailbox(&mut raw, &mut entries);
    entries
}

fn flush_mailbox(raw: &mut String, entries: &mut Vec<Address>) {
    if let Some(mailbox) = parse_mailbox(raw.trim()) {
        entries.push(Address::Mailbox(mailbox));
    }
    raw.clear();
}

/// Parse a single mailbox from a string like `John Doe <john@example.com>`
/// or a bare address. Entries without an address yield `None`.
fn parse_mailbox(raw: &str) -> Option<Mailbox> {
    if raw.is_empty() {
        return None;
    }

    if let Some(start) = raw.rfind('<')
        && let Some(end) = raw.rfind('>')
        && start < end
    {
        let addr = raw[start + 1..end].trim();
        if addr.is_empty() {
            return None;
        }
        let name = unquote(raw[..start].trim());
        return Some(Mailbox {
            name: (!name.is_empty()).then_some(name),
            addr: addr.to_string(),
        });
    }

    Some(Mailbox::new(raw))
}

/// Strip surrounding double quotes and unescape the contents.
fn unquote(s: &str) -> String {
    let inner = match s.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        Some(inner) => inner,
        None => return s.to_string(),
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
