//! Message-granularity rendering: ids, file paths, and extracted addresses

use super::SearchOptions;
use super::window::RenderWindow;
use crate::engine::{MailIndex, Query};
use crate::error::Result;
use crate::models::{Address, Mailbox, Message, parse_address_list};
use crate::printer::Printer;

/// What to emit per message in the window
#[derive(Debug, Clone, Copy)]
pub(crate) enum MessageMode {
    /// One record per message: its id
    Ids,
    /// One record per stored file path
    Files,
    /// Flattened mailboxes from the selected address headers
    Addresses { sender: bool, recipients: bool },
}

pub(crate) fn print_message_results(
    index: &dyn MailIndex,
    query: &Query,
    opts: &SearchOptions,
    format: &mut dyn Printer,
    mode: MessageMode,
) -> Result<()> {
    let window = RenderWindow::resolve(opts.offset, opts.limit, || index.count_messages(query))?;
    let messages = index.search_messages(query)?;

    format.begin_list()?;
    for (i, message) in messages.enumerate() {
        if window.is_done(i) {
            break;
        }
        if !window.contains(i) {
            continue;
        }

        match mode {
            MessageMode::Files => print_files(&message, opts.dupe, format)?,
            MessageMode::Ids => print_message_id(&message, opts.dupe, format)?,
            MessageMode::Addresses { sender, recipients } => {
                if sender {
                    print_address_header(message.header("from"), format)?;
                }
                if recipients {
                    for header in ["to", "cc", "bcc"] {
                        print_address_header(message.header(header), format)?;
                    }
                }
            }
        }
    }
    format.end()?;

    Ok(())
}

/// Emit the message's file paths; with a dupe selector only the selected
/// copy (1-based) is emitted.
fn print_files(message: &Message, dupe: Option<usize>, format: &mut dyn Printer) -> Result<()> {
    for (i, path) in message.filenames.iter().enumerate() {
        let j = i + 1;
        if dupe.is_none() || dupe == Some(j) {
            format.string(&path.to_string_lossy())?;
            format.separator()?;
        }
    }
    Ok(())
}

/// Emit the message id unless a dupe threshold filters it out; `dupe = n`
/// keeps only messages stored in at least n locations.
fn print_message_id(message: &Message, dupe: Option<usize>, format: &mut dyn Printer) -> Result<()> {
    let keep = match dupe {
        None => true,
        Some(n) if n <= 1 => true,
        Some(n) => message.filenames.len() >= n,
    };
    if keep {
        format.set_prefix("id");
        format.string(message.id.as_str())?;
        format.separator()?;
    }
    Ok(())
}

/// Emit the mailboxes of one address header. Unparseable or absent values
/// contribute nothing.
fn print_address_header(value: Option<&str>, format: &mut dyn Printer) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let Some(list) = parse_address_list(value) else {
        return Ok(());
    };
    print_address_list(&list, format)
}

/// Flatten an address list; groups recurse, empty groups contribute nothing.
fn print_address_list(list: &[Address], format: &mut dyn Printer) -> Result<()> {
    for address in list {
        match address {
            Address::Group { members, .. } => print_address_list(members, format)?,
            Address::Mailbox(mailbox) => print_mailbox(mailbox, format)?,
        }
    }
    Ok(())
}

fn print_mailbox(mailbox: &Mailbox, format: &mut dyn Printer) -> Result<()> {
    let name_addr = mailbox.name_addr();

    if format.is_text() {
        format.string(&name_addr)?;
        format.separator()?;
    } else {
        format.begin_map()?;
        format.map_key("name")?;
        match &mailbox.name {
            Some(name) => format.string(name)?,
            None => format.null()?,
        }
        format.map_key("address")?;
        format.string(&mailbox.addr)?;
        format.map_key("name-addr")?;
        format.string(&name_addr)?;
        format.end()?;
        format.separator()?;
    }

    Ok(())
}
