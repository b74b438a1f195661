//! Domain models for search results

mod address;
mod message;
mod thread;

pub use address::{Address, Mailbox, parse_address_list};
pub use message::{Message, MessageBuilder, MessageId};
pub use thread::{Thread, ThreadId, ThreadMember};
