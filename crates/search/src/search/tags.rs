//! Tag collection over a query's match set

use std::collections::BTreeSet;

use crate::engine::{MailIndex, MessageCursor, Query, WILDCARD_QUERY};
use crate::error::Result;
use crate::printer::Printer;

/// Emit the set of tags over the query's matched messages.
///
/// The universal query takes the engine's global tag vocabulary directly
/// instead of walking every message. An engine that cannot produce the
/// sequence fails the invocation; "no tags" renders as an empty list and
/// is not an error.
pub(crate) fn print_tag_results(
    index: &dyn MailIndex,
    query: &Query,
    format: &mut dyn Printer,
) -> Result<()> {
    let tags = if query.query_string() == WILDCARD_QUERY {
        index.all_tags()?
    } else {
        collect_tags(index.search_messages(query)?)
    };

    format.begin_list()?;
    for tag in &tags {
        format.string(tag)?;
        format.separator()?;
    }
    format.end()?;

    Ok(())
}

/// Union of tags over a message cursor, deduplicated and sorted
pub fn collect_tags(messages: MessageCursor) -> Vec<String> {
    let mut tags = BTreeSet::new();
    for message in messages {
        tags.extend(message.tags.iter().cloned());
    }
    tags.into_iter().collect()
}
