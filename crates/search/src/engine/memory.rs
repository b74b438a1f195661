//! In-memory mail index
//!
//! Reference implementation of [`MailIndex`] used by tests and as an
//! executable statement of the engine contract. It evaluates the query
//! grammar subset the renderers depend on: the `*` wildcard, `id:` terms
//! (an exclusive prefix, so successive terms are implicitly OR'd), `tag:`
//! and `subject:` terms, and free terms matched against the subject.

use std::collections::{BTreeSet, HashSet};
use std::sync::RwLock;

use anyhow::Result;

use super::{Exclude, MailIndex, MessageCursor, Query, Sort, ThreadCursor, WILDCARD_QUERY};
use crate::models::{Address, Message, Thread, ThreadId, ThreadMember, parse_address_list};

/// In-memory implementation of [`MailIndex`]
///
/// Messages are grouped into threads in insertion order; searches clone the
/// matching subset, so the returned cursors are independent of later
/// mutation.
pub struct InMemoryIndex {
    threads: RwLock<Vec<(String, Vec<Message>)>>,
}

impl InMemoryIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            threads: RwLock::new(Vec::new()),
        }
    }

    /// Add a message to a thread, creating the thread on first use
    pub fn add_message(&self, thread_id: &str, message: Message) {
        let mut threads = self.threads.write().unwrap();
        if let Some((_, messages)) = threads.iter_mut().find(|(id, _)| id == thread_id) {
            messages.push(message);
        } else {
            threads.push((thread_id.to_string(), vec![message]));
        }
    }
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl MailIndex for InMemoryIndex {
    fn count_threads(&self, query: &Query) -> Result<usize> {
        Ok(self.search_threads(query)?.count())
    }

    fn count_messages(&self, query: &Query) -> Result<usize> {
        Ok(self.search_messages(query)?.count())
    }

    fn search_threads(&self, query: &Query) -> Result<ThreadCursor> {
        let compiled = CompiledQuery::compile(query.query_string());
        let threads = self.threads.read().unwrap();
        let mut results = Vec::new();

        for (thread_id, messages) in threads.iter() {
            // All removes excluded messages from the thread entirely;
            // True only keeps them from matching.
            let mut members: Vec<Message> = messages
                .iter()
                .filter(|m| query.exclude() != Exclude::All || !is_excluded(m, query))
                .cloned()
                .collect();
            if members.is_empty() {
                continue;
            }
            members.sort_by_key(|m| m.date);

            let flags: Vec<bool> = members
                .iter()
                .map(|m| message_matches(m, &compiled, query))
                .collect();
            if !flags.iter().any(|&f| f) {
                continue;
            }

            results.push(build_thread(thread_id, &members, &flags, query.sort()));
        }

        match query.sort() {
            Sort::OldestFirst => results.sort_by_key(|t| t.oldest_date),
            Sort::NewestFirst => results.sort_by_key(|t| std::cmp::Reverse(t.newest_date)),
        }

        Ok(Box::new(results.into_iter()))
    }

    fn search_messages(&self, query: &Query) -> Result<MessageCursor> {
        let compiled = CompiledQuery::compile(query.query_string());
        let threads = self.threads.read().unwrap();
        let mut hits = Vec::new();

        for (_, messages) in threads.iter() {
            for message in messages {
                if message_matches(message, &compiled, query) {
                    let mut hit = message.clone();
                    hit.matched = true;
                    hits.push(hit);
                }
            }
        }

        match query.sort() {
            Sort::OldestFirst => hits.sort_by_key(|m| m.date),
            Sort::NewestFirst => hits.sort_by_key(|m| std::cmp::Reverse(m.date)),
        }

        Ok(Box::new(hits.into_iter()))
    }

    fn all_tags(&self) -> Result<Vec<String>> {
        let threads = self.threads.read().unwrap();
        let mut tags = BTreeSet::new();
        for (_, messages) in threads.iter() {
            for message in messages {
                tags.extend(message.tags.iter().cloned());
            }
        }
        Ok(tags.into_iter().collect())
    }
}

fn is_excluded(message: &Message, query: &Query) -> bool {
    query
        .exclude_tags()
        .iter()
        .any(|tag| message.tags.contains(tag))
}

fn message_matches(message: &Message, compiled: &CompiledQuery, query: &Query) -> bool {
    if matches!(query.exclude(), Exclude::True | Exclude::All) && is_excluded(message, query) {
        return false;
    }
    compiled.matches(message)
}

fn build_thread(thread_id: &str, members: &[Message], flags: &[bool], sort: Sort) -> Thread {
    let matched: Vec<&Message> = members
        .iter()
        .zip(flags)
        .filter(|&(_, &f)| f)
        .map(|(m, _)| m)
        .collect();

    let oldest_date = matched.first().map(|m| m.date).unwrap_or_default();
    let newest_date = matched.last().map(|m| m.date).unwrap_or_default();

    let mut authors = Vec::new();
    for message in &matched {
        let name = author_name(message);
        if !name.is_empty() && !authors.contains(&name) {
            authors.push(name);
        }
    }

    let lead = match sort {
        Sort::OldestFirst => matched.first(),
        Sort::NewestFirst => matched.last(),
    };
    let subject = lead
        .and_then(|m| m.header("subject"))
        .unwrap_or_default()
        .to_string();

    let mut tags = BTreeSet::new();
    for message in members {
        tags.extend(message.tags.iter().cloned());
    }

    Thread::new(
        ThreadId::new(thread_id),
        authors.join(", "),
        subject,
        oldest_date,
        newest_date,
        matched.len(),
        members.len(),
        tags.into_iter().collect(),
        members
            .iter()
            .zip(flags)
            .map(|(m, &f)| ThreadMember {
                id: m.id.clone(),
                matched: f,
            })
            .collect(),
    )
}

/// Display name of the message author, falling back to the bare address
fn author_name(message: &Message) -> String {
    let Some(value) = message.header("from") else {
        return String::new();
    };
    let Some(list) = parse_address_list(value) else {
        return String::new();
    };
    first_mailbox(&list)
        .map(|m| m.name.clone().unwrap_or_else(|| m.addr.clone()))
        .unwrap_or_default()
}

fn first_mailbox(list: &[Address]) -> Option<&crate::models::Mailbox> {
    for address in list {
        match address {
            Address::Mailbox(mailbox) => return Some(mailbox),
            Address::Group { members, .. } => {
                if let Some(mailbox) = first_mailbox(members) {
                    return Some(mailbox);
                }
            }
        }
    }
    None
}

/// A query string broken into evaluable terms
struct CompiledQuery {
    wildcard: bool,
    ids: HashSet<String>,
    terms: Vec<Term>,
}

enum Term {
    Tag(String),
    Text(String),
}

impl CompiledQuery {
    fn compile(query: &str) -> Self {
        let mut wildcard = false;
        let mut ids = HashSet::new();
        let mut terms = Vec::new();

        for (field, value) in parse_terms(query) {
            match field.as_deref() {
                None if value == WILDCARD_QUERY => wildcard = true,
                None => terms.push(Term::Text(value)),
                Some("id") => {
                    ids.insert(value);
                }
                Some("tag") => terms.push(Term::Tag(value)),
                // Unknown prefixes fall back to free-text matching
                Some(_) => terms.push(Term::Text(value)),
            }
        }

        Self {
            wildcard,
            ids,
            terms,
        }
    }

    fn matches(&self, message: &Message) -> bool {
        if self.wildcard {
            return true;
        }
        if self.ids.is_empty() && self.terms.is_empty() {
            return false;
        }
        if !self.ids.is_empty() && !self.ids.contains(message.id.as_str()) {
            return false;
        }
        self.terms.iter().all(|term| match term {
            Term::Tag(tag) => message.tags.iter().any(|t| t == tag),
            Term::Text(text) => message
                .header("subject")
                .is_some_and(|subject| subject.to_lowercase().contains(&text.to_lowercase())),
        })
    }
}

/// Split a query string into `(field, value)` terms.
///
/// Values may be double-quoted; inside quotes a doubled quote stands for a
/// literal one, mirroring [`boolean_term`](super::boolean_term).
fn parse_terms(query: &str) -> Vec<(Option<String>, String)> {
    let mut terms = Vec::new();
    let mut chars = query.chars().peekable();

    while chars.peek().is_some() {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }

        let mut field: Option<String> = None;
        let mut value = String::new();
        let mut quoted = false;

        while let Some(&c) = chars.peek() {
            match c {
                c if c.is_whitespace() => break,
                ':' if field.is_none() => {
                    chars.next();
                    field = Some(std::mem::take(&mut value));
                }
                '"' => {
                    chars.next();
                    quoted = true;
                    loop {
                        match chars.next() {
                            Some('"') => {
                                if chars.peek() == Some(&'"') {
                                    chars.next();
                                    value.push('"');
                                } else {
                                    break;
                                }
                            }
                            Some(inner) => value.push(inner),
                            None => break,
                        }
                    }
                }
                _ => {
                    value.push(c);
                    chars.next();
                }
            }
        }

        if !value.is_empty() || field.is_some() || quoted {
            terms.push((field, value));
        }
    }

    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::boolean_term;
    use crate::models::MessageId;
    use chrono::{TimeZone, Utc};

    fn message(id: &str, subject: &str, tags: &[&str], hour: u32) -> Message {
        let mut builder = Message::builder(MessageId::new(id))
            .header("From", "Alice <alice@example.org>")
            .header("Subject", subject)
            .date(Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap());
        for tag in tags {
            builder = builder.tag(*tag);
        }
        builder.build()
    }

    fn sample_index() -> InMemoryIndex {
        let index = InMemoryIndex::new();
        index.add_message("t1", message("m1", "Budget report", &["inbox", "work"], 9));
        index.add_message("t1", message("m2", "Re: Budget report", &["inbox"], 10));
        index.add_message("t2", message("m3", "Lunch plans", &["inbox", "social"], 11));
        index
    }

    #[test]
    fn test_wildcard_matches_everything() {
        let index = sample_index();
        let hits: Vec<_> = index
            .search_messages(&Query::new("*"))
            .unwrap()
            .map(|m| m.id.0)
            .collect();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_id_terms_are_disjunctive() {
        let index = sample_index();
        let hits: Vec<_> = index
            .search_messages(&Query::new("id:m1 id:m3").with_sort(Sort::OldestFirst))
            .unwrap()
            .map(|m| m.id.0)
            .collect();
        assert_eq!(hits, vec!["m1", "m3"]);
    }

    #[test]
    fn test_tag_term() {
        let index = sample_index();
        let hits: Vec<_> = index
            .search_messages(&Query::new("tag:work"))
            .unwrap()
            .map(|m| m.id.0)
            .collect();
        assert_eq!(hits, vec!["m1"]);
    }

    #[test]
    fn test_sort_order() {
        let index = sample_index();
        let oldest: Vec<_> = index
            .search_messages(&Query::new("*").with_sort(Sort::OldestFirst))
            .unwrap()
            .map(|m| m.id.0)
            .collect();
        assert_eq!(oldest, vec!["m1", "m2", "m3"]);

        let newest: Vec<_> = index
            .search_messages(&Query::new("*").with_sort(Sort::NewestFirst))
            .unwrap()
            .map(|m| m.id.0)
            .collect();
        assert_eq!(newest, vec!["m3", "m2", "m1"]);
    }

    #[test]
    fn test_exclude_true_omits_tagged_messages() {
        let index = sample_index();
        let query = Query::new("*").with_exclude(Exclude::True, vec!["social".to_string()]);
        let hits: Vec<_> = index
            .search_messages(&query)
            .unwrap()
            .map(|m| m.id.0)
            .collect();
        assert!(!hits.contains(&"m3".to_string()));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_exclude_false_keeps_tagged_messages() {
        let index = sample_index();
        let query = Query::new("*").with_exclude(Exclude::False, vec!["social".to_string()]);
        assert_eq!(index.count_messages(&query).unwrap(), 3);
    }

    #[test]
    fn test_thread_aggregation() {
        let index = sample_index();
        let threads: Vec<_> = index
            .search_threads(&Query::new("tag:work").with_sort(Sort::OldestFirst))
            .unwrap()
            .collect();
        assert_eq!(threads.len(), 1);
        let thread = &threads[0];
        assert_eq!(thread.id.as_str(), "t1");
        assert_eq!(thread.matched_count, 1);
        assert_eq!(thread.total_count, 2);
        assert_eq!(thread.authors, "Alice");
        assert_eq!(thread.subject, "Budget report");
        assert_eq!(thread.tags, vec!["inbox".to_string(), "work".to_string()]);
        assert!(thread.matched_count <= thread.total_count);
    }

    #[test]
    fn test_boolean_term_round_trips_through_parser() {
        let index = InMemoryIndex::new();
        index.add_message("t1", message("odd \"id with spaces", "Strange", &[], 9));

        let term = boolean_term("id", "odd \"id with spaces");
        let hits: Vec<_> = index
            .search_messages(&Query::new(&term))
            .unwrap()
            .map(|m| m.id.0)
            .collect();
        assert_eq!(hits, vec!["odd \"id with spaces".to_string()]);
    }

    #[test]
    fn test_all_tags_sorted_and_deduplicated() {
        let index = sample_index();
        assert_eq!(
            index.all_tags().unwrap(),
            vec!["inbox".to_string(), "social".to_string(), "work".to_string()]
        );
    }
}
