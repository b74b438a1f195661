//! End-to-end tests for search result rendering
//!
//! These tests drive the full pipeline: in-memory index, query, windowing,
//! and every output encoding.

use chrono::{DateTime, TimeZone, Utc};
use search::{
    Error, Exclude, Format, InMemoryIndex, MailIndex, Message, MessageId, Output, Query,
    SearchOptions, Sort, run_search, thread_queries,
};
use serde_json::Value;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

/// One conversation of three messages (two matching `tag:inbox`) plus a
/// second thread used for address extraction.
fn sample_index() -> InMemoryIndex {
    let index = InMemoryIndex::new();

    index.add_message(
        "t1",
        Message::builder(MessageId::new("m1"))
            .header("From", "Alice <alice@example.org>")
            .header("Subject", "Hello world")
            .date(at(2001, 5, 20, 9, 0))
            .tag("inbox")
            .tag("work")
            .filename("/mail/cur/m1-1")
            .build(),
    );
    index.add_message(
        "t1",
        Message::builder(MessageId::new("m2"))
            .header("From", "Alice <alice@example.org>")
            .header("Subject", "Hello world")
            .date(at(2001, 5, 20, 10, 0))
            .tag("inbox")
            .filename("/mail/cur/m2-1")
            .filename("/mail/cur/m2-2")
            .build(),
    );
    index.add_message(
        "t1",
        Message::builder(MessageId::new("m3"))
            .header("From", "Bob <bob@example.org>")
            .header("Subject", "Hello world")
            .date(at(2001, 5, 20, 11, 0))
            .filename("/mail/cur/m3-1")
            .filename("/mail/cur/m3-2")
            .filename("/mail/cur/m3-3")
            .build(),
    );
    index.add_message(
        "t2",
        Message::builder(MessageId::new("m4"))
            .header("From", "Carol <carol@x.org>")
            .header("To", "Team: Alice <alice@example.org>, bob@x.org;, \"Doe, John\" <john@doe.com>")
            .header("Cc", "undisclosed-recipients:;")
            .header("Subject", "Hello again")
            .date(at(2001, 6, 1, 8, 0))
            .filename("/mail/cur/m4-1")
            .build(),
    );

    index
}

fn render(index: &InMemoryIndex, opts: &SearchOptions) -> String {
    let mut buf = Vec::new();
    run_search(index, opts, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_text_summary_line() {
    let index = sample_index();
    let opts = SearchOptions::new("tag:inbox");
    // Newest matched message is m2 at 2001-05-20; the relative date falls
    // into the plain ISO bucket and is right-aligned to 12 columns.
    assert_eq!(
        render(&index, &opts),
        "thread:t1   2001-05-20 [2/3] Alice; Hello world (inbox work)\n"
    );
}

#[test]
fn test_threads_output_text_and_json() {
    let index = sample_index();
    let mut opts = SearchOptions::new("tag:inbox");
    opts.output = Output::Threads;
    assert_eq!(render(&index, &opts), "thread:t1\n");

    opts.format = Format::Json;
    let v: Value = serde_json::from_str(&render(&index, &opts)).unwrap();
    assert_eq!(v, serde_json::json!(["t1"]));
}

#[test]
fn test_json_summary_format_version_2() {
    let index = sample_index();
    let mut opts = SearchOptions::new("tag:inbox");
    opts.format = Format::Json;
    opts.format_version = 2;

    let v: Value = serde_json::from_str(&render(&index, &opts)).unwrap();
    let records = v.as_array().unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record["thread"], "t1");
    assert_eq!(record["timestamp"], at(2001, 5, 20, 10, 0).timestamp());
    assert_eq!(record["date_relative"], "2001-05-20");
    assert_eq!(record["matched"], 2);
    assert_eq!(record["total"], 3);
    assert_eq!(record["authors"], "Alice");
    assert_eq!(record["subject"], "Hello world");
    assert_eq!(record["query"], serde_json::json!(["id:m1 id:m2", "id:m3"]));
    assert_eq!(record["tags"], serde_json::json!(["inbox", "work"]));
}

#[test]
fn test_json_summary_format_version_1_has_no_query_field() {
    let index = sample_index();
    let mut opts = SearchOptions::new("tag:inbox");
    opts.format = Format::Json;
    opts.format_version = 1;

    let v: Value = serde_json::from_str(&render(&index, &opts)).unwrap();
    assert!(v[0].get("query").is_none());
}

#[test]
fn test_files_output_traversal_order() {
    let index = sample_index();
    let mut opts = SearchOptions::new("id:m1 id:m2");
    opts.output = Output::Files;
    opts.sort = Sort::OldestFirst;
    assert_eq!(
        render(&index, &opts),
        "/mail/cur/m1-1\n/mail/cur/m2-1\n/mail/cur/m2-2\n"
    );
}

#[test]
fn test_files_output_dupe_selects_single_copy() {
    let index = sample_index();
    let mut opts = SearchOptions::new("id:m3");
    opts.output = Output::Files;
    opts.dupe = Some(2);
    assert_eq!(render(&index, &opts), "/mail/cur/m3-2\n");
}

#[test]
fn test_messages_output_dupe_threshold() {
    let index = sample_index();
    let mut opts = SearchOptions::new("tag:inbox");
    opts.output = Output::Messages;
    opts.sort = Sort::OldestFirst;
    opts.dupe = Some(2);
    // m1 is stored in one location and filtered out; m2 in two and kept.
    assert_eq!(render(&index, &opts), "id:m2\n");
}

#[test]
fn test_negative_offset_selects_tail() {
    let index = sample_index();
    let mut opts = SearchOptions::new("tag:inbox");
    opts.output = Output::Messages;
    opts.sort = Sort::OldestFirst;
    opts.offset = -1;
    opts.limit = Some(1);
    assert_eq!(render(&index, &opts), "id:m2\n");
}

#[test]
fn test_negative_offset_clamps_to_start() {
    let index = sample_index();
    let mut opts = SearchOptions::new("tag:inbox");
    opts.output = Output::Messages;
    opts.sort = Sort::OldestFirst;
    opts.offset = -100;
    assert_eq!(render(&index, &opts), "id:m1\nid:m2\n");
}

#[test]
fn test_window_limit_slices_results() {
    let index = sample_index();
    let mut opts = SearchOptions::new("*");
    opts.output = Output::Messages;
    opts.sort = Sort::OldestFirst;
    opts.offset = 1;
    opts.limit = Some(2);
    assert_eq!(render(&index, &opts), "id:m2\nid:m3\n");
}

#[test]
fn test_wildcard_and_full_match_yield_same_tags() {
    let index = sample_index();
    let mut wildcard = SearchOptions::new("*");
    wildcard.output = Output::Tags;
    // Every message's subject contains "hello", so this matches the full set.
    let mut full = SearchOptions::new("hello");
    full.output = Output::Tags;

    let from_wildcard = render(&index, &wildcard);
    assert_eq!(from_wildcard, render(&index, &full));
    assert_eq!(from_wildcard, "inbox\nwork\n");
}

#[test]
fn test_tags_output_sexp() {
    let index = sample_index();
    let mut opts = SearchOptions::new("*");
    opts.output = Output::Tags;
    opts.format = Format::Sexp;
    assert_eq!(render(&index, &opts), "(\"inbox\" \"work\")");
}

#[test]
fn test_text0_files_uses_nul_delimiters() {
    let index = sample_index();
    let mut opts = SearchOptions::new("id:m2");
    opts.output = Output::Files;
    opts.format = Format::Text0;
    assert_eq!(render(&index, &opts), "/mail/cur/m2-1\0/mail/cur/m2-2\0");
}

#[test]
fn test_reconstructed_query_selects_matched_set() {
    let index = sample_index();
    let query = Query::new("tag:inbox");
    let thread = index.search_threads(&query).unwrap().next().unwrap();

    let (matched_query, unmatched_query) = thread_queries(&thread);
    assert_eq!(unmatched_query.as_deref(), Some("id:m3"));

    let mut opts = SearchOptions::new(matched_query.unwrap());
    opts.output = Output::Messages;
    opts.sort = Sort::OldestFirst;
    assert_eq!(render(&index, &opts), "id:m1\nid:m2\n");
}

#[test]
fn test_empty_results_render_empty_list() {
    let index = sample_index();
    let mut opts = SearchOptions::new("tag:nonexistent");
    assert_eq!(render(&index, &opts), "");

    opts.format = Format::Json;
    let v: Value = serde_json::from_str(&render(&index, &opts)).unwrap();
    assert_eq!(v, serde_json::json!([]));
}

#[test]
fn test_sender_extraction() {
    let index = sample_index();
    let mut opts = SearchOptions::new("id:m4");
    opts.output = Output::Addresses {
        sender: true,
        recipients: false,
    };
    assert_eq!(render(&index, &opts), "Carol <carol@x.org>\n");
}

#[test]
fn test_recipient_extraction_flattens_groups() {
    let index = sample_index();
    let mut opts = SearchOptions::new("id:m4");
    opts.output = Output::Addresses {
        sender: false,
        recipients: true,
    };
    // The To group flattens to its members, the empty Cc group contributes
    // nothing, and there is no Bcc header.
    assert_eq!(
        render(&index, &opts),
        "Alice <alice@example.org>\nbob@x.org\n\"Doe, John\" <john@doe.com>\n"
    );
}

#[test]
fn test_sender_extraction_json_shape() {
    let index = sample_index();
    let mut opts = SearchOptions::new("id:m4");
    opts.output = Output::Addresses {
        sender: true,
        recipients: false,
    };
    opts.format = Format::Json;

    let v: Value = serde_json::from_str(&render(&index, &opts)).unwrap();
    assert_eq!(
        v,
        serde_json::json!([{
            "name": "Carol",
            "address": "carol@x.org",
            "name-addr": "Carol <carol@x.org>"
        }])
    );
}

#[test]
fn test_exclude_true_drops_tagged_messages() {
    let index = sample_index();
    let mut opts = SearchOptions::new("tag:inbox");
    opts.output = Output::Messages;
    opts.sort = Sort::OldestFirst;
    opts.exclude_tags = vec!["work".to_string()];
    assert_eq!(render(&index, &opts), "id:m2\n");
}

#[test]
fn test_exclude_flag_falls_back_outside_summary() {
    let index = sample_index();
    let mut opts = SearchOptions::new("tag:inbox");
    opts.output = Output::Messages;
    opts.sort = Sort::OldestFirst;
    opts.exclude = Exclude::Flag;
    opts.exclude_tags = vec!["work".to_string()];
    // No summary record to carry the flag, so excluded messages are included.
    assert_eq!(render(&index, &opts), "id:m1\nid:m2\n");
}

#[test]
fn test_summary_with_dupe_is_rejected_without_output() {
    let index = sample_index();
    let mut opts = SearchOptions::new("tag:inbox");
    opts.dupe = Some(1);

    let mut buf = Vec::new();
    let err = run_search(&index, &opts, &mut buf).unwrap_err();
    assert!(matches!(err, Error::DupeUnsupported));
    assert!(buf.is_empty());
}

#[test]
fn test_text0_summary_is_rejected() {
    let index = sample_index();
    let mut opts = SearchOptions::new("tag:inbox");
    opts.format = Format::Text0;

    let mut buf = Vec::new();
    let err = run_search(&index, &opts, &mut buf).unwrap_err();
    assert!(matches!(err, Error::Text0WithSummary));
    assert!(buf.is_empty());
}
