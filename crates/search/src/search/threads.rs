//! Thread-granularity rendering: summaries and bare thread ids

use chrono::{DateTime, Utc};

use super::SearchOptions;
use super::window::RenderWindow;
use crate::display::{relative_date, sanitize};
use crate::engine::{MailIndex, Query, Sort, boolean_term};
use crate::error::Result;
use crate::models::Thread;
use crate::printer::Printer;

/// Render the threads matching `query` through `format`.
///
/// `threads_only` emits just the thread id per record; otherwise each
/// record is a full summary.
pub(crate) fn print_thread_results(
    index: &dyn MailIndex,
    query: &Query,
    opts: &SearchOptions,
    format: &mut dyn Printer,
    threads_only: bool,
) -> Result<()> {
    let window = RenderWindow::resolve(opts.offset, opts.limit, || index.count_threads(query))?;
    let threads = index.search_threads(query)?;
    let now = Utc::now();

    format.begin_list()?;
    for (i, thread) in threads.enumerate() {
        if window.is_done(i) {
            break;
        }
        if !window.contains(i) {
            continue;
        }

        if threads_only {
            format.set_prefix("thread");
            format.string(thread.id.as_str())?;
            format.separator()?;
        } else {
            print_thread_summary(&thread, opts, format, now)?;
        }
    }
    format.end()?;

    Ok(())
}

fn print_thread_summary(
    thread: &Thread,
    opts: &SearchOptions,
    format: &mut dyn Printer,
    now: DateTime<Utc>,
) -> Result<()> {
    let date = match opts.sort {
        Sort::OldestFirst => thread.oldest_date,
        Sort::NewestFirst => thread.newest_date,
    };
    let date_relative = relative_date(date, now);

    if format.is_text() {
        let mut line = format!(
            "thread:{} {:>12} [{}/{}] {}; {} (",
            thread.id.as_str(),
            date_relative,
            thread.matched_count,
            thread.total_count,
            sanitize(&thread.authors),
            sanitize(&thread.subject),
        );
        for (i, tag) in thread.tags.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            line.push_str(tag);
        }
        line.push(')');
        format.string(&line)?;
        format.separator()?;
    } else {
        format.begin_map()?;
        format.map_key("thread")?;
        format.string(thread.id.as_str())?;
        format.map_key("timestamp")?;
        format.integer(date.timestamp())?;
        format.map_key("date_relative")?;
        format.string(&date_relative)?;
        format.map_key("matched")?;
        format.integer(thread.matched_count as i64)?;
        format.map_key("total")?;
        format.integer(thread.total_count as i64)?;
        format.map_key("authors")?;
        format.string(&thread.authors)?;
        format.map_key("subject")?;
        format.string(&thread.subject)?;

        if opts.format_version >= 2 {
            let (matched_query, unmatched_query) = thread_queries(thread);
            format.map_key("query")?;
            format.begin_list()?;
            match &matched_query {
                Some(q) => format.string(q)?,
                None => format.null()?,
            }
            match &unmatched_query {
                Some(q) => format.string(q)?,
                None => format.null()?,
            }
            format.end()?;
        }

        format.map_key("tags")?;
        format.begin_list()?;
        for tag in &thread.tags {
            format.string(tag)?;
        }
        format.end()?;

        format.end()?;
        format.separator()?;
    }

    Ok(())
}

/// Build two stable query strings identifying exactly the matched and
/// unmatched messages of `thread`.
///
/// Each message contributes an `id:` term to the buffer matching its flag.
/// `id` is an exclusive prefix, so successive terms are implicitly OR'd and
/// a single space joins them. A side with no messages yields `None`, not an
/// empty string.
pub fn thread_queries(thread: &Thread) -> (Option<String>, Option<String>) {
    let mut matched: Option<String> = None;
    let mut unmatched: Option<String> = None;

    for member in &thread.members {
        let term = boolean_term("id", member.id.as_str());
        let buf = if member.matched {
            &mut matched
        } else {
            &mut unmatched
        };
        match buf {
            Some(q) => {
                q.push(' ');
                q.push_str(&term);
            }
            None => *buf = Some(term),
        }
    }

    (matched, unmatched)
}
