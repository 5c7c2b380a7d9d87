//! Live event tailing.
//!
//! The provider only offers the whole event log, newest first, and several
//! events can share a timestamp. [`TailCursor`] remembers the latest timestamp
//! printed and the ids already printed at exactly that timestamp, which is
//! enough to pick out new events from each full fetch.

use crate::model::StackEvent;
use crate::runtime::{CancellationToken, Timer, sleep_or_cancel};
use crate::source::StackSource;
use crate::Result;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Tail session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailOptions {
    /// Delay between polls
    pub interval: Duration,
    /// Omit the column header lines
    pub no_headers: bool,
}

impl Default for TailOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            no_headers: false,
        }
    }
}

/// Position in an event log.
///
/// `seen_ids` only ever holds ids whose timestamp equals `high_water_mark`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TailCursor {
    high_water_mark: Option<DateTime<Utc>>,
    seen_ids: HashSet<String>,
}

impl TailCursor {
    /// Cursor positioned at `event`, or at the very start when there is none
    pub fn seeded(event: Option<&StackEvent>) -> Self {
        let mut cursor = Self::default();
        if let Some(event) = event {
            cursor.record(event);
        }
        cursor
    }

    /// Latest timestamp printed so far
    pub fn high_water_mark(&self) -> Option<DateTime<Utc>> {
        self.high_water_mark
    }

    /// Ids printed at the high water mark
    pub fn seen_ids(&self) -> &HashSet<String> {
        &self.seen_ids
    }

    /// Whether `event` has not been printed yet
    pub fn is_new(&self, event: &StackEvent) -> bool {
        match self.high_water_mark {
            None => true,
            Some(mark) => {
                event.timestamp > mark
                    || (event.timestamp == mark && !self.seen_ids.contains(&event.event_id))
            }
        }
    }

    /// Take a full newest-first fetch and return the unseen events oldest first,
    /// recording them as seen.
    pub fn advance(&mut self, events: &[StackEvent]) -> Vec<StackEvent> {
        let mut fresh: Vec<StackEvent> = events.iter().filter(|e| self.is_new(e)).cloned().collect();
        fresh.reverse();
        // Stable, so same-timestamp events keep the provider's relative order
        fresh.sort_by_key(|e| e.timestamp);

        for event in &fresh {
            self.record(event);
        }
        fresh
    }

    fn record(&mut self, event: &StackEvent) {
        match self.high_water_mark {
            Some(mark) if event.timestamp < mark => return,
            Some(mark) if event.timestamp == mark => {}
            _ => {
                self.high_water_mark = Some(event.timestamp);
                self.seen_ids.clear();
            }
        }
        self.seen_ids.insert(event.event_id.clone());
    }
}

/// Counters for a finished tail session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TailSummary {
    /// Polls performed after seeding
    pub polls: u64,
    /// Polls that failed and were skipped
    pub failed_polls: u64,
    /// Events printed, including the seed event
    pub events_printed: u64,
}

/// Streams a stack's new events until cancelled
pub struct EventTailer<'a, S: ?Sized, T: ?Sized> {
    source: &'a S,
    timer: &'a T,
    options: TailOptions,
}

impl<'a, S, T> EventTailer<'a, S, T>
where
    S: StackSource + ?Sized,
    T: Timer + ?Sized,
{
    /// Create a tailer
    pub fn new(source: &'a S, timer: &'a T, options: TailOptions) -> Self {
        Self {
            source,
            timer,
            options,
        }
    }

    /// Tail `stack_name`, writing the feed to `out` until `cancel` fires.
    ///
    /// Failing to fetch the seed event is fatal; later fetch failures are
    /// logged and skipped.
    pub async fn run(
        &self,
        stack_name: &str,
        cancel: &CancellationToken,
        out: &mut impl Write,
    ) -> Result<TailSummary> {
        let seed = self.source.list_events(stack_name, Some(1)).await?;
        let mut cursor = TailCursor::seeded(seed.first());
        let mut summary = TailSummary::default();

        writeln!(out, "Tailing events for stack {:?} (Ctrl-C to stop)...\n", stack_name)?;
        if !self.options.no_headers {
            write_header(out)?;
        }
        if let Some(event) = seed.first() {
            write_event(out, event)?;
            summary.events_printed += 1;
        }
        out.flush()?;

        loop {
            if cancel.is_cancelled() {
                break;
            }
            if sleep_or_cancel(self.timer, self.options.interval, cancel).await {
                break;
            }

            summary.polls += 1;
            let events = match self.source.list_events(stack_name, None).await {
                Ok(events) => events,
                Err(e) => {
                    summary.failed_polls += 1;
                    warn!("Failed to fetch events for {}: {}", stack_name, e);
                    continue;
                }
            };

            let fresh = cursor.advance(&events);
            debug!("Poll {} returned {} events, {} new", summary.polls, events.len(), fresh.len());
            for event in &fresh {
                write_event(out, event)?;
            }
            summary.events_printed += fresh.len() as u64;
            out.flush()?;
        }

        writeln!(out, "\nStopped.")?;
        out.flush()?;
        info!("Tail of {} stopped after {} polls", stack_name, summary.polls);
        Ok(summary)
    }
}

fn write_header(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<22} {:<40} {:<45} {:<30} {}",
        "TIMESTAMP", "LOGICAL ID", "TYPE", "STATUS", "REASON"
    )?;
    writeln!(
        out,
        "{:<22} {:<40} {:<45} {:<30} {}",
        "─".repeat(22),
        "─".repeat(40),
        "─".repeat(45),
        "─".repeat(30),
        "─".repeat(6)
    )
}

/// One fixed-width feed line
pub fn format_event(event: &StackEvent) -> String {
    format!(
        "{:<22} {:<40} {:<45} {:<30} {}",
        event.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        truncate(&event.logical_id, 40),
        truncate(&event.resource_type, 45),
        truncate(&event.status, 30),
        event.reason.as_deref().unwrap_or("")
    )
}

fn write_event(out: &mut impl Write, event: &StackEvent) -> std::io::Result<()> {
    writeln!(out, "{}", format_event(event))
}

/// Shorten to at most `max` characters, marking the cut with `…`
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
