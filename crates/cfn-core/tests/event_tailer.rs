//! Event tailing against a scripted event log

mod common;

use cfn_core::tail::TailSummary;
use cfn_core::{CancellationToken, EventTailer, TailOptions};
use chrono::NaiveDateTime;
use common::{FakeSource, VirtualTimer, event};
use std::sync::Mutex;
use std::time::Duration;

async fn tail(source: &FakeSource, token: &CancellationToken, no_headers: bool) -> (String, TailSummary) {
    let timer = VirtualTimer::default();
    let options = TailOptions {
        interval: Duration::from_secs(5),
        no_headers,
    };
    let tailer = EventTailer::new(source, &timer, options);
    let mut out = Vec::new();
    let summary = tailer.run("payments", token, &mut out).await.unwrap();
    (String::from_utf8(out).unwrap(), summary)
}

fn event_lines(output: &str) -> Vec<&str> {
    output.lines().filter(|l| l.starts_with("2024-")).collect()
}

fn line_timestamp(line: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&line[..19], "%Y-%m-%d %H:%M:%S").unwrap()
}

#[smol_potat::test]
async fn test_new_events_printed_once_in_time_order() {
    let token = CancellationToken::new();
    let source = FakeSource {
        seed_events: vec![event("e3", 2)],
        event_polls: Mutex::new(
            vec![
                Ok(vec![event("e3", 2), event("e2", 1), event("e1", 0)]),
                Ok(vec![event("e5", 3), event("e4", 2), event("e3", 2), event("e2", 1)]),
                Ok(vec![event("e5", 3), event("e4", 2), event("e3", 2)]),
            ]
            .into(),
        ),
        cancel_when_drained: Some(token.clone()),
        ..Default::default()
    };

    let (output, summary) = tail(&source, &token, false).await;

    let lines = event_lines(&output);
    let ids: Vec<&str> = lines
        .iter()
        .map(|l| l[23..].split_whitespace().next().unwrap())
        .collect();
    assert_eq!(ids, vec!["Rese3", "Rese4", "Rese5"]);

    let stamps: Vec<_> = lines.iter().map(|l| line_timestamp(l)).collect();
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));

    assert_eq!(summary.polls, 3);
    assert_eq!(summary.events_printed, 3);
    assert!(output.starts_with("Tailing events for stack \"payments\" (Ctrl-C to stop)...\n\nTIMESTAMP"));
    assert!(output.ends_with("\nStopped.\n"));
}

#[smol_potat::test]
async fn test_failed_poll_does_not_stop_the_tail() {
    let token = CancellationToken::new();
    let source = FakeSource {
        seed_events: vec![event("e1", 0)],
        event_polls: Mutex::new(
            vec![
                Err("Rate exceeded".to_string()),
                Ok(vec![event("e2", 4), event("e1", 0)]),
            ]
            .into(),
        ),
        cancel_when_drained: Some(token.clone()),
        ..Default::default()
    };

    let (output, summary) = tail(&source, &token, true).await;

    assert_eq!(summary.failed_polls, 1);
    assert_eq!(summary.polls, 2);
    assert_eq!(event_lines(&output).len(), 2);
    assert!(!output.contains("TIMESTAMP"));
}

#[smol_potat::test]
async fn test_empty_log_prints_no_seed() {
    let token = CancellationToken::new();
    let source = FakeSource {
        event_polls: Mutex::new(vec![Ok(vec![event("e1", 9)])].into()),
        cancel_when_drained: Some(token.clone()),
        ..Default::default()
    };

    let (output, summary) = tail(&source, &token, false).await;

    assert_eq!(event_lines(&output).len(), 1);
    assert_eq!(summary.events_printed, 1);
    assert_eq!(
        source.calls(),
        vec!["list_events payments Some(1)", "list_events payments None"]
    );
}

#[smol_potat::test]
async fn test_cancelled_before_first_poll() {
    let token = CancellationToken::new();
    token.cancel();
    let source = FakeSource {
        seed_events: vec![event("e1", 0)],
        ..Default::default()
    };

    let (output, summary) = tail(&source, &token, false).await;

    assert_eq!(summary.polls, 0);
    assert_eq!(source.count_calls("list_events"), 1);
    assert!(output.ends_with("\nStopped.\n"));
}
