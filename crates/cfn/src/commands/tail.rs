use crate::output::Output;
use crate::signal;
use anyhow::{Context, Result};
use cfn_core::runtime::SmolTimer;
use cfn_core::{CancellationToken, EventTailer, StackSource, TailOptions};
use std::io::Write;
use std::time::Duration;
use tracing::info;

/// Follow a stack's events until SIGINT or SIGTERM
pub async fn run<S: StackSource + ?Sized>(
    source: &S,
    stack: &str,
    interval: Duration,
    output: &Output,
    out: &mut impl Write,
) -> Result<()> {
    let token = CancellationToken::new();
    let _guard = signal::cancel_on_signal(token.clone())?;

    let options = TailOptions {
        interval,
        no_headers: output.no_headers,
    };
    let summary = EventTailer::new(source, &SmolTimer, options)
        .run(stack, &token, out)
        .await
        .with_context(|| format!("Failed to tail events for stack {:?}", stack))?;

    info!(
        "Printed {} events over {} polls ({} failed)",
        summary.events_printed, summary.polls, summary.failed_polls
    );
    Ok(())
}
