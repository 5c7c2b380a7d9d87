use crate::output::{self, Output};
use anyhow::{Context, Result};
use cfn_core::StackSource;
use std::io::Write;

/// Event history table, newest first. A `limit` of 0 shows everything.
pub async fn run<S: StackSource + ?Sized>(
    source: &S,
    stack: &str,
    limit: usize,
    output: &Output,
    out: &mut impl Write,
) -> Result<()> {
    let limit = (limit > 0).then_some(limit);
    let events = source
        .list_events(stack, limit)
        .await
        .with_context(|| format!("Failed to get events for stack {:?}", stack))?;

    if events.is_empty() {
        writeln!(out, "No events found")?;
        return Ok(());
    }

    let mut table = output.table(["TIMESTAMP", "LOGICAL ID", "TYPE", "STATUS", "REASON"]);
    for event in &events {
        table.add_row([
            output::format_time(&event.timestamp),
            event.logical_id.clone(),
            event.resource_type.clone(),
            event.status.clone(),
            event.reason.clone().unwrap_or_default(),
        ]);
    }
    output::write_table(out, &table)?;
    Ok(())
}
