use crate::output::{self, Output};
use anyhow::{Context, Result};
use cfn_core::StackSource;
use std::io::Write;

pub async fn run<S: StackSource + ?Sized>(
    source: &S,
    stack: &str,
    output: &Output,
    out: &mut impl Write,
) -> Result<()> {
    let resources = source
        .list_resources(stack)
        .await
        .with_context(|| format!("Failed to list resources for stack {:?}", stack))?;

    if resources.is_empty() {
        writeln!(out, "No resources found")?;
        return Ok(());
    }

    let mut table = output.table(["LOGICAL ID", "PHYSICAL ID", "TYPE", "STATUS", "DRIFT"]);
    for resource in &resources {
        table.add_row([
            resource.logical_id.clone(),
            resource.physical_id.clone().unwrap_or_default(),
            resource.resource_type.clone(),
            resource.status.clone(),
            resource.drift_status.clone().unwrap_or_default(),
        ]);
    }
    output::write_table(out, &table)?;
    Ok(())
}
