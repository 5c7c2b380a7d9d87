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
    let detail = source
        .describe_stack(stack)
        .await
        .with_context(|| format!("Failed to describe stack {:?}", stack))?;

    if detail.outputs.is_empty() {
        writeln!(out, "No outputs found")?;
        return Ok(());
    }

    let mut table = output.table(["KEY", "VALUE", "EXPORT NAME", "DESCRIPTION"]);
    for o in &detail.outputs {
        table.add_row([
            o.key.clone(),
            o.value.clone(),
            o.export_name.clone().unwrap_or_default(),
            o.description.clone().unwrap_or_default(),
        ]);
    }
    output::write_table(out, &table)?;
    Ok(())
}
