use crate::output::{self, Output};
use anyhow::{Context, Result};
use cfn_core::{StackSource, TemplateValidation};
use std::io::Write;
use std::path::Path;

/// Have CloudFormation validate a local template file
pub async fn run<S: StackSource + ?Sized>(
    source: &S,
    file: &Path,
    output: &Output,
    out: &mut impl Write,
) -> Result<()> {
    let body = smol::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let validation = source
        .validate_template(&body)
        .await
        .context("Template validation failed")?;

    write_validation(out, output, &validation)
}

fn write_validation(
    out: &mut impl Write,
    output: &Output,
    validation: &TemplateValidation,
) -> Result<()> {
    writeln!(out, "Template is valid ✓")?;
    if let Some(description) = &validation.description {
        writeln!(out, "Description: {}", description)?;
    }

    if !validation.parameters.is_empty() {
        writeln!(out, "\nParameters:")?;
        let mut table = output.table(["KEY", "DEFAULT VALUE", "NO ECHO", "DESCRIPTION"]);
        for parameter in &validation.parameters {
            table.add_row([
                parameter.key.clone(),
                parameter.default_value.clone().unwrap_or_default(),
                parameter.no_echo.to_string(),
                parameter.description.clone().unwrap_or_default(),
            ]);
        }
        output::write_table(out, &table)?;
    }

    if !validation.capabilities.is_empty() {
        writeln!(
            out,
            "\nRequired Capabilities: {}",
            validation.capabilities.join(", ")
        )?;
        if let Some(reason) = &validation.capabilities_reason {
            writeln!(out, "Capabilities Reason: {}", reason)?;
        }
    }
    Ok(())
}
