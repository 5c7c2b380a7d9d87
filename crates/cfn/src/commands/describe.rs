use crate::output::{self, Output};
use anyhow::{Context, Result};
use cfn_core::{StackDetail, StackSource};
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

    write_detail(out, output, &detail)
}

fn field(out: &mut impl Write, label: &str, value: impl std::fmt::Display) -> std::io::Result<()> {
    writeln!(out, "{:<23}{}", format!("{}:", label), value)
}

fn write_detail(out: &mut impl Write, output: &Output, detail: &StackDetail) -> Result<()> {
    let summary = &detail.summary;
    field(out, "Name", &summary.name)?;
    field(out, "Stack ID", &summary.id)?;
    field(out, "Status", &summary.status)?;
    if let Some(reason) = &detail.status_reason {
        field(out, "Status Reason", reason)?;
    }
    field(out, "Created", output::format_optional_time(summary.created.as_ref()))?;
    if let Some(updated) = &summary.last_updated {
        field(out, "Last Updated", output::format_time(updated))?;
    }
    if let Some(description) = &summary.description {
        field(out, "Description", description)?;
    }
    field(out, "Termination Protected", detail.termination_protection)?;
    if let Some(role) = &detail.role_arn {
        field(out, "IAM Role", role)?;
    }
    if let Some(drift) = &detail.drift_status {
        field(out, "Drift Status", drift)?;
    }

    if !detail.parameters.is_empty() {
        writeln!(out, "\nParameters:")?;
        let mut table = output.table(["KEY", "VALUE", "RESOLVED VALUE"]);
        for parameter in &detail.parameters {
            let value = if parameter.use_previous_value {
                "<use-previous-value>".to_string()
            } else {
                parameter.value.clone().unwrap_or_default()
            };
            table.add_row([
                parameter.key.clone(),
                value,
                parameter.resolved_value.clone().unwrap_or_default(),
            ]);
        }
        output::write_table(out, &table)?;
    }

    if !detail.outputs.is_empty() {
        writeln!(out, "\nOutputs:")?;
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
    }

    if !detail.tags.is_empty() {
        writeln!(out, "\nTags:")?;
        let mut table = output.table(["KEY", "VALUE"]);
        for tag in &detail.tags {
            table.add_row([tag.key.clone(), tag.value.clone()]);
        }
        output::write_table(out, &table)?;
    }

    if !detail.capabilities.is_empty() {
        writeln!(out, "\nCapabilities: {}", detail.capabilities.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StaticSource, stack};
    use cfn_core::{StackParameter, StackStatus, StackTag};

    fn payments() -> StackDetail {
        StackDetail {
            summary: stack("payments", StackStatus::UpdateComplete, "Payments API"),
            status_reason: None,
            termination_protection: true,
            role_arn: None,
            drift_status: Some("IN_SYNC".to_string()),
            parameters: vec![
                StackParameter {
                    key: "Env".to_string(),
                    value: Some("prod".to_string()),
                    resolved_value: None,
                    use_previous_value: false,
                },
                StackParameter {
                    key: "ImageTag".to_string(),
                    value: None,
                    resolved_value: None,
                    use_previous_value: true,
                },
            ],
            outputs: Vec::new(),
            tags: vec![StackTag {
                key: "team".to_string(),
                value: "billing".to_string(),
            }],
            capabilities: vec!["CAPABILITY_IAM".to_string(), "CAPABILITY_AUTO_EXPAND".to_string()],
        }
    }

    #[smol_potat::test]
    async fn test_metadata_block_and_sections() {
        let mut source = StaticSource::default();
        source.details.insert("payments".to_string(), payments());

        let mut out = Vec::new();
        run(&source, "payments", &Output::default(), &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Name:                  payments\n"));
        assert!(text.contains("Status:                UPDATE_COMPLETE\n"));
        assert!(text.contains("Created:               2024-06-01 09:30:00\n"));
        assert!(text.contains("Termination Protected: true\n"));
        assert!(text.contains("Drift Status:          IN_SYNC\n"));
        assert!(!text.contains("Status Reason:"));
        assert!(!text.contains("IAM Role:"));

        assert!(text.contains("\nParameters:\n"));
        assert!(text.contains("<use-previous-value>"));
        assert!(!text.contains("\nOutputs:"));
        assert!(text.contains("\nTags:\n"));
        assert!(text.ends_with("\nCapabilities: CAPABILITY_IAM, CAPABILITY_AUTO_EXPAND\n"));
    }

    #[smol_potat::test]
    async fn test_missing_stack() {
        let mut out = Vec::new();
        let err = run(&StaticSource::default(), "ghost", &Output::default(), &mut out)
            .await
            .unwrap_err();
        assert_eq!(
            format!("{:#}", err),
            "Failed to describe stack \"ghost\": Stack not found: ghost"
        );
    }
}
