use anyhow::{Context, Result};
use cfn_core::StackSource;
use std::io::Write;

pub async fn run<S: StackSource + ?Sized>(
    source: &S,
    stack: &str,
    pretty: bool,
    out: &mut impl Write,
) -> Result<()> {
    let body = source
        .get_template(stack)
        .await
        .with_context(|| format!("Failed to get template for stack {:?}", stack))?;

    writeln!(out, "{}", render(&body, pretty))?;
    Ok(())
}

/// Re-indent JSON bodies when `pretty`; anything else (YAML) passes through
fn render(body: &str, pretty: bool) -> String {
    if !pretty {
        return body.to_string();
    }
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| body.to_string())
}
