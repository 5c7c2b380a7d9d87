use crate::commands::NothingFound;
use crate::output::{self, Output};
use anyhow::{Context, Result};
use cfn_core::{
    QueryOptions, ResourceSearch, StackQuery, StackSource, StackSummary, StatusFlags, query,
    template,
};
use clap::Args;
use std::io::{IsTerminal, Write};

/// Arguments for `cfn list`
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only stacks whose name contains this
    pub name: Option<String>,

    /// Show all stacks (overrides other status filters)
    #[arg(short = 'A', long)]
    pub all: bool,

    /// Complete stacks (*_COMPLETE statuses)
    #[arg(short = 'C', long)]
    pub complete: bool,

    /// Deleted stacks (DELETE_* statuses)
    #[arg(short = 'D', long)]
    pub deleted: bool,

    /// In-progress stacks (*_IN_PROGRESS statuses)
    #[arg(short = 'P', long)]
    pub in_progress: bool,

    /// Case-insensitive matching for every text filter
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Only stacks whose description contains this
    #[arg(long, value_name = "TEXT")]
    pub desc: Option<String>,

    /// Exclude stacks whose description contains this
    #[arg(long, value_name = "TEXT")]
    pub no_desc: Option<String>,

    /// Print only stack names, one per line
    #[arg(short = '1', long)]
    pub names_only: bool,

    /// Search templates for this resource type (e.g. AWS::S3::Bucket)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub resource_type: Option<String>,

    /// Search templates for a resource whose logical id contains this
    #[arg(short = 'n', long = "resource-name", value_name = "LOGICAL_ID")]
    pub resource_name: Option<String>,

    /// Search templates for a resource property (key=value or nested.key=value)
    #[arg(short = 'p', long = "property", value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

impl ListArgs {
    /// Query options for these arguments. Malformed property filters fail here,
    /// before any provider call.
    pub fn query_options(&self) -> Result<QueryOptions> {
        let search = ResourceSearch::new(
            self.resource_type.clone().unwrap_or_default(),
            self.resource_name.clone().unwrap_or_default(),
            self.properties.as_slice(),
            self.ignore_case,
        )?;

        Ok(QueryOptions {
            status: StatusFlags {
                all: self.all,
                complete: self.complete,
                deleted: self.deleted,
                in_progress: self.in_progress,
            },
            query: StackQuery {
                name: self.name.clone().unwrap_or_default(),
                desc_contains: self.desc.clone(),
                desc_excludes: self.no_desc.clone(),
                ignore_case: self.ignore_case,
            },
            resource_search: search.is_active().then_some(search),
        })
    }
}

pub async fn run<S: StackSource + ?Sized>(
    source: &S,
    args: &ListArgs,
    output: &Output,
    out: &mut impl Write,
) -> Result<()> {
    let options = args.query_options()?;
    let stacks = query::candidate_stacks(source, &options)
        .await
        .context("Failed to list stacks")?;

    let Some(search) = &options.resource_search else {
        if stacks.is_empty() {
            if !args.names_only {
                eprintln!("No stacks found");
            }
            return Err(NothingFound.into());
        }
        if args.names_only {
            return write_names(out, &stacks);
        }
        return write_stacks(out, output, &stacks);
    };

    if stacks.is_empty() {
        eprintln!("No stacks to search");
        return Err(NothingFound.into());
    }

    let announce = !args.names_only;
    if announce {
        eprintln!("Searching {} stacks for {}...", stacks.len(), search);
    }
    let matching = template::search_stacks(source, stacks, search).await;
    if announce && std::io::stderr().is_terminal() {
        // Clear the progress line
        eprint!("\x1b[1A\x1b[2K");
    }

    if matching.is_empty() {
        if announce {
            writeln!(out, "No stacks found containing {}", search)?;
        }
        return Err(NothingFound.into());
    }

    if args.names_only {
        write_names(out, &matching)
    } else {
        write_stacks(out, output, &matching)
    }
}

fn write_names(out: &mut impl Write, stacks: &[StackSummary]) -> Result<()> {
    for stack in stacks {
        writeln!(out, "{}", stack.name)?;
    }
    Ok(())
}

fn write_stacks(out: &mut impl Write, output: &Output, stacks: &[StackSummary]) -> Result<()> {
    let mut table = output.table(["NAME", "STATUS", "CREATED", "DESCRIPTION"]);
    for stack in stacks {
        table.add_row([
            stack.name.clone(),
            stack.status.to_string(),
            output::format_optional_time(stack.created.as_ref()),
            stack.description_or_empty().to_string(),
        ]);
    }
    output::write_table(out, &table)?;
    Ok(())
}
