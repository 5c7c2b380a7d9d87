use anyhow::{Context, Result};
use cfn_config::{Settings, parser};
use cfn_provider::AwsCliSource;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod logging;
mod output;
mod signal;
#[cfg(test)]
mod testing;

use output::Output;

#[derive(Parser)]
#[command(name = "cfn")]
#[command(about = "Inspect CloudFormation stacks")]
#[command(version)]
struct Cli {
    /// AWS region (uses the CLI default if not specified)
    #[arg(short, long, global = true)]
    region: Option<String>,

    /// AWS credentials profile
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Don't print table headers
    #[arg(long, global = true)]
    no_headers: bool,

    /// Settings file (defaults to <config dir>/cfn/config.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stacks, optionally searching their templates for resources
    List(commands::list::ListArgs),

    /// Show the event history of a stack
    Events {
        /// Stack name or id
        stack: String,

        /// Maximum number of events to show (0 = all)
        #[arg(short, long, default_value_t = 0)]
        limit: usize,
    },

    /// Show full metadata for a stack
    Describe {
        /// Stack name or id
        stack: String,
    },

    /// Show the outputs of a stack
    Outputs {
        /// Stack name or id
        stack: String,
    },

    /// Show the resources of a stack
    Resources {
        /// Stack name or id
        stack: String,
    },

    /// Detect drift between a stack and its template
    Drift {
        /// Stack name or id
        stack: String,

        /// Wait for drift detection to complete (default)
        #[arg(short, long, overrides_with = "no_wait")]
        wait: bool,

        /// Start detection and return immediately
        #[arg(long, overrides_with = "wait")]
        no_wait: bool,
    },

    /// Stream stack events in real time (Ctrl-C to stop)
    Tail {
        /// Stack name or id
        stack: String,

        /// Polling interval in seconds
        #[arg(short = 's', long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },

    /// Print the deployed template of a stack
    Template {
        /// Stack name or id
        stack: String,

        /// Re-indent JSON templates
        #[arg(short, long)]
        pretty: bool,
    },

    /// Validate a template file with CloudFormation
    Validate {
        /// Template file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match smol::block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Commands that found nothing have already said so
            if e.downcast_ref::<commands::NothingFound>().is_none() {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = parser::load(cli.config.as_deref()).context("Failed to load settings")?;
    logging::init(cli.verbose, settings.log_level());

    let source = provider(&cli, &settings);
    let output = Output {
        no_headers: cli.no_headers || settings.no_headers.unwrap_or(false),
    };
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::List(mut args) => {
            args.ignore_case |= settings.ignore_case.unwrap_or(false);
            commands::list::run(&source, &args, &output, &mut stdout).await
        }
        Commands::Events { stack, limit } => {
            commands::events::run(&source, &stack, limit, &output, &mut stdout).await
        }
        Commands::Describe { stack } => {
            commands::describe::run(&source, &stack, &output, &mut stdout).await
        }
        Commands::Outputs { stack } => {
            commands::outputs::run(&source, &stack, &output, &mut stdout).await
        }
        Commands::Resources { stack } => {
            commands::resources::run(&source, &stack, &output, &mut stdout).await
        }
        Commands::Drift { stack, wait, no_wait } => {
            let options = settings.drift_options(wait || !no_wait);
            commands::drift::run(&source, &stack, options, &output, &mut stdout).await
        }
        Commands::Tail { stack, interval } => {
            let interval = interval
                .map(std::time::Duration::from_secs)
                .unwrap_or_else(|| settings.tail_interval());
            commands::tail::run(&source, &stack, interval, &output, &mut stdout).await
        }
        Commands::Template { stack, pretty } => {
            commands::template::run(&source, &stack, pretty, &mut stdout).await
        }
        Commands::Validate { file } => {
            commands::validate::run(&source, &file, &output, &mut stdout).await
        }
    }
}

/// Provider client with flag values taking precedence over the settings file
fn provider(cli: &Cli, settings: &Settings) -> AwsCliSource {
    AwsCliSource::new()
        .region(cli.region.clone().or_else(|| settings.region.clone()))
        .profile(cli.profile.clone().or_else(|| settings.profile.clone()))
}
