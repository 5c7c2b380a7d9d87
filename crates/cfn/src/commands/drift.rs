use crate::output::{self, Output};
use anyhow::{Context, Result};
use cfn_core::runtime::SmolTimer;
use cfn_core::{
    DriftDetection, DriftObserver, DriftOptions, DriftOrchestrator, DriftOutcome, DriftSource,
    Timer,
};
use std::io::{self, Write};

pub async fn run<D: DriftSource + ?Sized>(
    source: &D,
    stack: &str,
    options: DriftOptions,
    output: &Output,
    out: &mut impl Write,
) -> Result<()> {
    detect(source, &SmolTimer, stack, options, output, out).await
}

async fn detect<D, T>(
    source: &D,
    timer: &T,
    stack: &str,
    options: DriftOptions,
    output: &Output,
    out: &mut impl Write,
) -> Result<()>
where
    D: DriftSource + ?Sized,
    T: Timer + ?Sized,
{
    let wait = options.wait;
    let orchestrator = DriftOrchestrator::new(source, timer, options);

    let mut progress = Progress::new(&mut *out, wait);
    let outcome = orchestrator.run(stack, &mut progress).await;
    let started = progress.finish()?;
    if started && wait {
        // End the line of poll dots
        writeln!(out)?;
    }

    let outcome =
        outcome.with_context(|| format!("Drift detection for stack {:?} failed", stack))?;
    let report = match outcome {
        DriftOutcome::Requested { .. } => {
            writeln!(out, "Use --wait to poll for results automatically.")?;
            return Ok(());
        }
        DriftOutcome::Completed(report) => report,
    };

    writeln!(out)?;
    report.write_header(out)?;
    writeln!(out)?;

    if report.drifts.is_empty() {
        writeln!(out, "No drifted resources.")?;
        return Ok(());
    }

    let mut table = output.table(["LOGICAL ID", "TYPE", "DRIFT STATUS", "PROPERTY DIFFS"]);
    for row in report.summary_rows() {
        table.add_row(row);
    }
    output::write_table(out, &table)?;
    report.write_details(out)?;
    Ok(())
}

/// Prints the detection id and a dot per status poll
struct Progress<W: Write> {
    out: W,
    wait: bool,
    started: bool,
    error: Option<io::Error>,
}

impl<W: Write> Progress<W> {
    fn new(out: W, wait: bool) -> Self {
        Self {
            out,
            wait,
            started: false,
            error: None,
        }
    }

    fn write(&mut self, f: impl FnOnce(&mut W) -> io::Result<()>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = f(&mut self.out).and_then(|_| self.out.flush()) {
            self.error = Some(e);
        }
    }

    /// Whether detection was started, or the first write error
    fn finish(self) -> io::Result<bool> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.started),
        }
    }
}

impl<W: Write> DriftObserver for Progress<W> {
    fn started(&mut self, detection_id: &str) {
        self.started = true;
        let wait = self.wait;
        self.write(|out| {
            writeln!(out, "Drift detection started (ID: {})", detection_id)?;
            if wait {
                write!(out, "Waiting")?;
            }
            Ok(())
        });
    }

    fn polled(&mut self, _detection: &DriftDetection) {
        self.write(|out| write!(out, "."));
    }
}
