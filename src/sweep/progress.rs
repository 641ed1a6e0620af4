//! Sweep progress reporting

use std::io::{self, Stdout, Write};

use crate::domain::{CalError, CalibrationTable};

use super::controller::PointOutcome;

/// Receives sweep events as they happen. Reporting never affects control flow.
pub trait SweepObserver {
    /// Called once per swept frequency, after the accept/reject decision
    fn on_point(&mut self, outcome: &PointOutcome);

    /// Called when the sweep finished every candidate frequency
    fn on_complete(&mut self, _table: &CalibrationTable) {}

    /// Called when the sweep aborted
    fn on_abort(&mut self, _error: &CalError) {}
}

/// Console progress: one line per point when verbose, otherwise one dot.
pub struct ConsoleProgress<W: Write = Stdout> {
    verbose: bool,
    out: W,
}

impl ConsoleProgress<Stdout> {
    pub fn new(verbose: bool) -> Self {
        Self::with_writer(verbose, io::stdout())
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub fn with_writer(verbose: bool, out: W) -> Self {
        Self { verbose, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SweepObserver for ConsoleProgress<W> {
    fn on_point(&mut self, outcome: &PointOutcome) {
        // Console output is best effort
        let _ = if self.verbose {
            writeln!(
                self.out,
                "{:.6} MHz: best suppression {:.6}dB",
                outcome.frequency().as_mhz(),
                outcome.best_suppression_db()
            )
        } else {
            write!(self.out, ".").and_then(|_| self.out.flush())
        };
    }

    fn on_complete(&mut self, _table: &CalibrationTable) {
        let _ = writeln!(self.out);
    }

    fn on_abort(&mut self, _error: &CalError) {
        let _ = writeln!(self.out);
    }
}
