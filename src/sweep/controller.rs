//! Sweep controller - one correction search per LO frequency
//!
//! Per candidate frequency:
//! 1. Tune RX (and TX at the configured offset below it), wait for lock
//! 2. Run the correction search with a measurement bound to the radio
//! 3. Accept the point if its best suppression beats the threshold,
//!    otherwise drop it and move on
//!
//! Any hardware error aborts the whole sweep and no table is produced.
//! A rejected point is not an error.

use crate::domain::{
    CalResult, CalibrationConfig, CalibrationEntry, CalibrationTable, Frequency, MeasurementResult,
};
use crate::frontend::{measure_suppression, tune_rx_and_tx};
use crate::ports::RadioFrontend;
use crate::search::{search, SearchWindow};

use super::plan::SweepPlan;
use super::progress::SweepObserver;

/// Result of the accept/reject decision for one frequency
#[derive(Debug, Clone, PartialEq)]
pub enum PointOutcome {
    Accepted(CalibrationEntry),
    Rejected {
        frequency: Frequency,
        best_suppression_db: f64,
    },
}

impl PointOutcome {
    /// Keep the point only if its suppression strictly exceeds `threshold_db`
    pub fn evaluate(frequency: Frequency, best: &MeasurementResult, threshold_db: f64) -> Self {
        if best.suppression_db > threshold_db {
            Self::Accepted(CalibrationEntry::new(frequency, best))
        } else {
            Self::Rejected {
                frequency,
                best_suppression_db: best.suppression_db,
            }
        }
    }

    pub fn frequency(&self) -> Frequency {
        match self {
            Self::Accepted(entry) => Frequency::hz(entry.frequency_hz),
            Self::Rejected { frequency, .. } => *frequency,
        }
    }

    pub fn best_suppression_db(&self) -> f64 {
        match self {
            Self::Accepted(entry) => entry.suppression_db,
            Self::Rejected {
                best_suppression_db,
                ..
            } => *best_suppression_db,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Drives the frequency sweep over a radio front-end
pub struct SweepController<'a> {
    config: &'a CalibrationConfig,
}

impl<'a> SweepController<'a> {
    pub fn new(config: &'a CalibrationConfig) -> Self {
        Self { config }
    }

    /// Candidate frequencies for `radio`'s tunable range
    pub fn plan(&self, radio: &dyn RadioFrontend) -> CalResult<SweepPlan> {
        SweepPlan::new(
            radio.rx_freq_range(),
            self.config.guard_band,
            self.config.freq_step,
        )
    }

    /// Sweep every candidate frequency and return the accepted points.
    ///
    /// The reference tone must already be on the air.
    pub fn run(
        &self,
        radio: &mut dyn RadioFrontend,
        observer: &mut dyn SweepObserver,
    ) -> CalResult<CalibrationTable> {
        match self.sweep(radio, observer) {
            Ok(table) => {
                observer.on_complete(&table);
                Ok(table)
            }
            Err(e) => {
                log::error!("Sweep aborted: {e}");
                observer.on_abort(&e);
                Err(e)
            }
        }
    }

    fn sweep(
        &self,
        radio: &mut dyn RadioFrontend,
        observer: &mut dyn SweepObserver,
    ) -> CalResult<CalibrationTable> {
        let plan = self.plan(radio)?;
        log::info!(
            "Sweeping {} frequencies, step {:.3} MHz",
            plan.len(),
            self.config.freq_step / 1e6
        );

        let mut table = CalibrationTable::new();
        for candidate in plan.frequencies() {
            let outcome = self.run_point(radio, candidate)?;
            match &outcome {
                PointOutcome::Accepted(entry) => {
                    log::info!(
                        "{:.3} MHz accepted: {:.2} dB",
                        entry.frequency_hz / 1e6,
                        entry.suppression_db
                    );
                    table.push(*entry);
                }
                PointOutcome::Rejected {
                    frequency,
                    best_suppression_db,
                } => {
                    log::info!(
                        "{:.3} MHz rejected: {best_suppression_db:.2} dB below {} dB threshold",
                        frequency.as_mhz(),
                        self.config.acceptance_threshold_db
                    );
                }
            }
            observer.on_point(&outcome);
        }

        log::info!("Sweep complete: {} of {} points accepted", table.len(), plan.len());
        Ok(table)
    }

    /// Tune to `candidate`, search, and decide. The entry carries the actual tuned frequency.
    pub fn run_point(
        &self,
        radio: &mut dyn RadioFrontend,
        candidate: Frequency,
    ) -> CalResult<PointOutcome> {
        let rx_lo = tune_rx_and_tx(radio, candidate, self.config.tx_offset, &self.config.lock)?;

        let nsamps = self.config.nsamps;
        let best = search(
            |correction| measure_suppression(&mut *radio, correction, nsamps),
            SearchWindow::symmetric(self.config.search.half_width),
            &self.config.search,
        )?;

        Ok(PointOutcome::evaluate(
            rx_lo,
            &best,
            self.config.acceptance_threshold_db,
        ))
    }
}
