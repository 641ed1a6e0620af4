//! Candidate LO frequencies for a sweep

use crate::domain::{CalError, CalResult, Frequency, FrequencyRange};

/// Relative slack on the last step so `stop` itself is not lost to rounding
const STEP_TOLERANCE: f64 = 1e-9;
/// Upper bound on candidate frequencies in one sweep
pub const MAX_SWEEP_POINTS: usize = 1_000_000;

/// Evenly spaced LO frequencies from `range.start + guard` up to and including
/// `range.stop - guard`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPlan {
    start: f64,
    step: f64,
    count: usize,
}

impl SweepPlan {
    /// A range narrower than twice the guard band yields an empty plan, not an error.
    pub fn new(range: FrequencyRange, guard_band: f64, step: f64) -> CalResult<Self> {
        if !(step > 0.0) || !step.is_finite() {
            return Err(CalError::Config(format!(
                "Frequency step must be positive, got {step}"
            )));
        }

        let start = range.start.as_hz() + guard_band;
        let stop = range.stop.as_hz() - guard_band;
        if stop < start {
            return Ok(Self {
                start,
                step,
                count: 0,
            });
        }

        let steps = ((stop - start) / step + STEP_TOLERANCE).floor();
        if !steps.is_finite() || steps >= MAX_SWEEP_POINTS as f64 {
            return Err(CalError::Config(format!(
                "Sweep from {:.3} MHz to {:.3} MHz in steps of {step} Hz exceeds {MAX_SWEEP_POINTS} points",
                start / 1e6,
                stop / 1e6
            )));
        }
        let count = steps as usize + 1;

        Ok(Self { start, step, count })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Frequencies in increasing order, each computed from its index
    pub fn frequencies(&self) -> impl Iterator<Item = Frequency> + '_ {
        (0..self.count).map(move |i| Frequency::hz(self.start + self.step * i as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hz(plan: &SweepPlan) -> Vec<f64> {
        plan.frequencies().map(|f| f.as_hz()).collect()
    }

    #[test]
    fn guard_band_meeting_in_the_middle_leaves_one_point() {
        let plan = SweepPlan::new(FrequencyRange::new(100e6, 200e6), 50e6, 10e6).unwrap();
        assert_eq!(hz(&plan), vec![150e6]);
    }

    #[test]
    fn range_narrower_than_guard_bands_is_empty() {
        let plan = SweepPlan::new(FrequencyRange::new(100e6, 180e6), 50e6, 10e6).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.frequencies().count(), 0);
    }

    #[test]
    fn stop_is_included_when_the_step_lands_on_it() {
        let plan = SweepPlan::new(FrequencyRange::new(0.0, 1e9), 50e6, 100e6).unwrap();
        let freqs = hz(&plan);
        assert_eq!(freqs.len(), 10);
        assert_eq!(freqs[0], 50e6);
        assert!((freqs[9] - 950e6).abs() < 1e-3);
    }

    #[test]
    fn partial_last_step_is_dropped() {
        let plan = SweepPlan::new(FrequencyRange::new(0.0, 300e6), 0.0, 70e6).unwrap();
        assert_eq!(hz(&plan), vec![0.0, 70e6, 140e6, 210e6, 280e6]);
    }

    #[test]
    fn non_positive_step_is_rejected() {
        let range = FrequencyRange::new(0.0, 1e9);
        assert!(SweepPlan::new(range, 0.0, 0.0).is_err());
        assert!(SweepPlan::new(range, 0.0, -1e6).is_err());
    }

    #[test]
    fn tiny_step_is_a_config_error() {
        let range = FrequencyRange::new(50e6, 2.2e9);
        assert!(matches!(
            SweepPlan::new(range, 50e6, 1e-300),
            Err(CalError::Config(_))
        ));
        assert!(matches!(
            SweepPlan::new(range, 50e6, 1e-3),
            Err(CalError::Config(_))
        ));
    }

    #[test]
    fn nan_guard_band_is_a_config_error() {
        let range = FrequencyRange::new(50e6, 2.2e9);
        assert!(matches!(
            SweepPlan::new(range, f64::NAN, 10e6),
            Err(CalError::Config(_))
        ));
    }

    #[test]
    fn largest_allowed_plan_is_accepted() {
        let step = 1.0;
        let range = FrequencyRange::new(0.0, (MAX_SWEEP_POINTS - 1) as f64 * step);
        let plan = SweepPlan::new(range, 0.0, step).unwrap();
        assert_eq!(plan.len(), MAX_SWEEP_POINTS);
    }
}
