//! Iterative zoom grid search
//!
//! Each round evaluates a `grid_size × grid_size` grid over the current window,
//! keeps the best point seen so far, then re-centres the window on that point
//! with a half-width of one current step. With a 5-point grid the window halves
//! every round.
//!
//! The search never talks to hardware. The caller supplies `measure`, which
//! applies a candidate and returns its image suppression in dB; any error it
//! returns aborts the search.

use crate::domain::{CalError, CalResult, Correction, MeasurementResult, SearchParams};

use super::window::SearchWindow;

/// State handed from one round to the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundOutcome {
    /// Best point over this and all previous rounds
    pub best: MeasurementResult,
    /// Window for the following round
    pub next_window: SearchWindow,
}

/// Run one refinement round over `window`.
///
/// Scan order is phase-major, amplitude innermost, both low to high. A point
/// replaces the incumbent only when strictly better, so ties resolve to the
/// earliest point scanned and a later round can never displace an equal
/// earlier result.
pub fn search_round<F>(
    window: &SearchWindow,
    grid_size: usize,
    incumbent: Option<MeasurementResult>,
    measure: &mut F,
) -> CalResult<RoundOutcome>
where
    F: FnMut(&Correction) -> CalResult<f64>,
{
    let mut best = incumbent;

    for phase in window.phase.points(grid_size) {
        for amplitude in window.amplitude.points(grid_size) {
            let correction = Correction::new(phase, amplitude);
            let suppression_db = measure(&correction)?;

            if is_improvement(best.as_ref(), suppression_db) {
                best = Some(MeasurementResult {
                    correction,
                    suppression_db,
                });
            }
        }
    }

    // grid_size >= 2 guarantees at least one evaluation
    let best = best.ok_or_else(|| {
        CalError::Config(format!("Empty search grid (grid_size {grid_size})"))
    })?;

    Ok(RoundOutcome {
        best,
        next_window: window.zoom(
            grid_size,
            best.correction.phase(),
            best.correction.amplitude(),
        ),
    })
}

/// Search for the correction maximizing `measure`, starting from `initial_window`.
pub fn search<F>(
    mut measure: F,
    initial_window: SearchWindow,
    params: &SearchParams,
) -> CalResult<MeasurementResult>
where
    F: FnMut(&Correction) -> CalResult<f64>,
{
    if params.grid_size < 2 || params.iterations == 0 {
        return Err(CalError::Config(format!(
            "Search needs grid_size >= 2 and at least one iteration, got {} x {}",
            params.grid_size, params.iterations
        )));
    }

    let mut window = initial_window;
    let mut best = None;

    for round in 0..params.iterations {
        let outcome = search_round(&window, params.grid_size, best, &mut measure)?;
        log::debug!(
            "search round {}: best phase={:.5} ampl={:.5} suppression={:.2} dB",
            round + 1,
            outcome.best.correction.phase(),
            outcome.best.correction.amplitude(),
            outcome.best.suppression_db
        );
        best = Some(outcome.best);
        window = outcome.next_window;
    }

    best.ok_or_else(|| CalError::Config("Search produced no result".into()))
}

fn is_improvement(incumbent: Option<&MeasurementResult>, candidate_db: f64) -> bool {
    match incumbent {
        None => true,
        // A NaN incumbent yields to any real measurement
        Some(best) if best.suppression_db.is_nan() => !candidate_db.is_nan(),
        Some(best) => candidate_db > best.suppression_db,
    }
}
