//! Search window over (phase, amplitude) correction space

/// Closed interval on one correction axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    pub start: f64,
    pub stop: f64,
}

impl Axis {
    pub fn new(start: f64, stop: f64) -> Self {
        Self { start, stop }
    }

    /// Interval spanning `half_width` either side of `center`
    pub fn around(center: f64, half_width: f64) -> Self {
        Self {
            start: center - half_width,
            stop: center + half_width,
        }
    }

    pub fn width(&self) -> f64 {
        self.stop - self.start
    }

    pub fn center(&self) -> f64 {
        (self.start + self.stop) / 2.0
    }

    /// Spacing between adjacent grid values when `grid_size` values span the axis
    pub fn step(&self, grid_size: usize) -> f64 {
        self.width() / (grid_size - 1) as f64
    }

    /// The `grid_size` grid values from `start` to `stop`, both endpoints included.
    ///
    /// Values are computed from their index rather than by repeated addition,
    /// so the last one is `stop` up to rounding and the count is always exact.
    pub fn points(&self, grid_size: usize) -> impl Iterator<Item = f64> {
        let start = self.start;
        let step = self.step(grid_size);
        (0..grid_size).map(move |i| start + step * i as f64)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.start && value <= self.stop
    }
}

/// Axis-aligned rectangle in correction space for one refinement round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchWindow {
    pub phase: Axis,
    pub amplitude: Axis,
}

impl SearchWindow {
    pub fn new(phase: Axis, amplitude: Axis) -> Self {
        Self { phase, amplitude }
    }

    /// Window spanning `±half_width` on both axes around zero correction
    pub fn symmetric(half_width: f64) -> Self {
        Self {
            phase: Axis::around(0.0, half_width),
            amplitude: Axis::around(0.0, half_width),
        }
    }

    /// Per-axis step `(phase_step, amplitude_step)` for a round on this window
    pub fn steps(&self, grid_size: usize) -> (f64, f64) {
        (self.phase.step(grid_size), self.amplitude.step(grid_size))
    }

    /// Next round's window: one current step either side of the best point
    pub fn zoom(&self, grid_size: usize, phase: f64, amplitude: f64) -> Self {
        let (phase_step, amplitude_step) = self.steps(grid_size);
        Self {
            phase: Axis::around(phase, phase_step),
            amplitude: Axis::around(amplitude, amplitude_step),
        }
    }

    pub fn contains(&self, phase: f64, amplitude: f64) -> bool {
        self.phase.contains(phase) && self.amplitude.contains(amplitude)
    }
}
