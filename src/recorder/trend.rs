//! Fixed-capacity trend window for live charts

use crate::simulation::SimulationState;

/// Signals plotted on the live trend
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrendSample {
    pub time: f64,
    pub tank1_level: f64,
    pub tank2_level: f64,
    pub setpoint: f64,
    pub controller_output: f64,
}

impl TrendSample {
    pub fn from_state(state: &SimulationState) -> Self {
        Self {
            time: state.time,
            tank1_level: state.tank1.height,
            tank2_level: state.tank2.height,
            setpoint: state.controller.setpoint,
            controller_output: state.controller_output,
        }
    }
}

/// Ring buffer holding the last `CAPACITY` samples
///
/// Once full, the oldest sample is overwritten. This is independent of
/// [`DataRecorder`](super::DataRecorder), which keeps the whole run.
///
/// # Example
///
/// ```
/// use tanksim::recorder::TrendWindow;
/// use tanksim::simulation::SimulationState;
///
/// let mut window = TrendWindow::<2>::new();
/// let mut state = SimulationState::initial();
/// for i in 0..3 {
///     state.time = i as f64;
///     window.push(&state);
/// }
/// let times: Vec<f64> = window.data().iter().map(|s| s.time).collect();
/// assert_eq!(times, vec![1.0, 2.0]);
/// ```
#[derive(Debug, Clone)]
pub struct TrendWindow<const CAPACITY: usize> {
    buffer: [TrendSample; CAPACITY],
    /// Next write position
    write_index: usize,
    /// Number of valid samples
    count: usize,
}

impl<const CAPACITY: usize> TrendWindow<CAPACITY> {
    pub fn new() -> Self {
        assert!(CAPACITY > 0, "Trend window capacity must be positive");

        Self {
            buffer: [TrendSample::default(); CAPACITY],
            write_index: 0,
            count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == CAPACITY
    }

    pub fn clear(&mut self) {
        self.write_index = 0;
        self.count = 0;
    }

    /// Record a snapshot of `state`
    pub fn push(&mut self, state: &SimulationState) {
        self.buffer[self.write_index] = TrendSample::from_state(state);
        self.write_index = (self.write_index + 1) % CAPACITY;

        if self.count < CAPACITY {
            self.count += 1;
        }
    }

    /// Samples in chronological order (oldest to newest)
    pub fn data(&self) -> Vec<TrendSample> {
        if self.count < CAPACITY {
            return self.buffer[..self.count].to_vec();
        }

        // Full: oldest sample sits at write_index
        (0..CAPACITY)
            .map(|i| self.buffer[(self.write_index + i) % CAPACITY])
            .collect()
    }

    /// Most recent sample
    pub fn last(&self) -> Option<TrendSample> {
        if self.count == 0 {
            return None;
        }

        let idx = if self.write_index == 0 {
            CAPACITY - 1
        } else {
            self.write_index - 1
        };

        Some(self.buffer[idx])
    }
}

impl<const CAPACITY: usize> Default for TrendWindow<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(time: f64) -> SimulationState {
        SimulationState {
            time,
            ..SimulationState::initial()
        }
    }

    #[test]
    fn test_partial_fill() {
        let mut window = TrendWindow::<10>::new();
        for i in 0..4 {
            window.push(&at(i as f64 * 0.1));
        }
        assert_eq!(window.len(), 4);
        assert!(!window.is_full());
        let data = window.data();
        assert_eq!(data.len(), 4);
        assert_eq!(data[0].time, 0.0);
        assert_eq!(window.last().unwrap().time, data[3].time);
    }

    #[test]
    fn test_wraparound_keeps_latest() {
        let mut window = TrendWindow::<5>::new();
        for i in 0..12 {
            window.push(&at(i as f64));
        }
        assert!(window.is_full());
        let times: Vec<f64> = window.data().iter().map(|s| s.time).collect();
        assert_eq!(times, vec![7.0, 8.0, 9.0, 10.0, 11.0]);
        assert_eq!(window.last().unwrap().time, 11.0);
    }

    #[test]
    fn test_clear() {
        let mut window = TrendWindow::<3>::new();
        window.push(&at(1.0));
        window.clear();
        assert!(window.is_empty());
        assert!(window.last().is_none());
        assert!(window.data().is_empty());
    }
}
