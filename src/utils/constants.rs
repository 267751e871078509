//! Physical and simulation constants for the two-tank system
//!
//! Unit conversions live here as named functions so that no call site
//! hard-codes a conversion factor.

/// Gravity acceleration (m/s²)
pub const GRAVITY: f64 = 9.81;

/// Default simulation timestep (s)
pub const SIM_TIMESTEP: f64 = 0.1;

/// Level floor used wherever a level feeds a square root (m)
///
/// Applied uniformly to outflow and to the linearization, so an empty tank
/// still drains at the floor rate instead of producing a NaN.
pub const MIN_LEVEL: f64 = 0.01;

/// Maximum inlet flow at 100% controller output (L/min)
pub const MAX_INFLOW_LPM: f64 = 25.4;

/// Maximum disturbance pump flow (L/min)
pub const MAX_PUMP_FLOW_LPM: f64 = 10.0;

/// Standard deviation of the inflow noise (L/min), ±1.25 L/min at 3σ
pub const NOISE_STD_DEV_LPM: f64 = 0.4167;

/// Lower bound of the controller output (%)
pub const OUTPUT_MIN: f64 = 0.0;

/// Upper bound of the controller output (%)
pub const OUTPUT_MAX: f64 = 100.0;

/// Slew rate of the ramp reference signal (m/s)
pub const REFERENCE_RAMP_RATE: f64 = 0.005;

/// Lead filter time constant of the process-model feedforward, as a
/// fraction of the upper tank time constant
pub const FEEDFORWARD_LEAD_RATIO: f64 = 0.25;

/// Litres per minute to cubic metres per second
pub const LPM_TO_M3S: f64 = 1.0 / (60.0 * 1000.0);

/// Convert a flow from L/min to m³/s
#[inline]
pub fn lpm_to_m3s(lpm: f64) -> f64 {
    lpm * LPM_TO_M3S
}

/// Convert a flow from m³/s to L/min
#[inline]
pub fn m3s_to_lpm(m3s: f64) -> f64 {
    m3s / LPM_TO_M3S
}

/// Convert a percentage (0-100) to a fraction (0-1)
#[inline]
pub fn percent_to_fraction(percent: f64) -> f64 {
    percent / 100.0
}

/// Convert a fraction (0-1) to a percentage (0-100)
#[inline]
pub fn fraction_to_percent(fraction: f64) -> f64 {
    fraction * 100.0
}

/// Maximum inlet flow (m³/s)
#[inline]
pub fn max_inflow() -> f64 {
    lpm_to_m3s(MAX_INFLOW_LPM)
}

/// Inlet flow (m³/s) commanded by a controller output in percent
#[inline]
pub fn output_to_inflow(output_percent: f64) -> f64 {
    percent_to_fraction(output_percent) * max_inflow()
}

/// Controller output (%) that commands the given inlet flow (m³/s)
#[inline]
pub fn inflow_to_output(inflow: f64) -> f64 {
    fraction_to_percent(inflow / max_inflow())
}

/// Disturbance flow (m³/s) for a pump flow in L/min, clamped to the pump range
#[inline]
pub fn pump_flow_to_m3s(pump_flow_lpm: f64) -> f64 {
    lpm_to_m3s(pump_flow_lpm.clamp(0.0, MAX_PUMP_FLOW_LPM))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lpm_round_trip() {
        assert_relative_eq!(lpm_to_m3s(60_000.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(m3s_to_lpm(lpm_to_m3s(12.5)), 12.5, epsilon = 1e-12);
    }

    #[test]
    fn test_output_to_inflow() {
        assert_relative_eq!(output_to_inflow(100.0), max_inflow(), epsilon = 1e-15);
        assert_relative_eq!(output_to_inflow(50.0), max_inflow() / 2.0, epsilon = 1e-15);
        assert_relative_eq!(inflow_to_output(output_to_inflow(37.0)), 37.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pump_flow_clamped() {
        assert_eq!(pump_flow_to_m3s(-3.0), 0.0);
        assert_relative_eq!(pump_flow_to_m3s(25.0), lpm_to_m3s(MAX_PUMP_FLOW_LPM), epsilon = 1e-15);
    }
}
