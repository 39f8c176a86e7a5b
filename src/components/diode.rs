//! Diode model: `Id = Is*(exp(V/Vt) - 1)`, Newton-linearized each iteration.

use crate::circuit::NodeId;
use crate::THERMAL_VOLTAGE;

/// Saturation current, fixed for every `D` device (the netlist grammar
/// carries no per-instance diode parameters).
pub const SATURATION_CURRENT: f64 = 1e-14;

/// Clamp applied to the operating-point voltage before evaluating the
/// exponential, to keep Newton iterates from overflowing `exp`.
const V_CLAMP: f64 = 0.9;

/// Initial operating-point guess used on the first Newton iteration of the
/// first time step.
const V_INITIAL_GUESS: f64 = 0.6;

/// A diode. `v_op` is the linearization point, updated every Newton
/// iteration (not gated by `first_iter` — unlike reactive history, this is
/// re-evaluated each iteration as the iterate refines).
#[derive(Debug, Clone)]
pub struct Diode {
    pub name: String,
    pub nodes: [NodeId; 2],
    v_op: f64,
    seeded: bool,
}

impl Diode {
    pub fn new(name: String, nodes: [NodeId; 2]) -> Self {
        Self {
            name,
            nodes,
            v_op: 0.0,
            seeded: false,
        }
    }

    /// Diode current at voltage `v`.
    pub fn current(v: f64) -> f64 {
        SATURATION_CURRENT * ((v / THERMAL_VOLTAGE).exp() - 1.0)
    }

    /// Conductance `dI/dV` at voltage `v`.
    pub fn conductance(v: f64) -> f64 {
        (SATURATION_CURRENT / THERMAL_VOLTAGE) * (v / THERMAL_VOLTAGE).exp()
    }

    /// Set the linearization point from the raw node-pair voltage, seeding
    /// with [`V_INITIAL_GUESS`] on the first iteration of the first step.
    /// Returns the clamped `(v, g, i_eq)` used for this iteration's stamp,
    /// where `I = g*v + i_eq`.
    pub fn linearize(&mut self, v_raw: f64, first_iter_of_first_step: bool) -> (f64, f64, f64) {
        let v = if first_iter_of_first_step && !self.seeded {
            self.seeded = true;
            V_INITIAL_GUESS
        } else {
            v_raw
        }
        .min(V_CLAMP);
        self.v_op = v;
        let g = Self::conductance(v);
        let id = Self::current(v);
        (v, g, id - g * v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bias_has_no_current() {
        assert!(Diode::current(0.0).abs() < 1e-15);
    }

    #[test]
    fn forward_current_grows_exponentially() {
        let i_small = Diode::current(0.3);
        let i_large = Diode::current(0.6);
        assert!(i_large > i_small * 100.0);
    }

    #[test]
    fn reverse_bias_saturates_near_minus_is() {
        let i_rev = Diode::current(-1.0);
        assert!(i_rev < 0.0);
        assert!(i_rev > -2.0 * SATURATION_CURRENT);
    }

    #[test]
    fn first_iteration_seeds_turn_on_guess() {
        let mut d = Diode::new("D1".into(), [NodeId(1), NodeId(0)]);
        let (v, _, _) = d.linearize(0.0, true);
        assert!((v - V_INITIAL_GUESS).abs() < 1e-12);
    }
}
