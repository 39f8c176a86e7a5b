//! Mutual inductance (`K`), coupling two branch-current inductors.

use crate::circuit::{ExtraVar, Method, StepContext};

/// Couples two `L` devices through mutual inductance `M = k*sqrt(L1*L2)`.
/// Borrows the coupled inductors' extra variables and inductance values by
/// index; owns no extra variable itself.
#[derive(Debug, Clone)]
pub struct Coupling {
    pub name: String,
    pub coupling: f64,
    pub extra_a: ExtraVar,
    pub extra_b: ExtraVar,
    pub inductance_a: f64,
    pub inductance_b: f64,
}

impl Coupling {
    pub fn new(
        name: String,
        coupling: f64,
        extra_a: ExtraVar,
        inductance_a: f64,
        extra_b: ExtraVar,
        inductance_b: f64,
    ) -> Self {
        Self {
            name,
            coupling,
            extra_a,
            extra_b,
            inductance_a,
            inductance_b,
        }
    }

    /// Mutual inductance `M`.
    pub fn mutual(&self) -> f64 {
        self.coupling * (self.inductance_a * self.inductance_b).sqrt()
    }

    /// Off-diagonal matrix term added at `[extra_a][extra_b]` and
    /// `[extra_b][extra_a]`.
    pub fn cross_term(&self, dt: f64, method: Method) -> f64 {
        match method {
            Method::Tr => 2.0 * self.mutual() / dt,
            Method::Be | Method::Fe => self.mutual() / dt,
        }
    }

    /// History contribution subtracted from the RHS of the other inductor's
    /// branch row. `other_history` is the companion history current the
    /// other inductor would itself stamp this step (`i_prev` for BE/FE,
    /// `i_star` for TR).
    pub fn history_term(&self, dt: f64, method: Method, other_history: f64) -> f64 {
        self.cross_term(dt, method) * other_history
    }

    /// TR recurrence for the coupling does not carry its own state; it
    /// rides on the coupled inductors' own `update_for_step`, which must
    /// run first in the same step.
    pub fn update_for_step(&self, _ctx: &StepContext) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutual_inductance_from_coefficient() {
        let k = Coupling::new("K1".into(), 0.5, ExtraVar(0), 1e-3, ExtraVar(1), 4e-3);
        assert!((k.mutual() - 0.5 * 2e-3).abs() < 1e-12);
    }
}
