//! Linear passive devices: resistor, capacitor, and the two inductor forms.

use crate::circuit::{ExtraVar, Method, NodeId, StepContext};

/// A resistor. `R` stamps a pure conductance and carries no history.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub name: String,
    pub nodes: [NodeId; 2],
    pub resistance: f64,
}

impl Resistor {
    pub fn new(name: String, nodes: [NodeId; 2], resistance: f64) -> Self {
        Self {
            name,
            nodes,
            resistance: resistance.max(1e-12),
        }
    }

    /// Conductance `1/R`.
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }
}

/// A capacitor, discretized with either Backward Euler or the Trapezoidal
/// Rule. Forward Euler is not defined for capacitors; a global FE run
/// stamps capacitors with the BE companion model (see DESIGN.md).
///
/// `v_prev` is the voltage accepted at the end of the last step. `v_star`
/// is the Trapezoidal-Rule equivalent voltage `V*` from the last step,
/// needed only by TR; it is updated once per step, guarded by
/// [`StepContext::first_iter`].
#[derive(Debug, Clone)]
pub struct Capacitor {
    pub name: String,
    pub nodes: [NodeId; 2],
    pub capacitance: f64,
    pub ic: Option<f64>,
    v_prev: f64,
    v_star: f64,
}

impl Capacitor {
    pub fn new(name: String, nodes: [NodeId; 2], capacitance: f64, ic: Option<f64>) -> Self {
        let v0 = ic.unwrap_or(0.0);
        Self {
            name,
            nodes,
            capacitance,
            ic,
            v_prev: v0,
            v_star: v0,
        }
    }

    /// Effective conductance for the companion model, given the run's method.
    pub fn conductance(&self, dt: f64, method: Method) -> f64 {
        match method {
            Method::Tr => 2.0 * self.capacitance / dt,
            Method::Be | Method::Fe => self.capacitance / dt,
        }
    }

    /// Recompute the TR recurrence once per step (no-op for BE/FE).
    /// Must be called only when `ctx.first_iter` is true.
    pub fn update_for_step(&mut self, ctx: &StepContext) {
        if ctx.method != Method::Tr {
            return;
        }
        let g_prev = 2.0 * self.capacitance / ctx.dt_prev;
        let i_prev = g_prev * (self.v_prev - self.v_star);
        let g = self.conductance(ctx.dt, ctx.method);
        self.v_star = self.v_prev + i_prev / g;
    }

    /// Equivalent history current source magnitude, stamped from b to a.
    pub fn history_source(&self, dt: f64, method: Method) -> f64 {
        let g = self.conductance(dt, method);
        match method {
            Method::Tr => g * self.v_star,
            Method::Be | Method::Fe => g * self.v_prev,
        }
    }

    /// Called once per accepted step with the new node-pair voltage.
    pub fn accept(&mut self, v_new: f64) {
        self.v_prev = v_new;
    }

    #[cfg(test)]
    pub fn accepted_voltage(&self) -> f64 {
        self.v_prev
    }
}

/// An inductor in branch-current form (`L`). Owns one extra variable: its
/// own branch current.
#[derive(Debug, Clone)]
pub struct Inductor {
    pub name: String,
    pub nodes: [NodeId; 2],
    pub inductance: f64,
    pub ic: Option<f64>,
    pub extra: ExtraVar,
    i_prev: f64,
    i_star: f64,
    v_acc: f64,
}

impl Inductor {
    pub fn new(
        name: String,
        nodes: [NodeId; 2],
        inductance: f64,
        ic: Option<f64>,
        extra: ExtraVar,
    ) -> Self {
        let i0 = ic.unwrap_or(0.0);
        Self {
            name,
            nodes,
            inductance,
            ic,
            extra,
            i_prev: i0,
            i_star: i0,
            v_acc: 0.0,
        }
    }

    /// Diagonal companion resistance for the branch row.
    pub fn diagonal(&self, dt: f64, method: Method) -> f64 {
        match method {
            Method::Tr => 2.0 * self.inductance / dt,
            Method::Be | Method::Fe => self.inductance / dt,
        }
    }

    /// Whether the branch row includes the node-voltage back-coupling
    /// (omitted for FE).
    pub fn back_couples(method: Method) -> bool {
        !matches!(method, Method::Fe)
    }

    /// Recompute the TR recurrence once per step (no-op for BE/FE).
    pub fn update_for_step(&mut self, ctx: &StepContext) {
        if ctx.method != Method::Tr {
            return;
        }
        let r_prev = 2.0 * self.inductance / ctx.dt_prev;
        let v_companion = r_prev * (self.i_prev - self.i_star);
        let r = self.diagonal(ctx.dt, ctx.method);
        self.i_star = self.i_prev + v_companion / r;
    }

    /// RHS contribution for the branch row.
    pub fn rhs(&self, dt: f64, method: Method) -> f64 {
        let diag = self.diagonal(dt, method);
        match method {
            Method::Tr => diag * self.i_star,
            Method::Be => diag * self.i_prev,
            Method::Fe => diag * self.i_prev + self.v_acc,
        }
    }

    /// Called once per accepted step with the branch current and terminal
    /// voltage from the accepted solution.
    pub fn accept(&mut self, i_new: f64, v_new: f64) {
        self.i_prev = i_new;
        self.v_acc = v_new;
    }

    /// This step's companion history current, for a mutual coupling to
    /// borrow (`i_prev` for BE/FE, `i_star` for TR).
    pub fn history_value(&self, method: Method) -> f64 {
        match method {
            Method::Tr => self.i_star,
            Method::Be | Method::Fe => self.i_prev,
        }
    }
}

/// An inductor in nodal-companion form (`X`). Stamped purely as a
/// conductance plus a history current source; owns no extra variable.
#[derive(Debug, Clone)]
pub struct NodalInductor {
    pub name: String,
    pub nodes: [NodeId; 2],
    pub inductance: f64,
    pub ic: Option<f64>,
    i_hist: f64,
    v_acc: f64,
}

impl NodalInductor {
    pub fn new(name: String, nodes: [NodeId; 2], inductance: f64, ic: Option<f64>) -> Self {
        Self {
            name,
            nodes,
            inductance,
            ic,
            i_hist: ic.unwrap_or(0.0),
            v_acc: 0.0,
        }
    }

    /// Companion conductance.
    pub fn conductance(&self, dt: f64, method: Method) -> f64 {
        match method {
            Method::Tr => dt / (2.0 * self.inductance),
            Method::Be | Method::Fe => dt / self.inductance,
        }
    }

    /// Update the history current once per step from the last accepted
    /// terminal voltage.
    pub fn update_for_step(&mut self, ctx: &StepContext) {
        let factor = match ctx.method {
            Method::Be => ctx.dt_prev / self.inductance,
            Method::Tr => (ctx.dt_prev + ctx.dt) / (2.0 * self.inductance),
            Method::Fe => ctx.dt / self.inductance,
        };
        self.i_hist += factor * self.v_acc;
    }

    /// Current history source value, stamped from a to b.
    pub fn history_current(&self) -> f64 {
        self.i_hist
    }

    /// Called once per accepted step with the accepted terminal voltage.
    pub fn accept(&mut self, v_new: f64) {
        self.v_acc = v_new;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resistor_conductance() {
        let r = Resistor::new("R1".into(), [NodeId(1), NodeId(0)], 1000.0);
        assert!((r.conductance() - 0.001).abs() < 1e-12);
    }

    #[test]
    fn capacitor_be_history_tracks_last_accepted_voltage() {
        let mut c = Capacitor::new("C1".into(), [NodeId(1), NodeId(0)], 1e-6, Some(0.0));
        let dt = 1e-5;
        assert_eq!(c.history_source(dt, Method::Be), 0.0);
        c.accept(2.0);
        let g = c.conductance(dt, Method::Be);
        assert!((c.history_source(dt, Method::Be) - g * 2.0).abs() < 1e-9);
    }

    #[test]
    fn inductor_first_step_uses_ic() {
        let l = Inductor::new("L1".into(), [NodeId(1), NodeId(0)], 1e-3, Some(0.5), ExtraVar(0));
        let diag = l.diagonal(1e-6, Method::Be);
        assert!((l.rhs(1e-6, Method::Be) - diag * 0.5).abs() < 1e-9);
    }
}
