//! BJT model: Ebers-Moll two-diode form with fixed common-base gains.
//!
//! The forward (BE) and reverse (BC) junction diodes are each linearized
//! the same way as a standalone [`crate::components::diode::Diode`]; the
//! stamp assembler (`solver::stamp`) combines their linearizations with
//! the `alpha_f`/`alpha_r` dependent-source terms into the three-terminal
//! device row.

use crate::circuit::NodeId;
use crate::components::diode::Diode;

/// Forward common-base current gain.
pub const ALPHA_F: f64 = 0.99;
/// Reverse common-base current gain.
pub const ALPHA_R: f64 = 0.5;

/// BJT polarity. PNP reverses terminal polarity: junction voltages are
/// evaluated with collector/emitter swapped against the declared node
/// order, and the resulting junction currents are negated back into the
/// declared terminal sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BjtKind {
    Npn,
    Pnp,
}

impl BjtKind {
    fn sign(self) -> f64 {
        match self {
            BjtKind::Npn => 1.0,
            BjtKind::Pnp => -1.0,
        }
    }
}

/// The linearized BE/BC junctions for one Newton iteration, in the sense
/// `I_F = gf*v_be + i_f0`, `I_R = gr*v_bc + i_r0` (declared terminal
/// polarity, after un-applying the PNP sign flip).
#[derive(Debug, Clone, Copy)]
pub struct BjtLinearization {
    pub gf: f64,
    pub i_f0: f64,
    pub gr: f64,
    pub i_r0: f64,
}

/// A bipolar junction transistor: collector, base, emitter.
#[derive(Debug, Clone)]
pub struct Bjt {
    pub name: String,
    pub nodes: [NodeId; 3],
    pub kind: BjtKind,
    be: Diode,
    bc: Diode,
}

impl Bjt {
    pub fn new(name: String, nodes: [NodeId; 3], kind: BjtKind) -> Self {
        let [c, b, e] = nodes;
        Self {
            name,
            nodes,
            kind,
            be: Diode::new(format!("{name}.be"), [b, e]),
            bc: Diode::new(format!("{name}.bc"), [b, c]),
        }
    }

    pub fn collector(&self) -> NodeId {
        self.nodes[0]
    }
    pub fn base(&self) -> NodeId {
        self.nodes[1]
    }
    pub fn emitter(&self) -> NodeId {
        self.nodes[2]
    }

    /// Linearize both junctions from the raw (declared-polarity) terminal
    /// voltages `v_be = V_b - V_e`, `v_bc = V_b - V_c`.
    pub fn linearize(
        &mut self,
        v_be: f64,
        v_bc: f64,
        first_iter_of_first_step: bool,
    ) -> BjtLinearization {
        let sign = self.kind.sign();
        let (_, gf, i_f0_signed) = self.be.linearize(sign * v_be, first_iter_of_first_step);
        let (_, gr, i_r0_signed) = self.bc.linearize(sign * v_bc, first_iter_of_first_step);
        BjtLinearization {
            gf,
            i_f0: sign * i_f0_signed,
            gr,
            i_r0: sign * i_r0_signed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npn_forward_active_has_large_current_gain() {
        let mut q = Bjt::new("Q1".into(), [NodeId(1), NodeId(2), NodeId(3)], BjtKind::Npn);
        let lin = q.linearize(0.65, -5.0, false);
        assert!(lin.gf > 0.0);
        assert!(lin.gr > 0.0);
    }
}
