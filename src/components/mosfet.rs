//! Square-law MOSFET model: `M` (NMOS|PMOS), drain/gate/source/bulk.

use crate::circuit::NodeId;

/// Channel-length modulation coefficient.
const LAMBDA: f64 = 0.05;
/// Threshold voltage.
const VT0: f64 = 1.0;
/// Process transconductance coefficient; the per-device `K = K0*W/L`.
const K0: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MosKind {
    Nmos,
    Pmos,
}

impl MosKind {
    fn sign(self) -> f64 {
        match self {
            MosKind::Nmos => 1.0,
            MosKind::Pmos => -1.0,
        }
    }
}

/// Linearized large-signal drain current about the current Newton iterate,
/// expressed against the *declared* terminal voltages so the caller can
/// stamp directly at `(d, g, s)`: `Id ≈ g*(Vg-Vs) + gds*(Vd-Vs) + i_eq`.
#[derive(Debug, Clone, Copy)]
pub struct MosfetLinearization {
    pub g: f64,
    pub gds: f64,
    pub i_eq: f64,
}

/// A MOSFET. Drain/source are sorted by node voltage before evaluating the
/// square-law equations (PMOS inverts the comparison and the resulting
/// signs), so the device behaves symmetrically regardless of which
/// declared terminal happens to sit at the higher potential.
#[derive(Debug, Clone)]
pub struct Mosfet {
    pub name: String,
    pub nodes: [NodeId; 4], // [drain, gate, source, bulk]
    pub kind: MosKind,
    pub length: f64,
    pub width: f64,
    seeded: bool,
}

impl Mosfet {
    pub fn new(name: String, nodes: [NodeId; 4], kind: MosKind, length: f64, width: f64) -> Self {
        Self {
            name,
            nodes,
            kind,
            length,
            width,
            seeded: false,
        }
    }

    fn k(&self) -> f64 {
        K0 * self.width / self.length
    }

    /// Linearize about the declared-terminal voltages `v_d, v_g, v_s`.
    /// `first_iter_of_first_step` seeds a just-above-threshold guess the
    /// first time a MOSFET is evaluated, mirroring the diode's turn-on
    /// seed; both NMOS and PMOS use the same symmetric seed condition.
    pub fn linearize(
        &mut self,
        v_d: f64,
        v_g: f64,
        v_s: f64,
        first_iter_of_first_step: bool,
    ) -> MosfetLinearization {
        let sign = self.kind.sign();
        let raw_vds = v_d - v_s;
        let swap = match self.kind {
            MosKind::Nmos => raw_vds < 0.0,
            MosKind::Pmos => raw_vds > 0.0,
        };
        let (d_eval, s_eval) = if swap { (v_s, v_d) } else { (v_d, v_s) };
        let vgs_eff = sign * (v_g - s_eval);
        let vds_eff = sign * (d_eval - s_eval);

        let seed = first_iter_of_first_step && !self.seeded;
        if seed {
            self.seeded = true;
        }
        let vgs_use = if seed { VT0 + 0.1 } else { vgs_eff };
        let conducting = vgs_use > VT0;
        let k = self.k();

        let (id_eff, g_eff, gds_eff) = if !conducting {
            (0.0, 1e-12, 1e-12)
        } else if vds_eff > vgs_use - VT0 {
            let overdrive = vgs_use - VT0;
            let id = k * overdrive * overdrive * (1.0 + LAMBDA * vds_eff);
            let g = 2.0 * k * overdrive * (1.0 + LAMBDA * vds_eff);
            let gds = k * overdrive * overdrive * LAMBDA;
            (id, g, gds)
        } else {
            let id = k * (2.0 * (vgs_use - VT0) * vds_eff - vds_eff * vds_eff);
            let g = 2.0 * k * vds_eff;
            let gds = 2.0 * k * (vgs_use - VT0 - vds_eff);
            (id, g, gds)
        };

        let flip = if swap { -1.0 } else { 1.0 };
        let id_physical = flip * sign * id_eff;
        let g = flip * sign * g_eff;
        let gds = flip * sign * gds_eff;

        let vgs_declared = v_g - v_s;
        let vds_declared = v_d - v_s;
        let i_eq = id_physical - g * vgs_declared - gds * vds_declared;

        MosfetLinearization { g, gds, i_eq }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nmos_cutoff_below_threshold_has_negligible_current() {
        let mut m = Mosfet::new(
            "M1".into(),
            [NodeId(1), NodeId(2), NodeId(0), NodeId(0)],
            MosKind::Nmos,
            1.0,
            1.0,
        );
        let lin = m.linearize(1.0, 0.2, 0.0, false);
        assert!(lin.g.abs() < 1e-9);
    }

    #[test]
    fn nmos_saturation_conducts_above_threshold() {
        let mut m = Mosfet::new(
            "M1".into(),
            [NodeId(1), NodeId(2), NodeId(0), NodeId(0)],
            MosKind::Nmos,
            1.0,
            1.0,
        );
        let lin = m.linearize(5.0, 3.0, 0.0, false);
        assert!(lin.g > 0.0);
    }
}
