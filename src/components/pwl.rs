//! Piecewise-linear nonlinear resistor (`N`), e.g. the Chua diode.

use crate::circuit::NodeId;

/// One segment of the three-segment PWL curve: `i = slope*v + intercept`.
#[derive(Debug, Clone, Copy)]
struct Segment {
    slope: f64,
    intercept: f64,
}

impl Segment {
    fn through(v_a: f64, i_a: f64, v_b: f64, i_b: f64) -> Self {
        let slope = (i_b - i_a) / (v_b - v_a);
        Segment {
            slope,
            intercept: i_a - slope * v_a,
        }
    }

    fn current(&self, v: f64) -> f64 {
        self.slope * v + self.intercept
    }
}

/// A four-breakpoint PWL nonlinear resistor. The outer two segments
/// extrapolate the `(V1,I1)-(V2,I2)` and `(V3,I3)-(V4,I4)` lines to
/// `±infinity`; the middle segment spans `(V2,I2)-(V3,I3)` directly.
#[derive(Debug, Clone)]
pub struct PiecewiseResistor {
    pub name: String,
    pub nodes: [NodeId; 2],
    v2: f64,
    v3: f64,
    low: Segment,
    mid: Segment,
    high: Segment,
}

impl PiecewiseResistor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        nodes: [NodeId; 2],
        v1: f64,
        i1: f64,
        v2: f64,
        i2: f64,
        v3: f64,
        i3: f64,
        v4: f64,
        i4: f64,
    ) -> Self {
        Self {
            name,
            nodes,
            v2,
            v3,
            low: Segment::through(v1, i1, v2, i2),
            mid: Segment::through(v2, i2, v3, i3),
            high: Segment::through(v3, i3, v4, i4),
        }
    }

    fn segment(&self, v: f64) -> &Segment {
        if v <= self.v2 {
            &self.low
        } else if v <= self.v3 {
            &self.mid
        } else {
            &self.high
        }
    }

    /// Returns `(g, i_eq)` such that `i(v) = g*v + i_eq` for the active
    /// segment at voltage `v`.
    pub fn linearize(&self, v: f64) -> (f64, f64) {
        let seg = self.segment(v);
        (seg.slope, seg.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chua_diode_has_negative_inner_slope() {
        let r = PiecewiseResistor::new(
            "N1".into(),
            [NodeId(1), NodeId(0)],
            -2.0, 1.1, -1.0, 0.7, 1.0, -0.7, 2.0, -1.1,
        );
        let (g_mid, _) = r.linearize(0.0);
        assert!(g_mid < 0.0);
        let (g_low, _) = r.linearize(-1.5);
        assert!(g_low < 0.0);
    }
}
