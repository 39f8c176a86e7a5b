//! Independent sources and their waveforms.

use std::f64::consts::PI;

use crate::circuit::{ExtraVar, NodeId};

/// The value-vs-time function of an independent source.
#[derive(Debug, Clone)]
pub enum Waveform {
    Dc {
        value: f64,
    },
    Sin {
        dc: f64,
        amplitude: f64,
        freq: f64,
        delay: f64,
        damping: f64,
        phase_deg: f64,
        n_cycles: f64,
    },
    Pulse {
        a1: f64,
        a2: f64,
        delay: f64,
        tr: f64,
        tf: f64,
        ton: f64,
        period: f64,
        n_cycles: f64,
    },
}

impl Waveform {
    /// Evaluate the waveform at time `t`. `base_dt` substitutes for a zero
    /// rise/fall time in PULSE, keeping the companion model numerically sane.
    pub fn eval(&self, t: f64, base_dt: f64) -> f64 {
        match self {
            Waveform::Dc { value } => *value,
            Waveform::Sin {
                dc,
                amplitude,
                freq,
                delay,
                damping,
                phase_deg,
                n_cycles,
            } => {
                let phase = PI * phase_deg / 180.0;
                let active_end = delay + n_cycles / freq.max(f64::MIN_POSITIVE);
                if *n_cycles > 0.0 && (t < *delay || t > active_end) {
                    dc + amplitude * phase.sin()
                } else if t < *delay {
                    dc + amplitude * phase.sin()
                } else {
                    let tau = t - delay;
                    dc + amplitude * (-damping * tau).exp() * (2.0 * PI * freq * tau + phase).sin()
                }
            }
            Waveform::Pulse {
                a1,
                a2,
                delay,
                tr,
                tf,
                ton,
                period,
                n_cycles,
            } => {
                let tr = if *tr == 0.0 { base_dt } else { *tr };
                let tf = if *tf == 0.0 { base_dt } else { *tf };
                if t < *delay {
                    return *a1;
                }
                let elapsed = t - delay;
                if *n_cycles > 0.0 && *period > 0.0 && elapsed > n_cycles * period {
                    return *a1;
                }
                let phase = if *period > 0.0 {
                    elapsed % period
                } else {
                    elapsed
                };
                if phase < tr {
                    a1 + (a2 - a1) * (phase / tr)
                } else if phase < tr + ton {
                    *a2
                } else if phase < tr + ton + tf {
                    a2 + (a1 - a2) * ((phase - tr - ton) / tf)
                } else {
                    *a1
                }
            }
        }
    }
}

/// An independent voltage source. Owns one extra variable: its branch
/// current, used to enforce `V+ - V- = s(t)`.
#[derive(Debug, Clone)]
pub struct VoltageSource {
    pub name: String,
    pub nodes: [NodeId; 2],
    pub waveform: Waveform,
    pub extra: ExtraVar,
}

impl VoltageSource {
    pub fn new(name: String, nodes: [NodeId; 2], waveform: Waveform, extra: ExtraVar) -> Self {
        Self {
            name,
            nodes,
            waveform,
            extra,
        }
    }

    pub fn value(&self, t: f64, base_dt: f64) -> f64 {
        self.waveform.eval(t, base_dt)
    }
}

/// An independent current source, injected `I(a,b, s(t))` directly into
/// the RHS.
#[derive(Debug, Clone)]
pub struct CurrentSource {
    pub name: String,
    pub nodes: [NodeId; 2],
    pub waveform: Waveform,
}

impl CurrentSource {
    pub fn new(name: String, nodes: [NodeId; 2], waveform: Waveform) -> Self {
        Self {
            name,
            nodes,
            waveform,
        }
    }

    pub fn value(&self, t: f64, base_dt: f64) -> f64 {
        self.waveform.eval(t, base_dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dc_is_constant() {
        let w = Waveform::Dc { value: 5.0 };
        assert_eq!(w.eval(0.0, 1e-6), 5.0);
        assert_eq!(w.eval(10.0, 1e-6), 5.0);
    }

    #[test]
    fn pulse_holds_a1_before_delay() {
        let w = Waveform::Pulse {
            a1: 0.0,
            a2: 5.0,
            delay: 1e-3,
            tr: 1e-6,
            tf: 1e-6,
            ton: 1e-4,
            period: 2e-4,
            n_cycles: 0.0,
        };
        assert_eq!(w.eval(0.0, 1e-6), 0.0);
    }

    #[test]
    fn pulse_reaches_plateau() {
        let w = Waveform::Pulse {
            a1: 0.0,
            a2: 5.0,
            delay: 0.0,
            tr: 1e-6,
            tf: 1e-6,
            ton: 1e-4,
            period: 2e-4,
            n_cycles: 0.0,
        };
        assert!((w.eval(5e-5, 1e-6) - 5.0).abs() < 1e-9);
    }
}
