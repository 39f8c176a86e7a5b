//! Linear controlled sources: VCCS (`G`), VCVS (`E`), CCCS (`F`), CCVS (`H`).

use crate::circuit::{ExtraVar, NodeId};

/// Voltage-controlled current source. Stamps as a transconductance between
/// the output and control node pairs; owns no extra variable.
#[derive(Debug, Clone)]
pub struct Vccs {
    pub name: String,
    pub output: [NodeId; 2],
    pub control: [NodeId; 2],
    pub gain: f64,
}

impl Vccs {
    pub fn new(name: String, output: [NodeId; 2], control: [NodeId; 2], gain: f64) -> Self {
        Self {
            name,
            output,
            control,
            gain,
        }
    }
}

/// Voltage-controlled voltage source. Owns one extra variable: its output
/// branch current.
#[derive(Debug, Clone)]
pub struct Vcvs {
    pub name: String,
    pub output: [NodeId; 2],
    pub control: [NodeId; 2],
    pub gain: f64,
    pub extra: ExtraVar,
}

impl Vcvs {
    pub fn new(
        name: String,
        output: [NodeId; 2],
        control: [NodeId; 2],
        gain: f64,
        extra: ExtraVar,
    ) -> Self {
        Self {
            name,
            output,
            control,
            gain,
            extra,
        }
    }
}

/// Current-controlled current source. Owns one extra variable: the
/// zero-volt control branch used to sense the controlling current.
#[derive(Debug, Clone)]
pub struct Cccs {
    pub name: String,
    pub output: [NodeId; 2],
    pub control: [NodeId; 2],
    pub gain: f64,
    pub extra: ExtraVar,
}

impl Cccs {
    pub fn new(
        name: String,
        output: [NodeId; 2],
        control: [NodeId; 2],
        gain: f64,
        extra: ExtraVar,
    ) -> Self {
        Self {
            name,
            output,
            control,
            gain,
            extra,
        }
    }
}

/// Current-controlled voltage source. Owns two extra variables: `jx`, the
/// zero-volt control branch, and `jy`, the output branch enforcing
/// `V_out = Rm * I_ctrl`.
#[derive(Debug, Clone)]
pub struct Ccvs {
    pub name: String,
    pub output: [NodeId; 2],
    pub control: [NodeId; 2],
    pub transresistance: f64,
    pub extra_ctrl: ExtraVar,
    pub extra_out: ExtraVar,
}

impl Ccvs {
    pub fn new(
        name: String,
        output: [NodeId; 2],
        control: [NodeId; 2],
        transresistance: f64,
        extra_ctrl: ExtraVar,
        extra_out: ExtraVar,
    ) -> Self {
        Self {
            name,
            output,
            control,
            transresistance,
            extra_ctrl,
            extra_out,
        }
    }
}
