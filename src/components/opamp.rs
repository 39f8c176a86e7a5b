//! Ideal operational amplifier (nullor) model.

use crate::circuit::{ExtraVar, NodeId};

/// An ideal op-amp: infinite open-loop gain, zero output impedance. Stamped
/// as a nullor — the output branch routes its current freely while the
/// extra-variable row forces the input difference to zero. Owns one extra
/// variable (the output branch current).
#[derive(Debug, Clone)]
pub struct OpAmp {
    pub name: String,
    pub output: [NodeId; 2],
    pub input: [NodeId; 2],
    pub extra: ExtraVar,
}

impl OpAmp {
    pub fn new(name: String, output: [NodeId; 2], input: [NodeId; 2], extra: ExtraVar) -> Self {
        Self {
            name,
            output,
            input,
            extra,
        }
    }
}
