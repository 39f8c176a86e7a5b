//! Core index types for the MNA system.

use std::fmt;

/// A node in the circuit. Node 0 is always ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The ground node (always index 0).
    pub const GROUND: NodeId = NodeId(0);

    /// Check if this is the ground node.
    pub fn is_ground(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ground() {
            write!(f, "GND")
        } else {
            write!(f, "N{}", self.0)
        }
    }
}

/// A unique identifier for a device in the circuit, in netlist order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(pub usize);

/// Index of an "extra" branch-current variable added to the MNA system by a
/// device that is not a simple two-terminal conductance (V, L, E, F, H, O).
///
/// Allocated once, in file order, by the allocation pass in
/// [`crate::circuit::Circuit::from_parsed`]; stable for the life of the
/// circuit so that `K` can borrow an `L` device's extra variable by index
/// without owning it. This is the dedicated "absent" marker the source
/// lacked: it never collides with node index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtraVar(pub usize);

impl fmt::Display for ExtraVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "J{}", self.0)
    }
}

/// Companion-model integration method used by reactive devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Backward Euler.
    Be,
    /// Forward Euler (inductor branch-current form only).
    Fe,
    /// Trapezoidal rule.
    Tr,
}

impl Method {
    /// Parse a method token from a netlist `.TRAN` line.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_uppercase().as_str() {
            "BE" => Some(Method::Be),
            "FE" => Some(Method::Fe),
            "TR" => Some(Method::Tr),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Be => write!(f, "BE"),
            Method::Fe => write!(f, "FE"),
            Method::Tr => write!(f, "TR"),
        }
    }
}

/// Per-step numerical context threaded through stamping and solving, in place
/// of the original implementation's global mutable simulation state.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    /// Current simulation time.
    pub t: f64,
    /// Current step size.
    pub dt: f64,
    /// Previous accepted step size. TR history terms must use this, not
    /// `dt`, to preserve the trapezoidal identity across step-size changes.
    pub dt_prev: f64,
    /// Integration method in effect for this run.
    pub method: Method,
    /// True only on the first Newton iteration of this time step. History
    /// terms that depend on `dt_prev` or the last accepted solution must be
    /// recomputed only when this is true.
    pub first_iter: bool,
    /// True only for the very first time step of the run (controls initial
    /// guesses: diode turn-on voltage, MOSFET conduction seeding).
    pub first_step: bool,
}
