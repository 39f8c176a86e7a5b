//! Component models for circuit simulation.
//!
//! Every device kind in the data model gets its own struct, grouped here
//! into a tagged [`Device`] enum. Stamp dispatch (the `match` that turns a
//! `Device` into entries of `(A, b)`) lives in `solver::stamp`, not here —
//! this module only owns device state and per-device algebra.

pub mod bjt;
pub mod controlled;
pub mod coupling;
pub mod diode;
pub mod linear;
pub mod logic;
pub mod mosfet;
pub mod opamp;
pub mod pwl;
pub mod sources;

pub use bjt::{Bjt, BjtKind};
pub use controlled::{Ccvs, Cccs, Vccs, Vcvs};
pub use coupling::Coupling;
pub use diode::Diode;
pub use linear::{Capacitor, Inductor, NodalInductor, Resistor};
pub use logic::{LogicGate, LogicKind, LogicParams};
pub use mosfet::{Mosfet, MosKind};
pub use opamp::OpAmp;
pub use pwl::PiecewiseResistor;
pub use sources::{CurrentSource, VoltageSource, Waveform};

/// A circuit device, in the tagged-enum form recommended by the design
/// notes: payload is the kind's own struct, dispatch is a single `match`.
#[derive(Debug, Clone)]
pub enum Device {
    Resistor(Resistor),
    Capacitor(Capacitor),
    Inductor(Inductor),
    NodalInductor(NodalInductor),
    Coupling(Coupling),
    Vccs(Vccs),
    Vcvs(Vcvs),
    Cccs(Cccs),
    Ccvs(Ccvs),
    VoltageSource(VoltageSource),
    CurrentSource(CurrentSource),
    OpAmp(OpAmp),
    Diode(Diode),
    Bjt(Bjt),
    Mosfet(Mosfet),
    Pwl(PiecewiseResistor),
    Logic(LogicGate),
}

impl Device {
    pub fn name(&self) -> &str {
        match self {
            Device::Resistor(d) => &d.name,
            Device::Capacitor(d) => &d.name,
            Device::Inductor(d) => &d.name,
            Device::NodalInductor(d) => &d.name,
            Device::Coupling(d) => &d.name,
            Device::Vccs(d) => &d.name,
            Device::Vcvs(d) => &d.name,
            Device::Cccs(d) => &d.name,
            Device::Ccvs(d) => &d.name,
            Device::VoltageSource(d) => &d.name,
            Device::CurrentSource(d) => &d.name,
            Device::OpAmp(d) => &d.name,
            Device::Diode(d) => &d.name,
            Device::Bjt(d) => &d.name,
            Device::Mosfet(d) => &d.name,
            Device::Pwl(d) => &d.name,
            Device::Logic(d) => &d.name,
        }
    }

    /// Whether this device requires Newton-Raphson iteration.
    pub fn is_nonlinear(&self) -> bool {
        matches!(
            self,
            Device::Diode(_) | Device::Bjt(_) | Device::Mosfet(_) | Device::Pwl(_) | Device::Logic(_)
        )
    }
}
