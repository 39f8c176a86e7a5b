//! Circuit graph: the allocation pass from a [`ParsedCircuit`] to a
//! resolved [`Circuit`] of devices addressed by stable `NodeId`/`ExtraVar`
//! indices, mirroring the teacher's two-phase `Circuit::from_ast` split
//! into "parse" then "build".

use std::collections::HashMap;

use super::types::{ExtraVar, Method, NodeId};
use crate::components::{
    bjt::Bjt, controlled::{Ccvs, Cccs, Vccs, Vcvs}, coupling::Coupling, diode::Diode,
    linear::{Capacitor, Inductor, NodalInductor, Resistor}, logic::{LogicGate, LogicParams},
    mosfet::Mosfet, opamp::OpAmp, pwl::PiecewiseResistor, sources::{CurrentSource, VoltageSource},
    Device,
};
use crate::error::{Result, SimError};
use crate::netlist::{ControlledKind, ParsedCircuit, ParsedDevice, SourceKind, TranDirective};

/// Upper bound on the total unknown count, guarding against runaway
/// netlists rather than any real circuit this simulator expects to see.
pub const MAX_VARIABLES: usize = 100_000;

/// The node/extra-variable topology of a circuit: everything the stamp
/// assembler needs to address the matrix, with no device state attached.
/// Kept separate from [`Circuit`]'s `devices` so a caller can hold `&Topology`
/// and `&mut [Device]` at the same time without the two borrows aliasing.
#[derive(Debug)]
pub struct Topology {
    /// Highest node index in use (excluding ground, which is always 0).
    pub node_count: usize,
    /// Number of extra (branch-current) variables allocated.
    pub extra_count: usize,
    /// Node names, indexed by `NodeId.0` (`node_names[0] == "GND"`).
    pub node_names: Vec<String>,
    pub tran: TranDirective,
}

impl Topology {
    /// Total unknown count `V`: node voltages (excluding ground) plus
    /// extra branch-current variables.
    pub fn var_count(&self) -> usize {
        self.node_count + self.extra_count
    }

    /// Matrix row/column for a node voltage. Ground (`NodeId(0)`) maps to
    /// row 0, which callers must never treat as a free variable.
    pub fn node_row(&self, node: NodeId) -> usize {
        node.0
    }

    /// Matrix row/column for an extra variable.
    pub fn extra_row(&self, extra: ExtraVar) -> usize {
        self.node_count + 1 + extra.0
    }

    /// Human-readable name for a variable row, for the trace header.
    pub fn var_name(&self, row: usize) -> String {
        if row <= self.node_count {
            self.node_names[row].clone()
        } else {
            format!("J{}", row - self.node_count - 1)
        }
    }
}

/// A fully resolved circuit, ready to simulate: topology plus the devices
/// that live on it.
#[derive(Debug)]
pub struct Circuit {
    pub devices: Vec<Device>,
    pub topology: Topology,
}

/// Resolves node names to stable `NodeId`s, assigning a fresh index the
/// first time a name is seen. `"0"` and case-insensitive `"gnd"` both
/// resolve to [`NodeId::GROUND`].
struct NodeTable {
    map: HashMap<String, NodeId>,
    names: Vec<String>,
}

impl NodeTable {
    fn new() -> Self {
        let mut map = HashMap::new();
        map.insert("0".to_string(), NodeId::GROUND);
        Self {
            map,
            names: vec!["GND".to_string()],
        }
    }

    fn resolve(&mut self, raw: &str) -> NodeId {
        if raw == "0" || raw.eq_ignore_ascii_case("gnd") {
            return NodeId::GROUND;
        }
        if let Some(&id) = self.map.get(raw) {
            return id;
        }
        let id = NodeId(self.names.len());
        self.map.insert(raw.to_string(), id);
        self.names.push(raw.to_string());
        id
    }
}

/// Hands out stable extra-variable indices in file order.
#[derive(Default)]
struct ExtraAllocator {
    next: usize,
}

impl ExtraAllocator {
    fn alloc(&mut self) -> ExtraVar {
        let e = ExtraVar(self.next);
        self.next += 1;
        e
    }
}

impl Circuit {
    /// Run the allocation pass over a [`ParsedCircuit`], producing a
    /// resolved [`Circuit`].
    pub fn from_parsed(parsed: ParsedCircuit) -> Result<Self> {
        let mut nodes = NodeTable::new();
        let mut extras = ExtraAllocator::default();
        let mut devices = Vec::with_capacity(parsed.entries.len());
        // L devices seen so far, by name, for `K` to borrow from.
        let mut inductors: HashMap<String, (ExtraVar, f64)> = HashMap::new();
        let mut has_coupling = false;

        for entry in parsed.entries {
            let device = match entry {
                ParsedDevice::Resistor { name, n1, n2, r } => Device::Resistor(Resistor::new(
                    name,
                    [nodes.resolve(&n1), nodes.resolve(&n2)],
                    r,
                )),
                ParsedDevice::Capacitor { name, n1, n2, c, ic } => Device::Capacitor(Capacitor::new(
                    name,
                    [nodes.resolve(&n1), nodes.resolve(&n2)],
                    c,
                    ic,
                )),
                ParsedDevice::Inductor { name, n1, n2, l, ic } => {
                    let extra = extras.alloc();
                    inductors.insert(name.clone(), (extra, l));
                    Device::Inductor(Inductor::new(
                        name,
                        [nodes.resolve(&n1), nodes.resolve(&n2)],
                        l,
                        ic,
                        extra,
                    ))
                }
                ParsedDevice::NodalInductor { name, n1, n2, l, ic } => Device::NodalInductor(
                    NodalInductor::new(name, [nodes.resolve(&n1), nodes.resolve(&n2)], l, ic),
                ),
                ParsedDevice::Coupling { name, l1, l2, k } => {
                    has_coupling = true;
                    let (extra_a, la) = *inductors.get(&l1).ok_or_else(|| {
                        SimError::CouplingReferencesUnknownInductor { name: l1.clone() }
                    })?;
                    let (extra_b, lb) = *inductors.get(&l2).ok_or_else(|| {
                        SimError::CouplingReferencesUnknownInductor { name: l2.clone() }
                    })?;
                    Device::Coupling(Coupling::new(name, k, extra_a, la, extra_b, lb))
                }
                ParsedDevice::Controlled {
                    kind,
                    name,
                    n1,
                    n2,
                    nc1,
                    nc2,
                    gain,
                } => {
                    let output = [nodes.resolve(&n1), nodes.resolve(&n2)];
                    let control = [nodes.resolve(&nc1), nodes.resolve(&nc2)];
                    match kind {
                        ControlledKind::Vccs => Device::Vccs(Vccs::new(name, output, control, gain)),
                        ControlledKind::Vcvs => {
                            let extra = extras.alloc();
                            Device::Vcvs(Vcvs::new(name, output, control, gain, extra))
                        }
                        ControlledKind::Cccs => {
                            let extra = extras.alloc();
                            Device::Cccs(Cccs::new(name, output, control, gain, extra))
                        }
                        ControlledKind::Ccvs => {
                            let extra_ctrl = extras.alloc();
                            let extra_out = extras.alloc();
                            Device::Ccvs(Ccvs::new(name, output, control, gain, extra_ctrl, extra_out))
                        }
                    }
                }
                ParsedDevice::Source {
                    kind,
                    name,
                    n1,
                    n2,
                    waveform,
                } => {
                    let node_pair = [nodes.resolve(&n1), nodes.resolve(&n2)];
                    match kind {
                        SourceKind::Current => {
                            Device::CurrentSource(CurrentSource::new(name, node_pair, waveform))
                        }
                        SourceKind::Voltage => {
                            let extra = extras.alloc();
                            Device::VoltageSource(VoltageSource::new(name, node_pair, waveform, extra))
                        }
                    }
                }
                ParsedDevice::OpAmp {
                    name,
                    nout_pos,
                    nout_neg,
                    nin_pos,
                    nin_neg,
                } => {
                    let extra = extras.alloc();
                    Device::OpAmp(OpAmp::new(
                        name,
                        [nodes.resolve(&nout_pos), nodes.resolve(&nout_neg)],
                        [nodes.resolve(&nin_pos), nodes.resolve(&nin_neg)],
                        extra,
                    ))
                }
                ParsedDevice::Diode { name, n1, n2 } => {
                    Device::Diode(Diode::new(name, [nodes.resolve(&n1), nodes.resolve(&n2)]))
                }
                ParsedDevice::Bjt {
                    name,
                    nc,
                    nb,
                    ne,
                    kind,
                } => Device::Bjt(Bjt::new(
                    name,
                    [nodes.resolve(&nc), nodes.resolve(&nb), nodes.resolve(&ne)],
                    kind,
                )),
                ParsedDevice::Mosfet {
                    name,
                    nd,
                    ng,
                    ns,
                    nb,
                    kind,
                    length,
                    width,
                } => Device::Mosfet(Mosfet::new(
                    name,
                    [
                        nodes.resolve(&nd),
                        nodes.resolve(&ng),
                        nodes.resolve(&ns),
                        nodes.resolve(&nb),
                    ],
                    kind,
                    length,
                    width,
                )),
                ParsedDevice::Pwl {
                    name,
                    n1,
                    n2,
                    v1,
                    i1,
                    v2,
                    i2,
                    v3,
                    i3,
                    v4,
                    i4,
                } => Device::Pwl(PiecewiseResistor::new(
                    name,
                    [nodes.resolve(&n1), nodes.resolve(&n2)],
                    v1, i1, v2, i2, v3, i3, v4, i4,
                )),
                ParsedDevice::Logic {
                    kind,
                    name,
                    inputs,
                    output,
                    v,
                    r,
                    c,
                    a,
                } => {
                    let input_nodes: Vec<NodeId> = inputs.iter().map(|n| nodes.resolve(n)).collect();
                    let output_node = nodes.resolve(&output);
                    Device::Logic(LogicGate::new(
                        name,
                        kind,
                        input_nodes,
                        output_node,
                        LogicParams { v, r, c, a },
                    ))
                }
            };
            devices.push(device);
        }

        if parsed.tran.method == Method::Fe && has_coupling {
            let name = devices
                .iter()
                .find_map(|d| match d {
                    Device::Coupling(c) => Some(c.name.clone()),
                    _ => None,
                })
                .unwrap_or_default();
            return Err(SimError::UnsupportedFeCoupling { name });
        }

        let node_count = nodes.names.len() - 1;
        let extra_count = extras.next;
        if node_count + extra_count > MAX_VARIABLES {
            return Err(SimError::TooManyVariables { limit: MAX_VARIABLES });
        }

        Ok(Circuit {
            devices,
            topology: Topology {
                node_count,
                extra_count,
                node_names: nodes.names,
                tran: parsed.tran,
            },
        })
    }

    /// Total unknown count `V`: node voltages (excluding ground) plus
    /// extra branch-current variables.
    pub fn var_count(&self) -> usize {
        self.topology.var_count()
    }

    /// Split into topology and devices, so a caller (the time integrator)
    /// can hold `&Topology` and `&mut [Device]` independently instead of
    /// one borrowed through the other.
    pub fn into_parts(self) -> (Topology, Vec<Device>) {
        (self.topology, self.devices)
    }
}
