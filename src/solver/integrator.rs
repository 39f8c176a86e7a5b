//! Time integrator: advances a [`Circuit`] through its `.TRAN` directive,
//! one accepted step at a time, driving [`NewtonRaphson`] and updating
//! device history state on acceptance.

use log::{debug, info};

use crate::circuit::{Circuit, Method, NodeId, StepContext, Topology};
use crate::components::Device;
use crate::error::Result;

use super::matrix::MnaMatrix;
use super::newton::NewtonRaphson;

/// Drives a circuit from `t=0` to `t_total`, yielding one trace row every
/// `n_substeps`-th accepted step.
///
/// Holds topology and devices as separate fields, rather than a single
/// `Circuit`, so that stamping (which needs `&Topology` for row lookups and
/// `&mut [Device]` for state) never borrows one through the other.
pub struct Integrator {
    topology: Topology,
    devices: Vec<Device>,
    matrix: MnaMatrix,
    newton: NewtonRaphson,
    dt_nominal: f64,
    t: f64,
    dt: f64,
    dt_prev: f64,
    step_index: usize,
    first_step: bool,
}

/// One accepted step's data, ready for the trace writer.
pub struct StepRecord {
    pub time: f64,
    pub values: Vec<f64>,
}

impl Integrator {
    pub fn new(circuit: Circuit) -> Self {
        let (topology, devices) = circuit.into_parts();
        let var_count = topology.var_count();
        let matrix = MnaMatrix::new(var_count);
        let n_points = topology.tran.n_points.max(1.0);
        let n_substeps = topology.tran.n_substeps.max(1) as f64;
        let dt_nominal = topology.tran.t_total / (n_points * n_substeps);
        Self {
            topology,
            devices,
            matrix,
            newton: NewtonRaphson::new(),
            dt_nominal,
            t: 0.0,
            dt: dt_nominal * 1e-3,
            dt_prev: dt_nominal * 1e-3,
            step_index: 0,
            first_step: true,
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Column names for the trace header: `time` plus one name per free
    /// variable, in row order.
    pub fn variable_names(&self) -> Vec<String> {
        (1..=self.topology.var_count())
            .map(|row| self.topology.var_name(row))
            .collect()
    }

    /// Run to completion, returning every `n_substeps`-th accepted step.
    pub fn run(mut self) -> Result<Vec<StepRecord>> {
        let t_total = self.topology.tran.t_total;
        let n_substeps = self.topology.tran.n_substeps.max(1);
        let mut records = Vec::new();

        while self.t < t_total {
            self.step()?;
            if self.step_index % n_substeps == 0 {
                records.push(StepRecord {
                    time: self.t,
                    values: self.matrix.x[1..].to_vec(),
                });
                debug!(
                    "t={:.6e}: trace row {} recorded",
                    self.t,
                    records.len()
                );
            }
        }

        info!(
            "run complete: {} steps, {} trace rows, t_final={:.6e}",
            self.step_index,
            records.len(),
            self.t
        );
        Ok(records)
    }

    fn step(&mut self) -> Result<()> {
        let mut ctx = StepContext {
            t: self.t + self.dt,
            dt: self.dt,
            dt_prev: self.dt_prev,
            method: self.method(),
            first_iter: true,
            first_step: self.first_step,
        };

        self.newton
            .solve(&self.topology, &mut self.devices, &mut ctx, &mut self.matrix)?;

        self.accept();

        self.step_index += 1;
        self.t += self.dt;
        self.dt_prev = self.dt;
        self.dt = self.dt_nominal;
        self.first_step = false;
        Ok(())
    }

    fn method(&self) -> Method {
        self.topology.tran.method
    }

    /// Push the accepted solution into every device's history state.
    fn accept(&mut self) {
        let topology = &self.topology;
        let x = &self.matrix.x;
        let row = |node: NodeId| x[topology.node_row(node)];

        for device in &mut self.devices {
            match device {
                Device::Capacitor(c) => {
                    let v = row(c.nodes[0]) - row(c.nodes[1]);
                    c.accept(v);
                }
                Device::Inductor(l) => {
                    let i = x[topology.extra_row(l.extra)];
                    let v = row(l.nodes[0]) - row(l.nodes[1]);
                    l.accept(i, v);
                }
                Device::NodalInductor(n) => {
                    let v = row(n.nodes[0]) - row(n.nodes[1]);
                    n.accept(v);
                }
                Device::Logic(gate) => {
                    let v_inputs: Vec<f64> = gate.inputs.iter().map(|&n| row(n)).collect();
                    gate.accept(&v_inputs);
                }
                _ => {}
            }
        }
    }
}
