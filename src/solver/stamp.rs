//! The stamp assembler: turns each [`Device`] into entries of `(A, b)`.
//!
//! Dispatch is a single `match` over the tagged [`Device`] enum, following
//! the primitives documented on [`MnaMatrix`]: `stamp_g` (conductance),
//! `stamp_gtrans` (transconductance), `stamp_i` (independent current), and
//! `stamp_branch` (zero-impedance branch row, used by every device that
//! owns an extra variable).

use std::collections::HashMap;

use crate::circuit::{ExtraVar, NodeId, StepContext, Topology};
use crate::components::bjt::{ALPHA_F, ALPHA_R};
use crate::components::Device;

use super::matrix::MnaMatrix;

const GND: usize = 0;

fn nrow(topology: &Topology, node: NodeId) -> usize {
    topology.node_row(node)
}

fn xrow(topology: &Topology, extra: ExtraVar) -> usize {
    topology.extra_row(extra)
}

/// Stamp every device in the circuit for one Newton iteration.
///
/// Per-step history updates (the TR recurrences, inductor/logic-gate input
/// history) are gated by `ctx.first_iter` and run once before any device is
/// stamped, matching the contract on [`StepContext`].
pub fn stamp_all(topology: &Topology, devices: &mut [Device], ctx: &StepContext, matrix: &mut MnaMatrix) {
    if ctx.first_iter {
        for device in devices.iter_mut() {
            match device {
                Device::Capacitor(c) => c.update_for_step(ctx),
                Device::Inductor(l) => l.update_for_step(ctx),
                Device::NodalInductor(x) => x.update_for_step(ctx),
                Device::Logic(g) => g.update_for_step(ctx),
                _ => {}
            }
        }
    }

    let mut inductor_history: HashMap<ExtraVar, f64> = HashMap::new();
    for device in devices.iter() {
        if let Device::Inductor(l) = device {
            inductor_history.insert(l.extra, l.history_value(ctx.method));
        }
    }

    for device in devices.iter_mut() {
        stamp_device(topology, device, ctx, matrix, &inductor_history);
    }
}

fn stamp_device(
    topology: &Topology,
    device: &mut Device,
    ctx: &StepContext,
    matrix: &mut MnaMatrix,
    inductor_history: &HashMap<ExtraVar, f64>,
) {
    match device {
        Device::Resistor(r) => {
            let a = nrow(topology, r.nodes[0]);
            let b = nrow(topology, r.nodes[1]);
            matrix.stamp_g(a, b, r.conductance());
        }

        Device::Capacitor(c) => {
            let a = nrow(topology, c.nodes[0]);
            let b = nrow(topology, c.nodes[1]);
            let g = c.conductance(ctx.dt, ctx.method);
            matrix.stamp_g(a, b, g);
            let i_hist = c.history_source(ctx.dt, ctx.method);
            matrix.stamp_i(b, a, i_hist);
        }

        Device::Inductor(l) => {
            use crate::components::linear::Inductor;
            let a = nrow(topology, l.nodes[0]);
            let b = nrow(topology, l.nodes[1]);
            let x = xrow(topology, l.extra);
            let diag = l.diagonal(ctx.dt, ctx.method);
            if Inductor::back_couples(ctx.method) {
                matrix.add(x, x, -diag);
                matrix.add_rhs(x, -l.rhs(ctx.dt, ctx.method));
                matrix.add(a, x, 1.0);
                matrix.add(x, a, 1.0);
                matrix.add(b, x, -1.0);
                matrix.add(x, b, -1.0);
            } else {
                matrix.add(x, x, diag);
                matrix.add_rhs(x, l.rhs(ctx.dt, ctx.method));
            }
        }

        Device::NodalInductor(x) => {
            let a = nrow(topology, x.nodes[0]);
            let b = nrow(topology, x.nodes[1]);
            let g = x.conductance(ctx.dt, ctx.method);
            matrix.stamp_g(a, b, g);
            matrix.stamp_i(a, b, x.history_current());
        }

        Device::Coupling(k) => {
            let xa = xrow(topology, k.extra_a);
            let xb = xrow(topology, k.extra_b);
            let cross = k.cross_term(ctx.dt, ctx.method);
            matrix.add(xa, xb, -cross);
            matrix.add(xb, xa, -cross);
            let hist_b = inductor_history.get(&k.extra_b).copied().unwrap_or(0.0);
            let hist_a = inductor_history.get(&k.extra_a).copied().unwrap_or(0.0);
            matrix.add_rhs(xa, -k.history_term(ctx.dt, ctx.method, hist_b));
            matrix.add_rhs(xb, -k.history_term(ctx.dt, ctx.method, hist_a));
        }

        Device::Vccs(g) => {
            let o0 = nrow(topology, g.output[0]);
            let o1 = nrow(topology, g.output[1]);
            let c0 = nrow(topology, g.control[0]);
            let c1 = nrow(topology, g.control[1]);
            matrix.stamp_gtrans(o0, o1, c0, c1, g.gain);
        }

        Device::Vcvs(e) => {
            let o0 = nrow(topology, e.output[0]);
            let o1 = nrow(topology, e.output[1]);
            let c0 = nrow(topology, e.control[0]);
            let c1 = nrow(topology, e.control[1]);
            let x = xrow(topology, e.extra);
            matrix.stamp_branch(o0, o1, x, 0.0);
            matrix.add(x, c0, -e.gain);
            matrix.add(x, c1, e.gain);
        }

        Device::Cccs(f) => {
            let o0 = nrow(topology, f.output[0]);
            let o1 = nrow(topology, f.output[1]);
            let c0 = nrow(topology, f.control[0]);
            let c1 = nrow(topology, f.control[1]);
            let x = xrow(topology, f.extra);
            // zero-volt control branch sensing the controlling current
            matrix.stamp_branch(c0, c1, x, 0.0);
            matrix.add(o0, x, f.gain);
            matrix.add(o1, x, -f.gain);
        }

        Device::Ccvs(h) => {
            let o0 = nrow(topology, h.output[0]);
            let o1 = nrow(topology, h.output[1]);
            let c0 = nrow(topology, h.control[0]);
            let c1 = nrow(topology, h.control[1]);
            let jx = xrow(topology, h.extra_ctrl);
            let jy = xrow(topology, h.extra_out);
            matrix.stamp_branch(c0, c1, jx, 0.0);
            matrix.stamp_branch(o0, o1, jy, 0.0);
            matrix.add(jy, jx, -h.transresistance);
        }

        Device::VoltageSource(v) => {
            let n0 = nrow(topology, v.nodes[0]);
            let n1 = nrow(topology, v.nodes[1]);
            let x = xrow(topology, v.extra);
            matrix.stamp_branch(n0, n1, x, v.value(ctx.t, ctx.dt));
        }

        Device::CurrentSource(i) => {
            let n0 = nrow(topology, i.nodes[0]);
            let n1 = nrow(topology, i.nodes[1]);
            matrix.stamp_i(n0, n1, i.value(ctx.t, ctx.dt));
        }

        Device::OpAmp(op) => {
            let o0 = nrow(topology, op.output[0]);
            let o1 = nrow(topology, op.output[1]);
            let i0 = nrow(topology, op.input[0]);
            let i1 = nrow(topology, op.input[1]);
            let x = xrow(topology, op.extra);
            matrix.add(o0, x, 1.0);
            matrix.add(o1, x, -1.0);
            matrix.add(x, i0, 1.0);
            matrix.add(x, i1, -1.0);
        }

        Device::Diode(d) => {
            let a = nrow(topology, d.nodes[0]);
            let b = nrow(topology, d.nodes[1]);
            let v_raw = matrix.value(a) - matrix.value(b);
            let (_, g, i_eq) = d.linearize(v_raw, ctx.first_iter && ctx.first_step);
            matrix.stamp_g(a, b, g);
            matrix.stamp_i(a, b, i_eq);
        }

        Device::Bjt(q) => {
            let c = nrow(topology, q.collector());
            let b = nrow(topology, q.base());
            let e = nrow(topology, q.emitter());
            let v_be = matrix.value(b) - matrix.value(e);
            let v_bc = matrix.value(b) - matrix.value(c);
            let lin = q.linearize(v_be, v_bc, ctx.first_iter && ctx.first_step);

            // BE junction current I_F, B -> E
            matrix.stamp_g(b, e, lin.gf);
            matrix.stamp_i(b, e, lin.i_f0);
            // BC junction current I_R, B -> C
            matrix.stamp_g(b, c, lin.gr);
            matrix.stamp_i(b, c, lin.i_r0);
            // forward transport alpha_F*I_F, C -> E
            matrix.stamp_gtrans(c, e, b, e, ALPHA_F * lin.gf);
            matrix.stamp_i(c, e, ALPHA_F * lin.i_f0);
            // reverse transport alpha_R*I_R, E -> C
            matrix.stamp_gtrans(e, c, b, c, ALPHA_R * lin.gr);
            matrix.stamp_i(e, c, ALPHA_R * lin.i_r0);
        }

        Device::Mosfet(m) => {
            let d = nrow(topology, m.nodes[0]);
            let g_node = nrow(topology, m.nodes[1]);
            let s = nrow(topology, m.nodes[2]);
            let v_d = matrix.value(d);
            let v_g = matrix.value(g_node);
            let v_s = matrix.value(s);
            let lin = m.linearize(v_d, v_g, v_s, ctx.first_iter && ctx.first_step);
            matrix.stamp_gtrans(d, s, g_node, s, lin.g);
            matrix.stamp_g(d, s, lin.gds);
            matrix.stamp_i(d, s, lin.i_eq);
        }

        Device::Pwl(n) => {
            let a = nrow(topology, n.nodes[0]);
            let b = nrow(topology, n.nodes[1]);
            let v = matrix.value(a) - matrix.value(b);
            let (g, i_eq) = n.linearize(v);
            matrix.stamp_g(a, b, g);
            matrix.stamp_i(a, b, i_eq);
        }

        Device::Logic(gate) => {
            let rows: Vec<usize> = gate.inputs.iter().map(|&n| nrow(topology, n)).collect();
            let v_inputs: Vec<f64> = rows.iter().map(|&r| matrix.value(r)).collect();
            for (i, &input_row) in rows.iter().enumerate() {
                let g_in = gate.input_conductance(i, ctx.dt, ctx.method);
                matrix.stamp_g(input_row, GND, g_in);
                let hist = gate.history_source(i, ctx.dt, ctx.method);
                matrix.stamp_i(GND, input_row, hist);
            }
            let out = nrow(topology, gate.output);
            let g_out = gate.output_conductance();
            let i_out = gate.output_source(&v_inputs);
            matrix.stamp_g(out, GND, g_out);
            matrix.stamp_i(GND, out, i_out);
        }
    }
}
