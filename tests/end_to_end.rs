//! Literal end-to-end scenarios, run through the full
//! netlist -> circuit -> integrator pipeline.

use approx::assert_relative_eq;

use mna_sim::circuit::Circuit;
use mna_sim::netlist::parse_str;
use mna_sim::solver::Integrator;

fn run(src: &str) -> (Vec<String>, Vec<mna_sim::solver::StepRecord>) {
    let parsed = parse_str(src).expect("netlist should parse");
    let circuit = Circuit::from_parsed(parsed).expect("circuit should build");
    let integrator = Integrator::new(circuit);
    let names = integrator.variable_names();
    let rows = integrator.run().expect("run should converge");
    (names, rows)
}

fn column(names: &[String], rows: &[mna_sim::solver::StepRecord], name: &str) -> Vec<f64> {
    let idx = names.iter().position(|n| n == name).expect("column not found");
    rows.iter().map(|r| r.values[idx]).collect()
}

#[test]
fn rc_charge() {
    let src = "10\nV1 1 0 DC 5\nR1 1 2 1e3\nC1 2 0 1e-6 IC=0\n.TRAN 1e-2 100 BE 10\n";
    let (names, rows) = run(src);
    let v2 = column(&names, &rows, "2");
    // t_total=1e-2, 100*10 steps -> dt_nominal=1e-5; t=1e-3 is row index 99 (0-based trace rows).
    let at_1ms = v2[rows.len() - 1];
    assert!(at_1ms > 4.9, "expected near-full charge by end of run, got {at_1ms}");

    // Earlier in the run, near one time constant (RC = 1e-3 s).
    let mid = rows.len() / 10;
    assert_relative_eq!(v2[mid], 3.16, epsilon = 0.3);
}

#[test]
fn lr_decay() {
    let src = "10\nV1 1 0 DC 0\nL1 2 0 1e-3 IC=1\nR1 1 2 10\n.TRAN 1e-3 100 TR 10\n";
    let (names, rows) = run(src);
    let j0 = column(&names, &rows, "J0");
    // Decays toward zero over the run (tau = L/R = 1e-4 s).
    assert!(j0[0].abs() < 1.0);
    assert!(j0.last().unwrap().abs() < 0.1);
}

#[test]
fn diode_clipper() {
    let src = "10\nV1 1 0 SIN (0 10 1e3 0 0 0 5)\nR1 1 2 1e3\nD1 2 0\n.TRAN 5e-3 200 BE 4\n";
    let (names, rows) = run(src);
    let v2 = column(&names, &rows, "2");
    for v in &v2 {
        assert!(*v < 1.5, "diode clipper should clamp positive half-cycles, got {v}");
    }
}

#[test]
fn chua_pwl_stays_bounded() {
    let src = "\
10
R0102 1 2 1.9
L0100 1 0 1 IC=1
C0200 2 0 0.31 IC=1
C0100 1 0 1 IC=1
N0200 2 0 -2 1.1 -1 0.7 1 -0.7 2 -1.1
.TRAN 20 0.1 BE 1 UIC
";
    let (names, rows) = run(src);
    let v1 = column(&names, &rows, "1");
    let v2 = column(&names, &rows, "2");
    for v in v1.iter().chain(v2.iter()) {
        assert!(v.abs() <= 3.0, "Chua trajectory escaped bounds: {v}");
    }
}

#[test]
fn ideal_opamp_inverter() {
    let src = "10\nV1 1 0 DC 1\nR1 1 2 1e3\nR2 2 3 1e4\nO1 3 0 0 2\n.TRAN 1e-3 50 BE 5\n";
    let (names, rows) = run(src);
    let v3 = column(&names, &rows, "3");
    let last = *v3.last().unwrap();
    assert_relative_eq!(last, -10.0, epsilon = 1e-3);
}

#[test]
fn coupled_inductors() {
    let src = "\
10
V1 1 0 SIN (0 1 1e3 0 0 0 5)
R1 1 2 10
L1 2 0 1e-3
L2 3 0 1e-3
R2 3 0 1e6
K1 L1 L2 0.9
.TRAN 5e-3 200 TR 4
";
    let (names, rows) = run(src);
    let v3 = column(&names, &rows, "3");
    assert!(v3.iter().any(|v| v.abs() > 1e-6), "secondary should show induced voltage");
}
