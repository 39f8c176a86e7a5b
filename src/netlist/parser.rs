//! Netlist parser: turns tokenized lines into a [`ParsedCircuit`] with raw,
//! unresolved node-name strings. Node/extra-variable resolution happens
//! later, in `Circuit::from_parsed`.

use crate::circuit::Method;
use crate::components::bjt::BjtKind;
use crate::components::logic::LogicKind;
use crate::components::mosfet::MosKind;
use crate::components::sources::Waveform;
use crate::error::{Result, SimError};

use super::lexer::{self, Line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlledKind {
    Vccs,
    Vcvs,
    Cccs,
    Ccvs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Current,
    Voltage,
}

/// One netlist device, prior to node/extra-variable resolution.
#[derive(Debug, Clone)]
pub enum ParsedDevice {
    Resistor {
        name: String,
        n1: String,
        n2: String,
        r: f64,
    },
    Capacitor {
        name: String,
        n1: String,
        n2: String,
        c: f64,
        ic: Option<f64>,
    },
    Inductor {
        name: String,
        n1: String,
        n2: String,
        l: f64,
        ic: Option<f64>,
    },
    NodalInductor {
        name: String,
        n1: String,
        n2: String,
        l: f64,
        ic: Option<f64>,
    },
    Coupling {
        name: String,
        l1: String,
        l2: String,
        k: f64,
    },
    Controlled {
        kind: ControlledKind,
        name: String,
        n1: String,
        n2: String,
        nc1: String,
        nc2: String,
        gain: f64,
    },
    Source {
        kind: SourceKind,
        name: String,
        n1: String,
        n2: String,
        waveform: Waveform,
    },
    OpAmp {
        name: String,
        nout_pos: String,
        nout_neg: String,
        nin_pos: String,
        nin_neg: String,
    },
    Diode {
        name: String,
        n1: String,
        n2: String,
    },
    Bjt {
        name: String,
        nc: String,
        nb: String,
        ne: String,
        kind: BjtKind,
    },
    Mosfet {
        name: String,
        nd: String,
        ng: String,
        ns: String,
        nb: String,
        kind: MosKind,
        length: f64,
        width: f64,
    },
    Pwl {
        name: String,
        n1: String,
        n2: String,
        v1: f64,
        i1: f64,
        v2: f64,
        i2: f64,
        v3: f64,
        i3: f64,
        v4: f64,
        i4: f64,
    },
    Logic {
        kind: LogicKind,
        name: String,
        inputs: Vec<String>,
        output: String,
        v: f64,
        r: f64,
        c: f64,
        a: f64,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct TranDirective {
    pub t_total: f64,
    pub n_points: f64,
    pub method: Method,
    pub n_substeps: usize,
    pub uic: bool,
}

#[derive(Debug, Clone)]
pub struct ParsedCircuit {
    pub node_count_hint: usize,
    pub entries: Vec<ParsedDevice>,
    pub tran: TranDirective,
}

fn num(tok: &str, line: usize) -> Result<f64> {
    tok.parse::<f64>()
        .map_err(|_| SimError::parse(line, format!("expected a number, got '{tok}'")))
}

fn kv_value<'a>(tok: &'a str, key: &str, line: usize) -> Result<&'a str> {
    let mut parts = tok.splitn(2, '=');
    let k = parts.next().unwrap_or_default();
    let v = parts.next().ok_or_else(|| {
        SimError::parse(line, format!("expected '{key}=<value>', got '{tok}'"))
    })?;
    if !k.eq_ignore_ascii_case(key) {
        return Err(SimError::parse(
            line,
            format!("expected '{key}=<value>', got '{tok}'"),
        ));
    }
    Ok(v)
}

fn parse_ic(tokens: &[&str], line: usize) -> Result<Option<f64>> {
    match tokens {
        [] => Ok(None),
        [tok] => Ok(Some(num(kv_value(tok, "IC", line)?, line)?)),
        _ => Err(SimError::parse(line, "unexpected trailing tokens")),
    }
}

fn parse_waveform(tokens: &[&str], line: usize) -> Result<Waveform> {
    let kind = tokens
        .first()
        .ok_or_else(|| SimError::parse(line, "missing waveform kind"))?;
    let rest: Vec<&str> = tokens[1..]
        .iter()
        .map(|t| t.trim_start_matches('(').trim_end_matches(')'))
        .filter(|t| !t.is_empty())
        .copied()
        .collect();
    match kind.to_uppercase().as_str() {
        "DC" => Ok(Waveform::Dc {
            value: num(rest.first().copied().unwrap_or("0"), line)?,
        }),
        "SIN" => {
            let get = |i: usize| rest.get(i).copied().unwrap_or("0");
            Ok(Waveform::Sin {
                dc: num(get(0), line)?,
                amplitude: num(get(1), line)?,
                freq: num(get(2), line)?,
                delay: num(get(3), line)?,
                damping: num(get(4), line)?,
                phase_deg: num(get(5), line)?,
                n_cycles: num(get(6), line)?,
            })
        }
        "PULSE" => {
            let get = |i: usize| rest.get(i).copied().unwrap_or("0");
            Ok(Waveform::Pulse {
                a1: num(get(0), line)?,
                a2: num(get(1), line)?,
                delay: num(get(2), line)?,
                tr: num(get(3), line)?,
                tf: num(get(4), line)?,
                ton: num(get(5), line)?,
                period: num(get(6), line)?,
                n_cycles: num(get(7), line)?,
            })
        }
        other => Err(SimError::parse(line, format!("unknown waveform kind '{other}'"))),
    }
}

fn parse_tran(tokens: &[&str], line: usize) -> Result<TranDirective> {
    if tokens.len() < 5 {
        return Err(SimError::parse(line, ".TRAN requires t_total n_points method n_substeps"));
    }
    let t_total = num(tokens[1], line)?;
    let n_points = num(tokens[2], line)?;
    let method = Method::parse(tokens[3])
        .ok_or_else(|| SimError::parse(line, format!("unknown integration method '{}'", tokens[3])))?;
    let n_substeps = tokens[4]
        .parse::<usize>()
        .map_err(|_| SimError::parse(line, "n_substeps must be a positive integer"))?;
    let uic = tokens.get(5).map(|t| t.eq_ignore_ascii_case("UIC")).unwrap_or(false);
    Ok(TranDirective {
        t_total,
        n_points,
        method,
        n_substeps,
        uic,
    })
}

fn parse_device(line: &Line<'_>) -> Result<ParsedDevice> {
    let t = &line.tokens;
    let name = t[0].to_string();
    let symbol = t[0].chars().next().unwrap();

    if let Some(kind) = LogicKind::from_symbol(symbol) {
        let bare_name = t[0][symbol.len_utf8()..].to_string();
        return if kind == LogicKind::Buffer {
            if t.len() != 7 {
                return Err(SimError::parse(line.number, "logic buffer requires nA nOut V R C A"));
            }
            Ok(ParsedDevice::Logic {
                kind,
                name: bare_name,
                inputs: vec![t[1].to_string()],
                output: t[2].to_string(),
                v: num(t[3], line.number)?,
                r: num(t[4], line.number)?,
                c: num(t[5], line.number)?,
                a: num(t[6], line.number)?,
            })
        } else {
            if t.len() != 8 {
                return Err(SimError::parse(line.number, "logic gate requires nA nB nOut V R C A"));
            }
            Ok(ParsedDevice::Logic {
                kind,
                name: bare_name,
                inputs: vec![t[1].to_string(), t[2].to_string()],
                output: t[3].to_string(),
                v: num(t[4], line.number)?,
                r: num(t[5], line.number)?,
                c: num(t[6], line.number)?,
                a: num(t[7], line.number)?,
            })
        };
    }

    match symbol.to_ascii_uppercase() {
        'R' => Ok(ParsedDevice::Resistor {
            name,
            n1: t[1].to_string(),
            n2: t[2].to_string(),
            r: num(t[3], line.number)?,
        }),
        'C' => Ok(ParsedDevice::Capacitor {
            name,
            n1: t[1].to_string(),
            n2: t[2].to_string(),
            c: num(t[3], line.number)?,
            ic: parse_ic(&t[4..], line.number)?,
        }),
        'L' => Ok(ParsedDevice::Inductor {
            name,
            n1: t[1].to_string(),
            n2: t[2].to_string(),
            l: num(t[3], line.number)?,
            ic: parse_ic(&t[4..], line.number)?,
        }),
        'X' => Ok(ParsedDevice::NodalInductor {
            name,
            n1: t[1].to_string(),
            n2: t[2].to_string(),
            l: num(t[3], line.number)?,
            ic: parse_ic(&t[4..], line.number)?,
        }),
        'K' => Ok(ParsedDevice::Coupling {
            name,
            l1: t[1].to_string(),
            l2: t[2].to_string(),
            k: num(t[3], line.number)?,
        }),
        'E' | 'F' | 'G' | 'H' => {
            let kind = match symbol.to_ascii_uppercase() {
                'E' => ControlledKind::Vcvs,
                'F' => ControlledKind::Cccs,
                'G' => ControlledKind::Vccs,
                'H' => ControlledKind::Ccvs,
                _ => unreachable!(),
            };
            Ok(ParsedDevice::Controlled {
                kind,
                name,
                n1: t[1].to_string(),
                n2: t[2].to_string(),
                nc1: t[3].to_string(),
                nc2: t[4].to_string(),
                gain: num(t[5], line.number)?,
            })
        }
        'I' | 'V' => {
            let kind = if symbol.to_ascii_uppercase() == 'I' {
                SourceKind::Current
            } else {
                SourceKind::Voltage
            };
            Ok(ParsedDevice::Source {
                kind,
                name,
                n1: t[1].to_string(),
                n2: t[2].to_string(),
                waveform: parse_waveform(&t[3..], line.number)?,
            })
        }
        'O' => Ok(ParsedDevice::OpAmp {
            name,
            nout_pos: t[1].to_string(),
            nout_neg: t[2].to_string(),
            nin_pos: t[3].to_string(),
            nin_neg: t[4].to_string(),
        }),
        'D' => Ok(ParsedDevice::Diode {
            name,
            n1: t[1].to_string(),
            n2: t[2].to_string(),
        }),
        'Q' => {
            let kind = match t[4].to_uppercase().as_str() {
                "NPN" => BjtKind::Npn,
                "PNP" => BjtKind::Pnp,
                other => return Err(SimError::parse(line.number, format!("unknown BJT kind '{other}'"))),
            };
            Ok(ParsedDevice::Bjt {
                name,
                nc: t[1].to_string(),
                nb: t[2].to_string(),
                ne: t[3].to_string(),
                kind,
            })
        }
        'M' => {
            let kind = match t[5].to_uppercase().as_str() {
                "NMOS" => MosKind::Nmos,
                "PMOS" => MosKind::Pmos,
                other => return Err(SimError::parse(line.number, format!("unknown MOSFET kind '{other}'"))),
            };
            let length = num(kv_value(t[6], "L", line.number)?, line.number)?;
            let width = num(kv_value(t[7], "W", line.number)?, line.number)?;
            Ok(ParsedDevice::Mosfet {
                name,
                nd: t[1].to_string(),
                ng: t[2].to_string(),
                ns: t[3].to_string(),
                nb: t[4].to_string(),
                kind,
                length,
                width,
            })
        }
        'N' => {
            let ln = line.number;
            Ok(ParsedDevice::Pwl {
                name,
                n1: t[1].to_string(),
                n2: t[2].to_string(),
                v1: num(t[3], ln)?,
                i1: num(t[4], ln)?,
                v2: num(t[5], ln)?,
                i2: num(t[6], ln)?,
                v3: num(t[7], ln)?,
                i3: num(t[8], ln)?,
                v4: num(t[9], ln)?,
                i4: num(t[10], ln)?,
            })
        }
        _ => Err(SimError::UnknownDevice {
            token: t[0].to_string(),
        }),
    }
}

/// Parse a full netlist source string.
pub fn parse(source: &str) -> Result<ParsedCircuit> {
    let lines = lexer::tokenize(source);
    let mut iter = lines.into_iter();
    let first = iter
        .next()
        .ok_or_else(|| SimError::parse(1, "empty netlist"))?;
    let node_count_hint = first.tokens[0]
        .parse::<usize>()
        .map_err(|_| SimError::parse(first.number, "expected a node-count hint on the first line"))?;

    let mut entries = Vec::new();
    let mut tran = None;
    for line in iter {
        if line.tokens[0].eq_ignore_ascii_case(".TRAN") {
            tran = Some(parse_tran(&line.tokens, line.number)?);
            continue;
        }
        entries.push(parse_device(&line)?);
    }

    let tran = tran.ok_or_else(|| SimError::parse(0, "missing .TRAN directive"))?;
    Ok(ParsedCircuit {
        node_count_hint,
        entries,
        tran,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rc_charge_netlist() {
        let src = "10\nV1 1 0 DC 5\nR1 1 2 1e3\nC1 2 0 1e-6 IC=0\n.TRAN 1e-2 100 BE 10\n";
        let parsed = parse(src).unwrap();
        assert_eq!(parsed.entries.len(), 3);
        assert_eq!(parsed.tran.n_substeps, 10);
    }

    #[test]
    fn parses_chua_pwl_netlist() {
        let src = "\
10
N0200 2 0 -2 1.1 -1 0.7 1 -0.7 2 -1.1
.TRAN 1000 0.1 BE 1 UIC
";
        let parsed = parse(src).unwrap();
        assert!(parsed.tran.uic);
        match &parsed.entries[0] {
            ParsedDevice::Pwl { v1, i4, .. } => {
                assert_eq!(*v1, -2.0);
                assert_eq!(*i4, -1.1);
            }
            _ => panic!("expected PWL device"),
        }
    }
}
