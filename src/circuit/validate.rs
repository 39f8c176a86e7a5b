//! Circuit validation.

use crate::error::{Result, SimError};

use super::graph::MAX_VARIABLES;
use super::Circuit;

/// Validate a circuit before simulation. Node and `K` resolution already
/// happened during [`Circuit::from_parsed`]; this pass only checks the
/// remaining whole-circuit invariants that allocation can't catch locally.
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    if circuit.devices.is_empty() {
        return Err(SimError::ParseError {
            line: 0,
            message: "circuit has no devices".to_string(),
        });
    }

    if circuit.var_count() > MAX_VARIABLES {
        return Err(SimError::TooManyVariables {
            limit: MAX_VARIABLES,
        });
    }

    Ok(())
}
