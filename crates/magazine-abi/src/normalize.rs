//! Converts alloy `DynSolValue` → `serde_json::Value`.
//!
//! Decoded field values end up in the graph store as JSON, so EVM ABI
//! types are mapped to JSON here. Integers that fit a JSON number are
//! emitted as numbers; larger ones as decimal strings.

use alloy_dyn_abi::DynSolValue;
use serde_json::Value;

/// Convert a decoded `DynSolValue` into a JSON value.
pub fn normalize(val: DynSolValue) -> Value {
    match val {
        DynSolValue::Bool(b) => Value::Bool(b),

        DynSolValue::Int(i, _bits) => match i128::try_from(i) {
            Ok(v) if v >= i64::MIN as i128 && v <= i64::MAX as i128 => {
                Value::from(v as i64)
            }
            _ => Value::String(i.to_string()),
        },

        DynSolValue::Uint(u, _bits) => match u128::try_from(u) {
            Ok(v) if v <= u64::MAX as u128 => Value::from(v as u64),
            _ => Value::String(u.to_string()),
        },

        DynSolValue::FixedBytes(word, size) => {
            Value::String(format!("0x{}", hex::encode(&word.as_slice()[..size])))
        }

        DynSolValue::Bytes(b) => Value::String(format!("0x{}", hex::encode(b))),

        DynSolValue::String(s) => Value::String(s),

        // Lowercase hex form; callers wanting EIP-55 can re-encode.
        DynSolValue::Address(a) => Value::String(format!("{a:#x}")),

        DynSolValue::Array(vals) | DynSolValue::FixedArray(vals) => {
            Value::Array(vals.into_iter().map(normalize).collect())
        }

        DynSolValue::Tuple(fields) => {
            Value::Array(fields.into_iter().map(normalize).collect())
        }

        // Function selectors — fall back to hex bytes
        DynSolValue::Function(f) => Value::String(format!("0x{}", hex::encode(f.to_vec()))),
    }
}
