//! Text to value conversion for scalar parameter types.

use super::BindError;
use crate::names::eq_ignore_case;
use crate::types::{ScalarType, Value};

/// Convert one raw token into `ty`.
///
/// Booleans accept `true`/`false` in any case. Numbers use the invariant
/// format (`.` as decimal separator, no grouping). Enumerations match member
/// names ignoring case.
pub fn convert_scalar(ty: &ScalarType, raw: &str, parameter: &str) -> Result<Value, BindError> {
    let mismatch = || BindError::TypeConversionFailure {
        parameter: parameter.to_string(),
        expected: ty.type_name().to_string(),
        raw: raw.to_string(),
    };

    match ty {
        ScalarType::Str => Ok(Value::Str(raw.to_string())),
        ScalarType::Bool => {
            if eq_ignore_case(raw, "true") {
                Ok(Value::Bool(true))
            } else if eq_ignore_case(raw, "false") {
                Ok(Value::Bool(false))
            } else {
                Err(mismatch())
            }
        }
        ScalarType::Int => raw.parse::<i64>().map(Value::Int).map_err(|_| mismatch()),
        ScalarType::Float => match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Value::Float(f)),
            _ => Err(mismatch()),
        },
        ScalarType::Enum(e) => e.member(raw).ok_or_else(|| BindError::EnumParseFailure {
            parameter: parameter.to_string(),
            enum_name: e.name.clone(),
            raw: raw.to_string(),
            members: e.members.clone(),
        }),
    }
}
