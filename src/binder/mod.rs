//! @dose
//! purpose: Binds a resolved command's declared parameters to the arguments of a parsed
//!     call. Produces either one value per parameter, in declaration order, or the set of
//!     diagnostics explaining why the call cannot be made.
//!
//! when-editing:
//!     - !The value list must always match `command.parameters()` in length and order
//!     - !Only `was_mapped` flags on the call may change; descriptors are never touched
//!     - Targets are consumed left to right from one shared pool, in declaration order
//!
//! invariants:
//!     - Binding the same command and call twice yields the same values
//!     - A required named non-bool parameter without a matching argument always fails
//!     - A bool named parameter given as a bare switch binds to true
//!
//! do-not:
//!     - Never invoke the command from here; the dispatcher owns invocation
//!     - Never fall back to a default after a conversion failure
//!
//! gotchas:
//!     - Default mode stops at the first failing parameter; `collect_all` keeps going
//!     - Extra-target warnings do not fail the bind

mod convert;

pub use convert::convert_scalar;

use crate::types::{
    CommandCall, CommandDescriptor, ParameterDescriptor, ParameterKind, ScalarType,
    TargetParameter, Value, ValueType,
};
use thiserror::Error;

/// One reason a call could not be bound.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error("Failed to map parameter '{parameter}' to command '{command}'")]
    MissingRequiredArgument { command: String, parameter: String },
    #[error(
        "Parameter '{parameter}' of command '{command}' takes {} but {found} were supplied",
        range_text(*min, *max)
    )]
    TargetCountOutOfRange {
        command: String,
        parameter: String,
        min: usize,
        max: Option<usize>,
        found: usize,
    },
    #[error("Couldn't convert '{raw}' to {expected} for parameter '{parameter}'")]
    TypeConversionFailure {
        parameter: String,
        expected: String,
        raw: String,
    },
    #[error(
        "Couldn't parse enumerated value argument \"{enum_name}.{raw}\" for parameter '{parameter}' (one of: {})",
        members.join(", ")
    )]
    EnumParseFailure {
        parameter: String,
        enum_name: String,
        raw: String,
        members: Vec<String>,
    },
}

/// Non-fatal binding notes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindWarning {
    #[error("{ignored} extra target(s) will be ignored by parameter '{parameter}' of command '{command}'")]
    ExtraTargetsIgnored {
        command: String,
        parameter: String,
        ignored: usize,
    },
}

fn range_text(min: usize, max: Option<usize>) -> String {
    match max {
        None => format!("at least {} target(s)", min),
        Some(max) if max == min => format!("exactly {} target(s)", min),
        Some(max) => format!("between {} and {} targets", min, max),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BindOptions {
    /// Keep examining parameters after the first failure to report every problem.
    pub collect_all: bool,
}

/// Successful binding: values in parameter order plus any warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundCall {
    pub values: Vec<Value>,
    pub warnings: Vec<BindWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct Binder {
    options: BindOptions,
}

/// Bind with default options (stop at first failure).
pub fn bind(command: &CommandDescriptor, call: &mut CommandCall) -> Result<BoundCall, Vec<BindError>> {
    Binder::default().bind(command, call)
}

impl Binder {
    pub fn new(options: BindOptions) -> Self {
        Self { options }
    }

    pub fn bind(
        &self,
        command: &CommandDescriptor,
        call: &mut CommandCall,
    ) -> Result<BoundCall, Vec<BindError>> {
        let params = command.parameters();
        let mut values = Vec::with_capacity(params.len());
        let mut warnings = Vec::new();
        let mut errors = Vec::new();
        let mut cursor = 0;

        for (i, param) in params.iter().enumerate() {
            let result = match param.kind() {
                ParameterKind::Named(_) => bind_named(command, param, call),
                ParameterKind::Target(range) => {
                    let last_target = !params[i + 1..].iter().any(ParameterDescriptor::is_target);
                    let mut pool = TargetPool {
                        call: &mut *call,
                        cursor: &mut cursor,
                    };
                    bind_target(command, param, range, &mut pool, last_target, &mut warnings)
                }
            };

            match result {
                Ok(value) => {
                    tracing::trace!(parameter = param.effective_name(), value = %value, "bound parameter");
                    values.push(value);
                }
                Err(err) => {
                    tracing::debug!(command = %command.full_name(), error = %err, "binding failed");
                    errors.push(err);
                    if !self.options.collect_all {
                        break;
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(BoundCall { values, warnings })
        } else {
            Err(errors)
        }
    }
}

fn bind_named(
    command: &CommandDescriptor,
    param: &ParameterDescriptor,
    call: &mut CommandCall,
) -> Result<Value, BindError> {
    let element = param.value_type().element();

    if let Some(idx) = call.find_command_argument_index(param.effective_name()) {
        let raw = call.command_arguments[idx].value.clone();
        let bound = match raw {
            Some(raw) => Some(convert_scalar(element, &raw, param.effective_name())?),
            // A bare switch means "present" for booleans.
            None if *element == ScalarType::Bool => Some(Value::Bool(true)),
            None => None,
        };
        if let Some(value) = bound {
            call.command_arguments[idx].was_mapped = true;
            return Ok(value);
        }
    }

    if param.is_optional() {
        return Ok(default_for(param));
    }

    Err(BindError::MissingRequiredArgument {
        command: command.full_name(),
        parameter: param.effective_name().to_string(),
    })
}

/// Positional tokens not yet consumed by an earlier target parameter.
struct TargetPool<'a> {
    call: &'a mut CommandCall,
    cursor: &'a mut usize,
}

impl TargetPool<'_> {
    fn remaining(&self) -> usize {
        self.call.target_arguments.len() - *self.cursor
    }

    fn peek(&self) -> Option<&str> {
        self.call
            .target_arguments
            .get(*self.cursor)
            .map(|t| t.value.as_str())
    }

    fn take(&mut self, count: usize) {
        let end = *self.cursor + count;
        for target in &mut self.call.target_arguments[*self.cursor..end] {
            target.was_mapped = true;
        }
        *self.cursor = end;
    }
}

fn bind_target(
    command: &CommandDescriptor,
    param: &ParameterDescriptor,
    range: &TargetParameter,
    pool: &mut TargetPool<'_>,
    last_target: bool,
    warnings: &mut Vec<BindWarning>,
) -> Result<Value, BindError> {
    let remaining = pool.remaining();

    match param.value_type() {
        ValueType::List(element) => {
            let too_many = range.max_count.is_some_and(|max| remaining > max);
            if remaining < range.min_count || too_many {
                return Err(BindError::TargetCountOutOfRange {
                    command: command.full_name(),
                    parameter: param.effective_name().to_string(),
                    min: range.min_count,
                    max: range.max_count,
                    found: remaining,
                });
            }

            let items = pool.call.target_arguments[*pool.cursor..]
                .iter()
                .map(|t| convert_scalar(element, &t.value, param.effective_name()))
                .collect::<Result<Vec<_>, _>>()?;
            pool.take(remaining);
            Ok(Value::List(items))
        }
        ValueType::Scalar(element) => match pool.peek() {
            Some(raw) => {
                let value = convert_scalar(element, raw, param.effective_name())?;
                if remaining > 1 && last_target && !param.is_optional() {
                    warnings.push(BindWarning::ExtraTargetsIgnored {
                        command: command.full_name(),
                        parameter: param.effective_name().to_string(),
                        ignored: remaining - 1,
                    });
                }
                pool.take(1);
                Ok(value)
            }
            None if param.is_optional() => Ok(default_for(param)),
            None => Err(BindError::MissingRequiredArgument {
                command: command.full_name(),
                parameter: param.effective_name().to_string(),
            }),
        },
    }
}

fn default_for(param: &ParameterDescriptor) -> Value {
    param
        .default_value()
        .cloned()
        .unwrap_or_else(|| param.value_type().zero_value())
}
