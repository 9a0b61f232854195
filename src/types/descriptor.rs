//! @dose
//! purpose: Immutable metadata describing command groups, commands and their parameters.
//!     Descriptors are assembled with builder methods at start-up, validated once by
//!     `RegistryBuilder::build`, and read-only for the rest of the process.
//!
//! when-editing:
//!     - !Effective defaults are resolved in `finalize`, never at bind time
//!     - !Parameter order is invocation order; never reorder `parameters`
//!     - Alias wins over the canonical name everywhere a name is matched
//!
//! invariants:
//!     - A named parameter is always scalar-typed
//!     - A command declares at most one list-shaped target parameter
//!     - Every optional parameter has `Some` effective default after finalize
//!
//! gotchas:
//!     - `default()` on a required parameter is validated but never used for binding
//!     - Enum defaults may be given as a member name string; finalize resolves them

use crate::names::{effective_name, eq_ignore_case, find_by_name, fold_key, strip_group_suffix};
use crate::registry::RegistryError;
use crate::types::value::{ScalarType, Value, ValueType};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Typed call-site for a command: receives bound values in parameter order.
pub type CommandHandler = Arc<dyn Fn(&[Value]) -> anyhow::Result<()> + Send + Sync>;

/// Binding rules for a `-name[=value]` parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedParameter {
    pub optional: bool,
}

/// Binding rules for a positional parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetParameter {
    pub min_count: usize,
    /// `None` means unbounded.
    pub max_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParameterKind {
    Named(NamedParameter),
    Target(TargetParameter),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    value_type: ValueType,
    #[serde(flatten)]
    kind: ParameterKind,
    #[serde(skip)]
    explicit_default: Option<Value>,
    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    effective_default: Option<Value>,
}

impl ParameterDescriptor {
    /// A named parameter: required, no default.
    pub fn new(name: impl Into<String>, value_type: impl Into<ValueType>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            description: None,
            value_type: value_type.into(),
            kind: ParameterKind::Named(NamedParameter { optional: false }),
            explicit_default: None,
            effective_default: None,
        }
    }

    /// A positional parameter consuming exactly one token.
    pub fn target(name: impl Into<String>, element: ScalarType) -> Self {
        Self {
            kind: ParameterKind::Target(TargetParameter {
                min_count: 1,
                max_count: Some(1),
            }),
            ..Self::new(name, ValueType::Scalar(element))
        }
    }

    /// A positional parameter collecting one or more tokens into a list.
    pub fn targets(name: impl Into<String>, element: ScalarType) -> Self {
        Self {
            kind: ParameterKind::Target(TargetParameter {
                min_count: 1,
                max_count: None,
            }),
            ..Self::new(name, ValueType::List(element))
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Named: may be omitted. Target: accepts zero tokens.
    pub fn optional(mut self) -> Self {
        match &mut self.kind {
            ParameterKind::Named(named) => named.optional = true,
            ParameterKind::Target(target) => target.min_count = 0,
        }
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.explicit_default = Some(value.into());
        self
    }

    pub fn min_count(mut self, min: usize) -> Self {
        if let ParameterKind::Target(target) = &mut self.kind {
            target.min_count = min;
        }
        self
    }

    pub fn max_count(mut self, max: usize) -> Self {
        if let ParameterKind::Target(target) = &mut self.kind {
            target.max_count = Some(max);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn effective_name(&self) -> &str {
        effective_name(self.alias.as_deref(), &self.name)
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    pub fn is_target(&self) -> bool {
        matches!(self.kind, ParameterKind::Target(_))
    }

    pub fn is_optional(&self) -> bool {
        match &self.kind {
            ParameterKind::Named(named) => named.optional,
            ParameterKind::Target(target) => target.min_count == 0,
        }
    }

    /// Value bound when the parameter is optional and nothing was supplied.
    pub fn default_value(&self) -> Option<&Value> {
        self.effective_default.as_ref()
    }

    fn finalize(&mut self, command: &str) -> Result<(), RegistryError> {
        let element = self.value_type.element();
        if let Some(e) = element.as_enum() {
            if e.members.is_empty() {
                return Err(RegistryError::EmptyEnum {
                    command: command.to_string(),
                    parameter: self.name.clone(),
                    enum_name: e.name.clone(),
                });
            }
        }

        let explicit = match &self.explicit_default {
            Some(value) if self.value_type.is_list() => {
                return Err(RegistryError::InvalidDefault {
                    command: command.to_string(),
                    parameter: self.name.clone(),
                    value: value.to_string(),
                });
            }
            Some(value) => Some(coerce_default(value, element).ok_or_else(|| {
                RegistryError::InvalidDefault {
                    command: command.to_string(),
                    parameter: self.name.clone(),
                    value: value.to_string(),
                }
            })?),
            None => None,
        };

        match &self.kind {
            ParameterKind::Named(_) if self.value_type.is_list() => {
                return Err(RegistryError::ListTypedNamedParameter {
                    command: command.to_string(),
                    parameter: self.name.clone(),
                });
            }
            ParameterKind::Target(target) => {
                let max_ok = match target.max_count {
                    Some(max) if self.value_type.is_list() => target.min_count <= max && max > 0,
                    Some(max) => max == 1 && target.min_count <= 1,
                    None => self.value_type.is_list(),
                };
                if !max_ok {
                    return Err(RegistryError::InvalidTargetRange {
                        command: command.to_string(),
                        parameter: self.name.clone(),
                        min: target.min_count,
                        max: target.max_count,
                    });
                }
            }
            ParameterKind::Named(_) => {}
        }

        self.effective_default = if self.is_optional() {
            Some(explicit.unwrap_or_else(|| self.value_type.zero_value()))
        } else {
            None
        };
        self.explicit_default = None;
        Ok(())
    }
}

/// Convert a registration-time default into the parameter's element type.
fn coerce_default(value: &Value, ty: &ScalarType) -> Option<Value> {
    match (ty, value) {
        (ScalarType::Bool, Value::Bool(_))
        | (ScalarType::Int, Value::Int(_))
        | (ScalarType::Float, Value::Float(_))
        | (ScalarType::Str, Value::Str(_))
        | (ScalarType::Str, Value::None) => Some(value.clone()),
        (ScalarType::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
        (ScalarType::Enum(e), Value::Str(name)) => e.member(name),
        (ScalarType::Enum(e), Value::Enum { member, .. }) => e.member(member),
        _ => None,
    }
}

/// One invocable operation.
#[derive(Clone, Serialize)]
pub struct CommandDescriptor {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    parameters: Vec<ParameterDescriptor>,
    #[serde(skip)]
    group: String,
    #[serde(skip)]
    handler: CommandHandler,
}

impl CommandDescriptor {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            alias: None,
            description: None,
            parameters: Vec::new(),
            group: String::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn param(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn effective_name(&self) -> &str {
        effective_name(self.alias.as_deref(), &self.name)
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Effective name of the owning group (empty until registered).
    pub fn group_name(&self) -> &str {
        &self.group
    }

    /// `<Group>.<command>` using effective names.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.group, self.effective_name())
    }

    /// Run the handler with values in parameter order.
    pub fn invoke(&self, values: &[Value]) -> anyhow::Result<()> {
        (self.handler)(values)
    }

    fn finalize(&mut self, group: &str) -> Result<(), RegistryError> {
        self.group = group.to_string();
        let full_name = self.full_name();

        let mut seen = HashSet::new();
        let mut list_targets = 0;
        for param in &mut self.parameters {
            param.finalize(&full_name)?;
            if param.is_target() {
                if param.value_type().is_list() {
                    list_targets += 1;
                }
            } else if !seen.insert(fold_key(param.effective_name())) {
                return Err(RegistryError::DuplicateParameter {
                    command: full_name,
                    parameter: param.effective_name().to_string(),
                });
            }
        }

        if list_targets > 1 {
            return Err(RegistryError::MultipleTargetLists { command: full_name });
        }
        Ok(())
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("group", &self.group)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// A named collection of related commands.
#[derive(Debug, Clone, Serialize)]
pub struct CommandGroupDescriptor {
    #[serde(rename = "name")]
    effective_name: String,
    type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    commands: Vec<CommandDescriptor>,
}

impl CommandGroupDescriptor {
    /// `type_name` is the defining type's name, e.g. `"WidgetCommands"`.
    pub fn new(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            effective_name: strip_group_suffix(&type_name, crate::names::DEFAULT_GROUP_SUFFIX)
                .to_string(),
            type_name,
            alias: None,
            description: None,
            commands: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        self.effective_name = alias.clone();
        self.alias = Some(alias);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn command(mut self, command: CommandDescriptor) -> Self {
        self.commands.push(command);
        self
    }

    /// Effective name used for lookup.
    pub fn name(&self) -> &str {
        &self.effective_name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    /// Case-insensitive lookup by effective command name.
    pub fn find_command(&self, name: &str) -> Option<&CommandDescriptor> {
        find_by_name(&self.commands, name, CommandDescriptor::effective_name)
    }

    pub(crate) fn finalize(&mut self, suffix: &str) -> Result<(), RegistryError> {
        self.effective_name = match &self.alias {
            Some(alias) => alias.clone(),
            None => strip_group_suffix(&self.type_name, suffix).to_string(),
        };

        for (i, command) in self.commands.iter().enumerate() {
            let clash = self.commands[..i]
                .iter()
                .any(|earlier| eq_ignore_case(earlier.effective_name(), command.effective_name()));
            if clash {
                return Err(RegistryError::DuplicateCommand {
                    group: self.effective_name.clone(),
                    command: command.effective_name().to_string(),
                });
            }
        }

        let group = self.effective_name.clone();
        for command in &mut self.commands {
            command.finalize(&group)?;
        }
        Ok(())
    }
}
