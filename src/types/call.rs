//! Parsed form of one command-line invocation.

use crate::names::eq_ignore_case;

/// A `-name`, `-name=value`, `/name` or `/name=value` token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NamedArgument {
    pub name: String,
    pub value: Option<String>,
    /// Set by the binder once a parameter consumed this argument.
    pub was_mapped: bool,
}

impl NamedArgument {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
            was_mapped: false,
        }
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

/// A bare positional token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetArgument {
    pub value: String,
    pub was_mapped: bool,
}

impl TargetArgument {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            was_mapped: false,
        }
    }
}

/// Structured call built once per invocation by [`crate::parser::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandCall {
    pub group_name: Option<String>,
    pub command_name: Option<String>,
    /// Switches reserved for the dispatcher itself (`help`, `?`, `log`).
    pub framework_arguments: Vec<NamedArgument>,
    pub command_arguments: Vec<NamedArgument>,
    pub target_arguments: Vec<TargetArgument>,
}

impl CommandCall {
    /// True when group or command is missing, which means "list commands".
    pub fn is_listing_request(&self) -> bool {
        self.group_name.is_none() || self.command_name.is_none()
    }

    pub fn full_command_name(&self) -> String {
        format!(
            "{}.{}",
            self.group_name.as_deref().unwrap_or_default(),
            self.command_name.as_deref().unwrap_or_default()
        )
    }

    pub fn find_framework_argument(&self, name: &str) -> Option<&NamedArgument> {
        self.framework_arguments
            .iter()
            .find(|arg| eq_ignore_case(&arg.name, name))
    }

    /// First command argument named `name`, ignoring case.
    pub fn find_command_argument(&self, name: &str) -> Option<&NamedArgument> {
        self.command_arguments
            .iter()
            .find(|arg| eq_ignore_case(&arg.name, name))
    }

    pub(crate) fn find_command_argument_index(&self, name: &str) -> Option<usize> {
        self.command_arguments
            .iter()
            .position(|arg| eq_ignore_case(&arg.name, name))
    }

    /// Command arguments no parameter consumed.
    pub fn unmapped_arguments(&self) -> impl Iterator<Item = &NamedArgument> {
        self.command_arguments.iter().filter(|arg| !arg.was_mapped)
    }

    pub fn unmapped_targets(&self) -> impl Iterator<Item = &TargetArgument> {
        self.target_arguments.iter().filter(|arg| !arg.was_mapped)
    }

    /// Clear all `was_mapped` flags so the call can be bound again.
    pub fn reset_mapping(&mut self) {
        for arg in &mut self.command_arguments {
            arg.was_mapped = false;
        }
        for target in &mut self.target_arguments {
            target.was_mapped = false;
        }
    }
}
