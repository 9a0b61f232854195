//! @dose
//! purpose: Explicit registration of command groups and the read-only index built from
//!     them. Groups are registered once at start-up, validated, and frozen into a
//!     `Registry` that answers case-insensitive lookups for the rest of the process.
//!
//! when-editing:
//!     - !Every validation rule lives in `build`; a built Registry is always consistent
//!     - !Duplicate effective names are registration errors, never silent shadowing
//!     - The process-wide instance is set at most once through `install`
//!
//! invariants:
//!     - `groups()` yields groups in registration order
//!     - Lookups are case-insensitive exact matches on effective names; no prefix matching
//!
//! flows:
//!     - Register: builder.register(group) for each group, then build()
//!     - Resolve: find_group(name), then group.find_command(name), or find_command(g, c)

use crate::names::{fold_key, DEFAULT_GROUP_SUFFIX};
use crate::types::{CommandDescriptor, CommandGroupDescriptor};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use thiserror::Error;

static GLOBAL: OnceCell<Registry> = OnceCell::new();

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Command group '{name}' is registered more than once")]
    DuplicateGroup { name: String },
    #[error("Command '{group}.{command}' is registered more than once")]
    DuplicateCommand { group: String, command: String },
    #[error("Parameter '{parameter}' is declared more than once on command '{command}'")]
    DuplicateParameter { command: String, parameter: String },
    #[error("Named parameter '{parameter}' on command '{command}' cannot be list-typed")]
    ListTypedNamedParameter { command: String, parameter: String },
    #[error("Command '{command}' declares more than one list-shaped target parameter")]
    MultipleTargetLists { command: String },
    #[error("Target parameter '{parameter}' on command '{command}' has an unsatisfiable range {min}..{}", .max.map(|m| m.to_string()).unwrap_or_else(|| "*".to_string()))]
    InvalidTargetRange {
        command: String,
        parameter: String,
        min: usize,
        max: Option<usize>,
    },
    #[error("Default value '{value}' does not fit parameter '{parameter}' on command '{command}'")]
    InvalidDefault {
        command: String,
        parameter: String,
        value: String,
    },
    #[error("Enumeration '{enum_name}' of parameter '{parameter}' on command '{command}' has no members")]
    EmptyEnum {
        command: String,
        parameter: String,
        enum_name: String,
    },
    #[error("A command registry has already been installed for this process")]
    AlreadyInstalled,
}

/// Collects group definitions before they are frozen into a [`Registry`].
#[derive(Debug)]
pub struct RegistryBuilder {
    suffix: String,
    groups: Vec<CommandGroupDescriptor>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_GROUP_SUFFIX.to_string(),
            groups: Vec::new(),
        }
    }
}

impl RegistryBuilder {
    /// Suffix stripped from group type names that carry no alias.
    pub fn group_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn register(mut self, group: CommandGroupDescriptor) -> Self {
        self.groups.push(group);
        self
    }

    pub fn register_all<I>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = CommandGroupDescriptor>,
    {
        self.groups.extend(groups);
        self
    }

    /// Validate every group, resolve names and defaults, and freeze the result.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut groups = self.groups;
        let mut index = HashMap::with_capacity(groups.len());

        for (i, group) in groups.iter_mut().enumerate() {
            group.finalize(&self.suffix)?;
            if index.insert(fold_key(group.name()), i).is_some() {
                return Err(RegistryError::DuplicateGroup {
                    name: group.name().to_string(),
                });
            }
            tracing::debug!(
                group = group.name(),
                commands = group.commands().len(),
                "registered command group"
            );
        }

        Ok(Registry { groups, index })
    }
}

/// Read-only index of every registered command group.
#[derive(Debug)]
pub struct Registry {
    groups: Vec<CommandGroupDescriptor>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// All groups, in registration order.
    pub fn groups(&self) -> &[CommandGroupDescriptor] {
        &self.groups
    }

    pub fn find_group(&self, name: &str) -> Option<&CommandGroupDescriptor> {
        self.index.get(&fold_key(name)).map(|&i| &self.groups[i])
    }

    pub fn find_command(
        &self,
        group: &str,
        command: &str,
    ) -> Option<(&CommandGroupDescriptor, &CommandDescriptor)> {
        let group = self.find_group(group)?;
        let command = group.find_command(command)?;
        Some((group, command))
    }
}

/// Make `registry` the process-wide instance. Fails if one is already set.
pub fn install(registry: Registry) -> Result<&'static Registry, RegistryError> {
    GLOBAL
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    GLOBAL.get().ok_or(RegistryError::AlreadyInstalled)
}

/// The process-wide registry, if one was installed.
pub fn global() -> Option<&'static Registry> {
    GLOBAL.get()
}
