//! @dose
//! purpose: Orchestrates one invocation end to end: parse tokens, honour the framework
//!     switches (-help, -?, -log), resolve group and command through the registry, bind
//!     parameters, and hand the bound values to the command's handler.
//!
//! when-editing:
//!     - !A command is invoked only after binding fully succeeded
//!     - !Any binding failure prints that command's help so the user sees correct usage
//!     - Handler errors are caught here and reported, never propagated as panics
//!
//! invariants:
//!     - The dispatcher never exits the process; callers map DispatchError to exit codes
//!     - An invalid -log value is reported and execution continues at the current level
//!
//! do-not:
//!     - Never retry a failed command
//!
//! flows:
//!     - Listing: no group or no command -> print all groups, or one group
//!     - Help: -help / -? with group.command -> print command usage
//!     - Execute: resolve -> bind -> log warnings and unused arguments -> invoke

use crate::binder::{BindError, BindOptions, BindWarning, Binder};
use crate::formatter::{
    format_command_help, format_command_help_json, format_group_listing,
    format_group_listing_json, HelpFormat,
};
use crate::logging::{LevelControl, LogLevel};
use crate::parser;
use crate::registry::Registry;
use crate::types::{
    CommandCall, CommandDescriptor, CommandGroupDescriptor, NamedArgument, TargetArgument,
};
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Help or a command listing was printed; nothing was invoked.
    HelpShown,
    /// The command ran to completion.
    Completed,
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Couldn't find command group '{0}'")]
    GroupNotFound(String),
    #[error("Couldn't find command \"{0}\"")]
    CommandNotFound(String),
    #[error("Couldn't bind arguments for command \"{command}\" ({} problem(s))", errors.len())]
    Binding {
        command: String,
        errors: Vec<BindError>,
    },
    #[error("Command \"{command}\" failed: {error:#}")]
    Invocation {
        command: String,
        error: anyhow::Error,
    },
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("Failed to render help: {0}")]
    Render(#[from] serde_json::Error),
}

/// Routes parsed calls to registered commands.
pub struct Dispatcher<'a> {
    registry: &'a Registry,
    binder: Binder,
    log: Option<&'a dyn LevelControl>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            binder: Binder::default(),
            log: None,
        }
    }

    pub fn with_bind_options(mut self, options: BindOptions) -> Self {
        self.binder = Binder::new(options);
        self
    }

    /// Let `-log=<Level>` adjust `log` at runtime.
    pub fn with_log_control(mut self, log: &'a dyn LevelControl) -> Self {
        self.log = Some(log);
        self
    }

    /// Parse `tokens` (program name excluded) and dispatch them. Help and
    /// messages meant for the user are written to `out`.
    pub fn run<S, W>(&self, tokens: &[S], out: &mut W) -> Result<Outcome, DispatchError>
    where
        S: AsRef<str>,
        W: Write,
    {
        let mut call = parser::parse(tokens);
        self.dispatch(&mut call, out)
    }

    pub fn dispatch<W: Write>(
        &self,
        call: &mut CommandCall,
        out: &mut W,
    ) -> Result<Outcome, DispatchError> {
        if let Some(log_arg) = call.find_framework_argument("log") {
            self.adjust_log_level(log_arg, out)?;
        }

        let help = call
            .find_framework_argument("help")
            .or_else(|| call.find_framework_argument("?"));
        let format = match help {
            Some(arg) => help_format(arg, out)?,
            None => HelpFormat::Text,
        };

        if call.is_listing_request() {
            self.write_listing(call.group_name.as_deref(), format, out)?;
            return Ok(Outcome::HelpShown);
        }

        let (group, command) = self.resolve(call)?;

        if help.is_some() {
            write_command_help(group, command, format, out)?;
            return Ok(Outcome::HelpShown);
        }

        self.execute(group, command, call, out)
    }

    fn resolve(
        &self,
        call: &CommandCall,
    ) -> Result<(&'a CommandGroupDescriptor, &'a CommandDescriptor), DispatchError> {
        let group_name = call.group_name.as_deref().unwrap_or_default();
        let registry: &'a Registry = self.registry;

        let Some(group) = registry.find_group(group_name) else {
            let err = DispatchError::GroupNotFound(group_name.to_string());
            tracing::error!("{}", err);
            return Err(err);
        };

        let command_name = call.command_name.as_deref().unwrap_or_default();
        let Some(command) = group.find_command(command_name) else {
            let err = DispatchError::CommandNotFound(call.full_command_name());
            tracing::error!("{}", err);
            return Err(err);
        };

        Ok((group, command))
    }

    fn execute<W: Write>(
        &self,
        group: &CommandGroupDescriptor,
        command: &CommandDescriptor,
        call: &mut CommandCall,
        out: &mut W,
    ) -> Result<Outcome, DispatchError> {
        let full_name = command.full_name();

        let bound = match self.binder.bind(command, call) {
            Ok(bound) => bound,
            Err(errors) => {
                for err in &errors {
                    tracing::error!("{}", err);
                }
                out.write_all(format_command_help(group, command).as_bytes())?;
                return Err(DispatchError::Binding {
                    command: full_name,
                    errors,
                });
            }
        };

        for warning in &bound.warnings {
            tracing::warn!("{}", warning);
        }
        for arg in call.unmapped_arguments() {
            tracing::warn!("Argument '{}' was not used by command \"{}\"", arg.name, full_name);
        }
        for target in unreported_targets(call, &bound.warnings) {
            tracing::warn!("Target '{}' was not used by command \"{}\"", target.value, full_name);
        }

        tracing::info!(command = %full_name, arguments = bound.values.len(), "invoking command");
        if let Err(error) = command.invoke(&bound.values) {
            tracing::error!(critical = true, "Command \"{}\" failed: {:#}", full_name, error);
            return Err(DispatchError::Invocation {
                command: full_name,
                error,
            });
        }

        Ok(Outcome::Completed)
    }

    fn write_listing<W: Write>(
        &self,
        filter: Option<&str>,
        format: HelpFormat,
        out: &mut W,
    ) -> Result<(), DispatchError> {
        let groups: Vec<&CommandGroupDescriptor> = match filter {
            Some(name) => match self.registry.find_group(name) {
                Some(group) => vec![group],
                None => {
                    let err = DispatchError::GroupNotFound(name.to_string());
                    tracing::error!("{}", err);
                    return Err(err);
                }
            },
            None => self.registry.groups().iter().collect(),
        };

        let text = match format {
            HelpFormat::Text => format_group_listing(groups),
            HelpFormat::Json => format_group_listing_json(groups)? + "\n",
        };
        out.write_all(text.as_bytes())?;
        Ok(())
    }

    fn adjust_log_level<W: Write>(
        &self,
        arg: &NamedArgument,
        out: &mut W,
    ) -> Result<(), DispatchError> {
        if let Some(Ok(level)) = arg.value.as_deref().map(str::parse::<LogLevel>) {
            match self.log {
                Some(control) => match control.set_level(level) {
                    Ok(()) => {
                        tracing::debug!(level = %level, "log level adjusted");
                        return Ok(());
                    }
                    Err(e) => tracing::warn!("Couldn't adjust log level: {:#}", e),
                },
                None => {
                    tracing::debug!(level = %level, "no log control installed; -log ignored");
                    return Ok(());
                }
            }
        }

        writeln!(
            out,
            "New log level '{}' is not valid. Can be one of: {}",
            arg.value.as_deref().unwrap_or_default(),
            LogLevel::names()
        )?;
        Ok(())
    }
}

/// Unmapped positional tokens not already counted by an extra-targets warning.
/// Ignored extras are always the tail of the target list.
fn unreported_targets<'c>(
    call: &'c CommandCall,
    warnings: &[BindWarning],
) -> Vec<&'c TargetArgument> {
    let counted: usize = warnings
        .iter()
        .map(|warning| match warning {
            BindWarning::ExtraTargetsIgnored { ignored, .. } => *ignored,
        })
        .sum();
    let mut unmapped: Vec<_> = call.unmapped_targets().collect();
    unmapped.truncate(unmapped.len().saturating_sub(counted));
    unmapped
}

fn help_format<W: Write>(arg: &NamedArgument, out: &mut W) -> Result<HelpFormat, DispatchError> {
    match HelpFormat::from_switch_value(arg.value.as_deref()) {
        Some(format) => Ok(format),
        None => {
            writeln!(
                out,
                "Help format '{}' is not valid. Can be one of: text, json",
                arg.value.as_deref().unwrap_or_default()
            )?;
            Ok(HelpFormat::Text)
        }
    }
}

fn write_command_help<W: Write>(
    group: &CommandGroupDescriptor,
    command: &CommandDescriptor,
    format: HelpFormat,
    out: &mut W,
) -> Result<(), DispatchError> {
    let text = match format {
        HelpFormat::Text => format_command_help(group, command),
        HelpFormat::Json => format_command_help_json(group, command)? + "\n",
    };
    out.write_all(text.as_bytes())?;
    Ok(())
}
