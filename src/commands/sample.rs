//! Small demonstration groups: a greeting, a farewell and a couple of echo variants.

use super::argument;
use crate::types::{
    CommandDescriptor, CommandGroupDescriptor, EnumType, ParameterDescriptor, ScalarType, Value,
};
use anyhow::{Context, Result};

pub fn severity_type() -> EnumType {
    EnumType::new(
        "Severity",
        ["Info", "Warning", "Error", "Critical", "OhDearGod"],
    )
}

pub fn test_commands() -> CommandGroupDescriptor {
    CommandGroupDescriptor::new("TestCommands")
        .description("Sample test commands")
        .command(
            CommandDescriptor::new("HelloWorld", |_: &[Value]| {
                println!("Hello World!");
                Ok(())
            })
            .description("Prints \"Hello World\" to the console"),
        )
}

pub fn sample_commands() -> CommandGroupDescriptor {
    CommandGroupDescriptor::new("SampleCommands")
        .alias("Sermple")
        .description("Sample commands with aliases and defaults")
        .command(
            CommandDescriptor::new("Farewell", |_: &[Value]| {
                println!("Fare thee well!");
                Ok(())
            })
            .alias("Sayounara")
            .description("Prints a farewell to the console"),
        )
        .command(
            CommandDescriptor::new("Repeat", run_echo)
                .alias("Echo")
                .description("Prints what you tell it")
                .param(
                    ParameterDescriptor::new("message", ScalarType::Str)
                        .alias("Text")
                        .description("Text to echo back to you"),
                ),
        )
        .command(
            CommandDescriptor::new("RepeatWithDefaults", run_echo_default)
                .alias("EchoDefault")
                .description("Prints what you tell it with a default")
                .param(
                    ParameterDescriptor::new("message", ScalarType::Str)
                        .alias("Text")
                        .optional()
                        .default("This is default!")
                        .description("Text to echo back to you"),
                )
                .param(
                    ParameterDescriptor::new("Value", ScalarType::Int)
                        .optional()
                        .default(42)
                        .description("Never you mind!"),
                )
                .param(ParameterDescriptor::new("optionalString", ScalarType::Str).optional())
                .param(
                    ParameterDescriptor::new("severity", ScalarType::Enum(severity_type()))
                        .optional()
                        .default("OhDearGod")
                        .description("How loudly to echo"),
                ),
        )
}

fn run_echo(values: &[Value]) -> Result<()> {
    let text = argument(values, 0)?.as_str().context("Text must be a string")?;
    println!("{}", text);
    Ok(())
}

fn run_echo_default(values: &[Value]) -> Result<()> {
    println!("{}", echo_default_line(values)?);
    Ok(())
}

/// `[<severity>] <text>` plus the optional string when one was given.
pub fn echo_default_line(values: &[Value]) -> Result<String> {
    let text = argument(values, 0)?.as_str().unwrap_or_default();
    let value = argument(values, 1)?.as_int().context("Value must be an integer")?;
    let extra = argument(values, 2)?.as_str();
    let severity = argument(values, 3)?
        .as_enum()
        .context("severity must be a Severity")?;

    tracing::debug!(value, "echoing with defaults");
    Ok(match extra {
        Some(extra) => format!("[{}] {} ({})", severity, text, extra),
        None => format!("[{}] {}", severity, text),
    })
}
