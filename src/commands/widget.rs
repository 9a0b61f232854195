//! The Widget group: spins and inspects widget files.

use super::argument;
use crate::types::{CommandDescriptor, CommandGroupDescriptor, ParameterDescriptor, ScalarType, Value};
use anyhow::{Context, Result};

pub fn widget_commands() -> CommandGroupDescriptor {
    CommandGroupDescriptor::new("WidgetCommands")
        .description("Widget spinning and inspection")
        .command(
            CommandDescriptor::new("spin", run_spin)
                .description("Spins every widget file given")
                .param(
                    ParameterDescriptor::new("speed", ScalarType::Int)
                        .optional()
                        .default(1)
                        .description("Revolutions per second"),
                )
                .param(
                    ParameterDescriptor::targets("files", ScalarType::Str)
                        .min_count(0)
                        .description("Widget files to spin"),
                ),
        )
        .command(
            CommandDescriptor::new("inspect", run_inspect)
                .description("Describes a single widget file")
                .param(
                    ParameterDescriptor::target("file", ScalarType::Str)
                        .description("Widget file to inspect"),
                )
                .param(
                    ParameterDescriptor::new("verbose", ScalarType::Bool)
                        .optional()
                        .description("Include every detail"),
                ),
        )
}

fn run_spin(values: &[Value]) -> Result<()> {
    let speed = argument(values, 0)?.as_int().context("speed must be an integer")?;
    let files = argument(values, 1)?.as_list().context("files must be a list")?;
    print!("{}", spin_report(speed, files));
    Ok(())
}

fn run_inspect(values: &[Value]) -> Result<()> {
    let file = argument(values, 0)?.as_str().context("file must be a string")?;
    let verbose = argument(values, 1)?.as_bool().unwrap_or(false);
    if verbose {
        println!("Inspecting {} (verbose)", file);
    } else {
        println!("Inspecting {}", file);
    }
    Ok(())
}

/// One summary line, then one tab-indented line per file.
pub fn spin_report(speed: i64, files: &[Value]) -> String {
    let mut lines = vec![format!(
        "Spinning {} widget(s) at speed {}",
        files.len(),
        speed
    )];
    lines.extend(files.iter().map(|file| format!("\t{}", file)));
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spin_report() {
        let files = vec![Value::from("a.txt"), Value::from("b.txt")];
        assert_eq!(
            spin_report(3, &files),
            "Spinning 2 widget(s) at speed 3\n\ta.txt\n\tb.txt\n"
        );
        assert_eq!(spin_report(1, &[]), "Spinning 0 widget(s) at speed 1\n");
    }

    #[test]
    fn test_spin_handler_accepts_bound_values() {
        let values = vec![Value::Int(5), Value::List(vec![Value::from("foo.txt")])];
        assert!(run_spin(&values).is_ok());
        assert!(run_spin(&[Value::Int(5)]).is_err());
    }
}
