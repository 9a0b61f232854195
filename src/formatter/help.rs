//! @dose
//! purpose: Renders usage text for command groups and commands from registry metadata,
//!     either as tab-indented plain text or as pretty JSON of the descriptor tree.
//!
//! when-editing:
//!     - !Text layout is one line per command or parameter; tabs, not spaces, indent
//!     - Optional parameters carry the [opt] tag; required ones an equal-width blank
//!
//! invariants:
//!     - Group listings are sorted by effective name, ignoring case
//!     - String defaults are quoted; absent non-string defaults are omitted
//!     - Enum parameters always list every member name
//!
//! gotchas:
//!     - Target parameters render as [Targets <range>] instead of a /name switch

use crate::names::{eq_ignore_case, fold_key};
use crate::types::{
    CommandDescriptor, CommandGroupDescriptor, ParameterDescriptor, ParameterKind, ScalarType,
    TargetParameter, Value, ValueType,
};
use serde::Serialize;

const OPTIONAL_TAG: &str = "[opt]";
const REQUIRED_TAG: &str = "     ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HelpFormat {
    #[default]
    Text,
    Json,
}

impl HelpFormat {
    /// Interpret the value of a `-help=<format>` switch. A bare switch means text.
    pub fn from_switch_value(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(HelpFormat::Text),
            Some(v) if v.is_empty() || eq_ignore_case(v, "text") => Some(HelpFormat::Text),
            Some(v) if eq_ignore_case(v, "json") => Some(HelpFormat::Json),
            Some(_) => None,
        }
    }
}

/// Group header followed by one line per command, then a blank line.
pub fn format_group_help(group: &CommandGroupDescriptor) -> String {
    let mut lines = vec![format!(
        "{}{}",
        group.name(),
        dashed(group.description_text(), true)
    )];

    for command in group.commands() {
        lines.push(format!(
            "\t{}.{}{}",
            group.name(),
            command.effective_name(),
            dashed(command.description_text(), true)
        ));
    }

    lines.join("\n") + "\n\n"
}

/// Help for several groups, sorted by name.
pub fn format_group_listing<'a, I>(groups: I) -> String
where
    I: IntoIterator<Item = &'a CommandGroupDescriptor>,
{
    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_by_cached_key(|g| fold_key(g.name()));
    groups.into_iter().map(format_group_help).collect()
}

/// Usage for one command: header line, then one line per parameter.
pub fn format_command_help(group: &CommandGroupDescriptor, command: &CommandDescriptor) -> String {
    let mut lines = vec![format!(
        "{}.{} {}",
        group.name(),
        command.effective_name(),
        dashed(command.description_text(), false)
    )
    .trim_end()
    .to_string()];

    for param in command.parameters() {
        lines.extend(format_parameter(param));
    }

    lines.join("\n") + "\n"
}

fn format_parameter(param: &ParameterDescriptor) -> Vec<String> {
    let tag = if param.is_optional() {
        OPTIONAL_TAG
    } else {
        REQUIRED_TAG
    };
    let description = dashed(param.description_text(), false);

    match param.kind() {
        ParameterKind::Target(range) => vec![format!(
            "\t{} [Targets{}] {}",
            tag,
            range_text(range),
            description
        )
        .trim_end()
        .to_string()],
        ParameterKind::Named(_) => {
            let default = if param.is_optional() {
                default_text(param)
            } else {
                String::new()
            };
            let mut lines = vec![format!(
                "\t{} /{} {}\t{}",
                tag,
                param.effective_name(),
                description,
                default
            )
            .trim_end()
            .to_string()];
            if let Some(e) = param.value_type().element().as_enum() {
                lines.push(format!("\t\t(one of: {})", e.members.join(", ")));
            }
            lines
        }
    }
}

fn default_text(param: &ParameterDescriptor) -> String {
    let value = param.default_value().unwrap_or(&Value::None);
    match param.value_type() {
        ValueType::Scalar(ScalarType::Str) => format!("(default: \"{}\")", value),
        _ if value.is_none() => String::new(),
        _ => format!("(default: {})", value),
    }
}

fn range_text(range: &TargetParameter) -> String {
    match (range.min_count, range.max_count) {
        (0, None) => " (any number)".to_string(),
        (min, None) => format!(" (at least {})", min),
        (0, Some(max)) => format!(" (up to {})", max),
        (min, Some(max)) if min == max => format!(" (exactly {})", min),
        (min, Some(max)) => format!(" (between {}..{})", min, max),
    }
}

/// `" - text"` (leading space) or `"- text"`; empty when there is no text.
fn dashed(text: Option<&str>, leading_space: bool) -> String {
    match text {
        Some(t) if !t.is_empty() && leading_space => format!(" - {}", t),
        Some(t) if !t.is_empty() => format!("- {}", t),
        _ => String::new(),
    }
}

#[derive(Serialize)]
struct CommandHelp<'a> {
    group: &'a str,
    #[serde(flatten)]
    command: &'a CommandDescriptor,
}

pub fn format_command_help_json(
    group: &CommandGroupDescriptor,
    command: &CommandDescriptor,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CommandHelp {
        group: group.name(),
        command,
    })
}

pub fn format_group_listing_json<'a, I>(groups: I) -> Result<String, serde_json::Error>
where
    I: IntoIterator<Item = &'a CommandGroupDescriptor>,
{
    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_by_cached_key(|g| fold_key(g.name()));
    serde_json::to_string_pretty(&groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::types::EnumType;

    fn noop(_: &[Value]) -> anyhow::Result<()> {
        Ok(())
    }

    fn registry() -> Registry {
        Registry::builder()
            .register(
                CommandGroupDescriptor::new("WidgetCommands")
                    .description("Widget tools")
                    .command(
                        CommandDescriptor::new("spin", noop)
                            .description("Spin some widgets")
                            .param(
                                ParameterDescriptor::new("speed", ScalarType::Int)
                                    .optional()
                                    .default(1)
                                    .description("Revolutions per second"),
                            )
                            .param(
                                ParameterDescriptor::targets("files", ScalarType::Str)
                                    .min_count(0)
                                    .description("Widget files"),
                            ),
                    )
                    .command(CommandDescriptor::new("stop", noop)),
            )
            .register(
                CommandGroupDescriptor::new("TestCommands2")
                    .alias("Sermple")
                    .command(
                        CommandDescriptor::new("TestDefaultArgs", noop)
                            .alias("EchoDefault")
                            .param(
                                ParameterDescriptor::new("thing", ScalarType::Str)
                                    .alias("Text")
                                    .description("Text to echo back to you"),
                            )
                            .param(ParameterDescriptor::new("note", ScalarType::Str).optional())
                            .param(ParameterDescriptor::new("count", ScalarType::Int).optional())
                            .param(
                                ParameterDescriptor::new(
                                    "severity",
                                    ScalarType::Enum(EnumType::new(
                                        "Severity",
                                        ["Info", "Warning", "OhDearGod"],
                                    )),
                                )
                                .optional()
                                .default("OhDearGod"),
                            ),
                    ),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_group_help() {
        let registry = registry();
        let group = registry.find_group("widget").unwrap();
        assert_eq!(
            format_group_help(group),
            "Widget - Widget tools\n\tWidget.spin - Spin some widgets\n\tWidget.stop\n\n"
        );
    }

    #[test]
    fn test_group_listing_sorted() {
        let registry = registry();
        let listing = format_group_listing(registry.groups());
        let sermple = listing.find("Sermple").unwrap();
        let widget = listing.find("Widget - ").unwrap();
        assert!(sermple < widget);
        assert!(listing.contains("\tSermple.EchoDefault\n"));
    }

    #[test]
    fn test_command_help_named_and_targets() {
        let registry = registry();
        let (group, command) = registry.find_command("widget", "spin").unwrap();
        let help = format_command_help(group, command);
        let lines: Vec<_> = help.lines().collect();
        assert_eq!(lines[0], "Widget.spin - Spin some widgets");
        assert_eq!(
            lines[1],
            "\t[opt] /speed - Revolutions per second\t(default: 1)"
        );
        assert_eq!(lines[2], "\t[opt] [Targets (any number)] - Widget files");
    }

    #[test]
    fn test_command_help_defaults_and_enums() {
        let registry = registry();
        let (group, command) = registry.find_command("sermple", "echodefault").unwrap();
        let help = format_command_help(group, command);
        let lines: Vec<_> = help.lines().collect();
        assert_eq!(lines[0], "Sermple.EchoDefault");
        assert_eq!(lines[1], "\t      /Text - Text to echo back to you");
        assert_eq!(lines[2], "\t[opt] /note \t(default: \"\")");
        assert_eq!(lines[3], "\t[opt] /count \t(default: 0)");
        assert_eq!(lines[4], "\t[opt] /severity \t(default: OhDearGod)");
        assert_eq!(lines[5], "\t\t(one of: Info, Warning, OhDearGod)");
    }

    #[test]
    fn test_range_text() {
        let range = |min, max| TargetParameter {
            min_count: min,
            max_count: max,
        };
        assert_eq!(range_text(&range(0, None)), " (any number)");
        assert_eq!(range_text(&range(2, None)), " (at least 2)");
        assert_eq!(range_text(&range(0, Some(3))), " (up to 3)");
        assert_eq!(range_text(&range(1, Some(1))), " (exactly 1)");
        assert_eq!(range_text(&range(1, Some(4))), " (between 1..4)");
    }

    #[test]
    fn test_help_format_switch_values() {
        assert_eq!(HelpFormat::from_switch_value(None), Some(HelpFormat::Text));
        assert_eq!(
            HelpFormat::from_switch_value(Some("JSON")),
            Some(HelpFormat::Json)
        );
        assert_eq!(HelpFormat::from_switch_value(Some("yaml")), None);
    }

    #[test]
    fn test_command_help_json() {
        let registry = registry();
        let (group, command) = registry.find_command("widget", "spin").unwrap();
        let json = format_command_help_json(group, command).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["group"], "Widget");
        assert_eq!(parsed["name"], "spin");
        assert_eq!(parsed["parameters"][0]["kind"], "named");
        assert_eq!(parsed["parameters"][0]["default"], 1);
        assert_eq!(parsed["parameters"][1]["kind"], "target");
        assert_eq!(parsed["parameters"][1]["min_count"], 0);
        assert!(parsed["parameters"][1]["max_count"].is_null());
    }

    #[test]
    fn test_group_listing_json() {
        let registry = registry();
        let json = format_group_listing_json(registry.groups()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["name"], "Sermple");
        assert_eq!(parsed[1]["name"], "Widget");
        assert_eq!(parsed[1]["type_name"], "WidgetCommands");
    }
}
