//! @dose
//! purpose: Turns raw command-line tokens into a `CommandCall`. The first token names
//!     the command as `<group>[.<command>]`; later tokens are switches (`-name[=value]`
//!     or `/name[=value]`) or bare positional targets.
//!
//! when-editing:
//!     - !Only the first `.` of the command token and the first `=` of a switch split
//!     - !Framework switches (help, ?, log) are routed away from command arguments
//!     - Names and values are trimmed after splitting
//!
//! invariants:
//!     - Parsing never fails; malformed input yields a call the dispatcher reports on
//!     - Target order is token order
//!
//! gotchas:
//!     - A leading switch means the call has no group; the token is parsed as a switch
//!     - `-` alone yields an argument with an empty name, not an error

use crate::names::eq_ignore_case;
use crate::types::{CommandCall, NamedArgument, TargetArgument};
use once_cell::sync::Lazy;
use regex::Regex;

/// Switch names consumed by the dispatcher rather than the command.
pub const FRAMEWORK_SWITCHES: [&str; 3] = ["help", "?", "log"];

static SWITCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^[-/](?P<name>[^=]*)(=(?P<value>.*))?$").expect("switch pattern is valid")
});

/// Parse a full token list (without the program name).
pub fn parse<S: AsRef<str>>(tokens: &[S]) -> CommandCall {
    let mut call = CommandCall::default();

    let mut rest = tokens.iter().map(AsRef::as_ref);
    let Some(first) = rest.next() else {
        return call;
    };

    match parse_switch(first) {
        Some(switch) => route_switch(&mut call, switch),
        None => {
            let (group, command) = match first.split_once('.') {
                Some((group, command)) => (group, Some(command)),
                None => (first, None),
            };
            call.group_name = Some(group.to_string());
            call.command_name = command.map(str::to_string);
        }
    }

    for token in rest {
        match parse_switch(token) {
            Some(switch) => route_switch(&mut call, switch),
            None => call.target_arguments.push(TargetArgument::new(token)),
        }
    }

    call
}

/// Parse one switch-shaped token, or `None` if the token is a bare target.
pub fn parse_switch(token: &str) -> Option<NamedArgument> {
    let caps = SWITCH.captures(token)?;
    let name = caps.name("name").map_or("", |m| m.as_str()).trim();
    let value = caps.name("value").map(|m| m.as_str().trim().to_string());
    Some(NamedArgument::new(name, value))
}

pub fn is_framework_switch(name: &str) -> bool {
    FRAMEWORK_SWITCHES
        .iter()
        .any(|reserved| eq_ignore_case(reserved, name))
}

fn route_switch(call: &mut CommandCall, switch: NamedArgument) {
    if is_framework_switch(&switch.name) {
        call.framework_arguments.push(switch);
    } else {
        call.command_arguments.push(switch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tokens() {
        let call = parse::<&str>(&[]);
        assert_eq!(call, CommandCall::default());
        assert!(call.is_listing_request());
    }

    #[test]
    fn test_group_and_command() {
        let call = parse(&["widget.spin"]);
        assert_eq!(call.group_name.as_deref(), Some("widget"));
        assert_eq!(call.command_name.as_deref(), Some("spin"));

        let call = parse(&["widget"]);
        assert_eq!(call.group_name.as_deref(), Some("widget"));
        assert!(call.command_name.is_none());

        // Only the first dot splits
        let call = parse(&["widget.spin.fast"]);
        assert_eq!(call.command_name.as_deref(), Some("spin.fast"));

        let call = parse(&["widget."]);
        assert_eq!(call.command_name.as_deref(), Some(""));
    }

    #[test]
    fn test_switch_with_value_is_trimmed() {
        let arg = parse_switch("-speed = 5 ").unwrap();
        assert_eq!(arg.name, "speed");
        assert_eq!(arg.value.as_deref(), Some("5"));
        assert!(arg.has_value());
        assert!(!arg.was_mapped);

        let arg = parse_switch("/ Name=  hello world  ").unwrap();
        assert_eq!(arg.name, "Name");
        assert_eq!(arg.value.as_deref(), Some("hello world"));
    }

    #[test]
    fn test_switch_without_value() {
        let arg = parse_switch("-verbose").unwrap();
        assert_eq!(arg.name, "verbose");
        assert!(!arg.has_value());

        let arg = parse_switch("/force").unwrap();
        assert_eq!(arg.name, "force");
        assert!(arg.value.is_none());
    }

    #[test]
    fn test_only_first_equals_splits() {
        let arg = parse_switch("-expr=a=b=c").unwrap();
        assert_eq!(arg.name, "expr");
        assert_eq!(arg.value.as_deref(), Some("a=b=c"));

        let arg = parse_switch("-empty=").unwrap();
        assert_eq!(arg.value.as_deref(), Some(""));
    }

    #[test]
    fn test_empty_switch_name() {
        let arg = parse_switch("-").unwrap();
        assert_eq!(arg.name, "");
        assert!(!arg.has_value());

        let arg = parse_switch("/=x").unwrap();
        assert_eq!(arg.name, "");
        assert_eq!(arg.value.as_deref(), Some("x"));
    }

    #[test]
    fn test_bare_tokens_are_not_switches() {
        assert!(parse_switch("foo.txt").is_none());
        assert!(parse_switch("a-b").is_none());
        assert!(parse_switch("").is_none());
    }

    #[test]
    fn test_value_may_span_lines() {
        let arg = parse_switch("-text=line one\nline two").unwrap();
        assert_eq!(arg.value.as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn test_framework_switches_routed() {
        let call = parse(&["widget.spin", "-HELP", "-?", "/log=Info", "-speed=5"]);
        let names: Vec<_> = call
            .framework_arguments
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["HELP", "?", "log"]);
        assert_eq!(call.command_arguments.len(), 1);
        assert_eq!(call.command_arguments[0].name, "speed");
    }

    #[test]
    fn test_targets_keep_order() {
        let call = parse(&["widget.spin", "b.txt", "-speed=5", "a.txt", "c.txt"]);
        let targets: Vec<_> = call
            .target_arguments
            .iter()
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(targets, vec!["b.txt", "a.txt", "c.txt"]);
        assert!(call.target_arguments.iter().all(|t| !t.was_mapped));
    }

    #[test]
    fn test_leading_switch_leaves_group_unset() {
        let call = parse(&["-help", "widget.spin"]);
        assert!(call.group_name.is_none());
        assert!(call.command_name.is_none());
        assert_eq!(call.framework_arguments.len(), 1);
        assert_eq!(call.target_arguments[0].value, "widget.spin");
    }

    #[test]
    fn test_accepts_owned_strings() {
        let tokens = vec!["widget.spin".to_string(), "-speed=5".to_string()];
        let call = parse(&tokens);
        assert_eq!(call.full_command_name(), "widget.spin");
    }
}
