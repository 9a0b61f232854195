use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn bin(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gavel"));
    cmd.current_dir(dir);
    cmd
}

fn run(dir: &Path, args: &[&str]) -> Output {
    bin(dir).args(args).output().expect("run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Golden test: verify exact output for a known command line
#[test]
fn e2e_spin_binds_named_and_targets() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(
        temp_dir.path(),
        &["widget.spin", "-speed=5", "foo.txt", "bar.txt"],
    );

    assert!(output.status.success(), "stderr:\n{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "Spinning 2 widget(s) at speed 5\n\tfoo.txt\n\tbar.txt\n"
    );
}

#[test]
fn e2e_names_are_case_insensitive() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(temp_dir.path(), &["WIDGET.Spin", "/SPEED=2"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "Spinning 0 widget(s) at speed 2\n");
}

#[test]
fn e2e_no_arguments_lists_all_groups() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(temp_dir.path(), &[]);

    assert!(output.status.success());
    let listing = stdout(&output);
    let sermple = listing.find("Sermple - ").expect("Sermple listed");
    let test = listing.find("Test - ").expect("Test listed");
    let widget = listing.find("Widget - ").expect("Widget listed");
    assert!(sermple < test && test < widget, "Got:\n{}", listing);
    assert!(listing.contains("\tSermple.Sayounara - "));
    assert!(listing.contains("\tWidget.inspect - "));
}

#[test]
fn e2e_group_only_lists_that_group() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(temp_dir.path(), &["test"]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "Test - Sample test commands\n\tTest.HelloWorld - Prints \"Hello World\" to the console\n\n"
    );
}

#[test]
fn e2e_alias_resolves_and_echoes() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(temp_dir.path(), &["Sermple.Echo", "-Text=hi"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "hi\n");
}

#[test]
fn e2e_echo_default_fills_defaults() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(temp_dir.path(), &["sermple.echodefault", "-severity=info"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "[Info] This is default!\n");
}

#[test]
fn e2e_missing_required_prints_help_and_fails() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(temp_dir.path(), &["sermple.echo"]);

    assert!(!output.status.success());
    assert_eq!(
        stdout(&output),
        "Sermple.Echo - Prints what you tell it\n\t      /Text - Text to echo back to you\n"
    );
    assert!(
        stderr(&output).contains("Failed to map parameter 'Text' to command 'Sermple.Echo'"),
        "stderr:\n{}",
        stderr(&output)
    );
}

#[test]
fn e2e_bad_conversion_fails() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(temp_dir.path(), &["widget.spin", "-speed=fast"]);

    assert!(!output.status.success());
    assert!(stdout(&output).starts_with("Widget.spin - "));
}

#[test]
fn e2e_unknown_group_fails() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(temp_dir.path(), &["nope.thing"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Couldn't find command group 'nope'"));
}

#[test]
fn e2e_unknown_command_fails() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(temp_dir.path(), &["widget.fold"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Couldn't find command \"widget.fold\""));
}

#[test]
fn e2e_help_switch_prints_command_usage() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(temp_dir.path(), &["widget.spin", "-?"]);

    assert!(output.status.success());
    let help = stdout(&output);
    assert!(help.starts_with("Widget.spin - Spins every widget file given\n"));
    assert!(help.contains("\t[opt] /speed - Revolutions per second\t(default: 1)\n"));
    assert!(help.contains("\t[opt] [Targets (any number)] - Widget files to spin\n"));
}

#[test]
fn e2e_help_json() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(temp_dir.path(), &["widget.inspect", "-help=json"]);

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(parsed["group"], "Widget");
    assert_eq!(parsed["name"], "inspect");
    assert_eq!(parsed["parameters"][0]["kind"], "target");
}

#[test]
fn e2e_invalid_log_level_reports_and_continues() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(temp_dir.path(), &["test.helloworld", "-log=bogus"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.starts_with("New log level 'bogus' is not valid. Can be one of: "));
    assert!(out.ends_with("Hello World!\n"), "Got:\n{}", out);
}

#[test]
fn e2e_log_switch_raises_verbosity() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(temp_dir.path(), &["widget.spin", "-log=warning", "-bogus=1"]);

    assert!(output.status.success());
    assert!(
        stderr(&output).contains("Argument 'bogus' was not used by command \"Widget.spin\""),
        "stderr:\n{}",
        stderr(&output)
    );
}

#[test]
fn e2e_config_sets_startup_level() {
    let temp_dir = TempDir::new().expect("temp dir");
    std::fs::write(
        temp_dir.path().join("gavel.toml"),
        "[logging]\nlevel = \"info\"\n",
    )
    .expect("write");

    let output = run(temp_dir.path(), &["test.helloworld"]);

    assert!(output.status.success());
    assert!(stderr(&output).contains("invoking command"));
}

#[test]
fn e2e_collect_all_reports_every_failure() {
    let temp_dir = TempDir::new().expect("temp dir");
    std::fs::write(
        temp_dir.path().join("gavel.toml"),
        "[binding]\ncollect_all_diagnostics = true\n",
    )
    .expect("write");

    let output = run(
        temp_dir.path(),
        &["sermple.echodefault", "-value=many", "-severity=loud"],
    );

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("many"), "stderr:\n{}", err);
    assert!(err.contains("loud"), "stderr:\n{}", err);
}

#[test]
fn e2e_critical_level_hides_binding_errors() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(temp_dir.path(), &["sermple.echo", "-log=critical"]);

    assert!(!output.status.success());
    assert!(
        !stderr(&output).contains("Failed to map parameter"),
        "stderr:\n{}",
        stderr(&output)
    );
}

#[test]
fn e2e_unused_targets_are_reported() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = run(
        temp_dir.path(),
        &["test.helloworld", "-log=warning", "stray.txt"],
    );

    assert!(output.status.success());
    assert!(
        stderr(&output).contains("Target 'stray.txt' was not used by command \"Test.HelloWorld\""),
        "stderr:\n{}",
        stderr(&output)
    );
}
