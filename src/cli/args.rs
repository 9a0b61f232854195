//! @dose
//! purpose: Process-level argument capture for the gavel binary. clap only collects the
//!     raw tokens; the `<group>.<command> -name=value target` grammar is parsed by
//!     `crate::parser` so framework switches like -help, -? and -log reach the dispatcher.
//!
//! when-editing:
//!     - !clap's own help and version flags stay disabled; -help belongs to the dispatcher
//!     - !Tokens are passed through verbatim and in order
//!
//! gotchas:
//!     - Both `-name` and `/name` switch styles must survive clap untouched

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "gavel")]
#[command(about = "Declarative command-group dispatcher")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// <group>[.<command>] followed by -switch[=value] and target arguments
    #[arg(
        value_name = "TOKENS",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub tokens: Vec<String>,
}
