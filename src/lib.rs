//! @toon
//! purpose: Library crate root for gavel, a declarative command dispatcher. Command groups,
//!     commands and their parameters are described as data and registered once; a command
//!     line of the form `<group>.<command> -name=value target...` is then parsed, bound
//!     against that metadata and routed to the command's handler.
//!
//! when-editing:
//!     - !All public modules must be declared here with pub mod
//!     - Keep the re-export list organized by module
//!
//! invariants:
//!     - The registry is immutable once built; lookups never register anything lazily
//!     - Handlers only ever see fully bound, typed values
//!
//! gotchas:
//!     - lib.rs is separate from main.rs; the binary only wires config, logging and stdout

pub mod binder;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod formatter;
pub mod logging;
pub mod names;
pub mod parser;
pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use binder::{bind, BindError, BindOptions, BindWarning, Binder, BoundCall};
pub use cli::Cli;
pub use config::Config;
pub use dispatch::{DispatchError, Dispatcher, Outcome};
pub use formatter::{format_command_help, format_group_help, format_group_listing, HelpFormat};
pub use logging::{LevelControl, LogLevel};
pub use parser::parse;
pub use registry::{Registry, RegistryBuilder, RegistryError};
pub use types::{
    CommandCall, CommandDescriptor, CommandGroupDescriptor, EnumType, ParameterDescriptor,
    ScalarType, Value, ValueType,
};
