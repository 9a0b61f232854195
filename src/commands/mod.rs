mod sample;
mod widget;

pub use sample::*;
pub use widget::*;

use crate::types::{CommandGroupDescriptor, Value};
use anyhow::{Context, Result};

/// Every command group the gavel binary ships with.
pub fn builtin_groups() -> Vec<CommandGroupDescriptor> {
    vec![test_commands(), sample_commands(), widget_commands()]
}

/// Bound value at `index`; the binder guarantees one value per parameter.
pub(crate) fn argument(values: &[Value], index: usize) -> Result<&Value> {
    values
        .get(index)
        .with_context(|| format!("missing bound argument #{}", index))
}
