mod help;

pub use help::*;
