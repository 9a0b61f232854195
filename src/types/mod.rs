mod call;
mod descriptor;
mod value;

pub use call::*;
pub use descriptor::*;
pub use value::*;
