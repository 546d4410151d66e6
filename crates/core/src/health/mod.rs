pub mod binder;
pub mod probe;
pub mod registry;

pub use binder::*;
pub use probe::*;
pub use registry::*;
