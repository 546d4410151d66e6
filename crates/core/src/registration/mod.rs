pub mod context;
pub mod ledger;
pub mod registrar;
pub mod validator;

pub use context::*;
pub use ledger::*;
pub use registrar::*;
pub use validator::*;
