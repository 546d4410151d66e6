pub mod health;
pub mod instance;
pub mod provider;

pub use health::*;
pub use instance::*;
pub use provider::*;
