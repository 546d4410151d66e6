pub mod config;
pub mod provider;
pub mod registration;

pub use config::*;
pub use provider::*;
pub use registration::*;
