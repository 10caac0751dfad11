pub mod artifacts;
pub mod chain;
pub mod config;
pub mod constants;
pub mod deploy;
