pub mod archive;
pub mod backup;
pub mod chain;
pub mod cli;
pub mod config;
pub mod error;
pub mod naming;
