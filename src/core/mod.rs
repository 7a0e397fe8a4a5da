pub mod config;
pub mod error;
pub mod spacelift;
pub mod terminal;
