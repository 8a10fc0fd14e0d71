//! Terminal front end for the tax rate engine.

pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod render;
pub mod session;
pub mod state;
pub mod utils;

pub use app::{MessageType, Notice, TaxApp};
pub use config::ConsoleConfig;
