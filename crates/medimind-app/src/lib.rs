//! MediMind application library
//!
//! Command line parsing, configuration resolution and the interactive
//! front end around [`medimind_chat::Orchestrator`].

pub mod app;
pub mod cli;
pub mod config;
pub mod ocr;

pub use app::{run_command, run_repl_mode};
pub use cli::{Cli, Commands};
pub use config::{Config, API_KEY_PLACEHOLDER};
pub use ocr::TesseractExtractor;
