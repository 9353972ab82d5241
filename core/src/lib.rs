pub mod cli;
pub mod config;
pub mod interpreter;
pub mod jsonp;

// Re-export main types
pub use config::Settings;
pub use interpreter::{parse_chain, run_until_done, EngineError, Value, VM};
