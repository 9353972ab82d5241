//! # Interpreter - Two-Stack Command Chain Engine
//!
//! Interprets the command chain against an in-memory JSON document.
//!
//! ## Core Principles
//!
//! 1. **Stack-driven execution**: working values live on a bounded Value Stack
//! 2. **Checkpoint/resume iteration**: `across` pushes a frame recording the
//!    stack watermark and the scan cursor; the driver rewinds to it and replays
//!    the rest of the chain once per element, innermost frame first
//! 3. **Centralized error policy**: handlers return `Result`, the driver decides
//!    between aborting and recovering with a placeholder
//! 4. **Pure executor**: no file or process handling, output goes to the
//!    writers it is given

pub mod commands;
pub mod errors;
pub mod exec_loop;
pub mod output;
pub mod stack;
pub mod types;
pub mod vm;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use errors::EngineError;
pub use exec_loop::{run_until_done, step, Step};
pub use types::{parse_chain, Chain, Command, Modifier, Op, Value};
pub use vm::VM;
