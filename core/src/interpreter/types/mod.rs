//! Type definitions for the interpreter
//!
//! This module contains all the core types used by the engine:
//! - Runtime values (Value)
//! - Command chain (Command, Op, Modifier) and its parser
//! - Iteration frames (Frame, Cursor)

pub mod command;
pub mod frame;
pub mod values;

// Re-export all types for convenient access
pub use command::{parse_chain, Chain, Command, Modifier, Op};
pub use frame::{Cursor, Frame};
pub use values::{ArrayRef, Elements, Members, ObjectRef, Value};
