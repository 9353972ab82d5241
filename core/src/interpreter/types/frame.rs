//! Iteration frame types
//!
//! One frame exists per active `across` scope. It is the checkpoint the
//! driver rewinds to before replaying the rest of the chain for the next
//! element.

use super::values::{ArrayRef, ObjectRef};

/// Element cursor over the collection being iterated
#[derive(Debug, Clone)]
pub enum Cursor {
    /// Member cursor over an object, in member order
    Members { target: ObjectRef, next: usize },
    /// 0-based index cursor over an array
    Elements { target: ArrayRef, next: usize },
}

/// Saved interpreter checkpoint for one `across` scope
#[derive(Debug, Clone)]
pub struct Frame {
    pub cursor: Cursor,

    /// Value-Stack index of the collection itself; elements are pushed at
    /// `watermark + 1` and closing the frame truncates the stack to here
    pub watermark: usize,

    /// Chain index of the command following the `across`
    pub resume_at: usize,

    /// Set once the cursor has moved past the last element
    pub complete: bool,
}
