//! Tests for the bounded Value Stack and Iteration Frame Stack

use crate::interpreter::errors::EngineError;
use crate::interpreter::stack::{FrameStack, ValueStack};
use crate::interpreter::types::{Cursor, Frame, Value};

fn frame(watermark: usize) -> Frame {
    let Value::Array(target) = Value::array(vec![Value::Null]) else {
        unreachable!("Value::array must build an array");
    };
    Frame {
        cursor: Cursor::Elements { target, next: 0 },
        watermark,
        resume_at: 0,
        complete: false,
    }
}

#[test]
fn test_push_pop_peek() {
    let mut stack = ValueStack::new(4);
    stack.push(Value::Integer(1)).unwrap();
    stack.push(Value::from("two")).unwrap();

    assert_eq!(stack.depth(), 2);
    assert_eq!(stack.peek().unwrap(), &Value::from("two"));
    assert_eq!(stack.peek_at(1).unwrap(), &Value::Integer(1));
    assert_eq!(stack.bottom(), Some(&Value::Integer(1)));

    assert_eq!(stack.pop().unwrap(), Value::from("two"));
    assert_eq!(stack.pop().unwrap(), Value::Integer(1));
    assert!(stack.is_empty());
}

#[test]
fn test_underflow() {
    let mut stack = ValueStack::new(4);
    assert!(matches!(stack.pop(), Err(EngineError::StackUnderflow)));
    assert!(matches!(stack.peek(), Err(EngineError::StackUnderflow)));

    stack.push(Value::Null).unwrap();
    assert!(matches!(stack.peek_at(1), Err(EngineError::StackUnderflow)));
}

#[test]
fn test_overflow_at_capacity() {
    let mut stack = ValueStack::new(2);
    stack.push(Value::Null).unwrap();
    stack.push(Value::Null).unwrap();
    assert!(matches!(stack.push(Value::Null), Err(EngineError::StackOverflow)));
    assert_eq!(stack.depth(), 2);
}

#[test]
fn test_truncate_to() {
    let mut stack = ValueStack::new(8);
    for i in 0..5i64 {
        stack.push(Value::Integer(i)).unwrap();
    }
    stack.truncate_to(2);
    assert_eq!(stack.depth(), 2);
    assert_eq!(stack.peek().unwrap(), &Value::Integer(1));

    // Truncating above the current depth leaves the stack alone
    stack.truncate_to(6);
    assert_eq!(stack.depth(), 2);
}

#[test]
fn test_frame_overflow() {
    let mut frames = FrameStack::new(2);
    frames.push(frame(0)).unwrap();
    frames.push(frame(1)).unwrap();
    assert!(matches!(frames.push(frame(2)), Err(EngineError::FrameOverflow)));
    assert_eq!(frames.len(), 2);
}

#[test]
fn test_frames_must_nest() {
    let mut frames = FrameStack::new(8);
    frames.push(frame(3)).unwrap();
    assert!(matches!(frames.push(frame(1)), Err(EngineError::StackUnderflow)));

    frames.push(frame(3)).unwrap();
    assert_eq!(frames.top().map(|f| f.watermark), Some(3));
    assert!(frames.pop().is_some());
    assert!(frames.pop().is_some());
    assert!(frames.is_empty());
}
