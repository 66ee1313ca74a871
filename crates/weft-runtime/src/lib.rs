//! Weft runtime - stackless coroutine core
//!
//! This library provides the suspended-call frame stack underlying the
//! Weft coroutine runtime:
//! - Growable frame stack with per-frame typed slot windows
//! - Thread-scoped lookup for the stack of the currently running chain
//! - Coroutine driver (lifecycle, suspension signal, resume walk)
//!
//! Application code is transformed elsewhere into state machines that save
//! their live locals into the frame stack at suspension points; this crate
//! only provides the storage, bookkeeping, and driver those state machines
//! run against.

/// Weft runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod coroutine;
pub mod current;
pub mod stack;

// Re-export commonly used types
pub use coroutine::{
    Coroutine, CoroutineError, CoroutineId, CoroutineProto, CoroutineState, Entry, Suspend,
    DEFAULT_STACK_SIZE,
};
pub use current::SharedStack;
pub use stack::{FrameStack, SlotRef, StackError};
