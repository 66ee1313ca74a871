//! Thread-scoped lookup for the active frame stack
//!
//! Instrumented code has no stack reference threaded through its calls; it
//! finds the stack of the chain it is running on through this registry.
//! The coroutine driver attaches the stack before entering transformed code
//! and restores the previous binding when control returns, so coroutines
//! can nest.

use std::cell::RefCell;
use std::sync::{Arc, Mutex};

use crate::stack::FrameStack;

/// Shared handle to a coroutine's frame stack.
///
/// The mutex makes the sharing between driver and instrumented code safe;
/// it is never contended in correct usage, since at most one logical
/// execution mutates a stack at a time.
pub type SharedStack = Arc<Mutex<FrameStack>>;

thread_local! {
    static CURRENT: RefCell<Option<SharedStack>> = const { RefCell::new(None) };
}

/// Install `stack` as the calling thread's active frame stack.
///
/// Returns the handle that was attached before, if any; a driver running
/// inside another coroutine re-attaches it when it is done.
pub fn attach(stack: SharedStack) -> Option<SharedStack> {
    CURRENT.with(|slot| slot.borrow_mut().replace(stack))
}

/// Remove and return the calling thread's active frame stack.
pub fn detach() -> Option<SharedStack> {
    CURRENT.with(|slot| slot.borrow_mut().take())
}

/// The frame stack last attached on the calling thread.
///
/// `None` if no coroutine is running here; there is no implicit default.
pub fn current() -> Option<SharedStack> {
    CURRENT.with(|slot| slot.borrow().clone())
}
