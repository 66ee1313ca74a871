//! Coroutine driver: lifecycle and suspension plumbing
//!
//! A [`Coroutine`] owns one frame stack and drives one suspendable call
//! chain through `New -> Running -> Suspended -> ... -> Finished`.
//! Transformed application code implements [`CoroutineProto`]; each call to
//! [`Coroutine::run`] executes it until it completes or suspends.
//!
//! Suspension is not an unwinding primitive: a suspendable function saves
//! its live locals into its reserved slot window and returns
//! `Err(Suspend)`, and every enclosing level propagates that with `?`
//! without popping its own frame.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::current;
use crate::current::SharedStack;
use crate::stack::{FrameStack, StackError};

/// Global coroutine ID counter
static COROUTINE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Slot capacity a coroutine's frame stack starts with unless configured
/// through [`Coroutine::with_stack_size`].
pub const DEFAULT_STACK_SIZE: usize = 16;

/// Identity of the coroutine a frame stack belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoroutineId(u64);

impl CoroutineId {
    /// Mint a process-unique id.
    pub fn fresh() -> Self {
        CoroutineId(COROUTINE_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CoroutineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "co-{}", self.0)
    }
}

/// The suspension signal.
///
/// Distinguished from any normal return value by the `Err` arm of a
/// `Result`; it means "this call did not complete, its state is saved,
/// propagate upward without popping".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suspend;

/// How a suspendable function is being entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Fresh call; execute from the top.
    Start,
    /// Re-entry during a resume walk; the prologue asks the stack for its
    /// jump-table offset via [`FrameStack::next_resume_step`].
    Resume,
}

/// Entry point of a suspendable call chain.
///
/// Implementations locate their frame stack via [`current::current`]; the
/// driver guarantees it is attached for the duration of `run`.
pub trait CoroutineProto {
    fn run(&mut self, entry: Entry) -> Result<(), Suspend>;
}

/// Coroutine lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoroutineState {
    /// Created, never run
    New,
    /// Executing on some thread right now
    Running,
    /// Suspended mid-chain; run again to resume
    Suspended,
    /// Completed; may not run again
    Finished,
}

/// Errors from coroutine construction and lifecycle
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoroutineError {
    /// `run` on a coroutine that already completed
    #[error("coroutine has already finished")]
    AlreadyFinished,
    /// `run` on a coroutine that is executing
    #[error("coroutine is already running")]
    AlreadyRunning,
    /// Frame stack construction failed
    #[error(transparent)]
    Stack(#[from] StackError),
}

/// A suspendable call chain and the frame stack that holds its state.
///
/// `Coroutine` is `Send`: a suspended coroutine may be moved to another
/// thread and resumed there. Ownership stays exclusive; nothing here makes
/// concurrent `run` calls on one coroutine safe, the single-owner rule is
/// the caller's to keep.
pub struct Coroutine {
    id: CoroutineId,
    state: CoroutineState,
    stack: SharedStack,
    proto: Box<dyn CoroutineProto + Send>,
}

impl Coroutine {
    /// Create a coroutine with the default stack capacity.
    pub fn new(proto: impl CoroutineProto + Send + 'static) -> Self {
        Self::with_stack_size(proto, DEFAULT_STACK_SIZE).expect("default stack size is positive")
    }

    /// Create a coroutine whose frame stack starts with `stack_size` slots.
    pub fn with_stack_size(
        proto: impl CoroutineProto + Send + 'static,
        stack_size: usize,
    ) -> Result<Self, CoroutineError> {
        let id = CoroutineId::fresh();
        let stack = FrameStack::new(id, stack_size)?;
        Ok(Self {
            id,
            state: CoroutineState::New,
            stack: Arc::new(Mutex::new(stack)),
            proto: Box::new(proto),
        })
    }

    pub fn id(&self) -> CoroutineId {
        self.id
    }

    pub fn state(&self) -> CoroutineState {
        self.state
    }

    pub fn is_suspended(&self) -> bool {
        self.state == CoroutineState::Suspended
    }

    pub fn is_finished(&self) -> bool {
        self.state == CoroutineState::Finished
    }

    /// Shared handle to this coroutine's frame stack.
    pub fn stack(&self) -> &SharedStack {
        &self.stack
    }

    /// Execute until the chain completes or suspends.
    ///
    /// Resets the walk cursor, attaches the stack to the calling thread,
    /// and enters the proto in `Start` or `Resume` mode depending on the
    /// prior state. The thread's previous stack binding is restored before
    /// returning, so coroutines may run coroutines.
    pub fn run(&mut self) -> Result<CoroutineState, CoroutineError> {
        let entry = match self.state {
            CoroutineState::New => Entry::Start,
            CoroutineState::Suspended => Entry::Resume,
            CoroutineState::Finished => return Err(CoroutineError::AlreadyFinished),
            CoroutineState::Running => return Err(CoroutineError::AlreadyRunning),
        };

        self.stack.lock().unwrap().reset_walk();
        self.state = CoroutineState::Running;

        let displaced = current::attach(Arc::clone(&self.stack));
        let outcome = self.proto.run(entry);
        match displaced {
            Some(outer) => {
                current::attach(outer);
            }
            None => {
                current::detach();
            }
        }

        self.state = match outcome {
            Ok(()) => CoroutineState::Finished,
            Err(Suspend) => CoroutineState::Suspended,
        };
        Ok(self.state)
    }
}

impl fmt::Debug for Coroutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coroutine")
            .field("id", &self.id)
            .field("state", &self.state)
            .finish()
    }
}
