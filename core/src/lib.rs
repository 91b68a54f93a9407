//! # Storeflow Core
//!
//! Core traits and types for the Storeflow architecture.
//!
//! This crate provides the fundamental abstractions for building
//! unidirectional-data-flow applications: a synchronous reducer that
//! describes *what* should happen, and an executor that decides *how*.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (user intents and effect results)
//! - **Reducer**: Pure function `(State, Action) → (State, Commands)`
//! - **Command**: Plain data describing a side effect
//! - **Executor**: Turns commands into [`effect::Effect`] values, holding the
//!   injected capabilities (network clients, stores, ...)
//! - **Effect**: A runnable side effect whose results are fed back as actions
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Commands (no hidden I/O in reducers)
//! - Capabilities passed to executors by constructor
//!
//! ## Example
//!
//! ```
//! use storeflow_core::{reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//!     Save,
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum CounterCommand {
//!     Persist(i64),
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Command = CounterCommand;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!     ) -> SmallVec<[CounterCommand; 4]> {
//!         match action {
//!             CounterAction::Increment => {
//!                 state.count += 1;
//!                 SmallVec::new()
//!             },
//!             CounterAction::Save => smallvec![CounterCommand::Persist(state.count)],
//!         }
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let commands = CounterReducer.reduce(&mut state, CounterAction::Increment);
//! assert!(commands.is_empty());
//! let commands = CounterReducer.reduce(&mut state, CounterAction::Save);
//! assert_eq!(commands.as_slice(), &[CounterCommand::Persist(1)]);
//! ```

// Re-export commonly used types
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action) → (State, Commands)`
///
/// They contain all business logic and are deterministic and testable
/// without a runtime.
pub mod reducer {
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Command`: Side effect descriptions this reducer can request
    ///
    /// A reducer never performs I/O. Anything that touches the outside world
    /// is returned as a `Command` and carried out by a
    /// [`CommandExecutor`](crate::executor::CommandExecutor).
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The command type this reducer emits
        type Command;

        /// Reduce an action into state changes and commands
        ///
        /// This is a pure function that:
        /// 1. Updates state in place
        /// 2. Returns command descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        ///
        /// # Returns
        ///
        /// The commands to hand to the executor, in order. Most actions
        /// produce zero or one command, so the inline capacity is small.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
        ) -> SmallVec<[Self::Command; 4]>;
    }
}

/// Effect module - Runnable side effects
///
/// Effects are what a command becomes once an executor has bound it to a
/// concrete capability. The runtime drives them and feeds every action they
/// produce back into the reducer.
pub mod effect {
    use futures::Stream;
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - a side effect ready to be driven by the runtime
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially, each one finishing before the next starts
        Sequential(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Async stream of actions
        ///
        /// Every item is fed back into the reducer as it arrives.
        Stream(Pin<Box<dyn Stream<Item = Action> + Send>>),
    }

    // Manual Debug implementation since Future and Stream don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Stream(_) => write!(f, "Effect::Stream(<stream>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap an async computation
        #[must_use]
        pub fn future<F>(future: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(future))
        }

        /// Wrap a stream of actions
        #[must_use]
        pub fn stream<S>(stream: S) -> Self
        where
            S: Stream<Item = Action> + Send + 'static,
        {
            Effect::Stream(Box::pin(stream))
        }

        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Whether this effect does nothing when run
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().all(Effect::is_none)
                },
                Effect::Future(_) | Effect::Stream(_) => false,
            }
        }
    }
}

/// Executor module - Binding commands to capabilities
///
/// All external dependencies live behind an executor. The reducer stays
/// ignorant of them; tests can swap the executor without touching business
/// logic.
pub mod executor {
    use super::effect::Effect;

    /// Turns reducer commands into runnable effects
    ///
    /// # Examples
    ///
    /// ```
    /// use storeflow_core::{effect::Effect, executor::CommandExecutor};
    ///
    /// enum Command {
    ///     Ping,
    /// }
    ///
    /// #[derive(Debug)]
    /// enum Action {
    ///     Pong,
    /// }
    ///
    /// struct PingExecutor;
    ///
    /// impl CommandExecutor for PingExecutor {
    ///     type Command = Command;
    ///     type Action = Action;
    ///
    ///     fn execute(&self, command: Command) -> Effect<Action> {
    ///         match command {
    ///             Command::Ping => Effect::future(async { Some(Action::Pong) }),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait CommandExecutor {
        /// Commands this executor understands
        type Command;

        /// Actions produced by the effects it builds
        type Action;

        /// Build the effect for a single command
        ///
        /// This must not block: the returned effect is what performs the work.
        fn execute(&self, command: Self::Command) -> Effect<Self::Action>;
    }
}
