//! # Storeflow Testing
//!
//! Testing utilities and helpers for the Storeflow architecture.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`ScriptedExecutor`]: a command executor that records what it was asked
//!   to do and answers with canned actions
//! - Assertion helpers for command lists
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use storeflow_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(MainReducer::new())
//!     .given_state(MainState::default())
//!     .when_action(MainAction::ViewLoaded)
//!     .then_commands(|commands| assertions::assert_commands_count(commands, 1))
//!     .run();
//! ```


/// Mock implementations of runtime collaborators
pub mod mocks {
    use std::sync::{Arc, Mutex, PoisonError};
    use storeflow_core::{effect::Effect, executor::CommandExecutor};

    type Responder<C, A> = Arc<dyn Fn(&C) -> Option<A> + Send + Sync>;

    /// Command executor driven by a closure
    ///
    /// Every command is recorded. The responder decides which action, if any,
    /// the command's effect feeds back.
    ///
    /// # Example
    ///
    /// ```
    /// use storeflow_core::{effect::Effect, executor::CommandExecutor};
    /// use storeflow_testing::ScriptedExecutor;
    ///
    /// let executor = ScriptedExecutor::new(|n: &u32| Some(n * 2));
    /// let effect = executor.execute(21);
    /// assert!(matches!(effect, Effect::Future(_)));
    /// assert_eq!(executor.commands(), vec![21]);
    /// ```
    pub struct ScriptedExecutor<C, A> {
        recorded: Arc<Mutex<Vec<C>>>,
        responder: Responder<C, A>,
    }

    impl<C, A> ScriptedExecutor<C, A> {
        /// Create an executor answering each command with `responder`
        #[must_use]
        pub fn new<F>(responder: F) -> Self
        where
            F: Fn(&C) -> Option<A> + Send + Sync + 'static,
        {
            Self {
                recorded: Arc::new(Mutex::new(Vec::new())),
                responder: Arc::new(responder),
            }
        }

        /// Create an executor that records commands and never answers
        #[must_use]
        pub fn silent() -> Self {
            Self::new(|_| None)
        }

        /// Commands received so far, in order
        #[must_use]
        pub fn commands(&self) -> Vec<C>
        where
            C: Clone,
        {
            self.recorded
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl<C, A> Clone for ScriptedExecutor<C, A> {
        fn clone(&self) -> Self {
            Self {
                recorded: Arc::clone(&self.recorded),
                responder: Arc::clone(&self.responder),
            }
        }
    }

    impl<C, A> std::fmt::Debug for ScriptedExecutor<C, A> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            let recorded = self
                .recorded
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len();
            f.debug_struct("ScriptedExecutor")
                .field("recorded", &recorded)
                .finish_non_exhaustive()
        }
    }

    impl<C, A> CommandExecutor for ScriptedExecutor<C, A>
    where
        A: Send + 'static,
    {
        type Command = C;
        type Action = A;

        fn execute(&self, command: C) -> Effect<A> {
            let response = (self.responder)(&command);
            self.recorded
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(command);

            match response {
                Some(action) => Effect::future(async move { Some(action) }),
                None => Effect::None,
            }
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    use tracing_subscriber::EnvFilter;

    /// Install a test-friendly tracing subscriber
    ///
    /// Honours `RUST_LOG` and defaults to `warn`. Safe to call from every
    /// test; only the first call installs anything.
    pub fn init_test_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use mocks::ScriptedExecutor;
pub use reducer_test::{assertions, ReducerTest};
