//! # Storeflow Runtime
//!
//! Runtime implementation for the Storeflow architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Command dispatch**: Hands reducer commands to a [`CommandExecutor`]
//! - **Event Loop**: Manages the action → reducer → commands → effects → action feedback loop
//!
//! ## Example
//!
//! ```ignore
//! use storeflow_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, my_executor);
//!
//! // Send an action and wait for its effects to settle
//! let mut handle = store.send(Action::DoSomething).await?;
//! handle.wait().await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field.clone()).await;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use storeflow_core::{effect::Effect, executor::CommandExecutor, reducer::Reducer};
use tokio::sync::{RwLock, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for effects or for a terminal action
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        ///
        /// The action broadcast channel was closed, typically because the
        /// store is shutting down.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use storeflow_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(5));
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of feedback actions buffered for slow subscribers
    pub broadcast_capacity: usize,
    /// Default timeout for graceful shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize, default_shutdown_timeout: Duration) -> Self {
        Self {
            broadcast_capacity,
            default_shutdown_timeout,
        }
    }

    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting until the effects spawned
/// for that action have finished. An effect counts as finished once the
/// action it produced has itself been reduced.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // All effects from Action::Start are now complete
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new handle plus the tracking side used during execution
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    ///
    /// Useful for initialization in loops where you need a `last_handle`.
    #[must_use]
    pub fn completed() -> Self {
        let (handle, _tracking) = Self::new();
        handle
    }

    /// Number of effects still running for this handle
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            // All tracking dropped means nothing can still be running
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all
    /// effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, CommandExecutor, DecrementGuard,
        Duration, Effect, EffectHandle, EffectTracking, Ordering, Reducer, RwLock, StoreConfig,
        StoreError,
    };
    use futures::StreamExt;
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; only the reducer writes to it)
    /// 2. Reducer (business logic)
    /// 3. Executor (turns commands into effects using injected capabilities)
    /// 4. Effect execution (with feedback loop)
    ///
    /// # Type Parameters
    ///
    /// - `R`: Reducer implementation
    /// - `X`: Command executor for `R`'s commands
    ///
    /// Cloning a store is cheap and every clone shares the same state.
    pub struct Store<R, X>
    where
        R: Reducer,
    {
        state: Arc<RwLock<R::State>>,
        reducer: Arc<R>,
        executor: Arc<X>,
        config: StoreConfig,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Every action produced by an effect is broadcast here before it is
        /// reduced.
        action_broadcast: broadcast::Sender<R::Action>,
    }

    impl<R, X> Store<R, X>
    where
        R: Reducer + Send + Sync + 'static,
        R::State: Send + Sync + 'static,
        R::Action: Clone + Send + 'static,
        R::Command: Send,
        X: CommandExecutor<Command = R::Command, Action = R::Action> + Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and executor
        ///
        /// Uses [`StoreConfig::default()`].
        #[must_use]
        pub fn new(initial_state: R::State, reducer: R, executor: X) -> Self {
            Self::with_config(initial_state, reducer, executor, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        ///
        /// # Example
        ///
        /// ```ignore
        /// let config = StoreConfig::default().with_broadcast_capacity(256);
        /// let store = Store::with_config(MyState::default(), MyReducer, my_executor, config);
        /// ```
        #[must_use]
        pub fn with_config(
            initial_state: R::State,
            reducer: R,
            executor: X,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                executor: Arc::new(executor),
                config,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
            }
        }

        /// The configuration this store was built with
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// Number of effects currently running across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// This method:
        /// 1. Sets the shutdown flag (rejecting new actions)
        /// 2. Waits for pending effects to complete (with timeout)
        ///
        /// Effects already running are not cancelled, and the actions they
        /// produce are still reduced.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(
                        pending_effects = pending,
                        "Shutdown timeout: {} effects still running", pending
                    );
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Shut down using the configured default timeout
        ///
        /// # Errors
        ///
        /// See [`Store::shutdown`].
        pub async fn shutdown_default(&self) -> Result<(), StoreError> {
            self.shutdown(self.config.default_shutdown_timeout).await
        }

        /// Send an action to the store
        ///
        /// This is the primary way to interact with the store:
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action)
        /// 3. Hands every returned command to the executor
        /// 4. Runs the resulting effects asynchronously
        /// 5. Effects may produce more actions (feedback loop)
        ///
        /// # Concurrency
        ///
        /// - The reducer executes synchronously while holding the write lock,
        ///   so concurrent `send()` calls serialize at the reducer level
        /// - Effects execute in spawned tasks and may complete in any order
        /// - `send()` returns after starting effects, not after they finish;
        ///   use the returned [`EffectHandle`] to wait
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Panics
        ///
        /// If the reducer panics, the panic will propagate to the caller.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: R::Action) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            Ok(self.process(action, false).await)
        }

        /// Send an action and wait for a matching result action
        ///
        /// Designed for request-response use: subscribes to the action
        /// broadcast, sends the action, then returns the first feedback
        /// action matching `predicate`.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: Timeout expired before matching action received
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: R::Action,
            predicate: F,
            timeout: Duration,
        ) -> Result<R::Action, StoreError>
        where
            F: Fn(&R::Action) -> bool,
        {
            // Subscribe BEFORE sending to avoid race condition
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects
        ///
        /// Actions sent directly through [`Store::send`] are not broadcast.
        /// A lagging receiver skips old actions and gets
        /// [`broadcast::error::RecvError::Lagged`].
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<R::Action> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure to ensure the lock is released promptly:
        ///
        /// ```ignore
        /// let product_count = store.state(|s| s.products.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&R::State) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Reduce an effect-produced action, then broadcast it
        ///
        /// Not gated on shutdown: the producing effect is still counted in
        /// `pending_effects`, so shutdown waits for this reduction.
        async fn feed_back(&self, action: R::Action) {
            let _handle = self.process(action, true).await;
        }

        /// Reduce `action` and start the effects of its commands
        ///
        /// With `broadcast`, the action is published after the reducer ran and
        /// before the write lock is released, so subscribers never observe an
        /// action that state does not reflect yet.
        async fn process(&self, action: R::Action, broadcast: bool) -> EffectHandle {
            tracing::debug!("Processing action");
            metrics::counter!("store.commands.total").increment(1);

            let (handle, tracking) = EffectHandle::new();

            let commands = {
                let mut state = self.state.write().await;

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let published = broadcast.then(|| action.clone());
                let commands = self.reducer.reduce(&mut state, action);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} commands", commands.len());

                if let Some(action) = published {
                    let _ = self.action_broadcast.send(action);
                }
                commands
            };

            for command in commands {
                let effect = self.executor.execute(command);
                self.execute_effect(effect, &tracking);
            }

            handle
        }

        /// Execute an effect with tracking
        ///
        /// - `None`: No-op
        /// - `Future`: Awaits the computation, feeds back the action if `Some`
        /// - `Stream`: Feeds back every item as it arrives
        /// - `Parallel`: Executes effects concurrently
        /// - `Sequential`: Executes effects in order, waiting for each to complete
        ///
        /// A panicking effect is confined to its task; the guards keep the
        /// counters correct.
        #[tracing::instrument(skip(self, effect, tracking), name = "execute_effect")]
        fn execute_effect(&self, effect: Effect<R::Action>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let guards = self.track(tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guards = guards;

                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            store.feed_back(action).await;
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    });
                },
                Effect::Stream(mut stream) => {
                    tracing::trace!("Executing Effect::Stream");
                    metrics::counter!("store.effects.executed", "type" => "stream").increment(1);
                    let guards = self.track(tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guards = guards;
                        let mut items = 0_usize;

                        while let Some(action) = stream.next().await {
                            items += 1;
                            store.feed_back(action).await;
                        }
                        tracing::trace!(items, "Effect::Stream completed");
                    });
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);

                    for effect in effects {
                        self.execute_effect(effect, tracking);
                    }
                },
                Effect::Sequential(effects) => {
                    let effect_count = effects.len();
                    tracing::trace!("Executing Effect::Sequential with {} effects", effect_count);
                    metrics::counter!("store.effects.executed", "type" => "sequential")
                        .increment(1);
                    let guards = self.track(tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guards = guards;

                        for (idx, effect) in effects.into_iter().enumerate() {
                            tracing::trace!(
                                "Executing sequential effect {} of {}",
                                idx + 1,
                                effect_count
                            );

                            let (mut step, step_tracking) = EffectHandle::new();
                            store.execute_effect(effect, &step_tracking);
                            drop(step_tracking);
                            step.wait().await;
                        }
                        tracing::trace!("Effect::Sequential completed");
                    });
                },
            }
        }

        /// Register one running effect against both the caller's handle and
        /// the store-wide shutdown counter
        fn track(&self, tracking: &EffectTracking) -> (DecrementGuard, AtomicCounterGuard) {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);

            (
                DecrementGuard(tracking.clone()),
                AtomicCounterGuard(Arc::clone(&self.pending_effects)),
            )
        }
    }

    impl<R, X> Clone for Store<R, X>
    where
        R: Reducer,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                executor: Arc::clone(&self.executor),
                config: self.config.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }

    impl<R, X> std::fmt::Debug for Store<R, X>
    where
        R: Reducer,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("config", &self.config)
                .field("shutdown", &self.shutdown.load(Ordering::Acquire))
                .field("pending_effects", &self.pending_effects.load(Ordering::Acquire))
                .finish_non_exhaustive()
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use storeflow_core::{smallvec, SmallVec};

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
        ProduceEffect,
        ProduceParallelEffects,
        ProduceSequentialEffects,
        ProduceStream,
        ProduceSlowEffect,
        ProducePanickingEffect,
    }

    #[derive(Debug)]
    enum TestCommand {
        Emit(TestAction),
        EmitAll(Vec<TestAction>),
        EmitInOrder(Vec<TestAction>),
        Stream(Vec<TestAction>),
        Slow(Duration),
        Panic,
    }

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Command = TestCommand;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
        ) -> SmallVec<[Self::Command; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    SmallVec::new()
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    SmallVec::new()
                },
                TestAction::NoOp => SmallVec::new(),
                TestAction::ProduceEffect => smallvec![TestCommand::Emit(TestAction::Increment)],
                TestAction::ProduceParallelEffects => smallvec![TestCommand::EmitAll(vec![
                    TestAction::Increment,
                    TestAction::Increment,
                    TestAction::Increment,
                ])],
                TestAction::ProduceSequentialEffects => {
                    smallvec![TestCommand::EmitInOrder(vec![
                        TestAction::Increment,
                        TestAction::Increment,
                        TestAction::Decrement,
                    ])]
                },
                TestAction::ProduceStream => smallvec![TestCommand::Stream(vec![
                    TestAction::Increment,
                    TestAction::Increment,
                ])],
                TestAction::ProduceSlowEffect => {
                    smallvec![TestCommand::Slow(Duration::from_millis(200))]
                },
                TestAction::ProducePanickingEffect => smallvec![TestCommand::Panic],
            }
        }
    }

    struct TestExecutor;

    impl CommandExecutor for TestExecutor {
        type Command = TestCommand;
        type Action = TestAction;

        fn execute(&self, command: TestCommand) -> Effect<TestAction> {
            match command {
                TestCommand::Emit(action) => Effect::future(async move { Some(action) }),
                TestCommand::EmitAll(actions) => Effect::merge(
                    actions
                        .into_iter()
                        .map(|a| Effect::future(async move { Some(a) }))
                        .collect(),
                ),
                TestCommand::EmitInOrder(actions) => Effect::chain(
                    actions
                        .into_iter()
                        .map(|a| Effect::future(async move { Some(a) }))
                        .collect(),
                ),
                TestCommand::Stream(actions) => Effect::stream(futures::stream::iter(actions)),
                TestCommand::Slow(duration) => Effect::future(async move {
                    tokio::time::sleep(duration).await;
                    Some(TestAction::Increment)
                }),
                #[allow(clippy::panic)] // Intentional panic for testing error handling
                TestCommand::Panic => Effect::future(async {
                    panic!("Intentional panic in effect for testing");
                }),
            }
        }
    }

    fn store() -> Store<TestReducer, TestExecutor> {
        Store::new(TestState { value: 0 }, TestReducer, TestExecutor)
    }

    #[tokio::test]
    async fn test_store_creation() {
        let store = store();

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 0);
    }

    #[tokio::test]
    async fn test_send_action() {
        let store = store();

        let _ = store.send(TestAction::Increment).await;
        let value = store.state(|s| s.value).await;
        assert_eq!(value, 1);
    }

    #[tokio::test]
    async fn test_multiple_actions() {
        let store = store();

        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Decrement).await;

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 1);
    }

    #[tokio::test]
    async fn test_no_commands_completes_immediately() {
        let store = store();

        let handle = store.send(TestAction::NoOp).await;
        assert!(matches!(handle, Ok(ref h) if h.pending() == 0));
        let value = store.state(|s| s.value).await;
        assert_eq!(value, 0);
    }

    #[tokio::test]
    async fn test_effect_future_feeds_back() {
        let store = store();

        let Ok(mut handle) = store.send(TestAction::ProduceEffect).await else {
            unreachable!("store is running");
        };
        handle.wait().await;

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 1);
    }

    #[tokio::test]
    async fn test_effect_parallel() {
        let store = store();

        let Ok(mut handle) = store.send(TestAction::ProduceParallelEffects).await else {
            unreachable!("store is running");
        };
        handle.wait().await;

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 3);
    }

    #[tokio::test]
    async fn test_effect_sequential_preserves_order() {
        let store = store();
        let mut rx = store.subscribe_actions();

        let Ok(mut handle) = store.send(TestAction::ProduceSequentialEffects).await else {
            unreachable!("store is running");
        };
        handle.wait().await;

        let mut seen = Vec::new();
        while let Ok(action) = rx.try_recv() {
            seen.push(action);
        }
        assert_eq!(
            seen,
            vec![TestAction::Increment, TestAction::Increment, TestAction::Decrement]
        );
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_effect_stream() {
        let store = store();

        let Ok(mut handle) = store.send(TestAction::ProduceStream).await else {
            unreachable!("store is running");
        };
        handle.wait().await;

        assert_eq!(store.state(|s| s.value).await, 2);
    }

    #[tokio::test]
    async fn test_panicking_effect_does_not_halt_store() {
        let store = store();

        let Ok(mut handle) = store.send(TestAction::ProducePanickingEffect).await else {
            unreachable!("store is running");
        };
        assert!(handle.wait_with_timeout(Duration::from_secs(1)).await.is_ok());

        let _ = store.send(TestAction::Increment).await;
        assert_eq!(store.state(|s| s.value).await, 1);
        assert_eq!(store.pending_effects(), 0);
    }

    #[tokio::test]
    async fn test_wait_with_timeout_expires() {
        let store = store();

        let Ok(mut handle) = store.send(TestAction::ProduceSlowEffect).await else {
            unreachable!("store is running");
        };
        let result = handle.wait_with_timeout(Duration::from_millis(10)).await;
        assert_eq!(result, Err(StoreError::Timeout));
    }

    #[tokio::test]
    async fn test_send_and_wait_for() {
        let store = store();

        let result = store
            .send_and_wait_for(
                TestAction::ProduceEffect,
                |a| matches!(a, TestAction::Increment),
                Duration::from_secs(1),
            )
            .await;
        assert_eq!(result, Ok(TestAction::Increment));
    }

    #[tokio::test]
    async fn test_send_and_wait_for_times_out() {
        let store = store();

        let result = store
            .send_and_wait_for(
                TestAction::NoOp,
                |a| matches!(a, TestAction::Increment),
                Duration::from_millis(20),
            )
            .await;
        assert_eq!(result, Err(StoreError::Timeout));
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() {
        let store = store();

        assert_eq!(store.shutdown(Duration::from_secs(1)).await, Ok(()));
        let result = store.send(TestAction::Increment).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_running_effects() {
        let store = store();

        let _ = store.send(TestAction::ProduceSlowEffect).await;
        let result = store.shutdown(Duration::from_millis(20)).await;
        assert_eq!(result, Err(StoreError::ShutdownTimeout(1)));
    }

    #[tokio::test]
    async fn test_shutdown_still_reduces_feedback_of_running_effects() {
        let store = store();
        let mut rx = store.subscribe_actions();

        let _ = store.send(TestAction::ProduceSlowEffect).await;
        assert_eq!(store.shutdown(Duration::from_secs(2)).await, Ok(()));

        assert_eq!(store.state(|s| s.value).await, 1);
        assert_eq!(rx.try_recv(), Ok(TestAction::Increment));
    }

    #[tokio::test]
    async fn test_broadcast_action_is_already_reduced() {
        let store = store();
        let mut rx = store.subscribe_actions();

        let _ = store.send(TestAction::ProduceEffect).await;
        let received = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await;

        assert!(matches!(received, Ok(Ok(TestAction::Increment))));
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_completed_handle() {
        let mut handle = EffectHandle::completed();
        assert!(handle.wait_with_timeout(Duration::from_millis(10)).await.is_ok());
    }

    #[test]
    fn test_store_config_builders() {
        let config = StoreConfig::new(8, Duration::from_secs(1))
            .with_broadcast_capacity(32)
            .with_shutdown_timeout(Duration::from_secs(2));
        assert_eq!(config.broadcast_capacity, 32);
        assert_eq!(config.default_shutdown_timeout, Duration::from_secs(2));
    }
}
