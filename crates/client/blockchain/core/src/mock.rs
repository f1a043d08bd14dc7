//! Gateway wrapper for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::traits::{LedgerGateway, TransportError};
use crate::types::{CallDescriptor, ExecutionResult, GameId, OnChainGame};

/// Records every call before forwarding it to `inner`, and can simulate
/// dropped connections.
///
/// Injected failures happen after recording, so a resent call shows up
/// twice in [`calls`](Self::calls).
#[derive(Clone)]
pub struct RecordingLedger<G> {
    inner: G,
    calls: Arc<Mutex<Vec<CallDescriptor>>>,
    pending_failures: Arc<Mutex<usize>>,
}

impl<G: LedgerGateway> RecordingLedger<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            calls: Arc::new(Mutex::new(Vec::new())),
            pending_failures: Arc::new(Mutex::new(0)),
        }
    }

    /// Makes the next `count` calls fail with a network error.
    pub fn fail_next(&self, count: usize) {
        *self.pending_failures.lock().unwrap() = count;
    }

    pub fn calls(&self) -> Vec<CallDescriptor> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Calls whose function name is `function`.
    pub fn calls_to(&self, function: &str) -> Vec<CallDescriptor> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.function() == function)
            .cloned()
            .collect()
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: LedgerGateway> LedgerGateway for RecordingLedger<G> {
    async fn call(&self, call: CallDescriptor) -> Result<ExecutionResult, TransportError> {
        self.calls.lock().unwrap().push(call.clone());

        {
            let mut pending = self.pending_failures.lock().unwrap();
            if *pending > 0 {
                *pending -= 1;
                tracing::debug!(function = call.function(), remaining = *pending, "Dropping call");
                return Err(TransportError::Network("connection reset (simulated)".to_string()));
            }
        }

        self.inner.call(call).await
    }

    async fn query_game(&self, game: GameId) -> Result<Option<OnChainGame>, TransportError> {
        self.inner.query_game(game).await
    }
}
