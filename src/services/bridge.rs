// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Adapts the store's callback protocol into futures.
//!
//! Each bridged call gets its own [`QueryBridge`] state machine, owned by the
//! handler closure handed to the store. The caller awaits a [`PendingQuery`]
//! that resolves exactly once.

use crate::db::{CompletionHandler, Delivery, QueryHandler};
use crate::error::{AppError, Result};
use tokio::sync::oneshot;

/// How the store delivers results for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// One callback with the full result list or an error
    SingleShot,
    /// One or more batches, the last flagged `done`
    Incremental,
}

#[derive(Debug)]
enum BridgeState<T> {
    Pending,
    Accumulating(Vec<T>),
    Resolved,
    Rejected,
}

/// Per-call state machine behind a [`QueryHandler`].
pub struct QueryBridge<T> {
    mode: DeliveryMode,
    state: BridgeState<T>,
    sender: Option<oneshot::Sender<Result<Vec<T>>>>,
}

impl<T> QueryBridge<T> {
    fn new(mode: DeliveryMode, sender: oneshot::Sender<Result<Vec<T>>>) -> Self {
        Self {
            mode,
            state: BridgeState::Pending,
            sender: Some(sender),
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self.state, BridgeState::Resolved | BridgeState::Rejected)
    }

    /// Feed one store callback invocation into the state machine.
    pub fn on_delivery(&mut self, delivery: Delivery<T>) {
        if self.is_terminal() {
            tracing::warn!(
                mode = ?self.mode,
                state = ?self.state_name(),
                "Ignoring store delivery after terminal outcome"
            );
            return;
        }

        if let Some(error) = delivery.error {
            self.reject(AppError::Store(error));
            return;
        }

        match self.mode {
            DeliveryMode::SingleShot => match delivery.items {
                Some(items) => self.resolve(items),
                None => self.reject(AppError::EmptyResponse),
            },
            DeliveryMode::Incremental => {
                let mut buffer = match std::mem::replace(&mut self.state, BridgeState::Pending) {
                    BridgeState::Accumulating(buffer) => buffer,
                    _ => Vec::new(),
                };
                buffer.extend(delivery.items.unwrap_or_default());

                if delivery.done {
                    self.resolve(buffer);
                } else {
                    self.state = BridgeState::Accumulating(buffer);
                }
            }
        }
    }

    fn resolve(&mut self, items: Vec<T>) {
        self.state = BridgeState::Resolved;
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(Ok(items));
        }
    }

    /// Any accumulated batches are dropped.
    fn reject(&mut self, error: AppError) {
        self.state = BridgeState::Rejected;
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(Err(error));
        }
    }

    fn state_name(&self) -> &'static str {
        match self.state {
            BridgeState::Pending => "pending",
            BridgeState::Accumulating(_) => "accumulating",
            BridgeState::Resolved => "resolved",
            BridgeState::Rejected => "rejected",
        }
    }
}

/// Receiving side of a bridged query.
pub struct PendingQuery<T> {
    receiver: oneshot::Receiver<Result<Vec<T>>>,
}

impl<T> PendingQuery<T> {
    /// Wait for the terminal outcome.
    ///
    /// A store that drops the handler without a terminal delivery is treated
    /// as an empty response.
    pub async fn outcome(self) -> Result<Vec<T>> {
        self.receiver.await.unwrap_or(Err(AppError::EmptyResponse))
    }
}

/// Create a handler for the store and the future that observes it.
pub fn channel<T: Send + 'static>(mode: DeliveryMode) -> (QueryHandler<T>, PendingQuery<T>) {
    let (sender, receiver) = oneshot::channel();
    let mut bridge = QueryBridge::new(mode, sender);
    let handler: QueryHandler<T> = Box::new(move |delivery| bridge.on_delivery(delivery));
    (handler, PendingQuery { receiver })
}

/// Run a single-shot query. `start` must hand the handler to the store.
pub async fn single_shot<T, F>(start: F) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: FnOnce(QueryHandler<T>),
{
    let (handler, pending) = channel(DeliveryMode::SingleShot);
    start(handler);
    pending.outcome().await
}

/// Run an incremental query, accumulating every batch until `done`.
pub async fn incremental<T, F>(start: F) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: FnOnce(QueryHandler<T>),
{
    let (handler, pending) = channel(DeliveryMode::Incremental);
    start(handler);
    pending.outcome().await
}

/// Await a one-shot completion handler.
pub async fn completion<T, F>(start: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(CompletionHandler<T>),
{
    let (sender, receiver) = oneshot::channel();
    start(Box::new(move |result| {
        let _ = sender.send(result);
    }));

    match receiver.await {
        Ok(result) => result.map_err(AppError::Store),
        Err(_) => Err(AppError::EmptyResponse),
    }
}
