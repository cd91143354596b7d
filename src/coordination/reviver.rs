//! Inactivity monitor.
//!
//! The reviver wakes on a fixed interval and, when the channel has been
//! silent for longer than the lookback window, invokes a [`ReviveHook`].
//! What "reviving" means (posting a nudge, asking a responder to speak up)
//! is entirely up to the hook.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::ReviverConfig;
use crate::coordination::state::ConversationState;
use crate::error::{Error, ReviveError};

/// Callback run when the channel has gone quiet.
#[async_trait]
pub trait ReviveHook: Send + Sync {
    async fn revive(&self) -> Result<(), Error>;
}

/// Result of a single wake-up.
#[derive(Debug, Clone, PartialEq)]
pub enum WakeOutcome {
    /// The channel was idle and the hook ran successfully.
    Revived,
    /// The channel saw activity within the lookback window.
    Active { idle_secs: f64 },
    /// The hook returned an error or panicked.
    HookFailed { reason: String },
}

/// Periodic inactivity check over the shared conversation state.
pub struct Reviver {
    state: Arc<ConversationState>,
    config: ReviverConfig,
    hook: Arc<dyn ReviveHook>,
}

impl Reviver {
    pub fn new(
        state: Arc<ConversationState>,
        config: ReviverConfig,
        hook: Arc<dyn ReviveHook>,
    ) -> Self {
        Self {
            state,
            config,
            hook,
        }
    }

    /// Run one inactivity check.
    pub async fn wake(&self) -> WakeOutcome {
        let idle_secs = self.state.idle_secs();
        if idle_secs <= self.config.lookback.as_secs_f64() {
            tracing::debug!(idle_secs, "Channel active, reviver idle");
            return WakeOutcome::Active { idle_secs };
        }

        tracing::info!(idle_secs, "Reviver triggered");

        // Run the hook on its own task so a panic stays contained.
        let hook = Arc::clone(&self.hook);
        let result = match tokio::spawn(async move { hook.revive().await }).await {
            Ok(result) => result,
            Err(join_err) => Err(ReviveError::Panicked(join_err.to_string()).into()),
        };

        match result {
            Ok(()) => WakeOutcome::Revived,
            Err(e) => {
                tracing::warn!(error = %e, "Revival hook failed");
                WakeOutcome::HookFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Start the periodic loop. It runs until `shutdown` fires or its sender
    /// is dropped.
    pub fn spawn(self, shutdown: oneshot::Receiver<()>) -> JoinHandle<()> {
        let interval = self.config.check_interval;
        tracing::info!(
            interval_secs = interval.as_secs(),
            lookback_secs = self.config.lookback.as_secs(),
            "Reviver started"
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut shutdown = std::pin::pin!(shutdown);
            // Skip immediate first tick
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // A hook still running at shutdown is left to finish on its own task.
                        tokio::select! {
                            _ = self.wake() => {}
                            _ = &mut shutdown => {
                                tracing::info!("Reviver stopped during revival");
                                break;
                            }
                        }
                    }
                    _ = &mut shutdown => {
                        tracing::info!("Reviver stopped");
                        break;
                    }
                }
            }
        })
    }
}
