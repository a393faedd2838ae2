// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Long-polling ingress, used when no public webhook URL is configured.

use crate::services::TelegramClient;
use crate::AppState;
use std::sync::Arc;
use std::time::Duration;

/// Server-side long-poll timeout for `getUpdates`.
const POLL_TIMEOUT_SECS: u64 = 30;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Capped exponential retry delay.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            current: initial,
        }
    }

    /// Delay to wait now; doubles the next one up to the cap.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(INITIAL_BACKOFF, MAX_BACKOFF)
    }
}

/// Remove any registered webhook, retrying until Telegram accepts.
///
/// `getUpdates` is refused while a webhook is set, so polling cannot
/// start before this succeeds.
pub async fn remove_webhook(telegram: &TelegramClient, backoff: &mut Backoff) {
    loop {
        match telegram.delete_webhook().await {
            Ok(()) => {
                backoff.reset();
                return;
            }
            Err(e) => {
                let delay = backoff.next_delay();
                tracing::warn!(
                    error = %e,
                    retry_in_ms = delay.as_millis() as u64,
                    "deleteWebhook failed"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Fetch updates forever, dispatching each on its own task.
///
/// Conversations are handled concurrently; the repository serializes
/// writes per collection.
pub async fn run_polling(state: Arc<AppState>) {
    let mut backoff = Backoff::default();
    remove_webhook(&state.telegram, &mut backoff).await;
    tracing::info!("Long polling started");

    let mut offset = 0i64;
    loop {
        match state.telegram.get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => {
                backoff.reset();
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    let state = state.clone();
                    tokio::spawn(async move {
                        crate::bot::handle_update(&state, update).await;
                    });
                }
            }
            Err(e) => {
                let delay = backoff.next_delay();
                tracing::warn!(
                    error = %e,
                    retry_in_secs = delay.as_secs(),
                    "getUpdates failed"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_to_cap_and_resets() {
        let mut backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(5));
        let delays: Vec<u64> = (0..5).map(|_| backoff.next_delay().as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 5, 5]);

        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_remove_webhook_retries_until_accepted() {
        let telegram = TelegramClient::new_mock();
        telegram.set_mock_failure(true);

        let task = {
            let telegram = telegram.clone();
            tokio::spawn(async move {
                let mut backoff =
                    Backoff::new(Duration::from_millis(5), Duration::from_millis(20));
                remove_webhook(&telegram, &mut backoff).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!task.is_finished());

        telegram.set_mock_failure(false);
        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .unwrap()
            .unwrap();
    }
}
