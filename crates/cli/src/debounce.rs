//! Timer-based coalescing of rapid search input.
//!
//! Every value received resets the timer; only the last value of a burst
//! is forwarded, once the input has been quiet for the debounce delay.
//! This bounds how often a new query key can reach the cache.

use std::time::Duration;

use tokio::sync::mpsc;

/// Delay between the last keystroke and the search it triggers.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Channel capacity for debounced output.
const OUTPUT_CAPACITY: usize = 16;

/// Spawn a task that debounces `input` by `delay`.
///
/// Consecutive equal values are forwarded only once. When `input` closes,
/// any pending value is flushed immediately and the output closes.
pub fn debounce<T>(mut input: mpsc::Receiver<T>, delay: Duration) -> mpsc::Receiver<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    let (tx, rx) = mpsc::channel(OUTPUT_CAPACITY);

    tokio::spawn(async move {
        let mut last_sent: Option<T> = None;

        while let Some(mut pending) = input.recv().await {
            let mut closed = false;
            loop {
                tokio::select! {
                    next = input.recv() => match next {
                        Some(value) => pending = value,
                        None => {
                            closed = true;
                            break;
                        }
                    },
                    _ = tokio::time::sleep(delay) => break,
                }
            }

            if last_sent.as_ref() != Some(&pending) {
                if tx.send(pending.clone()).await.is_err() {
                    return;
                }
                last_sent = Some(pending);
            }
            if closed {
                return;
            }
        }
    });

    rx
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
