//! Timer-based debounce with distinct-value suppression.
//!
//! A [`Debouncer`] owns a spawned task fed through an unbounded channel. Each
//! pushed value replaces the pending one and resets the quiet-window
//! deadline, so at most one emission is ever pending. When the deadline
//! passes the pending value is handed to the sink, unless it equals the last
//! value the sink received.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::trace;

/// Debouncing front end for a sink callback.
///
/// Dropping the debouncer stops the task; a pending value is discarded.
#[derive(Debug)]
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// Spawn the debounce task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(window: Duration, sink: impl Fn(T) + Send + 'static) -> Self {
        let (input, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(rx, window, sink));
        Self { input, task }
    }

    /// Submit a value. Returns `false` if the task has stopped.
    pub fn push(&self, value: T) -> bool {
        self.input.send(value).is_ok()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T>(mut rx: mpsc::UnboundedReceiver<T>, window: Duration, sink: impl Fn(T))
where
    T: Clone + PartialEq,
{
    let mut pending: Option<T> = None;
    let mut last_emitted: Option<T> = None;
    let mut deadline = Instant::now() + window;

    loop {
        tokio::select! {
            // New input always wins over an expiring deadline.
            biased;

            received = rx.recv() => match received {
                Some(value) => {
                    trace!("Debounce timer reset");
                    pending = Some(value);
                    deadline = Instant::now() + window;
                }
                None => break,
            },
            () = sleep_until(deadline), if pending.is_some() => {
                if let Some(value) = pending.take() {
                    if last_emitted.as_ref() == Some(&value) {
                        trace!("Suppressed repeated value");
                    } else {
                        last_emitted = Some(value.clone());
                        sink(value);
                    }
                }
            }
        }
    }
}
