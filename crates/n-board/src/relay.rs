// SPDX-License-Identifier: MIT
//
// Relay — carrying worker status to the board.
//
// Workers that run on other threads do not need a reference to the
// board. They get a `StatusSender` and write tagged messages into a
// channel; the coordinating thread drains the channel and hands each
// message to its target (the board, stdout, or nowhere).
//
//   worker ──tx──┐
//   worker ──tx──┼──▶ channel ──▶ Relay::drain ──▶ LineBoard::write
//   worker ──tx──┘
//
// The drain polls with `recv_timeout` so it notices completion even if
// some sender is still alive, the same hybrid event/tick shape a
// terminal input loop uses.
//
// `pool_map` puts the pieces together: scoped worker threads pull items
// from a shared queue, the calling thread drains status while they run,
// and results come back in input order.

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use n_term::sink::{Sink, StderrSink};
use tracing::{debug, trace};

use crate::board::LineBoard;
use crate::error::BoardError;
use crate::message;

/// How long the drain waits for a message before checking for completion.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

// ─── StatusSender ───────────────────────────────────────────────────────────

/// The producer end of a relay. Cheap to clone, one per worker.
#[derive(Debug, Clone)]
pub struct StatusSender {
    tx: Sender<String>,
}

impl StatusSender {
    /// Send a status message. Messages sent after the relay is gone are dropped.
    pub fn write(&self, message: impl Into<String>) {
        if self.tx.send(message.into()).is_err() {
            trace!("relay closed; status dropped");
        }
    }

    /// Send `payload` tagged for the row bound to `identifier`.
    pub fn write_tagged(&self, identifier: &str, payload: &str) {
        self.write(message::tag(identifier, payload));
    }
}

// ─── RelayTarget ────────────────────────────────────────────────────────────

/// Where drained messages go.
pub enum RelayTarget<'a, S: Sink = StderrSink> {
    /// Route tagged messages to their rows.
    Board(&'a LineBoard<S>),
    /// Print each message on its own line to stdout.
    Print,
    /// Drop messages.
    Discard,
}

impl<S: Sink> RelayTarget<'_, S> {
    fn deliver(&self, message: &str) -> Result<(), BoardError> {
        match self {
            Self::Board(board) => {
                board.write(message)?;
            }
            Self::Print => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{message}")?;
            }
            Self::Discard => {}
        }
        Ok(())
    }
}

// ─── Relay ──────────────────────────────────────────────────────────────────

/// The consumer end of a status channel.
#[derive(Debug)]
pub struct Relay {
    rx: Receiver<String>,
}

impl Relay {
    /// A new relay and the sender workers write into.
    #[must_use]
    pub fn new() -> (Self, StatusSender) {
        let (tx, rx) = mpsc::channel();
        (Self { rx }, StatusSender { tx })
    }

    /// Forward messages to `target` until the work is done.
    ///
    /// Stops when every sender is gone, or when a poll times out with
    /// `done()` reporting the batch complete. In the second case whatever
    /// is still queued is delivered before returning, so a worker's last
    /// message is never lost. Returns the number of messages received.
    ///
    /// # Errors
    ///
    /// I/O errors from the target.
    pub fn drain<S: Sink>(
        &self,
        done: impl Fn() -> bool,
        target: &RelayTarget<'_, S>,
    ) -> Result<usize, BoardError> {
        let mut received = 0;
        loop {
            match self.rx.recv_timeout(POLL_INTERVAL) {
                Ok(message) => {
                    target.deliver(&message)?;
                    received += 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    if done() {
                        while let Ok(message) = self.rx.try_recv() {
                            target.deliver(&message)?;
                            received += 1;
                        }
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!(received, "relay drained");
        Ok(received)
    }
}

// ─── Pool ───────────────────────────────────────────────────────────────────

/// Settings for [`pool_map`]. Status goes to stdout unless routed to a
/// board or discarded.
pub struct PoolOptions<'a, S: Sink = StderrSink> {
    /// Worker threads; `None` uses the available parallelism.
    pub concurrency: Option<usize>,
    pub target: RelayTarget<'a, S>,
}

impl Default for PoolOptions<'_> {
    fn default() -> Self {
        Self {
            concurrency: None,
            target: RelayTarget::Print,
        }
    }
}

impl PoolOptions<'_> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Sink> PoolOptions<'_, S> {
    #[must_use]
    pub const fn concurrency(mut self, workers: usize) -> Self {
        self.concurrency = Some(workers);
        self
    }

    /// Route worker status to `board`.
    #[must_use]
    pub fn on_board<'b, T: Sink>(self, board: &'b LineBoard<T>) -> PoolOptions<'b, T> {
        PoolOptions {
            concurrency: self.concurrency,
            target: RelayTarget::Board(board),
        }
    }

    /// Print worker status to stdout.
    #[must_use]
    pub fn print(self) -> Self {
        Self {
            target: RelayTarget::Print,
            ..self
        }
    }

    /// Drop worker status.
    #[must_use]
    pub fn discard(self) -> Self {
        Self {
            target: RelayTarget::Discard,
            ..self
        }
    }

    /// Validate the requested worker count against `available` cores.
    fn worker_count(&self, available: usize) -> Result<usize, BoardError> {
        match self.concurrency {
            None => Ok(available),
            Some(requested) if requested > 0 && requested <= available => Ok(requested),
            Some(requested) => Err(BoardError::InvalidConcurrency {
                requested,
                available,
            }),
        }
    }
}

/// Cores the pool may use.
#[must_use]
pub fn available_parallelism() -> usize {
    thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Counts an item as finished when dropped, even if its worker panicked.
struct FinishGuard<'a>(&'a AtomicUsize);

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::Release);
    }
}

/// Apply `f` to every item on a pool of worker threads.
///
/// Each call gets a [`StatusSender`]; its messages are drained into
/// `options.target` on the calling thread while the workers run.
/// Results are returned in the order of `items`. A panic in `f` is
/// re-raised on the calling thread once every worker has stopped.
///
/// # Errors
///
/// [`BoardError::InvalidConcurrency`] when the requested worker count is
/// zero or exceeds the available parallelism; I/O errors from the target.
///
/// # Panics
///
/// Re-raises the first panic raised by `f`.
pub fn pool_map<T, R, F, S>(
    items: Vec<T>,
    f: F,
    options: PoolOptions<'_, S>,
) -> Result<Vec<R>, BoardError>
where
    T: Send,
    R: Send,
    F: Fn(T, &StatusSender) -> R + Sync,
    S: Sink,
{
    let workers = options.worker_count(available_parallelism())?;
    let total = items.len();
    if total == 0 {
        return Ok(Vec::new());
    }
    let workers = workers.min(total);
    debug!(workers, items = total, "starting pool");

    let queue = Mutex::new(items.into_iter().enumerate());
    let results = Mutex::new(Vec::with_capacity(total));
    let finished = AtomicUsize::new(0);
    let (relay, status) = Relay::new();

    let drained = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let status = status.clone();
                let (queue, results, finished, f) = (&queue, &results, &finished, &f);
                scope.spawn(move || {
                    loop {
                        let next = queue
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .next();
                        let Some((index, item)) = next else { break };
                        let _finish = FinishGuard(finished);
                        let result = f(item, &status);
                        results
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push((index, result));
                    }
                })
            })
            .collect();
        drop(status);

        let drained = relay.drain(
            || finished.load(Ordering::Acquire) == total,
            &options.target,
        );

        let mut panicked = None;
        for handle in handles {
            if let Err(payload) = handle.join() {
                panicked.get_or_insert(payload);
            }
        }
        if let Some(payload) = panicked {
            panic::resume_unwind(payload);
        }
        drained
    })?;
    debug!(drained, "pool finished");

    let mut results = results.into_inner().unwrap_or_else(PoisonError::into_inner);
    results.sort_unstable_by_key(|&(index, _)| index);
    Ok(results.into_iter().map(|(_, result)| result).collect())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::BoardOptions;
    use n_term::sink::MemorySink;
    use pretty_assertions::assert_eq;

    // ── Relay ───────────────────────────────────────────────────────────

    #[test]
    fn drain_stops_when_senders_are_gone() {
        let (relay, status) = Relay::new();
        status.write("a");
        status.write("b");
        drop(status);
        let received = relay.drain(|| false, &RelayTarget::<StderrSink>::Discard).unwrap();
        assert_eq!(received, 2);
    }

    #[test]
    fn drain_stops_when_done_even_with_live_sender() {
        let (relay, status) = Relay::new();
        status.write("only");
        let received = relay.drain(|| true, &RelayTarget::<StderrSink>::Discard).unwrap();
        assert_eq!(received, 1);
        drop(status);
    }

    #[test]
    fn last_message_before_done_is_delivered() {
        let options = BoardOptions::identifiers(["a"]).announce_deferred(false);
        let board = LineBoard::new(options, MemorySink::detached()).unwrap();
        let (relay, status) = Relay::new();
        let done = || {
            status.write("a-> final");
            true
        };

        let received = relay.drain(done, &RelayTarget::Board(&board)).unwrap();
        assert_eq!(received, 1);
        assert_eq!(board.get(0).as_deref(), Some("final"));
    }

    #[test]
    fn print_target_counts_messages() {
        let (relay, status) = Relay::new();
        status.write("to stdout");
        drop(status);
        let received = relay.drain(|| false, &RelayTarget::<StderrSink>::Print).unwrap();
        assert_eq!(received, 1);
    }

    #[test]
    fn sending_after_relay_is_gone_is_ignored() {
        let (relay, status) = Relay::new();
        drop(relay);
        status.write("nobody listens");
    }

    #[test]
    fn drain_routes_to_board() {
        let options = BoardOptions::identifiers(["a", "b"]).announce_deferred(false);
        let board = LineBoard::new(options, MemorySink::detached()).unwrap();
        let (relay, status) = Relay::new();
        status.write_tagged("b", "second");
        status.write("untagged noise");
        status.write("a-> first");
        drop(status);

        let received = relay.drain(|| false, &RelayTarget::Board(&board)).unwrap();
        assert_eq!(received, 3);
        assert_eq!(board.snapshot(), vec!["first", "second"]);
    }

    // ── Pool ────────────────────────────────────────────────────────────

    #[test]
    fn status_is_printed_by_default() {
        assert!(matches!(PoolOptions::new().target, RelayTarget::Print));
        assert!(matches!(PoolOptions::new().discard().target, RelayTarget::Discard));
        assert!(matches!(PoolOptions::new().discard().print().target, RelayTarget::Print));
    }

    #[test]
    fn default_pool_prints_worker_status() {
        let out = pool_map(
            vec![1, 2],
            |n: i32, status| {
                status.write(format!("item {n} done"));
                n
            },
            PoolOptions::new(),
        )
        .unwrap();
        assert_eq!(out, vec![1, 2]);
    }

    #[test]
    fn results_keep_input_order() {
        let items: Vec<u64> = (0..64).collect();
        let doubled = pool_map(items, |n, _| n * 2, PoolOptions::new().concurrency(1).discard()).unwrap();
        assert_eq!(doubled, (0..64).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[test]
    fn default_concurrency_uses_all_cores() {
        let items: Vec<usize> = (0..16).collect();
        let out = pool_map(items, |n, _| n + 1, PoolOptions::new()).unwrap();
        assert_eq!(out, (1..=16).collect::<Vec<_>>());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let out: Vec<u8> = pool_map(Vec::<u8>::new(), |n, _| n, PoolOptions::new()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = pool_map(vec![1], |n: i32, _| n, PoolOptions::new().concurrency(0)).unwrap_err();
        assert!(matches!(err, BoardError::InvalidConcurrency { requested: 0, .. }));
    }

    #[test]
    fn excess_concurrency_is_rejected() {
        let too_many = available_parallelism() + 1;
        let err = pool_map(vec![1], |n: i32, _| n, PoolOptions::new().concurrency(too_many))
            .unwrap_err();
        assert!(matches!(
            err,
            BoardError::InvalidConcurrency { requested, .. } if requested == too_many
        ));
    }

    #[test]
    fn worker_status_reaches_board() {
        let ids: Vec<String> = (0..8).map(|i| format!("item-{i}")).collect();
        let options = BoardOptions::identifiers(ids.clone()).announce_deferred(false);
        let board = LineBoard::new(options, MemorySink::detached()).unwrap();

        let lengths = pool_map(
            ids,
            |id, status| {
                status.write_tagged(&id, "started");
                status.write_tagged(&id, &format!("finished {id}"));
                id.len()
            },
            PoolOptions::new().on_board(&board),
        )
        .unwrap();

        assert_eq!(lengths, vec![6; 8]);
        let snapshot = board.snapshot();
        for (i, row) in snapshot.iter().enumerate() {
            assert_eq!(row, &format!("finished item-{i}"));
        }
    }

    #[test]
    fn worker_panic_is_reraised() {
        let outcome = panic::catch_unwind(|| {
            pool_map(
                vec![1, 2, 3],
                |n: i32, _| {
                    assert!(n != 2, "item two fails");
                    n
                },
                PoolOptions::new().concurrency(1),
            )
        });
        assert!(outcome.is_err());
    }
}
